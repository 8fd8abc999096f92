use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a progress line for something that was added
pub fn added(what: &str, value: &str) {
    println!("{}", added_line(what, value));
}

fn added_line(what: &str, value: &str) -> String {
    format!("{} {what}: {value}", "[+]".green().bold())
}

/// Print a line diff between two versions of a document
pub fn diff(before: &str, after: &str) {
    let diff = similar::TextDiff::from_lines(before, after);

    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => {
                print!("    {}", format!("- {change}").red());
            }
            similar::ChangeTag::Insert => {
                print!("    {}", format!("+ {change}").green());
            }
            similar::ChangeTag::Equal => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_line() {
        colored::control::set_override(false);
        assert_eq!(
            added_line("CPP", r"Gen\Foo.generated.cpp"),
            r"[+] CPP: Gen\Foo.generated.cpp"
        );
    }
}
