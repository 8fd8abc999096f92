use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vcxsync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Register generated C++ files in a Visual Studio project", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the .vcxproj file
    pub project: PathBuf,

    /// Generated .cpp and .h files to register
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory scanned for header folders [default: <project dir>/Source/Runtime]
    #[arg(long, value_name = "DIR", conflicts_with = "no_include_dirs")]
    pub include_root: Option<PathBuf>,

    /// Leave AdditionalIncludeDirectories alone
    #[arg(long)]
    pub no_include_dirs: bool,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 2 if any step failed
    #[arg(long)]
    pub strict: bool,

    /// TOML file overriding the project conventions
    #[arg(long, value_name = "FILE", env = "VCXSYNC_CONFIG")]
    pub config: Option<PathBuf>,
}
