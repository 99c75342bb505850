use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use hippo_core::RunMode;
use hippo_engine::DEFAULT_HOST;

/// Scaffold project directories and READMEs from intranet project pages.
#[derive(Parser, Debug)]
#[command(name = "hipposcraper", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write the log to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Intranet the project pages live on
    #[arg(long, env = "HIPPOSCRAPER_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// Credentials file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scaffold the project directory and write its README
    Run(ProjectArgs),
    /// Scaffold the project directory only
    Dir(ProjectArgs),
    /// Write the README only
    Doc(ProjectArgs),
    /// Create or update the stored credentials
    Config(ConfigArgs),
}

impl Command {
    pub fn run_mode(&self) -> Option<RunMode> {
        match self {
            Command::Run(_) => Some(RunMode::Full),
            Command::Dir(_) => Some(RunMode::Scaffold),
            Command::Doc(_) => Some(RunMode::Readme),
            Command::Config(_) => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project page URLs
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Also write a check.sh style checker script
    #[arg(long)]
    pub checker: bool,

    /// Directory project directories are created in
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Author name for README footers
    #[arg(short = 'a', long)]
    pub author: Option<String>,

    /// GitHub username for README footers
    #[arg(short = 'g', long)]
    pub github: Option<String>,

    /// Intranet login
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Intranet password
    #[arg(short = 'p', long)]
    pub password: Option<String>,
}

impl ConfigArgs {
    pub fn is_empty(&self) -> bool {
        self.author.is_none()
            && self.github.is_none()
            && self.username.is_none()
            && self.password.is_none()
    }
}
