//! CLI argument definitions.
//!
//! Every flag is optional: a bare invocation runs the whole install
//! unattended and asks only whether to launch the application at the end.

use clap::Parser;

use crate::config::{DEFAULT_BOOTSTRAP_URL, DEFAULT_REPO_URL};
use crate::runner::LaunchPolicy;
use crate::ui::OutputMode;

/// Install Limpeza David and its dependencies for the current user.
#[derive(Debug, Parser)]
#[command(name = "limpeza-install")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Launch the application when done without asking
    #[arg(short, long, conflicts_with = "no_launch")]
    pub yes: bool,

    /// Never launch the application when done
    #[arg(long)]
    pub no_launch: bool,

    /// Git repository to install from
    #[arg(long, env = "LIMPEZA_REPO_URL", default_value = DEFAULT_REPO_URL)]
    pub repo_url: String,

    /// URL of the pip bootstrap script used when pip cannot be installed otherwise
    #[arg(long, env = "LIMPEZA_BOOTSTRAP_URL", default_value = DEFAULT_BOOTSTRAP_URL)]
    pub bootstrap_url: String,

    /// Never download and run the pip bootstrap script
    #[arg(long)]
    pub no_bootstrap_script: bool,

    /// Print the install report as JSON instead of the summary
    #[arg(long)]
    pub json: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Output mode implied by the flags. JSON output keeps stdout clean.
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Silent
        } else if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    /// Whether to launch the application at the end.
    pub fn launch_policy(&self) -> LaunchPolicy {
        if self.no_launch {
            LaunchPolicy::Never
        } else if self.yes {
            LaunchPolicy::Always
        } else {
            LaunchPolicy::Ask
        }
    }
}
