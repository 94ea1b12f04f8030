//! Clap argument types.

use clap::Parser;
use std::path::PathBuf;

use bldconf::config::Overrides;

/// Resolve and inspect build-tool configuration.
#[derive(Parser, Debug)]
#[command(name = "bldconf", version)]
pub struct Cli {
    /// Store file to read instead of the global config.
    #[arg(long, global = true, env = bldconf::constants::ENV_RC)]
    pub rc: Option<PathBuf>,

    /// Interpreter version override (e.g. 3.10 or 310).
    #[arg(long, global = true)]
    pub python: Option<String>,

    /// Numeric-library version override (e.g. 1.8 or 18).
    #[arg(long, global = true)]
    pub numpy: Option<String>,

    /// Perl version override.
    #[arg(long, global = true)]
    pub perl: Option<String>,

    /// Build root directory override.
    #[arg(long, global = true)]
    pub croot: Option<PathBuf>,

    /// Show debug logs, including where each setting was resolved from.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved configuration summary (default).
    Show,

    /// Print every setting with the layer that supplied it.
    Explain,

    /// List registered link-error handlers.
    Handlers,
}

impl Cli {
    /// Explicit overrides collected from the command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            python: self.python.clone(),
            numpy: self.numpy.clone(),
            perl: self.perl.clone(),
            croot: self.croot.clone(),
        }
    }

    /// The requested command, `show` when none is given.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Show)
    }
}
