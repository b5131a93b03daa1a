//! CLI argument parsing

use crate::commands::{self, Outcome, RulesArgs, ValidateArgs};
use clap::{Parser, Subcommand};

/// ordercheck - validate customer order requests
#[derive(Parser, Debug)]
#[command(name = "ordercheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log rule assembly and validation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a customer request read from a JSON file
    Validate(ValidateArgs),

    /// Show the configured rule set
    Rules(RulesArgs),
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<Outcome> {
        match self.command {
            Commands::Validate(args) => commands::validate(args),
            Commands::Rules(args) => commands::show_rules(args),
        }
    }
}
