//! Command-line argument parsing and validation

use crate::core::store::validate_alias_name;
use clap::{Parser, Subcommand};

/// Yo command runner - named shortcuts for shell commands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "yo")]
pub struct Args {
    /// Use the global config in your home directory
    #[arg(short = 'g', long = "global", global = true)]
    pub global: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Initialize command file
    Init,

    /// Remove command file
    #[command(visible_alias = "wipe")]
    Destroy,

    /// Add command
    Add {
        /// The alias of the command
        #[arg(value_parser = parse_alias)]
        alias: String,

        /// The command to run
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Remove command
    #[command(visible_alias = "rm")]
    Remove {
        /// The alias of the command
        alias: String,
    },

    /// Rename command
    #[command(visible_alias = "mv")]
    Rename {
        /// The alias of the command
        old: String,

        /// The new alias of the command
        #[arg(value_parser = parse_alias)]
        new: String,
    },

    /// Run command
    Run {
        /// The alias of the command
        alias: String,
    },

    /// List available commands
    #[command(visible_alias = "ls")]
    List,

    /// Edit configuration
    Edit,
}

fn parse_alias(value: &str) -> Result<String, String> {
    validate_alias_name(value)
        .map(|()| value.to_string())
        .map_err(|e| e.to_string())
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
