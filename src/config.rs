//! Per-invocation context
//!
//! A [`Config`] is built once from the parsed arguments and the
//! environment, then handed to every operation handler.

use crate::{
    cli::Args,
    error::{Result, YoError},
    utils::env::EnvUtils,
};
use std::io::IsTerminal;
use std::path::PathBuf;

/// File name of the alias config in either scope
pub const RC_FILE_NAME: &str = ".yorc";

/// Which config file an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// `<cwd>/.yorc`
    #[default]
    Local,
    /// `<home>/.yorc`
    Global,
}

impl Scope {
    pub const fn from_global_flag(global: bool) -> Self {
        if global { Self::Global } else { Self::Local }
    }
}

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Selected scope
    pub scope: Scope,
    /// Config file name inside the scope directory
    pub file_name: String,
    /// Working directory, if it could be determined
    pub cwd: Option<PathBuf>,
    /// Home directory, if it could be determined
    pub home: Option<PathBuf>,
    /// Editor command line for `edit`
    pub editor: String,
    /// Whether listings may use ANSI styling
    pub color: bool,
}

impl Config {
    /// Configuration for explicit directories, with defaults elsewhere
    pub fn new(scope: Scope, cwd: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            debug: false,
            scope,
            file_name: RC_FILE_NAME.to_string(),
            cwd,
            home,
            editor: EnvUtils::editor_from(None),
            color: false,
        }
    }

    /// Create configuration from command line arguments and the environment
    pub fn from_args(args: &Args) -> Self {
        Self {
            debug: args.debug,
            editor: EnvUtils::editor(),
            color: std::io::stdout().is_terminal(),
            ..Self::new(
                Scope::from_global_flag(args.global),
                std::env::current_dir().ok(),
                EnvUtils::home_dir(),
            )
        }
    }

    /// Config file path for the selected scope
    pub fn resolve_path(&self) -> Result<PathBuf> {
        let dir = match self.scope {
            Scope::Local => self
                .cwd
                .as_ref()
                .ok_or_else(|| YoError::path_resolution("current directory is unavailable"))?,
            Scope::Global => self
                .home
                .as_ref()
                .ok_or_else(|| YoError::path_resolution("home directory is unknown"))?,
        };
        Ok(dir.join(&self.file_name))
    }
}
