//! Environment lookups
//!
//! Everything yo reads from the process environment goes through here, so
//! the rest of the crate works on plain values.

use std::env;
use std::path::PathBuf;

/// Variable naming the interactive editor
pub const EDITOR_VAR: &str = "EDITOR";

/// Editor used when `EDITOR` is unset or blank
pub const DEFAULT_EDITOR: &str = "vi";

/// Variable holding a full `tracing` filter directive
pub const LOG_VAR: &str = "YO_LOG";

/// Environment variable utilities
#[derive(Debug)]
pub struct EnvUtils;

impl EnvUtils {
    /// Editor command line from `EDITOR`, falling back to `vi`
    pub fn editor() -> String {
        Self::editor_from(env::var(EDITOR_VAR).ok())
    }

    /// Pick the editor from an optional raw `EDITOR` value
    pub fn editor_from(value: Option<String>) -> String {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }

    /// The user's home directory, if one can be determined
    pub fn home_dir() -> Option<PathBuf> {
        dirs::home_dir()
    }

    /// Log filter override, if set
    pub fn log_filter() -> Option<String> {
        env::var(LOG_VAR).ok().filter(|v| !v.trim().is_empty())
    }
}
