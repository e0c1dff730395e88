//! Error types for yo
//!
//! Every failure an operation can hit is a variant of [`YoError`]. The
//! binary maps each variant to its own process exit code.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for alias store and dispatcher operations
#[derive(Error, Debug)]
pub enum YoError {
    /// The directory backing the selected scope could not be determined
    #[error("Cannot resolve config location: {message}")]
    PathResolution { message: String },

    /// The config file has no `[commands]` section (or it is empty)
    #[error("No commands defined in {path}, add one with `yo add`")]
    SectionMissing { path: PathBuf },

    /// Lookup, removal or rename of an alias that is not in the store
    #[error("No such command: {alias}")]
    AliasNotFound { alias: String, path: PathBuf },

    /// `init` against a config file that already exists
    #[error("Yo, you already have a command file at {path}")]
    AlreadyInitialized { path: PathBuf },

    /// The interactive edit was abandoned; the target file is untouched
    #[error("{reason}")]
    EditCancelled { reason: EditCancelReason },

    /// Alias name that cannot be represented in the config file
    #[error("Invalid alias '{alias}': {reason}")]
    InvalidAlias { alias: String, reason: String },

    /// Command string that would not read back unchanged from the config file
    #[error("Invalid command for '{alias}': {reason}")]
    InvalidCommand { alias: String, reason: String },

    /// Config file syntax errors
    #[error("Parse error in {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// File system operation errors
    #[error("File system error: {operation} failed on {path}")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A built-in parser pattern failed to compile
    #[error("Invalid parser pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A child process could not be started
    #[error("Process error: failed to start `{command}`")]
    Process {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why an interactive edit did not commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCancelReason {
    /// The scratch file modification time did not move
    NoChanges,
    /// The two-line comment header was altered
    CorruptHeader,
    /// The editor exited unsuccessfully
    EditorFailed { code: Option<i32> },
}

impl fmt::Display for EditCancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChanges => f.write_str("No changes detected, cancelling edit"),
            Self::CorruptHeader => f.write_str("Temp file header is corrupt, aborting"),
            Self::EditorFailed { code: Some(code) } => {
                write!(f, "Editor exited with code {code}, cancelling edit")
            }
            Self::EditorFailed { code: None } => {
                f.write_str("Editor was terminated by a signal, cancelling edit")
            }
        }
    }
}

impl YoError {
    /// Create a new path resolution error
    pub fn path_resolution(message: impl Into<String>) -> Self {
        Self::PathResolution {
            message: message.into(),
        }
    }

    /// Create a new missing section error
    pub fn section_missing<P: Into<PathBuf>>(path: P) -> Self {
        Self::SectionMissing { path: path.into() }
    }

    /// Create a new alias not found error
    pub fn alias_not_found<P: Into<PathBuf>>(alias: impl Into<String>, path: P) -> Self {
        Self::AliasNotFound {
            alias: alias.into(),
            path: path.into(),
        }
    }

    /// Create a new already initialized error
    pub fn already_initialized<P: Into<PathBuf>>(path: P) -> Self {
        Self::AlreadyInitialized { path: path.into() }
    }

    /// Create a new edit cancelled error
    pub const fn edit_cancelled(reason: EditCancelReason) -> Self {
        Self::EditCancelled { reason }
    }

    /// Create a new invalid alias error
    pub fn invalid_alias(alias: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAlias {
            alias: alias.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid command error
    pub fn invalid_command(alias: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCommand {
            alias: alias.into(),
            reason: reason.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<P: Into<PathBuf>>(path: P, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new process error
    pub fn process(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Process {
            command: command.into(),
            source,
        }
    }

    /// Process exit code reported for this error
    ///
    /// Code 2 is left to clap for usage errors.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::FileSystem { .. }
            | Self::Parse { .. }
            | Self::Regex(_)
            | Self::Process { .. } => 1,
            Self::PathResolution { .. } => 3,
            Self::SectionMissing { .. } => 4,
            Self::AliasNotFound { .. } => 5,
            Self::AlreadyInitialized { .. } => 6,
            Self::EditCancelled { .. } => 7,
            Self::InvalidAlias { .. } => 8,
            Self::InvalidCommand { .. } => 9,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, YoError>;
