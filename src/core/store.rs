//! Alias store
//!
//! An ordered alias-name to command-string map held in the `[commands]`
//! section of one `.yorc` file. The store is bound to that file for its
//! whole lifetime: it is loaded from it and saved back to it, never
//! anywhere else.

use crate::{
    core::rcfile::{RcDocument, RcParser, Section},
    error::{Result, YoError},
    utils::fs::FileSystemUtils,
};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Name of the section holding the aliases
pub const COMMANDS_SECTION: &str = "commands";

/// Check that a name can be written as a key and read back unchanged
pub fn validate_alias_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.contains('=') {
        Some("name contains '='")
    } else if name.chars().any(char::is_whitespace) {
        Some("name contains whitespace")
    } else if name.starts_with(['[', '#', ';']) {
        Some("name starts with '[', '#' or ';'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(YoError::invalid_alias(name, reason)),
        None => Ok(()),
    }
}

/// Check that a command can be written as a value and read back unchanged
///
/// Lines after the first are always stored verbatim. The first line shares
/// its row with the key, so surrounding whitespace there would be lost.
pub fn validate_command(alias: &str, command: &str) -> Result<()> {
    let first = command.split('\n').next().unwrap_or_default();
    let reason = if command.contains('\r') {
        Some("command contains a carriage return")
    } else if first.trim() != first {
        Some("command starts or ends with whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(YoError::invalid_command(alias, reason)),
        None => Ok(()),
    }
}

/// One aligned row of `yo list` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow<'a> {
    /// Spaces needed to right-align `name` to the longest alias
    pub padding: usize,
    pub name: &'a str,
    pub command: &'a str,
}

/// Aliases loaded from a single config file
#[derive(Debug, Clone)]
pub struct AliasStore {
    path: PathBuf,
    doc: RcDocument,
}

impl AliasStore {
    /// An empty store bound to `path`
    pub fn empty<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            doc: RcDocument::new(),
        }
    }

    /// Load the store from `path`; a missing file yields an empty store
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let content = FileSystemUtils::new()
            .read_optional(path)
            .map_err(|e| YoError::file_system("read", path, e))?;

        let Some(content) = content else {
            debug!("No config file at {}, starting empty", path.display());
            return Ok(Self::empty(path));
        };

        let doc = RcParser::new()?.parse(&content, path)?;
        let store = Self {
            path: path.to_path_buf(),
            doc,
        };
        debug!("Loaded {} alias(es) from {}", store.len(), path.display());
        Ok(store)
    }

    /// Write the whole store back to its file, atomically
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&self) -> Result<()> {
        FileSystemUtils::new()
            .write_atomic(&self.path, self.doc.serialize())
            .map_err(|e| YoError::file_system("write", &self.path, e))?;

        debug!("Saved {} alias(es)", self.len());
        Ok(())
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commands(&self) -> Result<&Section> {
        self.doc
            .section(COMMANDS_SECTION)
            .ok_or_else(|| YoError::section_missing(&self.path))
    }

    fn commands_mut(&mut self) -> Result<&mut Section> {
        let path = &self.path;
        self.doc
            .section_mut(COMMANDS_SECTION)
            .ok_or_else(|| YoError::section_missing(path))
    }

    /// Insert or overwrite an alias, creating the section if needed
    pub fn set(&mut self, name: &str, command: &str) -> Result<()> {
        validate_alias_name(name)?;
        validate_command(name, command)?;

        debug!("Setting alias {} = '{}'", name, command);
        self.doc.section_or_insert(COMMANDS_SECTION).set(name, command);
        Ok(())
    }

    /// Remove an alias, returning its command
    pub fn remove(&mut self, name: &str) -> Result<String> {
        let path = self.path.clone();
        self.commands_mut()?
            .remove(name)
            .ok_or_else(|| YoError::alias_not_found(name, path))
    }

    /// Rename an alias; an existing `new` alias is overwritten
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        validate_alias_name(new)?;
        let path = self.path.clone();
        if self.commands_mut()?.rename(old, new) {
            debug!("Renamed alias {} -> {}", old, new);
            Ok(())
        } else {
            Err(YoError::alias_not_found(old, path))
        }
    }

    /// Command bound to `name`
    pub fn get(&self, name: &str) -> Result<&str> {
        self.commands()?
            .get(name)
            .ok_or_else(|| YoError::alias_not_found(name, &self.path))
    }

    pub fn len(&self) -> usize {
        self.doc.section(COMMANDS_SECTION).map_or(0, Section::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows for `yo list`, right-aligned on the longest name
    ///
    /// Fails with `SectionMissing` when there is nothing to list.
    pub fn listing(&self) -> Result<Vec<ListingRow<'_>>> {
        let commands = self.commands()?;
        if commands.is_empty() {
            return Err(YoError::section_missing(&self.path));
        }

        let width = commands
            .iter()
            .map(|e| e.key.chars().count())
            .max()
            .unwrap_or(0);

        Ok(commands
            .iter()
            .map(|e| ListingRow {
                padding: width - e.key.chars().count(),
                name: &e.key,
                command: &e.value,
            })
            .collect())
    }
}

impl PartialEq for AliasStore {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.doc == other.doc
    }
}
