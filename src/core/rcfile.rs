//! `.yorc` file format
//!
//! A line-oriented format of `key=value` entries grouped under `[section]`
//! headers. Values are opaque strings, never coerced. Comment lines start
//! with `#` or `;`. Comments and blank lines before the first section are
//! kept as a preamble so the header written by `init` survives rewrites.
//!
//! A value spans several lines when the lines after its entry are indented.
//! The serializer indents them with one tab, and the parser strips exactly
//! that tab, so blank lines, padding and `#` inside a value are kept as is.
//! Hand-written continuations indented with spaces are trimmed instead.

use crate::error::{Result, YoError};
use regex::Regex;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, instrument};

/// One `key=value` line (plus any continuation lines)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// A named, insertion-ordered group of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].value.as_str())
    }

    /// Insert or overwrite; an existing key keeps its position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.entries[i].value = value,
            None => self.entries.push(Entry { key, value }),
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.entries.remove(i).value)
    }

    /// Change the key of an entry
    ///
    /// A fresh `new` key takes over the position of `old`. If `new` already
    /// exists its value is overwritten in place and `old` is dropped.
    /// Returns `false` when `old` is absent.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(old_idx) = self.position(old) else {
            return false;
        };
        if old == new {
            return true;
        }
        match self.position(new) {
            Some(new_idx) => {
                let entry = self.entries.remove(old_idx);
                let new_idx = if new_idx > old_idx { new_idx - 1 } else { new_idx };
                self.entries[new_idx].value = entry.value;
            }
            None => self.entries[old_idx].key = new.to_string(),
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed contents of a `.yorc` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RcDocument {
    preamble: Vec<String>,
    sections: Vec<Section>,
}

impl RcDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment and blank lines preceding the first section
    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Get a section, appending an empty one if needed
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    /// Render the document back to text
    pub fn serialize(&self) -> String {
        let mut out = String::new();

        for line in &self.preamble {
            out.push_str(line);
            out.push('\n');
        }

        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", section.name);
            for entry in &section.entries {
                let mut lines = entry.value.split('\n');
                let first = lines.next().unwrap_or_default();
                let _ = writeln!(out, "{}={}", entry.key, first);
                for continuation in lines {
                    let _ = writeln!(out, "\t{continuation}");
                }
            }
        }

        out
    }
}

/// Line-based `.yorc` parser
pub struct RcParser {
    /// Regex for `[section]` header lines
    re_section: Regex,
    /// Regex for `key=value` lines
    re_entry: Regex,
}

impl RcParser {
    /// Create a new parser
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_section: Regex::new(r"^\[\s*([^\]]+?)\s*\]$")?,
            re_entry: Regex::new(r"^([^=]+?)\s*=(.*)$")?,
        })
    }

    /// Parse file contents; `path` only labels errors
    #[instrument(skip(self, content))]
    pub fn parse(&self, content: &str, path: &Path) -> Result<RcDocument> {
        let mut doc = RcDocument::new();
        let mut current: Option<usize> = None;
        let mut last_key: Option<String> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;

            // Indented lines extend the previous value, even if blank or `#`
            if raw.starts_with(char::is_whitespace) {
                if let (Some(section), Some(key)) = (current, last_key.as_deref()) {
                    let section = &mut doc.sections[section];
                    if let Some(i) = section.position(key) {
                        let line = raw.strip_prefix('\t').unwrap_or_else(|| raw.trim_start());
                        let value = &mut section.entries[i].value;
                        value.push('\n');
                        value.push_str(line);
                    }
                    continue;
                }
            }

            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                if current.is_none() {
                    doc.preamble.push(raw.to_string());
                }
                last_key = None;
                continue;
            }

            if let Some(cap) = self.re_section.captures(trimmed) {
                let name = &cap[1];
                debug!("Section [{}] at line {}", name, line_no);
                doc.section_or_insert(name);
                current = doc.sections.iter().position(|s| s.name == name);
                last_key = None;
                continue;
            }

            if let Some(cap) = self.re_entry.captures(trimmed) {
                let Some(section) = current else {
                    return Err(YoError::parse(
                        path,
                        line_no,
                        "entry appears before any [section] header",
                    ));
                };
                let key = cap[1].to_string();
                let value = cap[2].trim().to_string();
                debug!("Entry {} = '{}'", key, value);
                doc.sections[section].set(key.clone(), value);
                last_key = Some(key);
                continue;
            }

            return Err(YoError::parse(
                path,
                line_no,
                format!("expected `[section]` or `key=value`, found '{trimmed}'"),
            ));
        }

        debug!(
            "Parsed {} preamble line(s) and {} section(s)",
            doc.preamble.len(),
            doc.sections.len()
        );
        Ok(doc)
    }
}
