//! Core functionality for alias storage
//!
//! Contains the `.yorc` format, the alias store built on it, and the
//! interactive edit workflow.

pub mod editor;
pub mod rcfile;
pub mod store;

pub use editor::{EditSession, EditState};
pub use rcfile::{RcDocument, RcParser};
pub use store::AliasStore;
