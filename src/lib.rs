//! # Yo
//!
//! A command runner: named shortcuts for shell commands, stored in a
//! `.yorc` file in the working directory or, with `--global`, in the home
//! directory.
//!
//! ## Features
//!
//! - Add, remove, rename and list aliases
//! - Run an alias through the platform shell
//! - Edit the raw config file in `$EDITOR` with header validation
//! - Atomic rewrites of the config file
//!
//! ## Example
//!
//! ```no_run
//! use yo::core::AliasStore;
//!
//! let mut store = AliasStore::load(std::path::Path::new(".yorc"))?;
//! store.set("build", "make -j4")?;
//! store.save()?;
//! println!("build = {}", store.get("build")?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Concurrent invocations against the same file are not coordinated: each
//! one rewrites the whole file, so the last save wins.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use utils::env::EnvUtils;

/// Initialize logging with appropriate verbosity
///
/// Logs go to stderr. `YO_LOG` overrides the level chosen by `debug`.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = match EnvUtils::log_filter() {
        Some(directive) => EnvFilter::try_new(directive)?,
        None if debug => EnvFilter::new("debug"),
        None => EnvFilter::new("warn"),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
