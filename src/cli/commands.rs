//! Command implementations for the CLI
//!
//! Each handler resolves the scope to a config file, runs the store
//! operations for its command and writes user-facing output to `out`.

use crate::{
    cli::Command,
    config::Config,
    core::{
        editor::EditSession,
        store::AliasStore,
    },
    error::YoError,
    utils::{fs::FileSystemUtils, process::ProcessRunner},
};
use anstyle::{AnsiColor, Color, Style};
use anyhow::Context;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Contents of a freshly initialized config file
pub const INIT_HEADER: &str = "# This is the command file\n\n";

const HEADING_STYLE: Style = Style::new().bold();
const ALIAS_STYLE: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Blue)));

/// Execute the appropriate command based on CLI arguments
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(config, command, &mut out)
}

/// Run `command` against the scope selected in `config`, writing to `out`
#[instrument(skip(config, out))]
pub fn dispatch(config: &Config, command: &Command, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Init => init(config, out),
        Command::Destroy => destroy(config, out),
        Command::Add { alias, command } => add(config, alias, command, out),
        Command::Remove { alias } => remove(config, alias, out),
        Command::Rename { old, new } => rename(config, old, new, out),
        Command::Run { alias } => run(config, alias),
        Command::List => list(config, out),
        Command::Edit => edit(config),
    }
}

/// Exit code for a failed command
///
/// The first [`YoError`] in the chain decides; anything else is 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<YoError>())
        .map_or(1, YoError::exit_code)
}

fn load(path: &Path) -> anyhow::Result<AliasStore> {
    AliasStore::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn save(store: &AliasStore) -> anyhow::Result<()> {
    store
        .save()
        .with_context(|| format!("Failed to save {}", store.path().display()))
}

/// Create the config file with only the comment header
#[instrument(skip(config, out))]
fn init(config: &Config, out: &mut dyn Write) -> anyhow::Result<()> {
    let path = config.resolve_path()?;
    let fs_utils = FileSystemUtils::new();

    if fs_utils.is_file(&path) {
        return Err(YoError::already_initialized(&path).into());
    }

    fs_utils
        .create_new(&path, INIT_HEADER)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => YoError::already_initialized(&path),
            _ => YoError::file_system("create", &path, e),
        })?;

    writeln!(out, "Yo, initialized {}", path.display())?;
    Ok(())
}

/// Delete the config file; absent files are not an error
#[instrument(skip(config, out))]
fn destroy(config: &Config, out: &mut dyn Write) -> anyhow::Result<()> {
    let path = config.resolve_path()?;

    let removed = FileSystemUtils::new()
        .remove_file_if_exists(&path)
        .map_err(|e| YoError::file_system("remove", &path, e))?;

    if removed {
        writeln!(out, "Yo, removed {}", path.display())?;
    } else {
        debug!("Nothing to remove at {}", path.display());
    }
    Ok(())
}

#[instrument(skip(config, out))]
fn add(
    config: &Config,
    alias: &str,
    tokens: &[String],
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let command = tokens.join(" ");

    let mut store = load(&config.resolve_path()?)?;
    store.set(alias, &command)?;
    save(&store)?;

    writeln!(out, "Yo, added command: {alias}={command}")?;
    Ok(())
}

#[instrument(skip(config, out))]
fn remove(config: &Config, alias: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut store = load(&config.resolve_path()?)?;
    store.remove(alias)?;
    save(&store)?;

    writeln!(out, "Yo, removed command: {alias}")?;
    Ok(())
}

#[instrument(skip(config, out))]
fn rename(config: &Config, old: &str, new: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut store = load(&config.resolve_path()?)?;
    store.rename(old, new)?;
    save(&store)?;

    writeln!(out, "Yo, renamed command {old} to {new}")?;
    Ok(())
}

/// Run the aliased command through the shell and wait for it
///
/// The child's exit status is logged, not propagated.
#[instrument(skip(config))]
fn run(config: &Config, alias: &str) -> anyhow::Result<()> {
    let store = load(&config.resolve_path()?)?;
    let command = store.get(alias)?;

    let status = ProcessRunner::new(config.debug).run_shell(command)?;
    if !status.success() {
        warn!("`{}` exited with {}", alias, status);
    }
    Ok(())
}

#[instrument(skip(config, out))]
fn list(config: &Config, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = load(&config.resolve_path()?)?;
    let rows = store.listing()?;

    let (heading, alias) = if config.color {
        (HEADING_STYLE, ALIAS_STYLE)
    } else {
        (Style::new(), Style::new())
    };

    writeln!(out)?;
    writeln!(out, "{heading}Available commands{heading:#}")?;
    writeln!(out)?;
    for row in rows {
        writeln!(
            out,
            "{:pad$}{alias}{}{alias:#} = {}",
            "",
            row.name,
            row.command,
            pad = row.padding
        )?;
    }
    writeln!(out)?;
    Ok(())
}

#[instrument(skip(config))]
fn edit(config: &Config) -> anyhow::Result<()> {
    let path = config.resolve_path()?;
    let runner = ProcessRunner::new(config.debug);

    EditSession::new(path, &config.editor, &runner).run()?;
    Ok(())
}
