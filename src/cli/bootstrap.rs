//! CLI bootstrap - Load settings and commands for CLI usage.
//!
//! This module provides `CliContext`, which owns everything a CLI invocation
//! needs: the terminal runtime, the populated registry and a session runner
//! bound to the workspace.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::command::{CommandLoader, CommandRegistry, CommandSource, LoadError};
use crate::runtime::CliRuntime;
use crate::session::SessionRunner;
use crate::settings::{
    user_commands_dir, workspace_commands_dir, SettingsManager, SlashkitSettings,
};

use super::args::Args;

/// Context for CLI execution containing all initialized services.
pub struct CliContext {
    /// Terminal runtime (also used directly by the REPL to read lines)
    pub runtime: Arc<CliRuntime>,

    /// Loaded commands
    pub registry: CommandRegistry,

    /// Runs invocations against `runtime` in `workspace`
    pub runner: SessionRunner,

    /// Resolved workspace path
    pub workspace: PathBuf,

    /// Settings manager
    pub settings_manager: Arc<SettingsManager>,

    /// Problems found while loading commands
    pub load_errors: Vec<LoadError>,

    /// Print the REPL welcome banner
    pub show_banner: bool,

    /// Command-line arguments
    pub args: Args,
}

/// Initialize the CLI context.
///
/// This is the main entry point for CLI initialization.
pub async fn initialize(args: &Args) -> Result<CliContext> {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        // Only warn on errors other than file not found
        if !matches!(e, dotenvy::Error::Io(_)) {
            tracing::warn!("Failed to load .env file: {}", e);
        }
    }

    init_logging(args.verbose);

    let workspace = args.resolve_workspace()?;

    if args.verbose {
        eprintln!("[cli] Workspace: {}", workspace.display());
    }

    let settings_manager = Arc::new(
        SettingsManager::new()
            .await
            .context("Failed to initialize settings manager")?,
    );

    // Ensure settings file exists (creates template on first run)
    if let Err(e) = settings_manager.ensure_settings_file().await {
        tracing::warn!("Failed to create settings template: {}", e);
    }

    let settings = settings_manager.get().await;

    if args.verbose {
        eprintln!(
            "[cli] Settings loaded from {}",
            settings_manager.path().display()
        );
    }

    let include_user = settings.commands.load_user_commands && !args.no_user_commands;
    let (registry, load_errors) = build_registry(&settings, &workspace, include_user);

    if !args.quiet {
        for error in &load_errors {
            eprintln!("Warning: {}", error);
        }
    }

    if args.verbose {
        eprintln!("[cli] {} command(s) available", registry.len());
    }

    let runtime =
        Arc::new(CliRuntime::new(args.json, args.quiet).with_answers(args.answers.clone()));

    let runner = SessionRunner::new(workspace.clone(), runtime.clone())
        .with_ask_timeout(settings.session.ask_timeout())
        .with_affirmative(settings.session.affirmative.clone());

    Ok(CliContext {
        runtime,
        registry,
        runner,
        workspace,
        settings_manager,
        load_errors,
        show_banner: settings.ui.show_banner,
        args: args.clone(),
    })
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match format!("slashkit_lib={}", log_level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Command sources in load order. Later sources replace same-named commands
/// from earlier ones, so workspace commands win over user commands, which win
/// over configured directories and built-ins.
pub fn command_sources(
    settings: &SlashkitSettings,
    workspace: &Path,
    include_user: bool,
) -> Vec<CommandSource> {
    let mut sources = vec![CommandSource::Builtin];
    sources.extend(
        settings
            .commands
            .directories
            .iter()
            .map(|dir| CommandSource::Directory(PathBuf::from(dir))),
    );
    if include_user {
        sources.push(CommandSource::Directory(user_commands_dir()));
        sources.push(CommandSource::Directory(workspace_commands_dir(workspace)));
    }
    sources
}

/// Load every source and apply the configured disabled list.
pub fn build_registry(
    settings: &SlashkitSettings,
    workspace: &Path,
    include_user: bool,
) -> (CommandRegistry, Vec<LoadError>) {
    let mut registry = CommandRegistry::new();
    let errors = CommandLoader::new().load_into(
        &mut registry,
        command_sources(settings, workspace, include_user),
    );

    for name in &settings.commands.disabled {
        if registry.set_enabled(name, false).is_err() {
            tracing::warn!("Cannot disable unknown command /{}", name);
        }
    }

    (registry, errors)
}
