//! Command discovery and validation.
//!
//! The loader turns a [`CommandSource`] into validated commands. Nothing is
//! executed during loading; every rejected candidate is reported as a
//! [`LoadError`] and the remaining commands stay usable.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::definitions::builtin_commands;
use super::manifest::CommandManifest;
use super::models::{CommandInfo, PromptResult, SlashCommand};
use super::registry::CommandRegistry;
use crate::session::ExecutionContext;

/// File extension of declarative command manifests.
pub const MANIFEST_EXTENSION: &str = "toml";

/// Why a candidate command was not admitted.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("command from {origin} has an empty name")]
    EmptyName { origin: String },

    #[error("command name '{name}' from {origin} must not contain whitespace")]
    InvalidName { name: String, origin: String },

    #[error("command '{name}' from {origin} collides with an earlier command of the same name")]
    DuplicateName { name: String, origin: String },

    #[error("command '{name}' from {origin} has nothing to execute (missing template)")]
    MissingExecute { name: String, origin: String },

    #[error("command '{name}' from {origin}: {reason}")]
    Invalid {
        name: String,
        origin: String,
        reason: String,
    },

    #[error("failed to parse {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where commands come from.
pub enum CommandSource {
    /// Commands bundled with the crate.
    Builtin,
    /// An explicit registration call from the host.
    Static {
        label: String,
        commands: Vec<Arc<dyn SlashCommand>>,
    },
    /// A directory of `*.toml` command manifests.
    Directory(PathBuf),
}

impl CommandSource {
    pub fn commands(
        label: impl Into<String>,
        commands: impl IntoIterator<Item = Arc<dyn SlashCommand>>,
    ) -> Self {
        CommandSource::Static {
            label: label.into(),
            commands: commands.into_iter().collect(),
        }
    }

    /// Human-readable origin used in errors and logs.
    pub fn label(&self) -> String {
        match self {
            CommandSource::Builtin => "builtin".to_string(),
            CommandSource::Static { label, .. } => label.clone(),
            CommandSource::Directory(path) => path.display().to_string(),
        }
    }
}

impl fmt::Debug for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandSource").field(&self.label()).finish()
    }
}

/// A command that passed validation. Cheap to clone.
#[derive(Clone)]
pub struct ValidatedCommand {
    info: CommandInfo,
    command: Arc<dyn SlashCommand>,
}

impl ValidatedCommand {
    /// Check a single command against the contract.
    ///
    /// Uniqueness is a property of a load pass and is checked by the loader.
    pub fn validate(command: Arc<dyn SlashCommand>, origin: &str) -> Result<Self, LoadError> {
        let name = command.name();
        if name.trim().is_empty() {
            return Err(LoadError::EmptyName {
                origin: origin.to_string(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(LoadError::InvalidName {
                name: name.to_string(),
                origin: origin.to_string(),
            });
        }

        let info = CommandInfo {
            name: name.to_string(),
            description: command.description().to_string(),
            requires_args: command.requires_args(),
            enabled: command.enabled(),
        };
        Ok(Self { info, command })
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn description(&self) -> &str {
        &self.info.description
    }

    pub fn requires_args(&self) -> bool {
        self.info.requires_args
    }

    /// The enabled flag the command was loaded with.
    pub fn enabled(&self) -> bool {
        self.info.enabled
    }

    pub fn info(&self) -> &CommandInfo {
        &self.info
    }

    pub(crate) async fn execute(
        &self,
        args: &str,
        ctx: &ExecutionContext,
    ) -> anyhow::Result<Option<PromptResult>> {
        self.command.execute(args, ctx).await
    }
}

impl fmt::Debug for ValidatedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCommand")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Result of one load pass.
#[derive(Debug)]
pub struct LoadReport {
    pub source: String,
    pub commands: Vec<ValidatedCommand>,
    pub errors: Vec<LoadError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Register every accepted command, returning the errors.
    pub fn register_into(self, registry: &mut CommandRegistry) -> Vec<LoadError> {
        for command in self.commands {
            registry.register(command);
        }
        self.errors
    }
}

/// Discovers and validates commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandLoader;

impl CommandLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load one source as a single pass.
    ///
    /// Within a pass the first command with a given name wins and every later
    /// one is rejected with [`LoadError::DuplicateName`].
    pub fn load(&self, source: CommandSource) -> LoadReport {
        let label = source.label();
        let candidates: Vec<Result<Arc<dyn SlashCommand>, LoadError>> = match source {
            CommandSource::Builtin => builtin_commands().into_iter().map(Ok).collect(),
            CommandSource::Static { commands, .. } => commands.into_iter().map(Ok).collect(),
            CommandSource::Directory(dir) => discover_manifests(&dir),
        };

        let mut seen = HashSet::new();
        let mut report = LoadReport {
            source: label.clone(),
            commands: Vec::new(),
            errors: Vec::new(),
        };

        for candidate in candidates {
            let admitted = candidate
                .and_then(|command| ValidatedCommand::validate(command, &label))
                .and_then(|validated| {
                    if seen.insert(validated.name().to_string()) {
                        Ok(validated)
                    } else {
                        Err(LoadError::DuplicateName {
                            name: validated.name().to_string(),
                            origin: label.clone(),
                        })
                    }
                });

            match admitted {
                Ok(validated) => {
                    tracing::debug!("Loaded command /{} from {}", validated.name(), label);
                    report.commands.push(validated);
                }
                Err(e) => {
                    tracing::warn!("Rejected command: {}", e);
                    report.errors.push(e);
                }
            }
        }

        tracing::info!(
            "Loaded {} command(s) from {} ({} rejected)",
            report.commands.len(),
            label,
            report.errors.len()
        );
        report
    }

    /// Load several sources in order into `registry`.
    ///
    /// Each source is its own pass, so a later source replaces same-named
    /// commands from an earlier one.
    pub fn load_into(
        &self,
        registry: &mut CommandRegistry,
        sources: impl IntoIterator<Item = CommandSource>,
    ) -> Vec<LoadError> {
        sources
            .into_iter()
            .flat_map(|source| self.load(source).register_into(registry))
            .collect()
    }
}

/// Read every manifest in `dir`, sorted by file name.
///
/// A missing directory is not an error: user command directories are optional.
fn discover_manifests(dir: &Path) -> Vec<Result<Arc<dyn SlashCommand>, LoadError>> {
    if !dir.is_dir() {
        tracing::debug!("Command directory {:?} not found, skipping", dir);
        return Vec::new();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            return vec![Err(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })]
        }
    };

    let (paths, errors) = manifest_paths(dir, entries.map(|entry| entry.map(|e| e.path())));

    errors
        .into_iter()
        .map(Err)
        .chain(paths.into_iter().map(|path| -> Result<_, LoadError> {
            let contents = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let manifest = CommandManifest::parse(&path, &contents)?;
            let command = manifest.into_command(&path.display().to_string())?;
            Ok(Arc::new(command) as Arc<dyn SlashCommand>)
        }))
        .collect()
}

/// Split directory entries into sorted manifest paths and unreadable entries.
fn manifest_paths(
    dir: &Path,
    entries: impl IntoIterator<Item = io::Result<PathBuf>>,
) -> (Vec<PathBuf>, Vec<LoadError>) {
    let mut paths = Vec::new();
    let mut errors = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file()
                    && path.extension().is_some_and(|ext| ext == MANIFEST_EXTENSION)
                {
                    paths.push(path);
                }
            }
            Err(source) => errors.push(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            }),
        }
    }
    paths.sort();
    (paths, errors)
}
