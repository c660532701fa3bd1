//! Settings loading and environment variable interpolation.
//!
//! The `SettingsManager` handles:
//! - Loading settings from `~/.slashkit/settings.toml`
//! - Resolving `$VAR` and `${VAR}` environment variable references
//! - First-run template generation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::RwLock;

use super::schema::{SessionSettings, SlashkitSettings};

/// Embedded template for first-run generation.
const TEMPLATE: &str = include_str!("template.toml");

/// Name of the per-user and per-workspace configuration directory.
pub const CONFIG_DIR: &str = ".slashkit";

/// `~/.slashkit`, or `./.slashkit` when there is no home directory.
pub fn slashkit_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

/// Get the path to the global settings file.
pub fn settings_path() -> PathBuf {
    slashkit_home().join("settings.toml")
}

/// Manifest directory shared by every workspace.
pub fn user_commands_dir() -> PathBuf {
    slashkit_home().join("commands")
}

/// Manifest directory of a single workspace.
pub fn workspace_commands_dir(workspace: &Path) -> PathBuf {
    workspace.join(CONFIG_DIR).join("commands")
}

/// Manages settings loading and interpolation.
pub struct SettingsManager {
    /// Cached settings (with env vars resolved)
    settings: RwLock<SlashkitSettings>,

    /// Path to the settings file
    path: PathBuf,
}

impl SettingsManager {
    /// Create a new SettingsManager, loading from disk if available.
    pub async fn new() -> Result<Self> {
        Self::with_path(settings_path()).await
    }

    /// Create a SettingsManager backed by a specific file.
    pub async fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = Self::load_from_path(&path).await?;

        Ok(Self {
            settings: RwLock::new(settings),
            path,
        })
    }

    /// Load settings from a specific path.
    async fn load_from_path(path: &Path) -> Result<SlashkitSettings> {
        if !path.exists() {
            tracing::debug!("Settings file not found at {:?}, using defaults", path);
            return Ok(SlashkitSettings::default());
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings file {:?}", path))?;

        let mut settings: SlashkitSettings =
            toml::from_str(&contents).context("Failed to deserialize settings")?;

        Self::resolve_env_vars(&mut settings);
        Self::apply_fallbacks(&mut settings);

        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Resolve $ENV_VAR references in path-valued fields.
    fn resolve_env_vars(settings: &mut SlashkitSettings) {
        for dir in settings.commands.directories.iter_mut() {
            if let Some(resolved) = resolve_env_ref(dir) {
                *dir = resolved;
            }
        }
    }

    /// Replace values that would change behavior in a surprising way.
    fn apply_fallbacks(settings: &mut SlashkitSettings) {
        // A blank token would turn an empty answer into a confirmation
        if settings.session.affirmative.trim().is_empty() {
            let fallback = SessionSettings::default().affirmative;
            tracing::warn!(
                "session.affirmative is blank, using {:?} instead",
                fallback
            );
            settings.session.affirmative = fallback;
        }
    }

    /// Get the current settings (read-only).
    pub async fn get(&self) -> SlashkitSettings {
        self.settings.read().await.clone()
    }

    /// Check if settings file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Get the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure settings file exists, creating from template if needed.
    ///
    /// Returns `true` if a new file was created.
    pub async fn ensure_settings_file(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, TEMPLATE).await?;
        tracing::info!("Generated settings template at {:?}", self.path);
        Ok(true)
    }
}

/// Resolve a $ENV_VAR or ${ENV_VAR} reference.
///
/// Returns `Some(resolved)` if the value starts with `$` and the env var exists.
/// Returns `None` if no env var reference or env var not set.
fn resolve_env_ref(value: &str) -> Option<String> {
    let trimmed = value.trim();

    if let Some(rest) = trimmed.strip_prefix('$') {
        let var_name = rest
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .unwrap_or(rest);

        return std::env::var(var_name).ok();
    }

    None
}
