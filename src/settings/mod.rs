//! Centralized TOML-based settings system.
//!
//! Settings are loaded from `~/.slashkit/settings.toml` with environment
//! variable interpolation support for directory paths.
//!
//! # Usage
//!
//! ```rust,ignore
//! use slashkit_lib::settings::SettingsManager;
//!
//! let manager = SettingsManager::new().await?;
//! let settings = manager.get().await;
//! let timeout = settings.session.ask_timeout();
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    settings_path, slashkit_home, user_commands_dir, workspace_commands_dir, SettingsManager,
};
pub use schema::{CommandSettings, SessionSettings, SlashkitSettings, UiSettings};
