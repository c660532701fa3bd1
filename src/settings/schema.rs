//! Settings schema definitions for slashkit configuration.
//!
//! All settings structs use `#[serde(default)]` to allow partial configuration files.
//! Missing fields are filled with sensible defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root settings structure.
///
/// Loaded from `~/.slashkit/settings.toml` with environment variable interpolation support.
/// Version field enables future migrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashkitSettings {
    /// Schema version for migrations
    pub version: u32,

    /// Command discovery and availability
    pub commands: CommandSettings,

    /// Dialogue behavior
    pub session: SessionSettings,

    /// Terminal presentation
    pub ui: UiSettings,
}

/// Where commands come from and which ones are switched off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    /// Commands registered but not resolvable
    pub disabled: Vec<String>,

    /// Extra manifest directories, loaded before the user and workspace ones
    /// (supports $ENV_VAR syntax)
    pub directories: Vec<String>,

    /// Load `~/.slashkit/commands` and `<workspace>/.slashkit/commands`
    pub load_user_commands: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Fail a session when one answer takes longer than this; unset waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_timeout_secs: Option<u64>,

    /// Token accepted as "yes" by confirmation questions (case-insensitive)
    pub affirmative: String,
}

impl SessionSettings {
    pub fn ask_timeout(&self) -> Option<Duration> {
        self.ask_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Print the welcome banner when the REPL starts
    pub show_banner: bool,
}

impl Default for SlashkitSettings {
    fn default() -> Self {
        Self {
            version: 1,
            commands: CommandSettings::default(),
            session: SessionSettings::default(),
            ui: UiSettings::default(),
        }
    }
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            directories: Vec::new(),
            load_user_commands: true,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ask_timeout_secs: None,
            affirmative: "y".to_string(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { show_banner: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = SlashkitSettings::default();
        assert_eq!(settings.version, 1);
        assert!(settings.commands.disabled.is_empty());
        assert!(settings.commands.load_user_commands);
        assert_eq!(settings.session.affirmative, "y");
        assert_eq!(settings.session.ask_timeout(), None);
        assert!(settings.ui.show_banner);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            version = 1
            [session]
            ask_timeout_secs = 90
        "#;

        let settings: SlashkitSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.session.ask_timeout(), Some(Duration::from_secs(90)));
        // Defaults should fill in missing fields
        assert_eq!(settings.session.affirmative, "y");
        assert!(settings.commands.load_user_commands);
    }

    #[test]
    fn test_parse_commands_table() {
        let toml = r#"
            [commands]
            disabled = ["new-blog"]
            directories = ["/opt/team-commands"]
            load_user_commands = false
        "#;

        let settings: SlashkitSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.commands.disabled, vec!["new-blog"]);
        assert_eq!(settings.commands.directories, vec!["/opt/team-commands"]);
        assert!(!settings.commands.load_user_commands);
    }

    #[test]
    fn test_serialize_settings() {
        let settings = SlashkitSettings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[commands]"));
        assert!(!toml_str.contains("ask_timeout_secs"));

        let parsed: SlashkitSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
    }
}
