//! Registry for slash commands.
//!
//! The registry indexes validated commands by name and keeps them in
//! registration order, which reflects source priority for help listings.

use std::collections::HashMap;

use super::loader::ValidatedCommand;
use super::models::CommandInfo;
use crate::error::{Result, SlashkitError};

struct Entry {
    command: ValidatedCommand,
    enabled: bool,
}

/// Registry of invocable commands.
///
/// Commands are registered at startup and looked up by name when the user
/// types `/name`. Lookups never see disabled commands.
pub struct CommandRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a command, replacing any existing one with the same name.
    ///
    /// A replacement keeps the slot of the command it replaces and takes its
    /// enabled state from the new command. Returns the replaced command.
    pub fn register(&mut self, command: ValidatedCommand) -> Option<ValidatedCommand> {
        let enabled = command.enabled();
        let entry = Entry { command, enabled };

        let existing = self.index.get(entry.command.name()).copied();
        match existing {
            Some(slot) => {
                tracing::debug!("Replacing command /{}", entry.command.name());
                let previous = std::mem::replace(&mut self.entries[slot], entry);
                Some(previous.command)
            }
            None => {
                self.index
                    .insert(entry.command.name().to_string(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    /// Resolve an enabled command by name.
    ///
    /// Unknown and disabled commands are both `NotFound`.
    pub fn resolve(&self, name: &str) -> Result<ValidatedCommand> {
        self.index
            .get(name)
            .map(|&slot| &self.entries[slot])
            .filter(|entry| entry.enabled)
            .map(|entry| entry.command.clone())
            .ok_or_else(|| SlashkitError::NotFound(name.to_string()))
    }

    /// Enable or disable a registered command.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let slot = *self
            .index
            .get(name)
            .ok_or_else(|| SlashkitError::NotFound(name.to_string()))?;
        self.entries[slot].enabled = enabled;
        Ok(())
    }

    /// Current enabled state, or `None` for unknown commands.
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.index.get(name).map(|&slot| self.entries[slot].enabled)
    }

    /// Enabled commands in registration order.
    pub fn list(&self) -> Vec<ValidatedCommand> {
        self.entries
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.command.clone())
            .collect()
    }

    /// Get info about enabled commands, in registration order.
    pub fn list_info(&self) -> Vec<CommandInfo> {
        self.list().iter().map(|c| c.info().clone()).collect()
    }

    /// Every registered command, including disabled ones.
    ///
    /// `enabled` reflects the registry's current state.
    pub fn list_all(&self) -> Vec<CommandInfo> {
        self.entries
            .iter()
            .map(|entry| CommandInfo {
                enabled: entry.enabled,
                ..entry.command.info().clone()
            })
            .collect()
    }

    /// Check if a command is registered, enabled or not.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get the number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::models::{PromptResult, SlashCommand};
    use crate::session::ExecutionContext;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct TestCommand {
        name: &'static str,
        description: &'static str,
        enabled: bool,
    }

    #[async_trait]
    impl SlashCommand for TestCommand {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        fn enabled(&self) -> bool {
            self.enabled
        }

        async fn execute(
            &self,
            _args: &str,
            _ctx: &ExecutionContext,
        ) -> anyhow::Result<Option<PromptResult>> {
            Ok(None)
        }
    }

    fn validated(name: &'static str, description: &'static str, enabled: bool) -> ValidatedCommand {
        let command = Arc::new(TestCommand {
            name,
            description,
            enabled,
        });
        ValidatedCommand::validate(command, "test").unwrap()
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = CommandRegistry::new();
        registry.register(validated("test_command", "A test command", true));

        assert!(registry.contains("test_command"));
        assert!(!registry.contains("nonexistent"));

        let command = registry.resolve("test_command").unwrap();
        assert_eq!(command.name(), "test_command");
        assert_eq!(command.description(), "A test command");
    }

    #[test]
    fn test_disabled_command_is_not_found() {
        let mut registry = CommandRegistry::new();
        registry.register(validated("hidden", "Disabled at load", false));

        assert!(registry.contains("hidden"));
        assert!(matches!(
            registry.resolve("hidden"),
            Err(SlashkitError::NotFound(name)) if name == "hidden"
        ));
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_unknown_command_leaves_registry_usable() {
        let mut registry = CommandRegistry::new();
        registry.register(validated("known", "Known", true));

        assert!(matches!(
            registry.resolve("nonexistent"),
            Err(SlashkitError::NotFound(_))
        ));
        assert!(registry.resolve("known").is_ok());
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let mut registry = CommandRegistry::new();
        registry.register(validated("zeta", "Z", true));
        registry.register(validated("alpha", "A", true));
        registry.register(validated("mid", "M", false));

        let names: Vec<_> = registry.list_info().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_replace_keeps_slot_and_swaps_descriptor() {
        let mut registry = CommandRegistry::new();
        registry.register(validated("first", "1", true));
        registry.register(validated("second", "original", true));
        registry.register(validated("third", "3", true));

        let previous = registry.register(validated("second", "replacement", true));

        assert_eq!(previous.unwrap().description(), "original");
        assert_eq!(registry.len(), 3);
        let infos = registry.list_info();
        assert_eq!(infos[1].name, "second");
        assert_eq!(infos[1].description, "replacement");
    }

    #[test]
    fn test_replacement_takes_new_enabled_state() {
        let mut registry = CommandRegistry::new();
        registry.register(validated("cmd", "enabled", true));
        registry.register(validated("cmd", "disabled", false));

        assert!(registry.resolve("cmd").is_err());
        assert_eq!(registry.is_enabled("cmd"), Some(false));
    }

    #[test]
    fn test_set_enabled_toggles_resolution() {
        let mut registry = CommandRegistry::new();
        registry.register(validated("toggle", "T", true));

        registry.set_enabled("toggle", false).unwrap();
        assert!(registry.resolve("toggle").is_err());

        registry.set_enabled("toggle", true).unwrap();
        assert!(registry.resolve("toggle").is_ok());

        assert!(matches!(
            registry.set_enabled("missing", false),
            Err(SlashkitError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_all_includes_disabled() {
        let mut registry = CommandRegistry::new();
        registry.register(validated("on", "On", true));
        registry.register(validated("off", "Off", true));
        registry.set_enabled("off", false).unwrap();

        let all = registry.list_all();
        assert_eq!(all.len(), 2);
        assert!(all[0].enabled);
        assert!(!all[1].enabled);
        assert_eq!(all[1].name, "off");
    }
}
