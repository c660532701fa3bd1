//! Built-in command definitions.
//!
//! Each command is defined in its own submodule and implements the
//! `SlashCommand` trait. Prompt text lives next to them in `templates/`.

mod clean_and_refactor;
mod new_blog;
mod test_all;

use std::sync::Arc;

use super::loader::{CommandLoader, CommandSource, LoadError};
use super::models::SlashCommand;
use super::registry::CommandRegistry;

pub use clean_and_refactor::CleanAndRefactorCommand;
pub use new_blog::NewBlogCommand;
pub use test_all::TestAllCommand;

/// All built-in commands, in listing order.
pub fn builtin_commands() -> Vec<Arc<dyn SlashCommand>> {
    vec![
        Arc::new(CleanAndRefactorCommand),
        Arc::new(NewBlogCommand),
        Arc::new(TestAllCommand),
    ]
}

/// Create a registry with all built-in commands pre-registered.
pub fn create_default_registry() -> (CommandRegistry, Vec<LoadError>) {
    let mut registry = CommandRegistry::new();
    let errors = CommandLoader::new().load_into(&mut registry, [CommandSource::Builtin]);
    (registry, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::assembler::PromptTemplate;

    #[test]
    fn default_registry_lists_builtins() {
        let (registry, errors) = create_default_registry();

        assert!(errors.is_empty());
        let infos = registry.list_info();
        assert_eq!(infos.len(), 3);
        assert!(infos.iter().all(|i| i.enabled && !i.requires_args));
        assert!(infos.iter().all(|i| !i.description.is_empty()));
    }

    #[test]
    fn builtin_templates_parse() {
        for (name, source) in [
            ("clean-and-refactor", clean_and_refactor::TEMPLATE),
            ("new-blog", new_blog::TEMPLATE),
            ("test-all", test_all::TEMPLATE),
        ] {
            assert!(
                PromptTemplate::compile(name, source).is_ok(),
                "template for {} does not parse",
                name
            );
        }
    }
}
