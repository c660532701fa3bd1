//! Declarative commands defined in TOML.
//!
//! A manifest describes the whole dialogue: an optional banner, an optional
//! confirmation step, an ordered list of questions with defaults, and the
//! prompt template. Example:
//!
//! ```toml
//! name = "review"
//! description = "Review the current change"
//! banner = "Preparing a review checklist..."
//! template = """
//! Review the code in {{ cwd }} with a focus on {{ focus }}.
//! """
//!
//! [confirm]
//! question = "Review the working tree? (y/n)"
//! cancel_message = "Review cancelled."
//!
//! [[questions]]
//! key = "focus"
//! ask = "What should the review focus on?"
//! default = "correctness"
//! ```

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::assembler::{is_blank, PromptTemplate, Slots};
use super::loader::LoadError;
use super::models::{PromptResult, SlashCommand};
use crate::session::ExecutionContext;

/// Slot holding the raw invocation arguments.
pub const ARGS_SLOT: &str = "args";
/// Slot holding the working directory.
pub const CWD_SLOT: &str = "cwd";
/// What `{{ args }}` renders as when the command was invoked without arguments.
pub const ARGS_DEFAULT: &str = "none";

fn default_enabled() -> bool {
    true
}

fn default_cancel_message() -> String {
    "Cancelled.".to_string()
}

/// Raw manifest as read from disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub requires_args: bool,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Message said before anything else
    #[serde(default)]
    pub banner: Option<String>,

    #[serde(default)]
    pub confirm: Option<ConfirmStep>,

    #[serde(default)]
    pub questions: Vec<Question>,

    /// Prompt template; a manifest without one has nothing to execute
    #[serde(default)]
    pub template: Option<String>,
}

/// A yes/no gate; anything but the affirmative token cancels.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfirmStep {
    pub question: String,

    #[serde(default = "default_cancel_message")]
    pub cancel_message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Question {
    /// Template variable the answer is bound to
    pub key: String,

    /// Question text shown to the user
    pub ask: String,

    /// Used when the answer is blank
    #[serde(default)]
    pub default: Option<String>,
}

impl CommandManifest {
    pub fn parse(path: &Path, contents: &str) -> Result<Self, LoadError> {
        toml::from_str(contents).map_err(|e| LoadError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Validate the manifest and compile its template.
    pub fn into_command(self, origin: &str) -> Result<TemplateCommand, LoadError> {
        let name = self.name.unwrap_or_default();
        if is_blank(&name) {
            return Err(LoadError::EmptyName {
                origin: origin.to_string(),
            });
        }

        let invalid = |reason: String| LoadError::Invalid {
            name: name.clone(),
            origin: origin.to_string(),
            reason,
        };

        let source = self.template.ok_or_else(|| LoadError::MissingExecute {
            name: name.clone(),
            origin: origin.to_string(),
        })?;

        let mut keys = HashSet::new();
        let mut questions = Vec::with_capacity(self.questions.len());
        for question in self.questions {
            if !is_identifier(&question.key) {
                return Err(invalid(format!(
                    "question key '{}' is not a valid identifier",
                    question.key
                )));
            }
            if question.key == ARGS_SLOT || question.key == CWD_SLOT {
                return Err(invalid(format!(
                    "question key '{}' is reserved",
                    question.key
                )));
            }
            if !keys.insert(question.key.clone()) {
                return Err(invalid(format!(
                    "question key '{}' is declared twice",
                    question.key
                )));
            }
            let default = match question.default {
                Some(default) if !is_blank(&default) => default,
                _ => {
                    return Err(invalid(format!(
                        "question '{}' needs a non-blank default",
                        question.key
                    )))
                }
            };
            questions.push(ResolvedQuestion {
                key: question.key,
                ask: question.ask,
                default,
            });
        }

        let template = PromptTemplate::compile(name.clone(), source)
            .map_err(|e| invalid(format!("template does not parse: {}", e)))?;
        let variables = template
            .variables()
            .map_err(|e| invalid(format!("template does not parse: {}", e)))?;
        for variable in variables {
            if !keys.contains(&variable) && variable != ARGS_SLOT && variable != CWD_SLOT {
                return Err(invalid(format!(
                    "template uses '{}' which no question provides",
                    variable
                )));
            }
        }

        Ok(TemplateCommand {
            name,
            description: self.description,
            requires_args: self.requires_args,
            enabled: self.enabled,
            banner: self.banner,
            confirm: self.confirm,
            questions,
            template,
        })
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone)]
struct ResolvedQuestion {
    key: String,
    ask: String,
    default: String,
}

/// A command built from a validated manifest.
#[derive(Debug)]
pub struct TemplateCommand {
    name: String,
    description: String,
    requires_args: bool,
    enabled: bool,
    banner: Option<String>,
    confirm: Option<ConfirmStep>,
    questions: Vec<ResolvedQuestion>,
    template: PromptTemplate,
}

#[async_trait]
impl SlashCommand for TemplateCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn requires_args(&self) -> bool {
        self.requires_args
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn execute(
        &self,
        args: &str,
        ctx: &ExecutionContext,
    ) -> anyhow::Result<Option<PromptResult>> {
        if let Some(banner) = &self.banner {
            ctx.say(banner.as_str());
        }

        if let Some(confirm) = &self.confirm {
            if !ctx.confirm(confirm.question.as_str()).await? {
                ctx.say(confirm.cancel_message.as_str());
                return Ok(None);
            }
        }

        let mut slots = Slots::new();
        for question in &self.questions {
            let answer = ctx.ask(question.ask.as_str()).await?;
            slots.fill(question.key.as_str(), &answer, &question.default);
        }
        slots.fill(ARGS_SLOT, args, ARGS_DEFAULT);
        slots.fill(CWD_SLOT, &ctx.cwd().display().to_string(), ".");

        let prompt = self.template.render(&slots)?;
        Ok(Some(PromptResult::new(prompt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn manifest(toml: &str) -> CommandManifest {
        CommandManifest::parse(&PathBuf::from("test.toml"), toml).unwrap()
    }

    #[test]
    fn optional_flags_default() {
        let command = manifest("name = \"plain\"\ntemplate = \"Do the thing\"")
            .into_command("test")
            .unwrap();

        assert!(command.enabled());
        assert!(!command.requires_args());
        assert_eq!(command.description(), "");
    }

    #[test]
    fn missing_template_is_missing_execute() {
        let err = manifest("name = \"empty\"").into_command("test").unwrap_err();
        assert!(matches!(err, LoadError::MissingExecute { name, .. } if name == "empty"));
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = manifest("template = \"x\"").into_command("test").unwrap_err();
        assert!(matches!(err, LoadError::EmptyName { .. }));
    }

    #[test]
    fn unknown_fields_are_a_parse_error() {
        let err = CommandManifest::parse(
            &PathBuf::from("test.toml"),
            "name = \"x\"\ntemplate = \"x\"\nexecute = \"rm -rf\"",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Manifest { .. }));
    }

    #[test]
    fn question_without_default_is_rejected() {
        let err = manifest(
            r#"
            name = "q"
            template = "{{ topic }}"
            [[questions]]
            key = "topic"
            ask = "Topic?"
            "#,
        )
        .into_command("test")
        .unwrap_err();

        assert!(matches!(err, LoadError::Invalid { reason, .. } if reason.contains("default")));
    }

    #[test]
    fn template_variable_without_question_is_rejected() {
        let err = manifest(
            r#"
            name = "q"
            template = "{{ topic }} for {{ audience }}"
            [[questions]]
            key = "topic"
            ask = "Topic?"
            default = "general"
            "#,
        )
        .into_command("test")
        .unwrap_err();

        assert!(matches!(err, LoadError::Invalid { reason, .. } if reason.contains("audience")));
    }

    #[test]
    fn reserved_and_duplicate_keys_are_rejected() {
        let reserved = manifest(
            r#"
            name = "q"
            template = "x"
            [[questions]]
            key = "args"
            ask = "?"
            default = "d"
            "#,
        )
        .into_command("test");
        assert!(reserved.is_err());

        let duplicate = manifest(
            r#"
            name = "q"
            template = "x"
            [[questions]]
            key = "topic"
            ask = "?"
            default = "d"
            [[questions]]
            key = "topic"
            ask = "again?"
            default = "d"
            "#,
        )
        .into_command("test");
        assert!(duplicate.is_err());
    }

    #[test]
    fn template_may_use_builtin_functions() {
        let command = manifest(
            r#"
            name = "steps"
            template = "{% for i in range(2) %}step {{ i }} {% endfor %}in {{ cwd }}"
            "#,
        )
        .into_command("test")
        .unwrap();

        let slots = Slots::new().with(CWD_SLOT, "/work", ".");
        assert_eq!(
            command.template.render(&slots).unwrap(),
            "step 0 step 1 in /work"
        );
    }

    #[test]
    fn template_syntax_error_is_rejected() {
        let err = manifest("name = \"broken\"\ntemplate = \"{% if %}\"")
            .into_command("test")
            .unwrap_err();
        assert!(matches!(err, LoadError::Invalid { .. }));
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("topic"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("two words"));
        assert!(!is_identifier(""));
    }
}
