//! Prompt assembly: template text plus collected answers.
//!
//! Every interpolation point goes through a [`Slots`] entry that was filled
//! with a fallback, so a blank answer can never leave a hole in the prompt.
//! Templates render in strict mode: a reference to a slot nobody filled is a
//! render error rather than an empty string.

use std::collections::{BTreeMap, BTreeSet};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

/// True for answers with no visible characters.
pub fn is_blank(answer: &str) -> bool {
    answer.trim().is_empty()
}

/// Use `answer` unless it is blank, otherwise `default`.
pub fn or_default<'a>(answer: &'a str, default: &'a str) -> &'a str {
    if is_blank(answer) {
        default
    } else {
        answer
    }
}

/// Case-insensitive match against the accepted affirmative token.
///
/// Anything else, including an empty answer or "yes" when the token is "y",
/// is a refusal.
pub fn is_affirmative(answer: &str, token: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(token.trim())
}

/// Named values available to a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Slots(BTreeMap<String, String>);

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill `key` with `answer`, or with `default` when the answer is blank.
    pub fn fill(&mut self, key: impl Into<String>, answer: &str, default: &str) -> &mut Self {
        self.0
            .insert(key.into(), or_default(answer, default).to_string());
        self
    }

    /// Builder form of [`Slots::fill`].
    pub fn with(mut self, key: impl Into<String>, answer: &str, default: &str) -> Self {
        self.fill(key, answer, default);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A compiled prompt template.
pub struct PromptTemplate {
    env: Environment<'static>,
    name: String,
}

impl PromptTemplate {
    /// Parse `source`. Syntax errors are reported here, not at render time.
    pub fn compile(
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, minijinja::Error> {
        let name = name.into();
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template_owned(name.clone(), source.into())?;
        Ok(Self { env, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level variables the template reads from its slots.
    ///
    /// Names the environment already provides (`range`, `dict`, ...) are
    /// not slots and are left out.
    pub fn variables(&self) -> Result<BTreeSet<String>, minijinja::Error> {
        let template = self.env.get_template(&self.name)?;
        let globals: BTreeSet<&str> = self.env.globals().map(|(name, _)| name).collect();
        Ok(template
            .undeclared_variables(false)
            .into_iter()
            .filter(|name| !globals.contains(name.as_str()))
            .collect())
    }

    /// Render with `slots`. Deterministic for a given set of slots.
    pub fn render(&self, slots: &Slots) -> Result<String, minijinja::Error> {
        self.env.get_template(&self.name)?.render(slots)
    }
}

impl std::fmt::Debug for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_answers_fall_back() {
        assert_eq!(or_default("", "general"), "general");
        assert_eq!(or_default("   ", "general"), "general");
        assert_eq!(or_default("databases", "general"), "databases");
    }

    #[test]
    fn non_blank_answers_are_kept_verbatim() {
        // Surrounding whitespace is not the assembler's business
        assert_eq!(or_default(" databases ", "general"), " databases ");
    }

    #[test]
    fn affirmative_is_case_insensitive_and_exact() {
        assert!(is_affirmative("y", "y"));
        assert!(is_affirmative("Y", "y"));
        assert!(is_affirmative(" y ", "y"));
        assert!(!is_affirmative("n", "y"));
        assert!(!is_affirmative("yes", "y"));
        assert!(!is_affirmative("", "y"));
    }

    #[test]
    fn slots_apply_defaults() {
        let slots = Slots::new()
            .with("topic", "databases", "general")
            .with("audience", "", "technical decision makers");

        assert_eq!(slots.get("topic"), Some("databases"));
        assert_eq!(slots.get("audience"), Some("technical decision makers"));
        assert_eq!(slots.keys().collect::<Vec<_>>(), vec!["audience", "topic"]);
    }

    #[test]
    fn renders_filled_slots() {
        let template = PromptTemplate::compile("t", "Topic: {{ topic }}\n").unwrap();
        let slots = Slots::new().with("topic", "", "general");

        // The final newline of the template file is not part of the prompt
        assert_eq!(template.render(&slots).unwrap(), "Topic: general");
    }

    #[test]
    fn unfilled_slot_is_a_render_error() {
        let template = PromptTemplate::compile("t", "Topic: {{ topic }}").unwrap();
        assert!(template.render(&Slots::new()).is_err());
    }

    #[test]
    fn reports_referenced_variables() {
        let template =
            PromptTemplate::compile("t", "{{ topic }} for {{ audience }} in {{ cwd }}").unwrap();
        let vars = template.variables().unwrap();

        assert_eq!(
            vars.into_iter().collect::<Vec<_>>(),
            vec!["audience", "cwd", "topic"]
        );
    }

    #[test]
    fn builtin_globals_are_not_slots() {
        let template = PromptTemplate::compile(
            "t",
            "{% for i in range(2) %}{{ topic }} {{ i }} {% endfor %}{{ dict(a=1).a }}",
        )
        .unwrap();

        assert_eq!(
            template.variables().unwrap().into_iter().collect::<Vec<_>>(),
            vec!["topic"]
        );
    }

    #[test]
    fn syntax_errors_surface_at_compile_time() {
        assert!(PromptTemplate::compile("t", "{{ topic ").is_err());
    }
}
