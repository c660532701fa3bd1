//! Core traits and types for the command system.
//!
//! This module provides the plugin contract every slash command implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::ExecutionContext;

/// The payload a successful command hands to the downstream engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResult {
    pub prompt: String,
}

impl PromptResult {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// A prompt with no visible text is not forwarded.
    pub fn is_well_formed(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// Contract for a slash command.
///
/// `name` and `execute` are required; `requires_args` defaults to `false` and
/// `enabled` to `true`. Implementations must be immutable once handed to the
/// loader: the loader snapshots the metadata and the registry never asks again.
///
/// # Example
///
/// ```rust,ignore
/// struct Hello;
///
/// #[async_trait]
/// impl SlashCommand for Hello {
///     fn name(&self) -> &str { "hello" }
///     fn description(&self) -> &str { "Greets someone" }
///
///     async fn execute(&self, _args: &str, ctx: &ExecutionContext) -> anyhow::Result<Option<PromptResult>> {
///         let who = ctx.ask("Who should I greet?").await?;
///         Ok(Some(PromptResult::new(format!("Say hello to {}", or_default(&who, "the team")))))
///     }
/// }
/// ```
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// Unique lookup key (what the user types after `/`).
    fn name(&self) -> &str;

    /// Human-readable summary for help listings.
    fn description(&self) -> &str;

    /// Advisory flag: the host should refuse to run the command without arguments.
    fn requires_args(&self) -> bool {
        false
    }

    /// Whether the command starts out resolvable.
    fn enabled(&self) -> bool {
        true
    }

    /// Run the dialogue and assemble the prompt.
    ///
    /// Returns `Ok(None)` when the user cancels. Errors, including a closed
    /// input channel, abort the invocation.
    async fn execute(&self, args: &str, ctx: &ExecutionContext)
        -> anyhow::Result<Option<PromptResult>>;
}

/// Metadata about a command, for listings and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub requires_args: bool,
    pub enabled: bool,
}
