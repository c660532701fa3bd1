//! slashkit: interactive slash commands that assemble prompts.
//!
//! A command holds a short dialogue with the user (messages and questions)
//! and returns a prompt for a downstream agent, or nothing when the user
//! cancels. Hosts provide the I/O channel through [`runtime::SlashRuntime`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use slashkit_lib::{create_default_registry, ScriptedRuntime, SessionRunner};
//!
//! let (registry, _errors) = create_default_registry();
//! let runtime = Arc::new(ScriptedRuntime::new(["api"]));
//! let runner = SessionRunner::new(".", runtime);
//! let report = runner.run_by_name(&registry, "test-all", "").await?;
//! println!("{}", report.outcome.prompt().unwrap_or_default());
//! ```

pub mod command;
pub mod error;
pub mod runtime;
pub mod session;
pub mod settings;

#[cfg(feature = "cli")]
pub mod cli;

pub use command::{
    create_default_registry, CommandInfo, CommandLoader, CommandRegistry, CommandSource,
    LoadError, PromptResult, SlashCommand, ValidatedCommand,
};
pub use error::{Result, SlashkitError};
pub use runtime::{InteractionError, ScriptedRuntime, SlashRuntime};
pub use session::{
    ExecutionContext, SessionOutcome, SessionReport, SessionRunner, SessionState,
};
