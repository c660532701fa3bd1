//! Session runner: drives one command invocation to a terminal outcome.
//!
//! ```text
//! Starting --> Running --+--> Completed(prompt)
//!                        +--> Cancelled
//!                        +--> Failed(error)
//! ```
//!
//! Every invocation gets a fresh [`ExecutionContext`] and reaches exactly one
//! terminal state. Nothing is retried: a dialogue that failed halfway is
//! reported, never replayed.

mod context;


use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::command::{CommandRegistry, PromptResult, ValidatedCommand};
use crate::error::Result;
use crate::runtime::{InteractionError, SlashRuntime};

pub use context::{Exchange, ExecutionContext};

/// Default affirmative token for confirmation questions.
pub const DEFAULT_AFFIRMATIVE: &str = "y";

/// Lifecycle of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Starting,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed
        )
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        match self {
            SessionState::Starting => matches!(next, SessionState::Running | SessionState::Failed),
            SessionState::Running => next.is_terminal(),
            _ => false,
        }
    }
}

/// What went wrong in a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The I/O channel failed or timed out
    Interaction,
    /// The command returned an error
    Command,
    /// The command panicked
    Panic,
    /// The command returned a blank prompt
    MalformedResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionFailure {
    pub kind: FailureKind,
    /// Originating error, with its cause chain
    pub message: String,
}

impl SessionFailure {
    fn from_error(err: &anyhow::Error) -> Self {
        let kind = if err.chain().any(|cause| cause.is::<InteractionError>()) {
            FailureKind::Interaction
        } else {
            FailureKind::Command
        };
        Self {
            kind,
            message: format!("{:#}", err),
        }
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self {
            kind: FailureKind::Panic,
            message: format!("command panicked: {}", detail),
        }
    }
}

impl std::fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Terminal outcome of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    Completed(PromptResult),
    Cancelled,
    Failed(SessionFailure),
}

impl SessionOutcome {
    pub fn state(&self) -> SessionState {
        match self {
            SessionOutcome::Completed(_) => SessionState::Completed,
            SessionOutcome::Cancelled => SessionState::Cancelled,
            SessionOutcome::Failed(_) => SessionState::Failed,
        }
    }

    /// The prompt, for completed sessions only.
    pub fn prompt(&self) -> Option<&str> {
        match self {
            SessionOutcome::Completed(result) => Some(&result.prompt),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SessionOutcome::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionOutcome::Cancelled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SessionOutcome::Failed(_))
    }
}

/// Everything observable about one finished invocation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub id: Uuid,
    pub command: String,
    pub outcome: SessionOutcome,
    pub transcript: Vec<Exchange>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionReport {
    /// Messages the command said, in order.
    pub fn said(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|exchange| match exchange {
                Exchange::Say { message } => Some(message.as_str()),
                Exchange::Ask { .. } => None,
            })
            .collect()
    }
}

/// Runs commands against a host runtime.
///
/// Holds configuration only; no state carries over between invocations.
pub struct SessionRunner {
    cwd: PathBuf,
    runtime: Arc<dyn SlashRuntime>,
    ask_timeout: Option<Duration>,
    affirmative: String,
}

impl SessionRunner {
    pub fn new(cwd: impl Into<PathBuf>, runtime: Arc<dyn SlashRuntime>) -> Self {
        Self {
            cwd: cwd.into(),
            runtime,
            ask_timeout: None,
            affirmative: DEFAULT_AFFIRMATIVE.to_string(),
        }
    }

    /// Fail a session when a single answer takes longer than `timeout`.
    pub fn with_ask_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.ask_timeout = timeout;
        self
    }

    /// Token that confirms a yes/no question (case-insensitive).
    ///
    /// A blank token is ignored and the current one kept.
    pub fn with_affirmative(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            tracing::warn!("Ignoring blank affirmative token");
        } else {
            self.affirmative = token;
        }
        self
    }

    pub fn cwd(&self) -> &PathBuf {
        &self.cwd
    }

    /// Resolve `name` and run it.
    ///
    /// Unknown or disabled commands return `SlashkitError::NotFound` before
    /// any context is created.
    pub async fn run_by_name(
        &self,
        registry: &CommandRegistry,
        name: &str,
        args: &str,
    ) -> Result<SessionReport> {
        let command = registry.resolve(name)?;
        Ok(self.run(&command, args).await)
    }

    /// Run one invocation to its terminal state.
    pub async fn run(&self, command: &ValidatedCommand, args: &str) -> SessionReport {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("session", command = %command.name(), %id);
        self.run_inner(id, command, args).instrument(span).await
    }

    async fn run_inner(&self, id: Uuid, command: &ValidatedCommand, args: &str) -> SessionReport {
        let started_at = Utc::now();
        let mut state = SessionState::Starting;
        tracing::debug!(?state, args, "Session starting");

        let ctx = ExecutionContext::new(
            self.cwd.clone(),
            self.runtime.clone(),
            self.ask_timeout,
            self.affirmative.clone(),
        );

        state = advance(state, SessionState::Running);
        let result = AssertUnwindSafe(command.execute(args, &ctx))
            .catch_unwind()
            .await;

        let outcome = match result {
            Ok(Ok(Some(prompt))) if prompt.is_well_formed() => SessionOutcome::Completed(prompt),
            Ok(Ok(Some(_))) => SessionOutcome::Failed(SessionFailure {
                kind: FailureKind::MalformedResult,
                message: "command returned an empty prompt".to_string(),
            }),
            Ok(Ok(None)) => SessionOutcome::Cancelled,
            Ok(Err(err)) => SessionOutcome::Failed(SessionFailure::from_error(&err)),
            Err(payload) => SessionOutcome::Failed(SessionFailure::from_panic(payload)),
        };

        advance(state, outcome.state());
        match &outcome {
            SessionOutcome::Completed(result) => {
                tracing::info!(bytes = result.prompt.len(), "Session completed")
            }
            SessionOutcome::Cancelled => tracing::info!("Session cancelled"),
            SessionOutcome::Failed(failure) => {
                tracing::warn!(kind = ?failure.kind, "Session failed: {}", failure)
            }
        }

        SessionReport {
            id,
            command: command.name().to_string(),
            outcome,
            transcript: ctx.into_transcript(),
            started_at,
            finished_at: Utc::now(),
        }
    }
}

fn advance(from: SessionState, to: SessionState) -> SessionState {
    debug_assert!(
        from.can_transition_to(to),
        "illegal session transition {:?} -> {:?}",
        from,
        to
    );
    tracing::debug!(?from, ?to, "Session state");
    to
}
