// Host I/O abstraction for command sessions
//
// A `SlashRuntime` is the channel between a running command and whoever is
// answering its questions: a terminal, a chat UI, or a scripted answer list.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failures of the host I/O channel.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("Input closed before an answer was received")]
    InputClosed,

    #[error("No answer received within {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Runtime abstraction for terminal vs scripted vs embedded hosts
///
/// # Object Safety
/// This trait is object-safe and intended to be used as `Arc<dyn SlashRuntime>`.
///
/// # Contract
/// - `say` must not block waiting on the user. Its errors are reported to the
///   caller but a session never fails because of them.
/// - `ask` resolves with exactly one line of input, without its line terminator.
///   An empty submission is `Ok(String::new())`, never an error.
#[async_trait]
pub trait SlashRuntime: Send + Sync + 'static {
    /// Deliver a one-way message to the user.
    fn say(&self, message: &str) -> Result<(), InteractionError>;

    /// Ask a question and wait for a single line of input.
    ///
    /// Takes owned `String` to avoid lifetime issues with `#[async_trait]`.
    async fn ask(&self, question: String) -> Result<String, InteractionError>;

    /// Check if a human is on the other end (has a TTY or UI)
    fn is_interactive(&self) -> bool;
}

/// Strip a single trailing `\n` or `\r\n`, keeping any other whitespace.
pub fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

#[cfg(feature = "cli")]
pub mod cli;
pub mod scripted;

#[cfg(feature = "cli")]
pub use cli::CliRuntime;
pub use scripted::ScriptedRuntime;
