//! Per-invocation execution context.
//!
//! The context is the only capability a command gets: where it runs (`cwd`),
//! a way to talk (`say`) and a way to wait for the user (`ask`). The session
//! runner creates one per invocation and drops it when the command returns.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::command::assembler::is_affirmative;
use crate::runtime::{InteractionError, SlashRuntime};

/// One step of the dialogue, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Exchange {
    Say { message: String },
    Ask { question: String, answer: String },
}

pub struct ExecutionContext {
    cwd: PathBuf,
    runtime: Arc<dyn SlashRuntime>,
    ask_timeout: Option<Duration>,
    affirmative: String,
    /// Held for the duration of an `ask` so questions never overlap
    turn: tokio::sync::Mutex<()>,
    transcript: Mutex<Vec<Exchange>>,
}

impl ExecutionContext {
    pub(crate) fn new(
        cwd: PathBuf,
        runtime: Arc<dyn SlashRuntime>,
        ask_timeout: Option<Duration>,
        affirmative: String,
    ) -> Self {
        Self {
            cwd,
            runtime,
            ask_timeout,
            affirmative,
            turn: tokio::sync::Mutex::new(()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Working directory the command was invoked in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Whether a person is answering (as opposed to a script or a pipe).
    pub fn is_interactive(&self) -> bool {
        self.runtime.is_interactive()
    }

    /// Send a message to the user. Never fails the invocation.
    pub fn say(&self, message: impl Into<String>) {
        let message = message.into();
        if let Err(e) = self.runtime.say(&message) {
            tracing::warn!("Failed to deliver message: {}", e);
        }
        self.transcript.lock().push(Exchange::Say { message });
    }

    /// Ask a question and wait for one line of input.
    ///
    /// An empty submission comes back as `""`. Errors mean the channel is
    /// gone (or the configured timeout expired) and the command should stop.
    pub async fn ask(&self, question: impl Into<String>) -> Result<String, InteractionError> {
        let question = question.into();
        let _turn = self.turn.lock().await;

        let pending = self.runtime.ask(question.clone());
        let answer = match self.ask_timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| InteractionError::Timeout(limit))??,
            None => pending.await?,
        };

        tracing::debug!(question = %question, "Answer received");
        self.transcript.lock().push(Exchange::Ask {
            question,
            answer: answer.clone(),
        });
        Ok(answer)
    }

    /// Ask a yes/no question. Only the affirmative token counts as yes.
    pub async fn confirm(&self, question: impl Into<String>) -> Result<bool, InteractionError> {
        let answer = self.ask(question).await?;
        Ok(is_affirmative(&answer, &self.affirmative))
    }

    pub(crate) fn into_transcript(self) -> Vec<Exchange> {
        self.transcript.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ScriptedRuntime;
    use async_trait::async_trait;

    fn context(runtime: Arc<dyn SlashRuntime>) -> ExecutionContext {
        ExecutionContext::new(PathBuf::from("/work"), runtime, None, "y".to_string())
    }

    struct Silent;

    #[async_trait]
    impl SlashRuntime for Silent {
        fn say(&self, _message: &str) -> Result<(), InteractionError> {
            Ok(())
        }

        async fn ask(&self, _question: String) -> Result<String, InteractionError> {
            futures::future::pending().await
        }

        fn is_interactive(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn records_dialogue_in_order() {
        let runtime = Arc::new(ScriptedRuntime::new(["databases"]));
        let ctx = context(runtime.clone());

        ctx.say("banner");
        let answer = ctx.ask("Topic?").await.unwrap();

        assert_eq!(answer, "databases");
        assert_eq!(ctx.cwd(), Path::new("/work"));
        assert!(!ctx.is_interactive());
        assert_eq!(
            ctx.into_transcript(),
            vec![
                Exchange::Say {
                    message: "banner".to_string()
                },
                Exchange::Ask {
                    question: "Topic?".to_string(),
                    answer: "databases".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn say_failure_is_swallowed() {
        let runtime = Arc::new(ScriptedRuntime::new(["y"]).with_failing_say());
        let ctx = context(runtime);

        ctx.say("still fine");
        assert!(ctx.confirm("Go?").await.unwrap());
    }

    #[tokio::test]
    async fn confirm_accepts_only_the_affirmative_token() {
        let runtime = Arc::new(ScriptedRuntime::new(["Y", "n", "yes", ""]));
        let ctx = context(runtime);

        assert!(ctx.confirm("1?").await.unwrap());
        assert!(!ctx.confirm("2?").await.unwrap());
        assert!(!ctx.confirm("3?").await.unwrap());
        assert!(!ctx.confirm("4?").await.unwrap());
    }

    #[tokio::test]
    async fn closed_input_is_an_error() {
        let runtime = Arc::new(ScriptedRuntime::new(Vec::<String>::new()));
        let ctx = context(runtime);

        assert!(matches!(
            ctx.ask("anyone?").await,
            Err(InteractionError::InputClosed)
        ));
        assert!(ctx.into_transcript().is_empty());
    }

    #[tokio::test]
    async fn ask_timeout_expires() {
        let ctx = ExecutionContext::new(
            PathBuf::from("/work"),
            Arc::new(Silent),
            Some(Duration::from_millis(20)),
            "y".to_string(),
        );

        assert!(matches!(
            ctx.ask("hello?").await,
            Err(InteractionError::Timeout(_))
        ));
    }
}
