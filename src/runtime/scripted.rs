//! Scripted runtime that replays a fixed answer sequence.
//!
//! Used as the test double for command sessions and by hosts that collect
//! answers up front (forms, batch files) instead of asking interactively.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{InteractionError, SlashRuntime};

/// Replays canned answers and records everything the command said or asked.
#[derive(Default)]
pub struct ScriptedRuntime {
    answers: Mutex<VecDeque<String>>,
    said: Mutex<Vec<String>>,
    asked: Mutex<Vec<String>>,
    fail_say: bool,
}

impl ScriptedRuntime {
    /// Create a runtime that answers questions from `answers`, in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Make every `say` report a channel failure (messages are still recorded).
    pub fn with_failing_say(mut self) -> Self {
        self.fail_say = true;
        self
    }

    /// Messages passed to `say`, in order.
    pub fn said(&self) -> Vec<String> {
        self.said.lock().clone()
    }

    /// Questions passed to `ask`, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }

    /// Number of answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.lock().len()
    }
}

#[async_trait]
impl SlashRuntime for ScriptedRuntime {
    fn say(&self, message: &str) -> Result<(), InteractionError> {
        self.said.lock().push(message.to_string());
        if self.fail_say {
            return Err(InteractionError::Other("output channel closed".to_string()));
        }
        Ok(())
    }

    async fn ask(&self, question: String) -> Result<String, InteractionError> {
        self.asked.lock().push(question);
        self.answers
            .lock()
            .pop_front()
            .ok_or(InteractionError::InputClosed)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
