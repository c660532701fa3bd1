use super::{strip_line_ending, InteractionError, SlashRuntime};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;

/// Lines from a blocking reader, read on a detached thread.
///
/// A read still waiting on the user never holds up runtime shutdown, so a
/// timed-out question does not keep the process alive.
struct LineFeed {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl LineFeed {
    fn spawn<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel(1);
        std::thread::spawn(move || {
            for line in reader.lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });
        Self { lines: rx }
    }

    fn stdin() -> Self {
        Self::spawn(io::BufReader::new(io::stdin()))
    }

    /// Next line without its terminator; `None` on EOF.
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.recv().await.transpose().map(|line| line.map(strip_line_ending))
    }
}

/// Terminal runtime: questions and messages on stderr, answers from stdin.
///
/// stdout is left alone so the emitted prompt can be piped to another program.
pub struct CliRuntime {
    /// Started on first use so scripted runs never touch stdin
    input: tokio::sync::Mutex<Option<LineFeed>>,
    /// Answers supplied up front (`--answer`), consumed before stdin
    scripted: Mutex<Option<VecDeque<String>>>,
    json_mode: bool,
    quiet_mode: bool,
}

impl CliRuntime {
    pub fn new(json_mode: bool, quiet_mode: bool) -> Self {
        Self {
            input: tokio::sync::Mutex::new(None),
            scripted: Mutex::new(None),
            json_mode,
            quiet_mode,
        }
    }

    /// Answer questions from a fixed list instead of stdin.
    ///
    /// Once the list is exhausted further questions fail with
    /// `InteractionError::InputClosed`. An empty list leaves stdin in charge.
    pub fn with_answers(self, answers: Vec<String>) -> Self {
        if !answers.is_empty() {
            *self.scripted.lock() = Some(answers.into());
        }
        self
    }

    /// Read one line for the REPL. Returns `None` on EOF.
    pub async fn read_line(&self, prompt: &str) -> Result<Option<String>, InteractionError> {
        eprint!("{}", prompt);
        io::stderr().flush()?;

        Ok(self.next_stdin_line().await?)
    }

    async fn next_stdin_line(&self) -> io::Result<Option<String>> {
        let mut input = self.input.lock().await;
        input.get_or_insert_with(LineFeed::stdin).next_line().await
    }

    fn show_question(&self, question: &str, scripted_answer: Option<&str>) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        if self.json_mode {
            let json = serde_json::json!({
                "type": "ask",
                "question": question,
                "answer": scripted_answer,
            });
            writeln!(stderr, "{}", json)?;
        } else if let Some(answer) = scripted_answer {
            if !self.quiet_mode {
                writeln!(stderr, "{}\n> {}", question, answer)?;
            }
        } else {
            write!(stderr, "{}\n> ", question)?;
        }
        stderr.flush()
    }
}

#[async_trait]
impl SlashRuntime for CliRuntime {
    fn say(&self, message: &str) -> Result<(), InteractionError> {
        if self.quiet_mode {
            return Ok(());
        }

        let mut stderr = io::stderr().lock();
        if self.json_mode {
            let json = serde_json::json!({ "type": "say", "message": message });
            writeln!(stderr, "{}", json)?;
        } else {
            writeln!(stderr, "{}", message)?;
        }
        Ok(())
    }

    async fn ask(&self, question: String) -> Result<String, InteractionError> {
        let scripted = {
            let mut guard = self.scripted.lock();
            guard.as_mut().map(|queue| queue.pop_front())
        };

        match scripted {
            Some(Some(answer)) => {
                self.show_question(&question, Some(&answer))?;
                Ok(answer)
            }
            Some(None) => {
                tracing::debug!("Scripted answers exhausted at question: {}", question);
                Err(InteractionError::InputClosed)
            }
            None => {
                self.show_question(&question, None)?;
                self.next_stdin_line()
                    .await?
                    .ok_or(InteractionError::InputClosed)
            }
        }
    }

    fn is_interactive(&self) -> bool {
        atty::is(atty::Stream::Stdin)
    }
}
