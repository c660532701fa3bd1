//! Lightweight REPL (Read-Eval-Print-Loop) for slashkit.
//!
//! Provides an interactive mode when no command is given via `-x`.
//! Supports:
//! - `/quit`, `/exit`, `/q` - Exit the REPL
//! - `/help` - List available commands
//! - `/<name> [args]` - Run a command
//!
//! Anything else prints a hint.

use anyhow::Result;

use crate::error::SlashkitError;
use crate::runtime::SlashRuntime;

use super::bootstrap::CliContext;
use super::output::format_command_list;
use super::runner::execute_once;

/// REPL command variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Exit the REPL
    Quit,
    /// Show available commands
    Help,
    /// Run a slash command
    Invoke { name: String, args: String },
    /// Input that is not a slash command
    Text(String),
    /// Empty input (skip)
    Empty,
}

impl ReplCommand {
    /// Parse user input into a REPL command.
    ///
    /// Built-in REPL commands are case-insensitive; command names are not.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return ReplCommand::Empty;
        }

        let Some(rest) = trimmed.strip_prefix('/') else {
            return ReplCommand::Text(trimmed.to_string());
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name.to_lowercase().as_str() {
            "quit" | "exit" | "q" if args.is_empty() => ReplCommand::Quit,
            "help" | "?" if args.is_empty() => ReplCommand::Help,
            _ => ReplCommand::Invoke {
                name: name.to_string(),
                args: args.to_string(),
            },
        }
    }
}

/// Run an interactive REPL session.
///
/// Returns when the user exits or on EOF (Ctrl+D).
pub async fn run_repl(ctx: &CliContext) -> Result<()> {
    if ctx.show_banner && !ctx.args.quiet && ctx.runtime.is_interactive() {
        eprintln!("slashkit interactive mode");
        eprintln!("Type /help to list commands, /quit to exit\n");
    }

    loop {
        let Some(input) = ctx.runtime.read_line("> ").await? else {
            // EOF (Ctrl+D)
            eprintln!("\nGoodbye!");
            break;
        };

        match ReplCommand::parse(&input) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => {
                eprintln!("Goodbye!");
                break;
            }
            ReplCommand::Help => {
                eprint!("{}", format_command_list(&ctx.registry.list_info()));
                eprintln!("  /quit       Exit");
            }
            ReplCommand::Text(_) => {
                eprintln!("Commands start with '/'. Type /help to list them.");
            }
            ReplCommand::Invoke { name, args } => {
                match execute_once(ctx, &name, &args).await {
                    Ok(_) => {}
                    Err(e) => match e.downcast_ref::<SlashkitError>() {
                        Some(SlashkitError::NotFound(_)) => {
                            eprintln!("{}. Type /help to list commands.", e)
                        }
                        _ => eprintln!("Error: {:#}", e),
                    },
                }
                println!(); // Blank line between interactions
            }
        }
    }

    Ok(())
}
