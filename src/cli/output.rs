//! CLI output handling - Rendering session results and command listings.
//!
//! stdout carries only results (the assembled prompt, or JSON lines in
//! `--json` mode). Everything meant for the person at the terminal goes to
//! stderr.

use std::io::{self, Write};

use anyhow::Result;

use crate::command::CommandInfo;
use crate::session::{SessionOutcome, SessionReport};

/// Print the result of one invocation.
///
/// * `json_mode` - If true, print the whole report as a JSON line on stdout
/// * `quiet_mode` - If true, only the prompt itself is printed
pub fn render_report(report: &SessionReport, json_mode: bool, quiet_mode: bool) -> Result<()> {
    if json_mode {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", serde_json::to_string(report)?)?;
        stdout.flush()?;
        return Ok(());
    }

    match &report.outcome {
        SessionOutcome::Completed(result) => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", result.prompt.trim_end())?;
            stdout.flush()?;
        }
        SessionOutcome::Cancelled => {
            if !quiet_mode {
                eprintln!("[cancelled] /{}", report.command);
            }
        }
        SessionOutcome::Failed(failure) => {
            eprintln!("Error: /{} failed: {}", report.command, failure);
        }
    }

    Ok(())
}

/// Print a command listing.
pub fn render_command_list(commands: &[CommandInfo], json_mode: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if json_mode {
        for info in commands {
            writeln!(stdout, "{}", serde_json::to_string(info)?)?;
        }
    } else {
        write!(stdout, "{}", format_command_list(commands))?;
    }
    stdout.flush()?;
    Ok(())
}

/// One line per command: name, description, and markers for flags.
pub fn format_command_list(commands: &[CommandInfo]) -> String {
    if commands.is_empty() {
        return "No commands available.\n".to_string();
    }

    let width = commands
        .iter()
        .map(|info| info.name.chars().count() + 1)
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for info in commands {
        let mut line = format!(
            "  {:<width$}  {}",
            format!("/{}", info.name),
            truncate(&info.description, 72),
            width = width
        );
        if info.requires_args {
            line.push_str(" [args]");
        }
        if !info.enabled {
            line.push_str(" (disabled)");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
