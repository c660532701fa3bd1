//! CLI module for running slash commands from a terminal.
//!
//! # Architecture
//!
//! The CLI wires the terminal runtime into the same loader, registry and
//! session runner an embedding host would use:
//!
//! ```text
//! +-----------------+     +---------------+     +---------------+
//! | CommandRegistry | --> | SessionRunner | --> | output.rs     |
//! | (bootstrap.rs)  |     | (CliRuntime)  |     | (print/JSON)  |
//! +-----------------+     +---------------+     +---------------+
//! ```
//!
//! # REPL Mode
//!
//! When no command is given via `-x` and no listing is requested, the CLI
//! enters interactive REPL mode. See `repl.rs` for details.

mod args;
mod bootstrap;
mod output;
mod repl;
mod runner;

pub use args::Args;
pub use bootstrap::{build_registry, command_sources, initialize, CliContext};
pub use output::{format_command_list, render_command_list, render_report};
pub use repl::{run_repl, ReplCommand};
pub use runner::{execute_once, list_commands, run_named};
