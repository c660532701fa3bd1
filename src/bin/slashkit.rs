//! slashkit - Interactive slash commands that assemble prompts for your agent
//!
//! # Usage
//!
//! ```bash
//! # List the available commands
//! slashkit --list
//!
//! # Run one command; the assembled prompt is printed to stdout
//! slashkit -x test-all
//!
//! # Answer the questions up front (blank answers use the defaults)
//! slashkit -x new-blog -a databases -a "" -a controversial
//!
//! # JSON output for scripting
//! slashkit -x test-all -a api --json | jq .outcome
//!
//! # Interactive REPL mode (when no -x is provided)
//! slashkit ~/src/my-project
//! ```
//!
//! # Features
//!
//! This binary requires the `cli` feature flag (enabled by default).

use anyhow::Result;
use clap::Parser;

use slashkit_lib::cli::{initialize, list_commands, run_named, run_repl, Args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let ctx = initialize(&args).await?;

    if args.is_listing() {
        list_commands(&ctx)
    } else if let Some(ref name) = args.run {
        // Single command execution mode
        run_named(&ctx, name, &args.args).await
    } else {
        run_repl(&ctx).await
    }
}
