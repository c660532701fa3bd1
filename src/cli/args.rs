//! CLI argument parsing using clap.
//!
//! Defines the command-line interface for slashkit.

use clap::Parser;
use std::path::PathBuf;

/// slashkit - Interactive slash commands that assemble prompts for your agent
#[derive(Parser, Debug, Clone)]
#[command(name = "slashkit")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Working directory (default: current directory)
    #[arg(default_value = ".")]
    pub workspace: PathBuf,

    /// Run a single command (without the leading '/') and exit
    #[arg(short = 'x', long = "run", value_name = "NAME", conflicts_with_all = ["list", "list_all"])]
    pub run: Option<String>,

    /// Arguments passed to the command given with --run
    #[arg(long, default_value = "", requires = "run", allow_hyphen_values = true)]
    pub args: String,

    /// Answer the next question with this value instead of reading stdin
    ///
    /// Repeat for each question, in order.
    #[arg(short = 'a', long = "answer", value_name = "ANSWER")]
    pub answers: Vec<String>,

    /// List enabled commands and exit
    #[arg(long, conflicts_with = "list_all")]
    pub list: bool,

    /// List all commands, including disabled ones, and exit
    #[arg(long)]
    pub list_all: bool,

    /// Skip ~/.slashkit/commands and <workspace>/.slashkit/commands
    #[arg(long, env = "SLASHKIT_NO_USER_COMMANDS")]
    pub no_user_commands: bool,

    /// Output messages and results as JSON lines (for scripting/parsing)
    #[arg(long)]
    pub json: bool,

    /// Only output the final prompt (suppress messages)
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the workspace path to an absolute path.
    ///
    /// Returns an error if the path does not exist or is not a directory.
    pub fn resolve_workspace(&self) -> anyhow::Result<PathBuf> {
        let canonical = self.workspace.canonicalize().map_err(|e| {
            anyhow::anyhow!(
                "Workspace '{}' does not exist or is not accessible: {}",
                self.workspace.display(),
                e
            )
        })?;

        if !canonical.is_dir() {
            anyhow::bail!("Workspace '{}' is not a directory", canonical.display());
        }

        Ok(canonical)
    }

    /// True when the invocation only lists commands.
    pub fn is_listing(&self) -> bool {
        self.list || self.list_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["slashkit"]);
        assert_eq!(args.workspace, PathBuf::from("."));
        assert!(args.run.is_none());
        assert!(args.args.is_empty());
        assert!(args.answers.is_empty());
        assert!(!args.is_listing());
        assert!(!args.json);
        assert!(!args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_run_with_answers() {
        let args = Args::parse_from([
            "slashkit",
            "-x",
            "new-blog",
            "-a",
            "databases",
            "-a",
            "",
            "--answer",
            "controversial",
        ]);
        assert_eq!(args.run.as_deref(), Some("new-blog"));
        assert_eq!(args.answers, vec!["databases", "", "controversial"]);
    }

    #[test]
    fn test_args_command_arguments() {
        let args = Args::parse_from(["slashkit", "--run", "review", "--args", "--staged src/"]);
        assert_eq!(args.args, "--staged src/");
    }

    #[test]
    fn test_args_requires_run() {
        assert!(Args::try_parse_from(["slashkit", "--args", "x"]).is_err());
    }

    #[test]
    fn test_args_listing_conflicts_with_run() {
        assert!(Args::try_parse_from(["slashkit", "--list", "-x", "test-all"]).is_err());
        assert!(Args::parse_from(["slashkit", "--list-all"]).is_listing());
    }

    #[test]
    fn test_args_output_modes() {
        let args = Args::parse_from(["slashkit", "--json", "--quiet"]);
        assert!(args.json);
        assert!(args.quiet);
    }

    #[test]
    fn test_resolve_workspace_missing() {
        let args = Args::parse_from(["slashkit", "/definitely/not/a/real/workspace"]);
        assert!(args.resolve_workspace().is_err());
    }
}
