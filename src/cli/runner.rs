//! CLI execution runner.
//!
//! Resolves a command, enforces its argument requirement and runs it through
//! the session runner.

use anyhow::Result;

use crate::command::ValidatedCommand;
use crate::session::SessionReport;

use super::bootstrap::CliContext;
use super::output::{render_command_list, render_report};

/// Execute a single command invocation and print its result.
///
/// Returns `Ok(None)` when the command needs arguments and none were given;
/// in that case a usage line is printed and no session is started.
pub async fn execute_once(
    ctx: &CliContext,
    name: &str,
    args: &str,
) -> Result<Option<SessionReport>> {
    let name = name.trim().trim_start_matches('/');
    let command = ctx.registry.resolve(name)?;

    if let Err(usage) = check_args(&command, args) {
        eprintln!("{}", usage);
        return Ok(None);
    }

    let report = ctx.runner.run(&command, args).await;
    render_report(&report, ctx.args.json, ctx.args.quiet)?;
    Ok(Some(report))
}

/// Run the command named by `--run` and map the outcome to a result.
///
/// Cancelling is a normal ending; a failed session is an error so the
/// process exits non-zero.
pub async fn run_named(ctx: &CliContext, name: &str, args: &str) -> Result<()> {
    match execute_once(ctx, name, args).await? {
        Some(report) if report.outcome.is_failed() => {
            anyhow::bail!("/{} did not complete", report.command)
        }
        Some(_) => Ok(()),
        None => anyhow::bail!("/{} was not run", name.trim_start_matches('/')),
    }
}

/// Print the command listing requested on the command line.
pub fn list_commands(ctx: &CliContext) -> Result<()> {
    let commands = if ctx.args.list_all {
        ctx.registry.list_all()
    } else {
        ctx.registry.list_info()
    };
    render_command_list(&commands, ctx.args.json)
}

/// Refuse commands that need arguments when none were given.
fn check_args(command: &ValidatedCommand, args: &str) -> Result<(), String> {
    if command.requires_args() && args.trim().is_empty() {
        return Err(format!(
            "Usage: /{} <args>  ({})",
            command.name(),
            command.description()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use clap::Parser;
    use tempfile::TempDir;

    use crate::cli::args::Args;
    use crate::command::{CommandLoader, CommandRegistry, CommandSource, PromptResult, SlashCommand};
    use crate::error::SlashkitError;
    use crate::runtime::CliRuntime;
    use crate::session::{ExecutionContext, SessionRunner};
    use crate::settings::SettingsManager;

    struct NeedsArgs;

    #[async_trait]
    impl SlashCommand for NeedsArgs {
        fn name(&self) -> &str {
            "fix"
        }

        fn description(&self) -> &str {
            "Fix an issue"
        }

        fn requires_args(&self) -> bool {
            true
        }

        async fn execute(
            &self,
            args: &str,
            _ctx: &ExecutionContext,
        ) -> anyhow::Result<Option<PromptResult>> {
            Ok(Some(PromptResult::new(format!("Fix issue {}", args))))
        }
    }

    async fn context(temp_dir: &TempDir, answers: &[&str]) -> CliContext {
        let args = Args::parse_from(["slashkit", "--quiet"]);
        let runtime = Arc::new(
            CliRuntime::new(false, true)
                .with_answers(answers.iter().map(|a| a.to_string()).collect()),
        );
        let mut registry = CommandRegistry::new();
        CommandLoader::new().load_into(
            &mut registry,
            [
                CommandSource::Builtin,
                CommandSource::commands("test", [Arc::new(NeedsArgs) as Arc<dyn SlashCommand>]),
            ],
        );

        CliContext {
            runner: SessionRunner::new(temp_dir.path(), runtime.clone()),
            runtime,
            registry,
            workspace: PathBuf::from(temp_dir.path()),
            settings_manager: Arc::new(
                SettingsManager::with_path(temp_dir.path().join("settings.toml"))
                    .await
                    .unwrap(),
            ),
            load_errors: Vec::new(),
            show_banner: false,
            args,
        }
    }

    #[tokio::test]
    async fn test_missing_args_skips_session() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, &[]).await;

        assert!(execute_once(&ctx, "fix", "  ").await.unwrap().is_none());

        let report = execute_once(&ctx, "/fix", "#42").await.unwrap().unwrap();
        assert_eq!(report.outcome.prompt(), Some("Fix issue #42"));
    }

    #[tokio::test]
    async fn test_args_are_passed_through_raw() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, &[]).await;

        let report = execute_once(&ctx, "fix", " #42  --force ").await.unwrap().unwrap();
        assert_eq!(report.outcome.prompt(), Some("Fix issue  #42  --force "));
    }

    #[tokio::test]
    async fn test_unknown_command_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, &[]).await;

        let err = execute_once(&ctx, "nonexistent", "").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlashkitError>(),
            Some(SlashkitError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_run_named_outcomes() {
        let temp_dir = TempDir::new().unwrap();

        let ctx = context(&temp_dir, &["n"]).await;
        assert!(run_named(&ctx, "clean-and-refactor", "").await.is_ok());

        // Answers run out after the first question
        let ctx = context(&temp_dir, &["databases"]).await;
        assert!(run_named(&ctx, "new-blog", "").await.is_err());
    }
}
