//! `/clean-and-refactor` - codebase cleanup guide behind a confirmation.

use async_trait::async_trait;

use crate::command::assembler::{PromptTemplate, Slots};
use crate::command::models::{PromptResult, SlashCommand};
use crate::session::ExecutionContext;

pub(super) const TEMPLATE: &str = include_str!("templates/clean_and_refactor.md");

pub struct CleanAndRefactorCommand;

#[async_trait]
impl SlashCommand for CleanAndRefactorCommand {
    fn name(&self) -> &str {
        "clean-and-refactor"
    }

    fn description(&self) -> &str {
        "Comprehensive codebase cleanup and refactoring"
    }

    async fn execute(
        &self,
        _args: &str,
        ctx: &ExecutionContext,
    ) -> anyhow::Result<Option<PromptResult>> {
        ctx.say("🧹 Starting comprehensive codebase cleanup and refactoring...");

        if !ctx.confirm("Ready to begin the cleanup? (y/n)").await? {
            ctx.say("Cleanup cancelled.");
            return Ok(None);
        }

        let template = PromptTemplate::compile(self.name(), TEMPLATE)?;
        Ok(Some(PromptResult::new(template.render(&Slots::new())?)))
    }
}
