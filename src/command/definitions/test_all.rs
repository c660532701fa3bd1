//! `/test-all` - test-writing guide for the project's conventions.

use async_trait::async_trait;

use crate::command::assembler::{PromptTemplate, Slots};
use crate::command::models::{PromptResult, SlashCommand};
use crate::session::ExecutionContext;

pub(super) const TEMPLATE: &str = include_str!("templates/test_all.md");

pub const DEFAULT_FOCUS: &str = "all";

pub struct TestAllCommand;

#[async_trait]
impl SlashCommand for TestAllCommand {
    fn name(&self) -> &str {
        "test-all"
    }

    fn description(&self) -> &str {
        "Create comprehensive tests following project patterns"
    }

    async fn execute(
        &self,
        _args: &str,
        ctx: &ExecutionContext,
    ) -> anyhow::Result<Option<PromptResult>> {
        ctx.say("🧪 Preparing comprehensive test creation guide...");

        let focus = ctx
            .ask("What would you like to test? (feature/api/component/security/all)")
            .await?;

        let slots = Slots::new().with("focus", &focus, DEFAULT_FOCUS);
        let template = PromptTemplate::compile(self.name(), TEMPLATE)?;
        Ok(Some(PromptResult::new(template.render(&slots)?)))
    }
}
