//! `/new-blog` - blog research and writing brief.
//!
//! Asks for topic, audience and angle. The angle is used twice with different
//! fallbacks: `mixed` where it selects a strategy, `mixed approach` in the
//! closing summary.

use async_trait::async_trait;

use crate::command::assembler::{PromptTemplate, Slots};
use crate::command::models::{PromptResult, SlashCommand};
use crate::session::ExecutionContext;

pub(super) const TEMPLATE: &str = include_str!("templates/new_blog.md");

pub const DEFAULT_TOPIC: &str = "general developer marketing";
pub const DEFAULT_AUDIENCE: &str = "technical decision makers";
pub const DEFAULT_ANGLE_PREFERENCE: &str = "mixed";
pub const DEFAULT_ANGLE: &str = "mixed approach";

pub struct NewBlogCommand;

#[async_trait]
impl SlashCommand for NewBlogCommand {
    fn name(&self) -> &str {
        "new-blog"
    }

    fn description(&self) -> &str {
        "Research and create data-driven blog posts using Picks and Shovels methodology"
    }

    async fn execute(
        &self,
        _args: &str,
        ctx: &ExecutionContext,
    ) -> anyhow::Result<Option<PromptResult>> {
        ctx.say("📊 Initializing comprehensive blog research and creation system...");

        let topic = ctx
            .ask("What topic or industry should I focus on? (or \"general\" for broad developer marketing)")
            .await?;
        let audience = ctx
            .ask("Who is your target audience? (e.g., \"technical founders\", \"developer advocates\")")
            .await?;
        let angle = ctx
            .ask("What angle for the posts? (personal/utility/controversial/mixed)")
            .await?;

        let slots = Slots::new()
            .with("topic", &topic, DEFAULT_TOPIC)
            .with("audience", &audience, DEFAULT_AUDIENCE)
            .with("angle_preference", &angle, DEFAULT_ANGLE_PREFERENCE)
            .with("angle", &angle, DEFAULT_ANGLE);

        let template = PromptTemplate::compile(self.name(), TEMPLATE)?;
        Ok(Some(PromptResult::new(template.render(&slots)?)))
    }
}
