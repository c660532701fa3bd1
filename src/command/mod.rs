//! Slash command plugin system.
//!
//! Commands are discovered by the [`CommandLoader`], validated against the
//! [`SlashCommand`] contract, and indexed by the [`CommandRegistry`]. Running
//! one is the session runner's job (see `crate::session`).
//!
//! ```text
//! CommandSource --load--> ValidatedCommand --register--> CommandRegistry
//!                                                             |
//!                                               resolve(name) v
//!                                                       SessionRunner
//! ```

pub mod assembler;
pub mod definitions;
pub mod loader;
pub mod manifest;
pub mod models;
pub mod registry;

pub use assembler::{is_affirmative, is_blank, or_default, PromptTemplate, Slots};
pub use definitions::{builtin_commands, create_default_registry};
pub use loader::{CommandLoader, CommandSource, LoadError, LoadReport, ValidatedCommand};
pub use manifest::{CommandManifest, TemplateCommand};
pub use models::{CommandInfo, PromptResult, SlashCommand};
pub use registry::CommandRegistry;
