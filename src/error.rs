use serde::Serialize;
use thiserror::Error;

use crate::command::LoadError;
use crate::runtime::InteractionError;

#[derive(Debug, Error)]
pub enum SlashkitError {
    #[error("Invalid command: {0}")]
    Load(#[from] LoadError),

    #[error("No such command: /{0}")]
    NotFound(String),

    #[error("Interaction failed: {0}")]
    Interaction(#[from] InteractionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Serialized as its message for JSON output
impl Serialize for SlashkitError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlashkitError>;
