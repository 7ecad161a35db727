use thiserror::Error as ThisError;

mod path;
mod pipeline;
mod preset;
mod rule;

pub use path::FieldPath;
pub use pipeline::{annotate, evaluate, AnnotatedPost};
pub use preset::{FeedConfig, FeedPreset};
pub use rule::{Action, Condition, FeedRule};

#[derive(Debug, ThisError)]
pub enum FeedError {
    #[error("Field path must be empty or start with '/': {0}")]
    BadFieldPath(String),
    #[error("Unknown feed preset: {0}")]
    UnknownPreset(String),
    #[error("Failed to convert post to fields, cause: {0}")]
    Fields(#[from] serde_json::Error),
}
