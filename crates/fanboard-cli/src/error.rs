use std::io;

use fanboard_core::remote::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] fanboard_core::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No story content provided")]
    EmptyContent,
    #[error("Invalid story ID: {0}")]
    InvalidStoryId(String),
    #[error("No story with ID {0}")]
    StoryNotFound(String),
    #[error("Remote sync failed: {0}")]
    SyncFailed(String),
    #[error(
        "Remote store is not configured. Pass --remote-url or set FANBOARD_REMOTE_URL to enable `fanboard sync`."
    )]
    SyncNotConfigured,
}
