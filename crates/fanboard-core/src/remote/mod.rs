//! Remote transport: best-effort channel to the shared story backend.
//!
//! The reconciler only sees [`RemoteTransport`]. How a transport reaches the
//! backend (plain HTTP here) stays behind the trait.

mod http;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

pub use http::HttpTransport;

use crate::models::Story;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Remote store is not configured")]
    NotConfigured,
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Remote API error: {0}")]
    Api(String),
    #[error("Invalid remote payload: {0}")]
    Payload(String),
    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Network side of the board.
///
/// Both calls report failure as a value. Neither is expected to enforce its
/// own deadline; callers bound them.
pub trait RemoteTransport: Send + Sync {
    /// Fetch every story the remote store holds.
    fn fetch(&self) -> impl Future<Output = TransportResult<Vec<Story>>> + Send;

    /// Publish one newly created story.
    fn push(&self, story: &Story) -> impl Future<Output = TransportResult<()>> + Send;
}

/// `None` is a board with no remote configured: every call fails fast.
impl<T: RemoteTransport> RemoteTransport for Option<T> {
    async fn fetch(&self) -> TransportResult<Vec<Story>> {
        match self {
            Some(transport) => transport.fetch().await,
            None => Err(TransportError::NotConfigured),
        }
    }

    async fn push(&self, story: &Story) -> TransportResult<()> {
        match self {
            Some(transport) => transport.push(story).await,
            None => Err(TransportError::NotConfigured),
        }
    }
}
