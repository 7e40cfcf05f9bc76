//! fanboard-core - Core library for Fanboard
//!
//! This crate contains the story model, the local store, the remote transport
//! interface, and the reconciler that keeps the two in agreement. Front ends
//! (the CLI today) only talk to [`Reconciler`].

pub mod collection;
pub mod config;
pub mod error;
pub mod models;
pub mod reconciler;
pub mod remote;
pub mod samples;
pub mod state;
pub mod store;
pub mod util;

pub use collection::SortKey;
pub use config::BoardConfig;
pub use error::{Error, Result};
pub use models::{BoardStats, Story, StoryDraft, StoryId};
pub use reconciler::{Reconciler, SubmitReceipt, SyncOutcome};
pub use state::SyncState;
