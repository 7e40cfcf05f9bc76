//! Data models for Fanboard

mod stats;
mod story;

pub use stats::BoardStats;
pub use story::{Story, StoryDraft, StoryId, ANONYMOUS_AUTHOR, UNTITLED_STORY};

#[cfg(test)]
pub(crate) use story::story;
