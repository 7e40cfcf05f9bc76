//! Board statistics

use std::collections::HashSet;

use serde::Serialize;

use super::Story;

/// Aggregate numbers shown above the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    /// Number of stories in the collection
    pub story_count: usize,
    /// Sum of like counters
    pub total_likes: u64,
    /// Unique non-empty author names
    pub distinct_author_count: usize,
}

impl BoardStats {
    pub fn from_stories(stories: &[Story]) -> Self {
        let authors = stories
            .iter()
            .filter_map(|story| story.author.as_deref())
            .filter(|author| !author.is_empty())
            .collect::<HashSet<_>>();

        Self {
            story_count: stories.len(),
            total_likes: stories
                .iter()
                .fold(0u64, |total, story| total.saturating_add(story.likes)),
            distinct_author_count: authors.len(),
        }
    }
}
