//! Identity, merge, and ordering rules for the story collection.
//!
//! The collection itself is kept in insertion order. Every ordering a reader
//! sees is computed here on demand.

use std::collections::HashSet;
use std::fmt;

use crate::models::Story;

/// Display order requested by a front end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Reverse-chronological, by id
    #[default]
    Newest,
    /// Most liked first, ties in newest order
    Popular,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Newest => f.write_str("newest"),
            Self::Popular => f.write_str("popular"),
        }
    }
}

/// Keep the first record seen for each id, preserving first-occurrence order.
pub fn dedupe_by_id(stories: Vec<Story>) -> Vec<Story> {
    let mut seen = HashSet::with_capacity(stories.len());
    stories
        .into_iter()
        .filter(|story| seen.insert(story.id))
        .collect()
}

/// Merge a remote fetch into the local collection.
///
/// Remote records come first, so for an id present on both sides the remote
/// record replaces the local one wholesale.
pub fn merge_remote_first(remote: Vec<Story>, local: Vec<Story>) -> Vec<Story> {
    let mut combined = remote;
    combined.extend(local);
    dedupe_by_id(combined)
}

/// Copy of `stories` in the requested display order.
pub fn sorted(stories: &[Story], key: SortKey) -> Vec<Story> {
    let mut ordered = stories.to_vec();
    match key {
        SortKey::Newest => ordered.sort_by(|a, b| b.id.cmp(&a.id)),
        SortKey::Popular => {
            ordered.sort_by(|a, b| b.likes.cmp(&a.likes).then_with(|| b.id.cmp(&a.id)));
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{story, StoryId};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ids(stories: &[Story]) -> Vec<i64> {
        stories.iter().map(|story| story.id.get()).collect()
    }

    #[test]
    fn merge_prefers_remote_record_for_shared_id() {
        let local = vec![story(1, 5)];
        let remote = vec![story(1, 9), story(2, 0)];

        let merged = merge_remote_first(remote.clone(), local);
        assert_eq!(merged, remote);
    }

    #[test]
    fn merge_keeps_local_only_records_after_remote_ones() {
        let local = vec![story(3, 0), story(1, 1)];
        let remote = vec![story(2, 0), story(1, 7)];

        let merged = merge_remote_first(remote, local);
        assert_eq!(ids(&merged), vec![2, 1, 3]);
        assert_eq!(merged[1].likes, 7);
    }

    #[test]
    fn merge_replaces_local_like_state_with_remote_record() {
        let mut liked = story(1, 4);
        liked.liked_by_user = true;

        let merged = merge_remote_first(vec![story(1, 3)], vec![liked]);
        assert_eq!(merged.len(), 1);
        assert!(!merged[0].liked_by_user);
    }

    #[test]
    fn merge_with_empty_remote_is_local() {
        let local = vec![story(5, 0), story(4, 0)];
        assert_eq!(merge_remote_first(Vec::new(), local.clone()), local);
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let deduped = dedupe_by_id(vec![story(2, 1), story(1, 0), story(2, 8), story(3, 0)]);
        assert_eq!(ids(&deduped), vec![2, 1, 3]);
        assert_eq!(deduped[0].likes, 1);
    }

    #[test]
    fn newest_sorts_by_descending_id() {
        let stories = vec![story(100, 0), story(300, 0), story(200, 0)];
        assert_eq!(ids(&sorted(&stories, SortKey::Newest)), vec![300, 200, 100]);
        assert_eq!(ids(&stories), vec![100, 300, 200]);
    }

    #[test]
    fn popular_breaks_ties_by_newest() {
        let stories = vec![story(1, 3), story(2, 9), story(3, 9)];
        assert_eq!(ids(&sorted(&stories, SortKey::Popular)), vec![3, 2, 1]);
    }

    #[test]
    fn newest_is_stable_for_duplicate_ids() {
        let mut first = story(5, 0);
        first.content = "first".to_string();
        let mut second = story(5, 0);
        second.content = "second".to_string();

        let ordered = sorted(&[first, story(9, 0), second], SortKey::Newest);
        assert_eq!(ordered[0].id, StoryId::new(9));
        assert_eq!(ordered[1].content, "first");
        assert_eq!(ordered[2].content, "second");
    }

    #[test]
    fn sort_key_displays_lowercase() {
        assert_eq!(SortKey::Newest.to_string(), "newest");
        assert_eq!(SortKey::Popular.to_string(), "popular");
    }

    fn stories_strategy() -> impl Strategy<Value = Vec<Story>> {
        prop::collection::vec((0i64..12, 0u64..20), 0..40).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(id, likes)| story(id, likes))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn dedupe_is_idempotent(stories in stories_strategy()) {
            let once = dedupe_by_id(stories);
            let twice = dedupe_by_id(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn dedupe_leaves_unique_ids(stories in stories_strategy()) {
            let deduped = dedupe_by_id(stories.clone());
            let unique = deduped.iter().map(|story| story.id).collect::<HashSet<_>>();
            prop_assert_eq!(unique.len(), deduped.len());
            let all = stories.iter().map(|story| story.id).collect::<HashSet<_>>();
            prop_assert_eq!(unique, all);
        }

        #[test]
        fn repeated_merge_with_same_remote_is_stable(
            remote in stories_strategy(),
            local in stories_strategy(),
        ) {
            let once = merge_remote_first(remote.clone(), local);
            let twice = merge_remote_first(remote, once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
