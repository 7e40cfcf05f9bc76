//! Remote sync state shared with front ends.

/// Where the board stands relative to the remote store.
///
/// Front ends use this to decide whether to show the "local only" advisory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No successful fetch yet, or the last one failed or timed out.
    #[default]
    Offline,
    /// A fetch is in flight.
    Syncing,
    /// The last fetch merged and persisted.
    Synced,
    /// The last merge could not be written to the local store.
    Error,
}

impl SyncState {
    /// Whether the last completed fetch got an answer from the remote store.
    pub const fn is_remote_reachable(self) -> bool {
        matches!(self, Self::Synced | Self::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_answered_fetches_count_as_reachable() {
        assert!(SyncState::Synced.is_remote_reachable());
        assert!(SyncState::Error.is_remote_reachable());
        assert!(!SyncState::Offline.is_remote_reachable());
        assert!(!SyncState::Syncing.is_remote_reachable());
    }
}
