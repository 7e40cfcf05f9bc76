//! Reconciler: the single owner of the in-memory story collection.
//!
//! The collection and the local store sit behind one async mutex, so submit,
//! like, and merge each run to completion and local writes never interleave.
//! Network calls happen outside that lock and are bounded by the timeouts in
//! [`BoardConfig`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::collection::{merge_remote_first, sorted, SortKey};
use crate::config::BoardConfig;
use crate::error::Result;
use crate::models::{BoardStats, Story, StoryDraft, StoryId};
use crate::remote::{RemoteTransport, TransportError};
use crate::samples::sample_stories;
use crate::state::SyncState;
use crate::store::LocalStore;
use crate::util::{local_display_date, unix_millis_now};

/// Result of one remote fetch-and-merge round.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Remote stories were merged and the collection persisted.
    Merged { fetched: usize, total: usize },
    /// The fetch failed or timed out; the collection is unchanged.
    Unavailable(TransportError),
    /// A newer fetch was commissioned meanwhile; this result was dropped.
    Stale,
}

impl SyncOutcome {
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// What happened to a submitted story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub story: Story,
    /// Always true: a receipt is only issued after the local save.
    pub persisted_locally: bool,
    pub published_remotely: bool,
}

struct Board<S> {
    stories: Vec<Story>,
    store: S,
    last_issued_id: i64,
}

impl<S> Board<S> {
    /// Creation time, bumped past every id already in use.
    fn next_id(&self, now_ms: i64) -> StoryId {
        let floor = self
            .stories
            .iter()
            .map(|story| story.id.get())
            .max()
            .unwrap_or(i64::MIN)
            .max(self.last_issued_id);
        if now_ms > floor {
            return StoryId::new(now_ms);
        }
        if let Some(next) = floor.checked_add(1) {
            return StoryId::new(next);
        }

        // Nothing fits above the largest id; take the first free one from now.
        let mut candidate = now_ms;
        while self.stories.iter().any(|story| story.id.get() == candidate) {
            candidate = candidate.saturating_add(1);
        }
        StoryId::new(candidate)
    }
}

struct Inner<S, R> {
    board: Mutex<Board<S>>,
    remote: R,
    config: BoardConfig,
    fetch_generation: AtomicU64,
    revision: watch::Sender<u64>,
    sync_state: watch::Sender<SyncState>,
}

/// Owns the story collection and keeps it in step with the local store and
/// the remote transport.
///
/// Cloning is cheap; clones share the same collection.
pub struct Reconciler<S, R> {
    inner: Arc<Inner<S, R>>,
}

impl<S, R> Clone for Reconciler<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: LocalStore, R: RemoteTransport> Reconciler<S, R> {
    /// Load the local snapshot. The board is displayable as soon as this
    /// returns; no network call is made.
    pub fn open(mut store: S, remote: R, config: BoardConfig) -> Self {
        let mut stories = store.load();

        if stories.is_empty() && config.seed_samples && !store.has_snapshot() {
            stories = sample_stories();
            tracing::info!("Seeding empty board with {} sample stories", stories.len());
            if let Err(error) = store.save(&stories) {
                tracing::warn!("Failed to persist sample stories: {error}");
            }
        }

        tracing::debug!("Opened board with {} local stories", stories.len());

        let (revision, _) = watch::channel(0);
        let (sync_state, _) = watch::channel(SyncState::Offline);
        Self {
            inner: Arc::new(Inner {
                board: Mutex::new(Board {
                    stories,
                    store,
                    last_issued_id: i64::MIN,
                }),
                remote,
                config,
                fetch_generation: AtomicU64::new(0),
                revision,
                sync_state,
            }),
        }
    }

    /// [`Reconciler::open`] followed by one [`Reconciler::sync_remote`].
    pub async fn bootstrap(store: S, remote: R, config: BoardConfig) -> (Self, SyncOutcome) {
        let reconciler = Self::open(store, remote, config);
        let outcome = reconciler.sync_remote().await;
        (reconciler, outcome)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.inner.config
    }

    /// Fetch from the remote store and merge, remote records first.
    ///
    /// Never fails: an unreachable, erroring, or slow remote leaves the
    /// collection as it was. Only the most recently commissioned fetch may
    /// merge; an older one that resolves later is dropped.
    pub async fn sync_remote(&self) -> SyncOutcome {
        let inner = &self.inner;
        let generation = inner.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;
        inner.sync_state.send_replace(SyncState::Syncing);

        let bound = inner.config.fetch_timeout();
        let fetched = time::timeout(bound, inner.remote.fetch())
            .await
            .unwrap_or(Err(TransportError::Timeout(bound)));

        let mut guard = inner.board.lock().await;
        let board = &mut *guard;
        if inner.fetch_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding result of superseded fetch #{generation}");
            return SyncOutcome::Stale;
        }

        let remote = match fetched {
            Ok(remote) => remote,
            Err(error) => {
                if matches!(error, TransportError::NotConfigured) {
                    tracing::debug!("No remote store configured; staying local-only");
                } else {
                    tracing::warn!("Remote fetch failed, staying local-only: {error}");
                }
                inner.sync_state.send_replace(SyncState::Offline);
                return SyncOutcome::Unavailable(error);
            }
        };

        let fetched = remote.len();
        let local = std::mem::take(&mut board.stories);
        board.stories = merge_remote_first(remote, local);
        let total = board.stories.len();

        let state = match board.store.save(&board.stories) {
            Ok(()) => SyncState::Synced,
            Err(error) => {
                tracing::warn!("Merged {total} stories but could not persist them: {error}");
                SyncState::Error
            }
        };
        drop(guard);

        inner.sync_state.send_replace(state);
        self.bump_revision();
        tracing::debug!("Merged {fetched} remote stories; board now holds {total}");
        SyncOutcome::Merged { fetched, total }
    }

    /// Stories in the requested display order. The collection is untouched.
    pub async fn stories(&self, sort: SortKey) -> Vec<Story> {
        let board = self.inner.board.lock().await;
        sorted(&board.stories, sort)
    }

    /// Look up one story by id.
    pub async fn story(&self, id: StoryId) -> Option<Story> {
        let board = self.inner.board.lock().await;
        board.stories.iter().find(|story| story.id == id).cloned()
    }

    pub async fn stats(&self) -> BoardStats {
        let board = self.inner.board.lock().await;
        BoardStats::from_stories(&board.stories)
    }

    /// Validate, store locally, then try to publish.
    ///
    /// The story is committed to the local store before the remote is
    /// contacted and is never withdrawn because publishing failed. If the
    /// local save fails the collection is left as it was and the error is
    /// returned.
    pub async fn submit_story(
        &self,
        author: &str,
        title: &str,
        content: &str,
    ) -> Result<SubmitReceipt> {
        let draft = StoryDraft::new(author, title, content)?;
        let inner = &self.inner;

        let story = {
            let mut guard = inner.board.lock().await;
            let board = &mut *guard;
            let id = board.next_id(unix_millis_now());
            let story = draft.into_story(id, local_display_date(&inner.config.date_format));

            board.stories.insert(0, story.clone());
            if let Err(error) = board.store.save(&board.stories) {
                board.stories.remove(0);
                tracing::warn!("Rejected story {id}: local save failed: {error}");
                return Err(error);
            }
            board.last_issued_id = id.get();
            story
        };
        self.bump_revision();
        tracing::info!("Stored story {} locally", story.id);

        let bound = inner.config.push_timeout();
        let published_remotely = match time::timeout(bound, inner.remote.push(&story)).await {
            Ok(Ok(())) => true,
            Ok(Err(TransportError::NotConfigured)) => false,
            Ok(Err(error)) => {
                tracing::warn!("Story {} kept local-only: {error}", story.id);
                false
            }
            Err(_) => {
                tracing::warn!(
                    "Story {} kept local-only: {}",
                    story.id,
                    TransportError::Timeout(bound)
                );
                false
            }
        };

        Ok(SubmitReceipt {
            story,
            persisted_locally: true,
            published_remotely,
        })
    }

    /// Flip this device's like on a story and persist. Like state is never
    /// sent to the remote store.
    ///
    /// Returns `Ok(None)` for an id that is not on the board.
    pub async fn toggle_like(&self, id: StoryId) -> Result<Option<Story>> {
        let mut guard = self.inner.board.lock().await;
        let board = &mut *guard;
        let Some(index) = board.stories.iter().position(|story| story.id == id) else {
            tracing::debug!("Ignoring like for unknown story {id}");
            return Ok(None);
        };

        let previous = board.stories[index].clone();
        board.stories[index].toggle_like();
        if let Err(error) = board.store.save(&board.stories) {
            board.stories[index] = previous;
            return Err(error);
        }

        let updated = board.stories[index].clone();
        drop(guard);
        self.bump_revision();
        Ok(Some(updated))
    }

    pub fn sync_state(&self) -> SyncState {
        *self.inner.sync_state.borrow()
    }

    /// Receiver that changes whenever the collection does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn subscribe_sync_state(&self) -> watch::Receiver<SyncState> {
        self.inner.sync_state.subscribe()
    }

    fn bump_revision(&self) {
        self.inner
            .revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}

impl<S, R> Reconciler<S, R>
where
    S: LocalStore + Send + 'static,
    R: RemoteTransport + 'static,
{
    /// Re-run fetch and merge every `resync_interval` until the handle is
    /// aborted. The first round happens one interval from now.
    pub fn spawn_periodic_resync(&self) -> JoinHandle<()> {
        let reconciler = self.clone();
        let period = self.inner.config.resync_interval();

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match reconciler.sync_remote().await {
                    SyncOutcome::Merged { fetched, total } => {
                        tracing::debug!("Periodic resync merged {fetched} stories ({total} total)");
                    }
                    SyncOutcome::Unavailable(error) => {
                        tracing::debug!("Periodic resync skipped: {error}");
                    }
                    SyncOutcome::Stale => {}
                }
            }
        })
    }
}
