use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use chrono::Utc;
use fanboard_core::remote::HttpTransport;
use fanboard_core::store::{LocalStore, MemoryStore, SqliteStore};
use fanboard_core::util::normalize_text_option;
use fanboard_core::{BoardConfig, Reconciler, Story, SyncOutcome, SyncState};
use serde::Serialize;

use crate::error::CliError;

/// Board as the CLI drives it: one of two local stores, optional remote.
pub type CliBoard = Reconciler<BoardStore, Option<HttpTransport>>;

/// Where the board lives for this invocation, resolved from flags and env.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardOptions {
    pub db_path: PathBuf,
    pub remote_url: Option<String>,
    pub ephemeral: bool,
}

impl BoardOptions {
    pub fn resolve(db_path: Option<PathBuf>, remote_url: Option<String>, ephemeral: bool) -> Self {
        Self {
            db_path: resolve_db_path(db_path),
            remote_url: resolve_remote_url(remote_url),
            ephemeral,
        }
    }

    pub const fn has_remote(&self) -> bool {
        self.remote_url.is_some()
    }
}

pub enum BoardStore {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl LocalStore for BoardStore {
    fn load(&self) -> Vec<Story> {
        match self {
            Self::Sqlite(store) => store.load(),
            Self::Memory(store) => store.load(),
        }
    }

    fn save(&mut self, stories: &[Story]) -> fanboard_core::Result<()> {
        match self {
            Self::Sqlite(store) => store.save(stories),
            Self::Memory(store) => store.save(stories),
        }
    }

    fn has_snapshot(&self) -> bool {
        match self {
            Self::Sqlite(store) => store.has_snapshot(),
            Self::Memory(store) => store.has_snapshot(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StoryListItem {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub date: String,
    pub relative_time: String,
    pub likes: u64,
    pub liked_by_user: bool,
}

/// Open the board from the local store only. No network traffic.
pub fn open_board(options: &BoardOptions) -> Result<CliBoard, CliError> {
    let store = if options.ephemeral {
        BoardStore::Memory(MemoryStore::new())
    } else {
        BoardStore::Sqlite(SqliteStore::open(&options.db_path)?)
    };

    let transport = options
        .remote_url
        .clone()
        .map(HttpTransport::new)
        .transpose()?;

    if let Some(transport) = transport.as_ref() {
        tracing::info!("Remote store: {}", transport.endpoint());
    } else {
        tracing::info!("Running in local-only mode (no remote configured)");
    }

    Ok(Reconciler::open(store, transport, BoardConfig::from_env()))
}

/// Open the board and merge the remote store once, warning on stderr when a
/// configured remote could not be reached.
pub async fn bootstrap_board(options: &BoardOptions) -> Result<CliBoard, CliError> {
    let board = open_board(options)?;
    let outcome = board.sync_remote().await;
    if options.has_remote() {
        if let Some(advisory) = sync_advisory(&outcome) {
            eprintln!("{advisory}");
        }
    }
    Ok(board)
}

/// Non-blocking notice for a fetch that did not merge.
pub fn sync_advisory(outcome: &SyncOutcome) -> Option<String> {
    match outcome {
        SyncOutcome::Unavailable(error) => Some(format!(
            "Note: remote store unavailable ({error}); showing stories saved on this device."
        )),
        SyncOutcome::Merged { .. } | SyncOutcome::Stale => None,
    }
}

/// Notice for a settled sync state, printed only when reachability flips or a
/// merge could not be saved.
pub fn sync_state_notice(previous: SyncState, current: SyncState) -> Option<&'static str> {
    match current {
        SyncState::Syncing => None,
        SyncState::Error => {
            Some("Note: merged remote stories but could not save them on this device.")
        }
        _ if previous.is_remote_reachable() == current.is_remote_reachable() => None,
        SyncState::Offline => {
            Some("Note: remote store unreachable; showing stories saved on this device.")
        }
        SyncState::Synced => Some("Remote store reachable again."),
    }
}

pub fn format_story_lines(stories: &[Story]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    stories
        .iter()
        .map(|story| {
            let heart = if story.liked_by_user { "♥" } else { " " };
            let title = story_preview(story.display_title(), 32);
            let author = story_preview(story.display_author(), 16);
            let relative_time = format_relative_time(story.id.get(), now_ms);

            format!(
                "{:<13}  {heart}{:>4}  {title:<32}  {author:<16}  {relative_time}",
                story.id, story.likes
            )
        })
        .collect()
}

pub fn story_to_list_item(story: &Story) -> StoryListItem {
    let now_ms = Utc::now().timestamp_millis();
    StoryListItem {
        id: story.id.get(),
        author: story.display_author().to_string(),
        title: story.display_title().to_string(),
        preview: story_preview(&story.content, 80),
        content: story.content.clone(),
        date: story.date.clone(),
        relative_time: format_relative_time(story.id.get(), now_ms),
        likes: story.likes,
        liked_by_user: story.liked_by_user,
    }
}

pub fn story_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// Age of a story from its id. Ids below 2001-09-09 (sample stories) have no
/// meaningful age and render as "-".
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    const MIN_PLAUSIBLE_MS: i64 = 1_000_000_000_000;
    if timestamp_ms < MIN_PLAUSIBLE_MS {
        return "-".to_string();
    }

    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn resolve_story_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("FANBOARD_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fanboard")
        .join("fanboard.db")
}

pub fn resolve_remote_url(cli_remote_url: Option<String>) -> Option<String> {
    normalize_text_option(cli_remote_url)
        .or_else(|| normalize_text_option(env::var("FANBOARD_REMOTE_URL").ok()))
}
