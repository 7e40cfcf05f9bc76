use std::path::PathBuf;

use clap::Parser;
use fanboard_core::remote::TransportError;
use fanboard_core::{BoardStats, SortKey, Story, StoryId, SyncOutcome, SyncState};
use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

use crate::cli::{Cli, Commands, SortArg};
use crate::commands::common::{
    format_relative_time, normalize_content, open_board, resolve_db_path, resolve_remote_url,
    story_preview, story_to_list_item, sync_advisory, sync_state_notice, BoardOptions,
};
use crate::commands::like::{parse_story_id, run_like};
use crate::commands::list::render_story_table;
use crate::commands::stats::{format_stats_lines, run_stats};
use crate::commands::submit::run_submit;
use crate::commands::sync::run_sync;
use crate::error::CliError;

fn local_options(dir: &TempDir) -> BoardOptions {
    BoardOptions {
        db_path: dir.path().join("fanboard.db"),
        remote_url: None,
        ephemeral: false,
    }
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn normalize_content_keeps_multiline_text() {
    assert_eq!(
        normalize_content("line 1\nline 2\n"),
        Some("line 1\nline 2".to_string())
    );
}

#[test]
fn format_relative_time_units() {
    let now = 1_700_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
}

#[test]
fn format_relative_time_hides_non_timestamp_ids() {
    assert_eq!(format_relative_time(3, 1_700_000_000_000), "-");
}

#[test]
fn story_preview_truncates_with_ellipsis() {
    let preview = story_preview("This is a very long sentence that should be shortened", 20);
    assert_eq!(preview, "This is a very lo...");
}

#[test]
fn story_preview_collapses_first_line() {
    assert_eq!(story_preview("  one   two \nthree", 40), "one two");
}

#[test]
fn resolve_db_path_prefers_flag() {
    let explicit = PathBuf::from("/tmp/explicit.db");
    assert_eq!(resolve_db_path(Some(explicit.clone())), explicit);
}

#[test]
fn resolve_remote_url_ignores_blank_flag() {
    assert_eq!(
        resolve_remote_url(Some(" https://script.example.com/exec ".to_string())),
        Some("https://script.example.com/exec".to_string())
    );
}

#[test]
fn parse_story_id_rejects_garbage() {
    assert_eq!(parse_story_id(" 1700000000000 ").unwrap(), StoryId::new(1_700_000_000_000));
    assert!(matches!(
        parse_story_id("abc"),
        Err(CliError::InvalidStoryId(id)) if id == "abc"
    ));
}

#[test]
fn cli_parses_submit_and_sort() {
    let cli = Cli::parse_from([
        "fanboard",
        "submit",
        "--author",
        "Ann",
        "--title",
        "Concert",
        "what",
        "a",
        "night",
    ]);
    match cli.command {
        Commands::Submit {
            author,
            title,
            content,
        } => {
            assert_eq!(author, "Ann");
            assert_eq!(title, "Concert");
            assert_eq!(content, words("what a night"));
        }
        _ => panic!("expected submit"),
    }

    let cli = Cli::parse_from(["fanboard", "list", "--sort", "popular", "--ephemeral"]);
    assert!(cli.ephemeral);
    assert!(matches!(
        cli.command,
        Commands::List {
            sort: SortArg::Popular,
            ..
        }
    ));
    assert_eq!(SortKey::from(SortArg::Popular), SortKey::Popular);
}

#[test]
fn sync_advisory_only_for_unavailable_remote() {
    assert!(sync_advisory(&SyncOutcome::Merged {
        fetched: 1,
        total: 1
    })
    .is_none());
    assert!(sync_advisory(&SyncOutcome::Stale).is_none());
    let advisory = sync_advisory(&SyncOutcome::Unavailable(TransportError::Api(
        "down".to_string(),
    )))
    .unwrap();
    assert!(advisory.contains("down"));
}

#[test]
fn format_stats_lines_lists_all_counters() {
    let lines = format_stats_lines(&BoardStats {
        story_count: 3,
        total_likes: 6,
        distinct_author_count: 2,
    });
    assert_eq!(lines, vec!["Stories: 3", "Likes:   6", "Authors: 2"]);
}

#[tokio::test]
async fn submit_then_like_persists_across_invocations() {
    let dir = tempdir().unwrap();
    let options = local_options(&dir);

    let receipt = run_submit(
        "Ann",
        "Concert",
        &words("The best night of the year"),
        &options,
    )
    .await
    .unwrap();
    assert!(!receipt.published_remotely);

    let liked = run_like(&receipt.story.id.to_string(), &options)
        .await
        .unwrap();
    assert_eq!(liked.likes, 1);

    let board = open_board(&options).unwrap();
    let stories = board.stories(SortKey::Newest).await;
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].id, receipt.story.id);
    assert!(stories[0].liked_by_user);
}

#[tokio::test]
async fn submit_rejects_short_content() {
    let dir = tempdir().unwrap();
    let options = local_options(&dir);

    let error = run_submit("Ann", "Concert", &words("too short"), &options)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        CliError::Core(fanboard_core::Error::Validation(_))
    ));
    assert!(open_board(&options)
        .unwrap()
        .stories(SortKey::Newest)
        .await
        .is_empty());
}

#[tokio::test]
async fn like_unknown_story_reports_not_found() {
    let dir = tempdir().unwrap();
    let error = run_like("42", &local_options(&dir)).await.unwrap_err();
    assert!(matches!(error, CliError::StoryNotFound(id) if id == "42"));
}

#[tokio::test]
async fn stats_reflect_submitted_stories() {
    let dir = tempdir().unwrap();
    let options = local_options(&dir);

    for author in ["A", "B", "A"] {
        run_submit(author, "Title", &words("long enough story text"), &options)
            .await
            .unwrap();
    }

    let stats = run_stats(true, &options).await.unwrap();
    assert_eq!(stats.story_count, 3);
    assert_eq!(stats.distinct_author_count, 2);
    assert_eq!(stats.total_likes, 0);
}

#[tokio::test]
async fn sync_requires_remote() {
    let dir = tempdir().unwrap();
    let error = run_sync(&local_options(&dir)).await.unwrap_err();
    assert!(matches!(error, CliError::SyncNotConfigured));
}

#[tokio::test]
async fn ephemeral_board_writes_nothing_to_disk() {
    let dir = tempdir().unwrap();
    let options = BoardOptions {
        ephemeral: true,
        ..local_options(&dir)
    };

    run_submit("Ann", "Concert", &words("The best night of the year"), &options)
        .await
        .unwrap();
    assert!(!options.db_path.exists());
}

#[test]
fn invalid_remote_url_is_rejected() {
    let dir = tempdir().unwrap();
    let options = BoardOptions {
        remote_url: Some("script.example.com".to_string()),
        ..local_options(&dir)
    };
    assert!(matches!(
        open_board(&options),
        Err(CliError::Transport(TransportError::InvalidConfiguration(_)))
    ));
}

#[test]
fn list_item_uses_display_fallbacks() {
    let story: Story =
        serde_json::from_str(r#"{"id": 5, "content": "legacy record"}"#).unwrap();
    let item = story_to_list_item(&story);
    assert_eq!(item.author, "Anonymous");
    assert_eq!(item.title, "Untitled story");
    assert_eq!(item.relative_time, "-");
}

#[test]
fn story_table_hint_only_for_an_empty_board() {
    let story: Story =
        serde_json::from_str(r#"{"id": 5, "content": "a story long enough"}"#).unwrap();

    assert!(render_story_table(&[story.clone()], 0).is_empty());
    assert_eq!(render_story_table(&[story], 5).len(), 1);
    let empty = render_story_table(&[], 5);
    assert_eq!(empty.len(), 1);
    assert!(empty[0].starts_with("No stories yet"));
}

#[test]
fn sync_state_notice_fires_on_reachability_flips() {
    assert_eq!(sync_state_notice(SyncState::Synced, SyncState::Synced), None);
    assert_eq!(sync_state_notice(SyncState::Offline, SyncState::Offline), None);
    assert_eq!(sync_state_notice(SyncState::Offline, SyncState::Syncing), None);
    assert!(sync_state_notice(SyncState::Synced, SyncState::Offline)
        .unwrap()
        .contains("unreachable"));
    assert_eq!(
        sync_state_notice(SyncState::Offline, SyncState::Synced),
        Some("Remote store reachable again.")
    );
    assert!(sync_state_notice(SyncState::Synced, SyncState::Error).is_some());
}
