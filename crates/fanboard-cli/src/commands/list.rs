use fanboard_core::{SortKey, Story};

use crate::commands::common::{
    bootstrap_board, format_story_lines, story_to_list_item, BoardOptions, StoryListItem,
};
use crate::error::CliError;

pub async fn run_list(
    sort: SortKey,
    limit: usize,
    as_json: bool,
    options: &BoardOptions,
) -> Result<(), CliError> {
    let board = bootstrap_board(options).await?;
    let stories = board.stories(sort).await;
    print_stories(&stories, limit, as_json)
}

pub fn print_stories(stories: &[Story], limit: usize, as_json: bool) -> Result<(), CliError> {
    if as_json {
        let json_items = stories
            .iter()
            .take(limit)
            .map(story_to_list_item)
            .collect::<Vec<StoryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    for line in render_story_table(stories, limit) {
        println!("{line}");
    }
    Ok(())
}

/// Text lines for the board. The empty-board hint only shows when there are
/// no stories at all, not when `limit` hides them.
pub fn render_story_table(stories: &[Story], limit: usize) -> Vec<String> {
    if stories.is_empty() {
        return vec![EMPTY_BOARD_HINT.to_string()];
    }
    format_story_lines(&stories[..stories.len().min(limit)])
}

const EMPTY_BOARD_HINT: &str =
    "No stories yet. Be the first: fanboard submit --author NAME --title TITLE \"...\"";
