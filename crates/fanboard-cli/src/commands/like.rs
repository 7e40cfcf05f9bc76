use fanboard_core::{Story, StoryId};

use crate::commands::common::{open_board, BoardOptions};
use crate::error::CliError;

pub async fn run_like(id: &str, options: &BoardOptions) -> Result<Story, CliError> {
    let story_id = parse_story_id(id)?;

    let board = open_board(options)?;
    let Some(story) = board.toggle_like(story_id).await? else {
        return Err(CliError::StoryNotFound(story_id.to_string()));
    };

    let verb = if story.liked_by_user { "Liked" } else { "Unliked" };
    println!("{verb} {} ({} likes)", story.id, story.likes);
    Ok(story)
}

pub fn parse_story_id(id: &str) -> Result<StoryId, CliError> {
    id.parse::<StoryId>()
        .map_err(|_| CliError::InvalidStoryId(id.trim().to_string()))
}
