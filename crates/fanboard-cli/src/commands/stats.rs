use fanboard_core::BoardStats;

use crate::commands::common::{bootstrap_board, BoardOptions};
use crate::error::CliError;

pub async fn run_stats(as_json: bool, options: &BoardOptions) -> Result<BoardStats, CliError> {
    let board = bootstrap_board(options).await?;
    let stats = board.stats().await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats_lines(&stats) {
            println!("{line}");
        }
    }
    Ok(stats)
}

pub fn format_stats_lines(stats: &BoardStats) -> Vec<String> {
    vec![
        format!("Stories: {}", stats.story_count),
        format!("Likes:   {}", stats.total_likes),
        format!("Authors: {}", stats.distinct_author_count),
    ]
}
