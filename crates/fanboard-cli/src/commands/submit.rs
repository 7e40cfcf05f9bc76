use fanboard_core::SubmitReceipt;

use crate::commands::common::{open_board, resolve_story_content, BoardOptions};
use crate::error::CliError;

pub async fn run_submit(
    author: &str,
    title: &str,
    content_parts: &[String],
    options: &BoardOptions,
) -> Result<SubmitReceipt, CliError> {
    let content = resolve_story_content(content_parts)?;

    let board = open_board(options)?;
    let receipt = board.submit_story(author, title, &content).await?;

    println!("{}", receipt.story.id);
    if options.has_remote() && !receipt.published_remotely {
        eprintln!("Saved on this device only; the remote store did not accept it yet.");
    }
    Ok(receipt)
}
