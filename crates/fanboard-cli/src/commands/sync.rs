use fanboard_core::SyncOutcome;

use crate::commands::common::{open_board, BoardOptions};
use crate::error::CliError;

pub async fn run_sync(options: &BoardOptions) -> Result<(), CliError> {
    if !options.has_remote() {
        return Err(CliError::SyncNotConfigured);
    }

    let board = open_board(options)?;
    match board.sync_remote().await {
        SyncOutcome::Merged { fetched, total } => {
            println!("Sync completed: {fetched} remote stories, {total} on this device");
            Ok(())
        }
        SyncOutcome::Unavailable(error) => Err(CliError::SyncFailed(error.to_string())),
        SyncOutcome::Stale => Err(CliError::SyncFailed(
            "superseded by a newer sync".to_string(),
        )),
    }
}
