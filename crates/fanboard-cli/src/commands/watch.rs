use fanboard_core::{SortKey, SyncState};

use crate::commands::common::{bootstrap_board, sync_state_notice, BoardOptions};
use crate::commands::list::print_stories;
use crate::error::CliError;

pub async fn run_watch(
    sort: SortKey,
    limit: usize,
    options: &BoardOptions,
) -> Result<(), CliError> {
    let board = bootstrap_board(options).await?;
    let mut revisions = board.subscribe();
    let mut sync_states = board.subscribe_sync_state();
    let mut settled = board.sync_state();
    print_stories(&board.stories(sort).await, limit, false)?;

    let resync = board.spawn_periodic_resync();
    tracing::info!(
        "Watching board in {sort} order; resync every {}s (Ctrl-C to stop)",
        board.config().resync_interval_secs
    );

    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                println!();
                print_stories(&board.stories(sort).await, limit, false)?;
            }
            changed = sync_states.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *sync_states.borrow_and_update();
                if current == SyncState::Syncing {
                    continue;
                }
                if options.has_remote() {
                    if let Some(notice) = sync_state_notice(settled, current) {
                        eprintln!("{notice}");
                    }
                }
                settled = current;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    resync.abort();
    Ok(())
}
