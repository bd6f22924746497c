// latchbot-core/src/tasks/cache_refresh.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use crate::Error;
use crate::channels::ChannelState;
use crate::repositories::StoreGuard;

/// Re-lists the channel's triggers and swaps them into its cache in one step.
/// On failure the previous snapshot stays in place.
pub async fn refresh_channel_cache(
    channel: &ChannelState,
    guard: &StoreGuard,
) -> Result<usize, Error> {
    let _writer = channel.lock_cache_writer().await;
    let store = channel.store();
    let triggers = guard
        .run("list_triggers", move || store.list_triggers())
        .await?;
    let count = triggers.len();
    channel.cache().replace(triggers);
    debug!("Refreshed '{}' command cache ({} triggers)", channel.name(), count);
    Ok(count)
}

/// Spawns the per-channel refresh loop. The first refresh happens one `period` after spawning,
/// since joining already populates the cache. Stops once the channel is parted.
pub fn spawn_cache_refresh_task(
    channel: Arc<ChannelState>,
    guard: StoreGuard,
    period: Duration,
) -> JoinHandle<()> {
    let mut shutdown_rx = channel.shutdown_rx();

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown_rx.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = refresh_channel_cache(&channel, &guard).await {
                        warn!(
                            "Command cache refresh for '{}' failed, keeping the stale list: {}",
                            channel.name(), e
                        );
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Command cache refresh for '{}' stopped", channel.name());
    })
}
