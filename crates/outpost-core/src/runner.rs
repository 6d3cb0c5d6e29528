//! The live tick loop.
//!
//! One spawned task advances the universe every `tick_dt` wall seconds,
//! paced against an absolute deadline so slow ticks do not accumulate
//! drift. A oneshot channel stops it; the loop exits before starting
//! another tick.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{info, warn};

use crate::clock::WallClock;
use crate::store::UniverseStore;
use crate::universe::Shared;

/// Handle to a running tick loop.
#[derive(Debug)]
pub(crate) struct LoopHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl LoopHandle {
    /// Signal the loop and wait for it to finish its current tick.
    pub(crate) async fn shutdown(self) {
        // The receiver is gone only if the task already ended.
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            warn!(error = %e, "tick loop task ended abnormally");
        }
    }

    /// Cancel the task without waiting.
    pub(crate) fn abort(&self) {
        self.task.abort();
    }
}

/// Spawn the tick loop on the current runtime.
pub(crate) fn spawn<S: UniverseStore, C: WallClock>(shared: Arc<Shared<S, C>>) -> LoopHandle {
    let (stop, stop_rx) = oneshot::channel();
    let task = tokio::spawn(tick_loop(shared, stop_rx));
    LoopHandle { stop, task }
}

async fn tick_loop<S: UniverseStore, C: WallClock>(
    shared: Arc<Shared<S, C>>,
    mut stop: oneshot::Receiver<()>,
) {
    let period = shared.universe_config().tick_period();
    let mut deadline = Instant::now() + period;
    info!(tick_ms = period.as_millis(), "tick loop started");

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            () = sleep_until(deadline) => {}
        }
        deadline += period;
        shared.live_tick().await;
    }

    info!("tick loop stopped");
}
