//! Collection scheduling: one pipeline cycle, and the periodic tick loop.
//!
//! A cycle queries every discovered endpoint sequentially, folds the results
//! into the aggregate, renders the exposition document and publishes it. The
//! tick loop runs one cycle per interval under the store's single-flight
//! gate; a tick that fires while a cycle is still executing is skipped, not
//! queued.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::aggregate::CycleAggregate;
use crate::collector::query_endpoint;
use crate::render::render;
use crate::runner::CommandRunner;
use crate::snapshot::SnapshotStore;

/// Immutable collection configuration, shared by every cycle.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Path to the supervisorctl binary.
    pub supervisorctl: String,
    /// Endpoint set fixed at startup discovery.
    pub endpoints: Vec<String>,
}

/// Runs one full collect → aggregate → render cycle.
///
/// Blocks on external command execution for every endpoint in turn; callers
/// on the async runtime must wrap it in `spawn_blocking`. A hung query stalls
/// the whole cycle — there is no per-endpoint timeout.
pub fn run_cycle(runner: &dyn CommandRunner, config: &CycleConfig) -> String {
    let mut aggregate = CycleAggregate::new();
    for endpoint in &config.endpoints {
        let status = query_endpoint(runner, &config.supervisorctl, endpoint);
        aggregate.record(endpoint, &status);
    }
    render(&aggregate)
}

/// Runs one cycle under the single-flight gate and publishes the result.
///
/// Returns `false` when the gate was held and the trigger was skipped.
pub async fn run_once(
    store: &SnapshotStore,
    runner: Arc<dyn CommandRunner>,
    config: Arc<CycleConfig>,
) -> bool {
    let Some(_guard) = store.try_begin_collection() else {
        debug!("collection already in flight, skipping trigger");
        return false;
    };

    let result = tokio::task::spawn_blocking(move || run_cycle(runner.as_ref(), &config)).await;

    match result {
        Ok(text) => {
            store.publish(text);
            true
        }
        Err(e) => {
            error!(error = %e, "collection cycle panicked in spawn_blocking");
            false
        }
    }
}

/// Periodic collection loop.
///
/// The immediate first tick of the interval is consumed before the loop
/// starts, since startup already ran one synchronous cycle.
pub async fn tick_loop(
    store: Arc<SnapshotStore>,
    runner: Arc<dyn CommandRunner>,
    config: Arc<CycleConfig>,
    interval: Duration,
) {
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tick.tick().await;

    let mut cycle_count: u64 = 0;

    loop {
        tick.tick().await;

        let t0 = Instant::now();
        let published = run_once(&store, runner.clone(), config.clone()).await;
        let elapsed = t0.elapsed();

        if published {
            cycle_count += 1;
            debug!(
                duration_ms = elapsed.as_millis() as u64,
                cycle_count, "collection cycle completed"
            );
        }

        if elapsed > interval / 2 {
            warn!(
                duration_ms = elapsed.as_millis() as u64,
                interval_ms = interval.as_millis() as u64,
                "collection cycle exceeded 50% of interval"
            );
        }
    }
}

/// Runs the startup cycle and publishes its snapshot before serving begins,
/// so scrapes never observe the initial empty document.
pub async fn run_startup_cycle(
    store: &SnapshotStore,
    runner: Arc<dyn CommandRunner>,
    config: Arc<CycleConfig>,
) {
    let t0 = Instant::now();
    let published = run_once(store, runner, config).await;
    if published {
        info!(
            duration_ms = t0.elapsed().as_millis() as u64,
            "first snapshot collected"
        );
    }
}
