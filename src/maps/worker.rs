//! Background recompute worker
//!
//! One dedicated thread recomputes the strategic maps from the most recent
//! sample on a wall-clock cadence decoupled from the tick counter. The tick
//! thread submits samples and reads results without ever blocking on the
//! computation; only the newest sample matters, so the worker drains its
//! queue and keeps the last one.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::core::error::{OverseerError, Result};
use crate::maps::grids::{WorldSample, StrategicMaps};
use crate::maps::latest::Latest;

enum WorkerMsg {
    Sample(WorldSample),
    Shutdown,
}

/// Tick-thread handle to the recompute worker
pub struct MapWorkerHandle {
    latest: Arc<Latest<StrategicMaps>>,
    tx: Sender<WorkerMsg>,
    join: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for MapWorkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapWorkerHandle").finish_non_exhaustive()
    }
}

impl MapWorkerHandle {
    /// Spawn the worker thread with the given recompute cadence.
    pub fn spawn(interval: Duration) -> Result<Self> {
        let latest = Arc::new(Latest::new());
        let (tx, rx) = mpsc::channel::<WorkerMsg>();
        let published = Arc::clone(&latest);

        let join = std::thread::Builder::new()
            .name("map-recompute".into())
            .spawn(move || {
                let mut pending: Option<WorldSample> = None;
                let mut version: u64 = 0;
                loop {
                    // Sleep out the cadence, collecting whatever arrives
                    match rx.recv_timeout(interval) {
                        Ok(WorkerMsg::Sample(sample)) => {
                            pending = Some(sample);
                            continue;
                        }
                        Ok(WorkerMsg::Shutdown) => break,
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                    // Interval elapsed; drain to the newest sample and compute
                    loop {
                        match rx.try_recv() {
                            Ok(WorkerMsg::Sample(sample)) => pending = Some(sample),
                            Ok(WorkerMsg::Shutdown) => return,
                            Err(_) => break,
                        }
                    }
                    if let Some(sample) = pending.take() {
                        version += 1;
                        let maps = StrategicMaps::compute(&sample, version);
                        tracing::debug!(version, computed_at = maps.computed_at, "strategic maps published");
                        published.publish(maps);
                    }
                }
            })?;

        Ok(Self { latest, tx, join: Some(join) })
    }

    /// Submit this tick's sample; never blocks. A worker that is gone is
    /// tolerated (shutdown races the last ticks).
    pub fn submit(&self, sample: WorldSample) {
        let _ = self.tx.send(WorkerMsg::Sample(sample));
    }

    /// Newest finished analysis, or None before the first completes
    pub fn latest(&self) -> Option<Arc<StrategicMaps>> {
        self.latest.get()
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(&mut self) -> Result<()> {
        let _ = self.tx.send(WorkerMsg::Shutdown);
        match self.join.take() {
            Some(join) => join.join().map_err(|_| OverseerError::WorkerPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for MapWorkerHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkerMsg::Shutdown);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Point2;

    #[test]
    fn test_worker_publishes_and_shuts_down() {
        let mut worker = MapWorkerHandle::spawn(Duration::from_millis(5)).unwrap();
        assert!(worker.latest().is_none());

        worker.submit(WorldSample {
            tick: 3,
            width: 8,
            height: 8,
            enemy_military: vec![],
            enemy_structures: vec![Point2::new(4.0, 4.0)],
        });

        // Poll until the worker publishes
        let mut maps = None;
        for _ in 0..200 {
            if let Some(found) = worker.latest() {
                maps = Some(found);
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        let maps = maps.expect("worker never published");
        assert_eq!(maps.computed_at, 3);
        assert!(maps.most_vulnerable().is_some());

        worker.shutdown().unwrap();
    }
}
