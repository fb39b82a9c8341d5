//! Single-handle timer for the status poll loop.

use std::sync::mpsc;
use std::time::Duration;

use engine_logging::engine_trace;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{Cycle, EngineEvent};

/// Owns at most one armed timer. Arming a new timer drops the previous one,
/// and `stop` disarms it for good.
pub struct PollScheduler {
    runtime: Handle,
    events: mpsc::Sender<EngineEvent>,
    shutdown: CancellationToken,
    armed: Option<(Cycle, JoinHandle<()>)>,
}

impl PollScheduler {
    pub fn new(runtime: Handle, events: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            runtime,
            events,
            shutdown: CancellationToken::new(),
            armed: None,
        }
    }

    /// Arms the timer to report `PollDue { cycle }` after `delay`.
    pub fn schedule(&mut self, cycle: Cycle, delay: Duration) {
        if self.is_stopped() {
            return;
        }
        self.disarm();

        let shutdown = self.shutdown.clone();
        let events = self.events.clone();
        let task = self.runtime.spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    engine_trace!("Poll timer for cycle {} expired", cycle);
                    let _ = events.send(EngineEvent::PollDue { cycle });
                }
            }
        });
        self.armed = Some((cycle, task));
    }

    /// Cycle of the armed timer, if it has not fired yet.
    pub fn armed_cycle(&self) -> Option<Cycle> {
        self.armed
            .as_ref()
            .filter(|(_, task)| !task.is_finished())
            .map(|(cycle, _)| *cycle)
    }

    pub fn stop(&mut self) {
        self.shutdown.cancel();
        self.disarm();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn disarm(&mut self) {
        if let Some((_, task)) = self.armed.take() {
            task.abort();
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
