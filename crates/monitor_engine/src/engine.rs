use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::scheduler::PollScheduler;
use crate::{Cycle, EngineEvent, FetchError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}

enum EngineCommand {
    Fetch(FetchCommand),
    SchedulePoll { cycle: Cycle, delay: Duration },
    CancelPoll,
}

enum FetchCommand {
    Page { url: String },
    Status { cycle: Cycle, url: String },
    Tab { tab_id: String, url: String },
    Action { url: String },
}

/// Runs fetches and the poll timer on a worker thread and reports back
/// through [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let fetcher = ReqwestFetcher::new(settings)?;
        Self::with_fetcher(Arc::new(fetcher))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let mut scheduler = PollScheduler::new(runtime.handle().clone(), event_tx.clone());
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::SchedulePoll { cycle, delay } => {
                        scheduler.schedule(cycle, delay);
                    }
                    EngineCommand::CancelPoll => scheduler.stop(),
                    EngineCommand::Fetch(command) => {
                        let fetcher = fetcher.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let event = handle_fetch(fetcher.as_ref(), command).await;
                            let _ = event_tx.send(event);
                        });
                    }
                }
            }
            engine_debug!("Engine command channel closed");
            scheduler.stop();
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_page(&self, url: impl Into<String>) {
        self.send(EngineCommand::Fetch(FetchCommand::Page { url: url.into() }));
    }

    pub fn fetch_status(&self, cycle: Cycle, url: impl Into<String>) {
        self.send(EngineCommand::Fetch(FetchCommand::Status {
            cycle,
            url: url.into(),
        }));
    }

    pub fn fetch_tab(&self, tab_id: impl Into<String>, url: impl Into<String>) {
        self.send(EngineCommand::Fetch(FetchCommand::Tab {
            tab_id: tab_id.into(),
            url: url.into(),
        }));
    }

    pub fn submit_action(&self, url: impl Into<String>) {
        self.send(EngineCommand::Fetch(FetchCommand::Action { url: url.into() }));
    }

    pub fn schedule_poll(&self, cycle: Cycle, delay: Duration) {
        self.send(EngineCommand::SchedulePoll { cycle, delay });
    }

    pub fn cancel_poll(&self) {
        self.send(EngineCommand::CancelPoll);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_fetch(fetcher: &dyn Fetcher, command: FetchCommand) -> EngineEvent {
    match command {
        FetchCommand::Page { url } => EngineEvent::PageFetched(fetcher.get_text(&url).await),
        FetchCommand::Status { cycle, url } => EngineEvent::StatusFetched {
            cycle,
            result: fetcher.get_json(&url).await,
        },
        FetchCommand::Tab { tab_id, url } => EngineEvent::TabFetched {
            tab_id,
            result: fetcher.get_records(&url).await,
        },
        FetchCommand::Action { url } => {
            let result = fetcher.post_empty(&url).await;
            EngineEvent::ActionCompleted { url, result }
        }
    }
}
