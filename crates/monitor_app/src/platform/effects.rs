use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use monitor_core::{ActionResult, Effect, FailureClass, FetchFailure, Msg};
use monitor_engine::{EngineEvent, EngineHandle, FailureKind, FetchError};

/// Executes core effects on the engine and turns engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchStatus { cycle, url } => {
                    engine_debug!("FetchStatus cycle={} url={}", cycle, url);
                    self.engine.fetch_status(cycle, url);
                }
                Effect::SchedulePoll { cycle, delay } => {
                    self.engine.schedule_poll(cycle, delay);
                }
                Effect::CancelPoll => self.engine.cancel_poll(),
                Effect::FetchTab { tab_id, url } => {
                    engine_info!("FetchTab tab={} url={}", tab_id, url);
                    self.engine.fetch_tab(tab_id, url);
                }
                Effect::SubmitAction { url } => {
                    engine_info!("SubmitAction url={}", url);
                    self.engine.submit_action(url);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event that maps to a message.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).and_then(to_msg)
    }
}

pub(crate) fn to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::PageFetched(_) => {
            engine_warn!("Ignoring page download after startup");
            None
        }
        EngineEvent::PollDue { cycle } => Some(Msg::PollTimerFired { cycle }),
        EngineEvent::StatusFetched { cycle, result } => Some(Msg::StatusFetched {
            cycle,
            result: result.map_err(to_failure),
        }),
        EngineEvent::TabFetched { tab_id, result } => Some(Msg::TabFetched {
            tab_id,
            result: result.map_err(to_failure),
        }),
        EngineEvent::ActionCompleted { url, result } => {
            let result = match result {
                Ok(response) => Ok(ActionResult::new(response.status, response.body)),
                Err(err) => {
                    engine_warn!("Action {} failed: {}", url, err);
                    Err(to_failure(err))
                }
            };
            Some(Msg::ActionCompleted(result))
        }
    }
}

pub(crate) fn to_failure(err: FetchError) -> FetchFailure {
    let class = match err.kind {
        _ if err.kind.is_transport() => FailureClass::Network,
        FailureKind::HttpStatus(code) => FailureClass::HttpStatus(code),
        _ => FailureClass::Decode,
    };
    FetchFailure::new(class, err.to_string())
}
