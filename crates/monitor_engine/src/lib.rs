//! Monitor engine: HTTP access and the poll timer.
mod engine;
mod fetch;
mod scheduler;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use scheduler::PollScheduler;
pub use types::{ActionResponse, Cycle, EngineEvent, FailureKind, FetchError};
