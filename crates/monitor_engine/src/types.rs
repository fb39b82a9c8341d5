use std::fmt;

use serde_json::Value;

/// Poll cycle number, as issued by the status poller.
pub type Cycle = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Page shell download settled.
    PageFetched(Result<String, FetchError>),
    /// The armed poll timer for `cycle` expired.
    PollDue { cycle: Cycle },
    StatusFetched {
        cycle: Cycle,
        result: Result<Value, FetchError>,
    },
    TabFetched {
        tab_id: String,
        result: Result<Vec<Value>, FetchError>,
    },
    ActionCompleted {
        url: String,
        result: Result<ActionResponse, FetchError>,
    },
}

/// Any HTTP response to a control action, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    RedirectLimitExceeded,
    HttpStatus(u16),
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
}

impl FailureKind {
    /// True when no usable HTTP response was received.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FailureKind::HttpStatus(_) | FailureKind::Decode)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "undecodable body"),
        }
    }
}
