use std::fmt;

/// Coarse failure classes the state machine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// No usable response: connection, timeout, size limit, bad url.
    Network,
    /// A response arrived with a non-success status.
    HttpStatus(u16),
    /// The body could not be decoded as the expected JSON shape.
    Decode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub class: FailureClass,
    pub message: String,
}

impl FetchFailure {
    pub fn new(class: FailureClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            FailureClass::Network => write!(f, "network error: {}", self.message),
            FailureClass::HttpStatus(code) => write!(f, "http status {code}: {}", self.message),
            FailureClass::Decode => write!(f, "decode error: {}", self.message),
        }
    }
}
