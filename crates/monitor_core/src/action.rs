use serde::Serialize;

/// The only status code that counts as a successful control action.
pub const OK_STATUS: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
        }
    }
}

/// Outcome of one submitted control action, kept only long enough to render
/// its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub status: u16,
    pub body: String,
}

impl ActionResult {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        if self.status == OK_STATUS {
            Severity::Success
        } else {
            Severity::Warning
        }
    }
}
