use std::time::Duration;

use crate::page::TabId;

/// Side effects requested by `update`, executed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// GET the status snapshot for poll `cycle`.
    FetchStatus { cycle: u64, url: String },
    /// Arm the single poll timer; it must report back with `cycle`.
    SchedulePoll { cycle: u64, delay: Duration },
    /// Disarm the poll timer.
    CancelPoll,
    /// GET a tab's report records.
    FetchTab { tab_id: TabId, url: String },
    /// POST a control action with an empty body.
    SubmitAction { url: String },
}
