use crate::{PollPhase, Popover, TabId, TabLoadState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub dashboard_html: String,
    pub message_html: String,
    pub tabs: Vec<TabView>,
    pub active_tab: Option<TabId>,
    pub modals: Vec<String>,
    pub popover: Option<Popover>,
    pub poll: PollView,
    pub messages_shown: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub id: TabId,
    pub state: TabLoadState,
    pub fetches: u32,
    pub failures: u32,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollView {
    pub phase: PollPhase,
    pub cycle: u64,
    pub completed: u64,
    pub failed: u64,
}
