use serde_json::Value;

use crate::{ActionResult, Element, EventKind, FetchFailure, TabId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Page shell is in place: start polling and load the active tab.
    PageLoaded,
    /// The poll timer armed for `cycle` expired.
    PollTimerFired { cycle: u64 },
    /// Status fetch for `cycle` settled.
    StatusFetched {
        cycle: u64,
        result: Result<Value, FetchFailure>,
    },
    /// A tab was shown, by the host or by a tab link click.
    TabActivated(TabId),
    /// Report fetch for a tab settled.
    TabFetched {
        tab_id: TabId,
        result: Result<Vec<Value>, FetchFailure>,
    },
    /// A submitted control action settled. `Ok` covers every HTTP status.
    ActionCompleted(Result<ActionResult, FetchFailure>),
    /// Pointer or form event on an element of the document.
    Interaction { kind: EventKind, target: Element },
    /// Teardown: stop polling.
    StopPolling,
}
