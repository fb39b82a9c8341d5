//! Monitor core: pure dashboard state machine, document model and rendering.
mod action;
mod dispatch;
mod dom;
mod effect;
mod failure;
mod msg;
mod page;
mod poller;
mod render;
mod state;
mod tabs;
mod update;
mod view_model;

pub use action::{ActionResult, Severity, OK_STATUS};
pub use dispatch::{Behavior, Dispatcher, EventKind};
pub use dom::{parse_selector, Document, Element, Popover, Region, RegionId, SelectorError};
pub use effect::Effect;
pub use failure::{FailureClass, FetchFailure};
pub use msg::Msg;
pub use page::{Page, TabDescriptor, TabId};
pub use poller::{PollPhase, StatusPoller, DEFAULT_POLL_INTERVAL};
pub use render::{
    RenderError, TemplateSet, DASHBOARD_TEMPLATE, MESSAGE_TEMPLATE, NO_JOBS_HTML,
    REPORTS_TEMPLATE, REQUIRED_TEMPLATES,
};
pub use state::{AppState, ClientSettings, SetupError, STATUS_PATH};
pub use tabs::{TabEntry, TabLoadState, TabRegistry};
pub use update::update;
pub use view_model::{AppViewModel, PollView, TabView};
