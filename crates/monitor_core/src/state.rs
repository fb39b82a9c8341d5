use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use serde_json::Value;
use url::Url;

use crate::view_model::{AppViewModel, PollView, TabView};
use crate::{
    ActionResult, Dispatcher, Document, Effect, FetchFailure, Page, Popover, RegionId,
    RenderError, SelectorError, Severity, StatusPoller, TabId, TabRegistry, TemplateSet,
    DEFAULT_POLL_INTERVAL,
};

/// Status endpoint, relative to the base url.
pub const STATUS_PATH: &str = "status";

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Template(#[from] RenderError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Page location; every relative url is resolved against it.
    pub base_url: Url,
    pub poll_interval: Duration,
}

impl ClientSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    base_url: Url,
    templates: TemplateSet,
    dispatcher: Dispatcher,
    document: Document,
    tabs: TabRegistry,
    poller: StatusPoller,
    initial_tab: Option<TabId>,
    booted: bool,
    actions_in_flight: usize,
    messages_shown: u64,
    dirty: bool,
}

impl AppState {
    pub fn new(page: Page, settings: ClientSettings) -> Result<Self, SetupError> {
        let status_url = settings.base_url.join(STATUS_PATH)?;
        let document = Document::new(page.shell, page.tabs.iter().map(|tab| tab.id.clone()));
        Ok(Self {
            base_url: settings.base_url,
            templates: page.templates,
            dispatcher: Dispatcher::standard()?,
            document,
            tabs: TabRegistry::new(page.tabs),
            poller: StatusPoller::new(status_url, settings.poll_interval),
            initial_tab: page.active_tab,
            booted: false,
            actions_in_flight: 0,
            messages_shown: 0,
            dirty: false,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    pub fn actions_in_flight(&self) -> usize {
        self.actions_in_flight
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            dashboard_html: self.region_html(&RegionId::Dashboard),
            message_html: self.region_html(&RegionId::Message),
            tabs: self
                .tabs
                .entries()
                .map(|entry| TabView {
                    id: entry.descriptor.id.clone(),
                    state: entry.state,
                    fetches: entry.fetches,
                    failures: entry.failures,
                    html: self.region_html(&RegionId::Tab(entry.descriptor.id.clone())),
                })
                .collect(),
            active_tab: self.document.active_tab().cloned(),
            modals: self.document.modals().map(str::to_string).collect(),
            popover: self.document.popover().cloned(),
            poll: PollView {
                phase: self.poller.phase(),
                cycle: self.poller.cycle(),
                completed: self.poller.completed(),
                failed: self.poller.failed(),
            },
            messages_shown: self.messages_shown,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn region_html(&self, region: &RegionId) -> String {
        self.document.html(region).unwrap_or_default().to_string()
    }

    pub(crate) fn resolve(&self, reference: &str) -> Option<String> {
        match self.base_url.join(reference) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                engine_warn!("Cannot resolve {:?} against {}: {}", reference, self.base_url, err);
                None
            }
        }
    }

    /// Starts the poll loop and loads the initially active tab, once.
    pub(crate) fn boot(&mut self) -> Vec<Effect> {
        if self.booted {
            return Vec::new();
        }
        self.booted = true;

        let mut effects: Vec<Effect> = self.poller.start().into_iter().collect();
        engine_logging::set_poll_cycle(self.poller.cycle());
        if let Some(tab) = self.initial_tab.clone() {
            effects.extend(self.activate_tab(&tab));
        }
        effects
    }

    pub(crate) fn poll_timer_fired(&mut self, cycle: u64) -> Vec<Effect> {
        match self.poller.timer_fired(cycle) {
            Some(effect) => {
                engine_logging::set_poll_cycle(cycle);
                vec![effect]
            }
            None => {
                engine_debug!("Ignoring stale poll timer for cycle {}", cycle);
                Vec::new()
            }
        }
    }

    pub(crate) fn apply_status(
        &mut self,
        cycle: u64,
        result: Result<Value, FetchFailure>,
    ) -> Vec<Effect> {
        if !self.poller.accepts(cycle) {
            engine_debug!("Ignoring status result for cycle {}", cycle);
            return Vec::new();
        }

        let rendered = match result {
            Ok(status) => match self.templates.render_dashboard(&status) {
                Ok(html) => {
                    self.document.replace(&RegionId::Dashboard, html);
                    self.dirty = true;
                    true
                }
                Err(err) => {
                    engine_error!("Dashboard render failed: {}", err);
                    false
                }
            },
            Err(failure) => {
                engine_warn!("Status poll failed: {}", failure);
                false
            }
        };

        self.poller.settle(cycle, rendered).into_iter().collect()
    }

    pub(crate) fn stop_polling(&mut self) -> Vec<Effect> {
        engine_info!("Stopping status poll after cycle {}", self.poller.cycle());
        self.poller.stop().into_iter().collect()
    }

    pub(crate) fn activate_tab(&mut self, tab: &str) -> Vec<Effect> {
        if self.tabs.get(tab).is_none() {
            engine_debug!("Activation of undeclared tab {:?}", tab);
            return Vec::new();
        }
        if self.document.active_tab().map(String::as_str) != Some(tab) {
            self.document.set_active_tab(tab.to_string());
            self.dirty = true;
        }

        let Some(source) = self.tabs.begin_load(tab).map(str::to_string) else {
            return Vec::new();
        };
        match self.resolve(&source) {
            Some(url) => {
                engine_info!("Loading tab {:?} from {}", tab, url);
                vec![Effect::FetchTab {
                    tab_id: tab.to_string(),
                    url,
                }]
            }
            None => {
                self.tabs.finish_load(tab, false);
                Vec::new()
            }
        }
    }

    pub(crate) fn apply_tab(&mut self, tab: &str, result: Result<Vec<Value>, FetchFailure>) {
        if self.tabs.state(tab) != Some(crate::TabLoadState::Loading) {
            engine_debug!("Ignoring report result for tab {:?}", tab);
            return;
        }

        let html = match result {
            Ok(records) => match self.templates.render_reports(&records) {
                Ok(html) => html,
                Err(err) => {
                    engine_error!("Report render for tab {:?} failed: {}", tab, err);
                    self.tabs.finish_load(tab, false);
                    return;
                }
            },
            Err(failure) => {
                engine_warn!("Loading tab {:?} failed: {}", tab, failure);
                self.tabs.finish_load(tab, false);
                return;
            }
        };

        self.document.replace(&RegionId::Tab(tab.to_string()), html);
        self.tabs.finish_load(tab, true);
        self.dirty = true;
    }

    pub(crate) fn submit_action(&mut self, url: String) -> Effect {
        self.actions_in_flight += 1;
        engine_info!("Submitting control action {}", url);
        Effect::SubmitAction { url }
    }

    pub(crate) fn apply_action(&mut self, result: Result<ActionResult, FetchFailure>) {
        self.actions_in_flight = self.actions_in_flight.saturating_sub(1);

        let (severity, body) = match result {
            Ok(outcome) => {
                engine_info!("Control action answered with status {}", outcome.status);
                (outcome.severity(), outcome.body)
            }
            Err(failure) => {
                engine_warn!("Control action failed: {}", failure);
                (Severity::Warning, failure.to_string())
            }
        };

        match self.templates.render_message(severity, &body) {
            Ok(html) => {
                self.document.replace(&RegionId::Message, html);
                self.messages_shown += 1;
                self.dirty = true;
            }
            Err(err) => engine_error!("Message render failed: {}", err),
        }
    }

    pub(crate) fn show_popover(&mut self, popover: Popover) {
        self.document.show_popover(popover);
        self.dirty = true;
    }

    pub(crate) fn open_modal(&mut self, template: &str, content: &str) {
        match self.templates.render_modal(template, content) {
            Ok(html) => {
                self.document.open_modal(html);
                self.dirty = true;
            }
            Err(err) => engine_warn!("Modal {:?} not opened: {}", template, err),
        }
    }

    pub(crate) fn dismiss_modal(&mut self, origin: &RegionId) {
        if self.document.dismiss_modal(origin).is_some() {
            self.dirty = true;
        }
    }
}
