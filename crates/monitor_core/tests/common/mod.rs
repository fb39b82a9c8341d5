#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use monitor_core::{
    parse_selector, update, AppState, ClientSettings, Effect, Element, EventKind, Msg, Page,
};
use serde_json::{json, Value};
use url::Url;

pub const BASE_URL: &str = "http://monitor.test/";
pub const INTERVAL: Duration = Duration::from_millis(5000);

pub const PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>daemons</title></head>
<body>
<ul class="nav nav-tabs">
  <li class="active"><a href="#running" data-toggle="tab">Running</a></li>
  <li><a href="#failed" data-toggle="tab">Failed</a></li>
  <li><a href="#queued" data-toggle="tab">Queued</a></li>
</ul>
<div class="tab-content">
  <div class="tab-pane active" id="running" data-url="reports/running"></div>
  <div class="tab-pane" id="failed" data-url="reports/failed"></div>
  <div class="tab-pane" id="queued" data-url="reports/queued"></div>
</div>
<div id="daemontools-message-view"></div>
<div id="daemontools-app-view"></div>
<script type="text/template" id="dj_reports_template">
<ul class="reports">{{#.}}<li>{{id}} <a href="#error_template" rel="modal" data-content="{{last_error}}">details</a> <a rel="popover" data-original-title="{{id}}" data-content="{{queue}}">queue</a></li>{{/.}}</ul>
</script>
<script type="text/template" id="daemontools_app_template">
<ul class="daemons">{{#daemons}}<li>{{name}} {{srv_status}}<form action="daemons/{{name}}/restart" method="post"><button>restart</button></form></li>{{/daemons}}</ul>
</script>
<script type="text/template" id="daemontools_message_template">
<div class="alert alert-{{level}}">{{data}}</div>
</script>
<script type="text/template" id="error_template">
<div class="modal"><div class="modal-body">{{content}}</div><a class="close" data-dismiss="modal">close</a></div>
</script>
<script type="text/template" id="confirm_template">
<div class="modal"><table><tr><td>{{content}}</td><td data-dismiss="modal">cancel</td></tr></table></div>
</script>
</body>
</html>
"##;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn state() -> AppState {
    state_from(PAGE)
}

pub fn state_from(html: &str) -> AppState {
    init_logging();
    let page = Page::parse(html).expect("fixture page parses");
    let settings = ClientSettings {
        base_url: Url::parse(BASE_URL).unwrap(),
        poll_interval: INTERVAL,
    };
    AppState::new(page, settings).expect("fixture state")
}

/// State after `PageLoaded`, with its effects.
pub fn booted() -> (AppState, Vec<Effect>) {
    update(state(), Msg::PageLoaded)
}

pub fn status(names: &[&str]) -> Value {
    json!({
        "daemons": names
            .iter()
            .map(|name| json!({"name": name, "srv_status": "running"}))
            .collect::<Vec<_>>()
    })
}

pub fn find(state: &AppState, css: &str) -> Vec<Element> {
    state.document().query(&parse_selector(css).unwrap())
}

pub fn interact(state: AppState, kind: EventKind, target: Element) -> (AppState, Vec<Effect>) {
    update(state, Msg::Interaction { kind, target })
}

pub fn status_fetches(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::FetchStatus { .. }))
        .count()
}

pub fn tab_fetches(effects: &[Effect], tab: &str) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::FetchTab { tab_id, .. } if tab_id == tab))
        .count()
}
