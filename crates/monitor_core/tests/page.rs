mod common;

use common::*;
use monitor_core::{
    update, AppState, ClientSettings, Msg, Page, RenderError, SetupError, TabDescriptor,
    DASHBOARD_TEMPLATE, MESSAGE_TEMPLATE, REPORTS_TEMPLATE,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;

#[test]
fn page_declares_templates_tabs_and_active_tab() {
    init_logging();
    let page = Page::parse(PAGE).unwrap();

    for id in [REPORTS_TEMPLATE, DASHBOARD_TEMPLATE, MESSAGE_TEMPLATE, "error_template"] {
        assert!(page.templates.contains(id), "missing {id}");
    }
    assert_eq!(
        page.tabs,
        vec![
            TabDescriptor {
                id: "running".to_string(),
                source_url: "reports/running".to_string(),
            },
            TabDescriptor {
                id: "failed".to_string(),
                source_url: "reports/failed".to_string(),
            },
            TabDescriptor {
                id: "queued".to_string(),
                source_url: "reports/queued".to_string(),
            },
        ]
    );
    assert_eq!(page.active_tab.as_deref(), Some("running"));
}

#[test]
fn missing_required_template_aborts_setup() {
    let page = PAGE.replace("id=\"daemontools_message_template\"", "id=\"other\"");

    let err = Page::parse(&page).unwrap_err();
    assert!(matches!(
        err,
        SetupError::Template(RenderError::Missing(ref id)) if id == MESSAGE_TEMPLATE
    ));
}

#[test]
fn malformed_template_aborts_setup() {
    let page = PAGE.replace("{{/.}}</ul>", "</ul>");

    let err = Page::parse(&page).unwrap_err();
    assert!(matches!(
        err,
        SetupError::Template(RenderError::Malformed { ref id, .. }) if id == REPORTS_TEMPLATE
    ));
}

#[test]
fn tab_link_without_source_is_not_a_tab() {
    let page = PAGE.replace(" data-url=\"reports/queued\"", "");

    let page = Page::parse(&page).unwrap();
    assert_eq!(page.tabs.len(), 2);
    assert!(page.tabs.iter().all(|tab| tab.id != "queued"));
}

#[test]
fn page_without_active_tab_loads_nothing_initially() {
    let page = PAGE.replace("<li class=\"active\">", "<li>");

    let page = Page::parse(&page).unwrap();
    assert_eq!(page.active_tab, None);
}

#[test]
fn dashboard_page_with_mustache_templates_boots_and_renders() {
    init_logging();
    let shell = r##"<html><body>
<ul class="nav nav-tabs"><li class="active"><a href="#queued" data-toggle="tab">Queued</a></li></ul>
<div class="tab-pane" id="queued" data-url="dj_mon/queued_jobs"></div>
<script id="dj_reports_template" type="text/template"><ul>{{#.}}<li>{{id}}</li>{{/.}}</ul></script>
<script id="daemontools_app_template" type="text/template">{{#daemons}}<form action="daemons/{{name}}/restart"></form>{{/daemons}}</script>
<script id="daemontools_message_template" type="text/template">{{level}}/{{data}}</script>
</body></html>"##;

    let page = Page::parse(shell).unwrap();
    let settings = ClientSettings::new(Url::parse(BASE_URL).unwrap());
    let (state, effects) = update(AppState::new(page, settings).unwrap(), Msg::PageLoaded);
    assert_eq!(tab_fetches(&effects, "queued"), 1);

    let (state, _) = update(
        state,
        Msg::TabFetched {
            tab_id: "queued".to_string(),
            result: Ok(vec![json!({"id": 1}), json!({"id": 2})]),
        },
    );
    let view = state.view();
    let queued = view.tabs.iter().find(|tab| tab.id == "queued").unwrap();
    assert_eq!(queued.html, "<ul><li>1</li><li>2</li></ul>");
}
