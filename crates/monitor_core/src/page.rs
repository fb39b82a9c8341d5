//! Page bootstrap: templates, tab descriptors and the initially active tab are
//! all declared by the page shell and collected once, at load.

use std::collections::BTreeMap;

use scraper::Html;

use crate::dom::parse_selector;
use crate::render::{TemplateSet, REQUIRED_TEMPLATES};
use crate::state::SetupError;

/// Tab identifier: the id of the tab's pane element.
pub type TabId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDescriptor {
    pub id: TabId,
    /// Report source as declared by the pane's `data-url`, unresolved.
    pub source_url: String,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub shell: String,
    pub templates: TemplateSet,
    pub tabs: Vec<TabDescriptor>,
    pub active_tab: Option<TabId>,
}

const TEMPLATE_SELECTOR: &str = "script[id]";
const TAB_LINK_SELECTOR: &str = "a[data-toggle=\"tab\"]";
const TAB_SOURCE_SELECTOR: &str = "[id][data-url]";
const ACTIVE_TAB_SELECTOR: &str = ".nav.nav-tabs li.active a[data-toggle=\"tab\"]";

impl Page {
    /// Parses the page shell. Fails if a required template is missing or any
    /// template does not compile.
    pub fn parse(html: &str) -> Result<Self, SetupError> {
        let document = Html::parse_document(html);

        let templates = TemplateSet::compile(
            document
                .select(&parse_selector(TEMPLATE_SELECTOR)?)
                .filter_map(|script| {
                    let id = script.value().id()?;
                    Some((id.to_string(), script.text().collect::<String>()))
                }),
        )?;
        templates.require(&REQUIRED_TEMPLATES)?;

        let sources: BTreeMap<&str, &str> = document
            .select(&parse_selector(TAB_SOURCE_SELECTOR)?)
            .filter_map(|pane| Some((pane.value().id()?, pane.value().attr("data-url")?)))
            .collect();

        let mut tabs: Vec<TabDescriptor> = Vec::new();
        for link in document.select(&parse_selector(TAB_LINK_SELECTOR)?) {
            let Some(target) = link.value().attr("href").and_then(|href| href.strip_prefix('#'))
            else {
                continue;
            };
            let Some(source) = sources.get(target) else {
                continue;
            };
            if tabs.iter().any(|tab| tab.id == target) {
                continue;
            }
            tabs.push(TabDescriptor {
                id: target.to_string(),
                source_url: (*source).to_string(),
            });
        }

        let active_tab = document
            .select(&parse_selector(ACTIVE_TAB_SELECTOR)?)
            .filter_map(|link| link.value().attr("href")?.strip_prefix('#'))
            .find(|target| tabs.iter().any(|tab| tab.id == *target))
            .map(str::to_string);

        Ok(Self {
            shell: html.to_string(),
            templates,
            tabs,
            active_tab,
        })
    }
}
