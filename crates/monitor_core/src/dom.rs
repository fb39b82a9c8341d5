//! Owned document model.
//!
//! The page is split into regions that are each written by exactly one
//! component and always replaced wholesale. Every replacement bumps the
//! region's generation, so element snapshots taken from an older render can
//! be recognised and ignored.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};

use crate::page::TabId;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionId {
    /// Static page shell: navigation, tab links, region containers.
    Shell,
    /// Latest status snapshot render.
    Dashboard,
    /// Latest control-action message.
    Message,
    /// Report content of one tab pane.
    Tab(TabId),
    /// An open modal dialog.
    Modal(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub html: String,
    pub generation: u64,
}

impl Region {
    fn with_html(html: String) -> Self {
        Self {
            html,
            generation: 0,
        }
    }

    fn replace(&mut self, html: String) {
        self.html = html;
        self.generation += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popover {
    pub title: Option<String>,
    pub content: String,
}

/// Snapshot of one element, tagged with where it lived and which render of
/// that region produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub region: RegionId,
    pub generation: u64,
    /// Position among the elements of the region's parsed tree, in document order.
    pub ordinal: usize,
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub html: String,
}

impl Element {
    fn snapshot(
        region: &RegionId,
        generation: u64,
        ordinal: usize,
        element: ElementRef<'_>,
    ) -> Self {
        let value = element.value();
        Self {
            region: region.clone(),
            generation,
            ordinal,
            name: value.name().to_string(),
            attrs: value
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            html: element.html(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// `href` with a leading `#` removed, as used by tab and modal triggers.
    pub fn href_target(&self) -> Option<&str> {
        self.attr("href")
            .map(|href| href.trim_start_matches('#'))
            .filter(|target| !target.is_empty())
    }
}

fn elements(fragment: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

#[derive(Debug, thiserror::Error)]
#[error("invalid selector `{css}`: {reason}")]
pub struct SelectorError {
    pub css: String,
    pub reason: String,
}

pub fn parse_selector(css: &str) -> Result<Selector, SelectorError> {
    Selector::parse(css).map_err(|err| SelectorError {
        css: css.to_string(),
        reason: err.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    shell: Region,
    dashboard: Region,
    message: Region,
    tabs: BTreeMap<TabId, Region>,
    modals: Vec<(u64, Region)>,
    next_modal: u64,
    popover: Option<Popover>,
    active_tab: Option<TabId>,
}

impl Document {
    pub fn new<I>(shell: String, tab_ids: I) -> Self
    where
        I: IntoIterator<Item = TabId>,
    {
        Self {
            shell: Region::with_html(shell),
            dashboard: Region::default(),
            message: Region::default(),
            tabs: tab_ids
                .into_iter()
                .map(|id| (id, Region::default()))
                .collect(),
            modals: Vec::new(),
            next_modal: 1,
            popover: None,
            active_tab: None,
        }
    }

    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        match id {
            RegionId::Shell => Some(&self.shell),
            RegionId::Dashboard => Some(&self.dashboard),
            RegionId::Message => Some(&self.message),
            RegionId::Tab(tab) => self.tabs.get(tab),
            RegionId::Modal(modal) => self
                .modals
                .iter()
                .find(|(id, _)| id == modal)
                .map(|(_, region)| region),
        }
    }

    fn region_mut(&mut self, id: &RegionId) -> Option<&mut Region> {
        match id {
            RegionId::Shell => Some(&mut self.shell),
            RegionId::Dashboard => Some(&mut self.dashboard),
            RegionId::Message => Some(&mut self.message),
            RegionId::Tab(tab) => self.tabs.get_mut(tab),
            RegionId::Modal(modal) => self
                .modals
                .iter_mut()
                .find(|(id, _)| id == modal)
                .map(|(_, region)| region),
        }
    }

    /// Replaces a region's content wholesale. Returns `false` for unknown regions.
    pub fn replace(&mut self, id: &RegionId, html: String) -> bool {
        match self.region_mut(id) {
            Some(region) => {
                region.replace(html);
                true
            }
            None => false,
        }
    }

    pub fn html(&self, id: &RegionId) -> Option<&str> {
        self.region(id).map(|region| region.html.as_str())
    }

    pub fn generation(&self, id: &RegionId) -> Option<u64> {
        self.region(id).map(|region| region.generation)
    }

    /// True when `element` was taken from the region's latest render.
    pub fn is_current(&self, element: &Element) -> bool {
        self.generation(&element.region) == Some(element.generation)
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        [
            (RegionId::Shell, &self.shell),
            (RegionId::Dashboard, &self.dashboard),
            (RegionId::Message, &self.message),
        ]
        .into_iter()
        .chain(
            self.tabs
                .iter()
                .map(|(id, region)| (RegionId::Tab(id.clone()), region)),
        )
        .chain(
            self.modals
                .iter()
                .map(|(id, region)| (RegionId::Modal(*id), region)),
        )
    }

    /// Every element in the current document matching `selector`, in region order.
    pub fn query(&self, selector: &Selector) -> Vec<Element> {
        let mut found = Vec::new();
        for (id, region) in self.regions() {
            if region.html.is_empty() {
                continue;
            }
            let fragment = Html::parse_fragment(&region.html);
            found.extend(
                elements(&fragment)
                    .enumerate()
                    .filter(|(_, element)| selector.matches(element))
                    .map(|(ordinal, element)| {
                        Element::snapshot(&id, region.generation, ordinal, element)
                    }),
            );
        }
        found
    }

    /// Tests `element` against `selector` where it sits in its region, so
    /// ancestors and table context count. Snapshots from an older render of the
    /// region never match.
    pub fn matches(&self, element: &Element, selector: &Selector) -> bool {
        let Some(region) = self.region(&element.region) else {
            return false;
        };
        if region.generation != element.generation {
            return false;
        }
        let fragment = Html::parse_fragment(&region.html);
        let matched = elements(&fragment)
            .nth(element.ordinal)
            .is_some_and(|node| selector.matches(&node));
        matched
    }

    pub fn open_modal(&mut self, html: String) -> RegionId {
        let id = self.next_modal;
        self.next_modal += 1;
        self.modals.push((id, Region::with_html(html)));
        RegionId::Modal(id)
    }

    /// Removes the modal containing `origin`, or the most recently opened one
    /// when the dismiss control lives outside any modal.
    pub fn dismiss_modal(&mut self, origin: &RegionId) -> Option<RegionId> {
        let index = match origin {
            RegionId::Modal(modal) => self.modals.iter().position(|(id, _)| id == modal),
            _ => self.modals.len().checked_sub(1),
        }?;
        let (id, _) = self.modals.remove(index);
        Some(RegionId::Modal(id))
    }

    pub fn modals(&self) -> impl Iterator<Item = &str> {
        self.modals.iter().map(|(_, region)| region.html.as_str())
    }

    pub fn popover(&self) -> Option<&Popover> {
        self.popover.as_ref()
    }

    pub fn show_popover(&mut self, popover: Popover) {
        self.popover = Some(popover);
    }

    pub fn active_tab(&self) -> Option<&TabId> {
        self.active_tab.as_ref()
    }

    pub fn set_active_tab(&mut self, tab: TabId) {
        self.active_tab = Some(tab);
    }
}
