//! Delegated event bindings.
//!
//! Bindings are selector based rather than node based: any element in the
//! current document that matches a binding's selector is handled, including
//! elements injected by later poll and tab renders.

use scraper::Selector;

use crate::dom::{parse_selector, Document, Element, SelectorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerEnter,
    Click,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    ShowPopover,
    OpenModal,
    DismissModal,
    ActivateTab,
    SubmitAction,
}

#[derive(Debug, Clone)]
struct Binding {
    kind: EventKind,
    selector: Selector,
    behavior: Behavior,
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    bindings: Vec<Binding>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings used by the dashboard page.
    pub fn standard() -> Result<Self, SelectorError> {
        let mut dispatcher = Self::new();
        dispatcher.bind(EventKind::PointerEnter, "a[rel=popover]", Behavior::ShowPopover)?;
        dispatcher.bind(EventKind::Click, "a[rel=modal]", Behavior::OpenModal)?;
        dispatcher.bind(EventKind::Click, "[data-dismiss=modal]", Behavior::DismissModal)?;
        dispatcher.bind(EventKind::Click, "a[data-toggle=tab]", Behavior::ActivateTab)?;
        dispatcher.bind(EventKind::Submit, "form", Behavior::SubmitAction)?;
        Ok(dispatcher)
    }

    pub fn bind(
        &mut self,
        kind: EventKind,
        css: &str,
        behavior: Behavior,
    ) -> Result<(), SelectorError> {
        self.bindings.push(Binding {
            kind,
            selector: parse_selector(css)?,
            behavior,
        });
        Ok(())
    }

    /// First binding for `kind` whose selector matches `target` in `document`.
    pub fn resolve(
        &self,
        kind: EventKind,
        target: &Element,
        document: &Document,
    ) -> Option<Behavior> {
        self.bindings
            .iter()
            .filter(|binding| binding.kind == kind)
            .find(|binding| document.matches(target, &binding.selector))
            .map(|binding| binding.behavior)
    }

    /// Every element of `document` some binding would handle, in binding order.
    pub fn targets(&self, document: &Document) -> Vec<(EventKind, Behavior, Element)> {
        self.bindings
            .iter()
            .flat_map(|binding| {
                document
                    .query(&binding.selector)
                    .into_iter()
                    .map(|element| (binding.kind, binding.behavior, element))
            })
            .collect()
    }
}
