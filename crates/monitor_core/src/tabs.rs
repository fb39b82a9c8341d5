use std::collections::BTreeMap;

use crate::page::{TabDescriptor, TabId};

/// One-way load flag of a tab, with a transient in-flight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabLoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    pub descriptor: TabDescriptor,
    pub state: TabLoadState,
    pub fetches: u32,
    pub failures: u32,
}

/// Session-owned load state of every tab declared by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabRegistry {
    entries: BTreeMap<TabId, TabEntry>,
}

impl TabRegistry {
    pub fn new<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = TabDescriptor>,
    {
        let entries = descriptors
            .into_iter()
            .map(|descriptor| {
                (
                    descriptor.id.clone(),
                    TabEntry {
                        descriptor,
                        state: TabLoadState::Unloaded,
                        fetches: 0,
                        failures: 0,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&TabEntry> {
        self.entries.get(id)
    }

    pub fn state(&self, id: &str) -> Option<TabLoadState> {
        self.entries.get(id).map(|entry| entry.state)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TabEntry> {
        self.entries.values()
    }

    /// Moves an unloaded tab to `Loading` and returns its declared source.
    /// Loading and loaded tabs yield `None`.
    pub fn begin_load(&mut self, id: &str) -> Option<&str> {
        let entry = self.entries.get_mut(id)?;
        if entry.state != TabLoadState::Unloaded {
            return None;
        }
        entry.state = TabLoadState::Loading;
        entry.fetches += 1;
        Some(entry.descriptor.source_url.as_str())
    }

    /// Settles a load. Returns `false` when the tab was not loading, in which
    /// case nothing changes.
    pub fn finish_load(&mut self, id: &str, succeeded: bool) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            return false;
        };
        if entry.state != TabLoadState::Loading {
            return false;
        }
        if succeeded {
            entry.state = TabLoadState::Loaded;
        } else {
            entry.state = TabLoadState::Unloaded;
            entry.failures += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TabRegistry {
        TabRegistry::new([TabDescriptor {
            id: "failed".to_string(),
            source_url: "reports/failed".to_string(),
        }])
    }

    #[test]
    fn loaded_flag_is_one_way() {
        let mut tabs = registry();
        assert_eq!(tabs.begin_load("failed"), Some("reports/failed"));
        assert!(tabs.finish_load("failed", true));
        assert_eq!(tabs.begin_load("failed"), None);
        assert!(!tabs.finish_load("failed", false));
        assert_eq!(tabs.state("failed"), Some(TabLoadState::Loaded));
    }

    #[test]
    fn failure_returns_to_unloaded() {
        let mut tabs = registry();
        tabs.begin_load("failed");
        assert_eq!(tabs.begin_load("failed"), None);
        tabs.finish_load("failed", false);

        let entry = tabs.get("failed").unwrap();
        assert_eq!(entry.state, TabLoadState::Unloaded);
        assert_eq!(entry.failures, 1);
        assert_eq!(tabs.begin_load("failed"), Some("reports/failed"));
        assert_eq!(tabs.get("failed").unwrap().fetches, 2);
    }

    #[test]
    fn unknown_tab_is_ignored() {
        let mut tabs = registry();
        assert_eq!(tabs.begin_load("queued"), None);
        assert!(!tabs.finish_load("queued", true));
    }
}
