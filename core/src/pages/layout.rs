use std::collections::{BTreeMap, BTreeSet};

/// A set of group tags.
pub type GroupSet = BTreeSet<String>;

/// Immutable page structure: rotation pages, always-visible tags, and named
/// hidden pages outside the rotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pages: Vec<GroupSet>,
    fixed: GroupSet,
    overlays: BTreeMap<String, GroupSet>,
}

impl PageLayout {
    pub fn new<P, F, O>(pages: P, fixed: F, overlays: O) -> Self
    where
        P: IntoIterator,
        P::Item: IntoIterator<Item = String>,
        F: IntoIterator<Item = String>,
        O: IntoIterator<Item = (String, Vec<String>)>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|page| page.into_iter().collect())
                .collect(),
            fixed: fixed.into_iter().collect(),
            overlays: overlays
                .into_iter()
                .map(|(name, tags)| (name, tags.into_iter().collect()))
                .collect(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn has_overlay(&self, name: &str) -> bool {
        self.overlays.contains_key(name)
    }

    pub fn overlay_names(&self) -> impl Iterator<Item = &str> {
        self.overlays.keys().map(String::as_str)
    }

    /// Tags visible on `page`: the page's own tags plus the fixed set.
    /// An index past the end yields the fixed set alone.
    pub fn page_groups(&self, page: usize) -> GroupSet {
        let mut visible = self.fixed.clone();
        if let Some(tags) = self.pages.get(page) {
            visible.extend(tags.iter().cloned());
        }
        visible
    }

    /// Tags visible while the named hidden page is shown. The fixed set is
    /// not included; a hidden page lists everything it wants on screen.
    pub fn overlay_groups(&self, name: &str) -> Option<&GroupSet> {
        self.overlays.get(name)
    }
}
