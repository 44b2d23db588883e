use std::collections::BTreeMap;
use std::time::Duration;

use carousel_types::TimingsConfig;
use tracing::warn;

use super::PageLayout;
use crate::config::clamp_millis;

/// Typed key into the timing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey<'a> {
    Default,
    Page(usize),
    Overlay(&'a str),
}

/// Rotation intervals and hidden-page timeouts.
///
/// Lookups fall back from the specific key to the default entry; a zero
/// duration anywhere in that chain means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingTable {
    default: Duration,
    pages: BTreeMap<usize, Duration>,
    overlays: BTreeMap<String, Duration>,
}

impl TimingTable {
    pub fn new(default: Duration) -> Self {
        Self {
            default,
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: usize, interval: Duration) -> Self {
        self.pages.insert(page, interval);
        self
    }

    pub fn with_overlay(mut self, name: impl Into<String>, timeout: Duration) -> Self {
        self.overlays.insert(name.into(), timeout);
        self
    }

    /// Build from raw config. Numeric keys are page indices, anything else
    /// names a hidden page. Keys that match nothing in `layout` are kept but
    /// warned about.
    pub fn from_config(config: &TimingsConfig, layout: &PageLayout) -> Self {
        let mut table = Self::new(clamp_millis("timings.default", config.default));

        for (key, ms) in &config.overrides {
            let duration = clamp_millis(key, *ms);
            match key.parse::<usize>() {
                Ok(page) => {
                    if page >= layout.page_count() {
                        warn!(page, pages = layout.page_count(), "timing override for a page that does not exist");
                    }
                    table.pages.insert(page, duration);
                }
                Err(_) => {
                    if !layout.has_overlay(key) {
                        warn!(key = %key, "timing key is neither a page index nor a hidden page");
                    }
                    table.overlays.insert(key.clone(), duration);
                }
            }
        }

        table
    }

    /// The entry stored under exactly `key`, without fallback.
    pub fn entry(&self, key: PageKey<'_>) -> Option<Duration> {
        let found = match key {
            PageKey::Default => Some(self.default),
            PageKey::Page(page) => self.pages.get(&page).copied(),
            PageKey::Overlay(name) => self.overlays.get(name).copied(),
        };
        found.filter(|d| !d.is_zero())
    }

    /// Resolve `key`: specific entry, then default, then `None` (disabled).
    pub fn effective_interval(&self, key: PageKey<'_>) -> Option<Duration> {
        self.entry(key).or_else(|| self.entry(PageKey::Default))
    }

    /// Auto-return timeout of a hidden page. Only its own entry counts; the
    /// default rotation interval is not a timeout.
    pub fn overlay_timeout(&self, name: &str) -> Option<Duration> {
        self.entry(PageKey::Overlay(name))
    }

    /// Whether the per-page rotation regime is active: a non-zero default or
    /// at least one non-zero page override. Hidden-page timeouts do not count.
    pub fn rotates(&self) -> bool {
        !self.default.is_zero() || self.pages.values().any(|d| !d.is_zero())
    }
}
