//! Shared configuration types for carousel
//!
//! This crate contains the serializable configuration consumed by the page
//! scheduler (carousel-core) and by the interactive driver (carousel-cli).
//! Values here are raw: durations are signed so a negative number in a file
//! still parses, and sanitization into runtime settings happens in core.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Group tag of the page indicator widget, visible on every page by default.
pub const PAGE_INDICATOR_TAG: &str = "page-indicator";

/// Identifier used as lock token and API module name.
pub const DEFAULT_IDENTIFIER: &str = "carousel";

fn default_true() -> bool {
    true
}

fn default_fixed() -> Vec<String> {
    vec![PAGE_INDICATOR_TAG.to_string()]
}

fn default_animation_time() -> i64 {
    1000
}

fn default_rotation_delay() -> i64 {
    10_000
}

fn default_identifier() -> String {
    DEFAULT_IDENTIFIER.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Timing Table
// ─────────────────────────────────────────────────────────────────────────────

/// Rotation timings in milliseconds.
///
/// ```toml
/// [timings]
/// default = 5000
/// 2 = 20000       # page index override
/// admin = 30000   # hidden page timeout
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingsConfig {
    /// Interval used by every page without an override. 0 disables rotation.
    #[serde(default)]
    pub default: i64,

    /// Page-index or hidden-page keyed overrides.
    #[serde(flatten)]
    pub overrides: BTreeMap<String, i64>,
}

impl TimingsConfig {
    pub fn with_default(default: i64) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// Builder-style override insertion, handy for tests and demos.
    pub fn with_override(mut self, key: impl Into<String>, ms: i64) -> Self {
        self.overrides.insert(key.into(), ms);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation Policy
// ─────────────────────────────────────────────────────────────────────────────

/// What to do with a directly selected page index outside `[0, page_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageBounds {
    /// Normalize with true modulo (`-1` selects the last page).
    #[default]
    Wrap,
    /// Log the selection as invalid and keep the current page.
    Reject,
}

// ─────────────────────────────────────────────────────────────────────────────
// Widgets (driver only)
// ─────────────────────────────────────────────────────────────────────────────

/// A widget declared for the in-memory board used by the interactive driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Start hidden; rotation will never reveal this widget.
    #[serde(default)]
    pub hidden_on_startup: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pages Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Complete page rotation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Ordered pages, each a list of group tags.
    #[serde(default)]
    pub pages: Vec<Vec<String>>,

    /// Group tags visible on every page.
    #[serde(default = "default_fixed")]
    pub fixed: Vec<String>,

    /// Named on-demand pages outside the rotation.
    #[serde(default)]
    pub hidden_pages: BTreeMap<String, Vec<String>>,

    /// Full hide+show animation time; each half takes half of it.
    #[serde(default = "default_animation_time")]
    pub animation_time_ms: i64,

    #[serde(default)]
    pub timings: TimingsConfig,

    /// Cool-down after manual navigation before rotation resumes.
    #[serde(default = "default_rotation_delay")]
    pub rotation_delay_ms: i64,

    /// Idle time before returning to the home page (only when no rotation
    /// timings are configured). 0 disables.
    #[serde(default)]
    pub rotation_home_page_ms: i64,

    /// Same as `rotation_home_page_ms`, used while a hidden page is shown.
    #[serde(default)]
    pub rotation_home_page_hidden_ms: i64,

    #[serde(default)]
    pub home_page: i64,

    /// Pass `identifier` as lock token to every hide/show.
    #[serde(default = "default_true")]
    pub use_lock_string: bool,

    #[serde(default = "default_identifier")]
    pub identifier: String,

    #[serde(default)]
    pub page_bounds: PageBounds,

    /// Deprecated: use `timings.default`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation_time_ms: i64,

    /// Deprecated: use `rotation_home_page_ms`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation_first_page_ms: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub widgets: Vec<WidgetConfig>,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            fixed: default_fixed(),
            hidden_pages: BTreeMap::new(),
            animation_time_ms: default_animation_time(),
            timings: TimingsConfig::default(),
            rotation_delay_ms: default_rotation_delay(),
            rotation_home_page_ms: 0,
            rotation_home_page_hidden_ms: 0,
            home_page: 0,
            use_lock_string: true,
            identifier: default_identifier(),
            page_bounds: PageBounds::Wrap,
            rotation_time_ms: 0,
            rotation_first_page_ms: 0,
            widgets: Vec::new(),
        }
    }
}

impl PagesConfig {
    /// Config with the given pages and everything else defaulted.
    pub fn with_pages<I, P, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|page| page.into_iter().map(Into::into).collect())
                .collect(),
            ..Self::default()
        }
    }
}
