use std::time::Duration;

use carousel_types::{PageBounds, PagesConfig};
use tracing::{error, warn};

use crate::pages::{PageLayout, TimingTable};
use crate::scheduler::SchedulerError;

/// Sanitized, immutable runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub layout: PageLayout,
    pub timings: TimingTable,
    pub animation_time: Duration,
    /// Hold-off after manual navigation before rotation resumes.
    pub rotation_delay: Duration,
    /// Idle time before returning home. Zero disables.
    pub home_idle: Duration,
    /// Idle time before returning home from a hidden page. Zero disables.
    pub overlay_idle: Duration,
    pub home_page: usize,
    /// Lock token passed to every hide/show, if any.
    pub lock_token: Option<String>,
    pub identifier: String,
    pub page_bounds: PageBounds,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&PagesConfig::default())
    }
}

impl Settings {
    pub fn from_config(config: &PagesConfig) -> Self {
        let layout = PageLayout::new(
            config.pages.iter().cloned(),
            config.fixed.iter().cloned(),
            config.hidden_pages.clone(),
        );
        if layout.is_empty() {
            error!(error = %SchedulerError::NoPages, "rotation will stay idle");
        }

        let mut timings = config.timings.clone();
        if config.rotation_time_ms > 0 {
            warn!(
                option = "rotation_time_ms",
                replacement = "timings.default",
                "deprecated configuration option"
            );
            if timings.default == 0 {
                timings.default = config.rotation_time_ms;
            }
        }

        let mut home_idle_ms = config.rotation_home_page_ms;
        if config.rotation_first_page_ms > 0 {
            warn!(
                option = "rotation_first_page_ms",
                replacement = "rotation_home_page_ms",
                "deprecated configuration option"
            );
            if home_idle_ms == 0 {
                home_idle_ms = config.rotation_first_page_ms;
            }
        }

        let home_page = usize::try_from(config.home_page)
            .ok()
            .filter(|page| *page < layout.page_count())
            .unwrap_or_else(|| {
                if config.home_page != 0 {
                    warn!(
                        home_page = config.home_page,
                        pages = layout.page_count(),
                        "home page out of range, using page 0"
                    );
                }
                0
            });

        Self {
            timings: TimingTable::from_config(&timings, &layout),
            layout,
            animation_time: clamp_millis("animation_time_ms", config.animation_time_ms),
            rotation_delay: clamp_millis("rotation_delay_ms", config.rotation_delay_ms),
            home_idle: clamp_millis("rotation_home_page_ms", home_idle_ms),
            overlay_idle: clamp_millis(
                "rotation_home_page_hidden_ms",
                config.rotation_home_page_hidden_ms,
            ),
            home_page,
            lock_token: config.use_lock_string.then(|| config.identifier.clone()),
            identifier: config.identifier.clone(),
            page_bounds: config.page_bounds,
        }
    }

    /// Half of the animation time; hide and show each take this long.
    pub fn half_animation(&self) -> Duration {
        self.animation_time / 2
    }
}

/// Millisecond value to duration, clamping negatives to zero.
pub(crate) fn clamp_millis(field: &str, ms: i64) -> Duration {
    match u64::try_from(ms) {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => {
            warn!(field, value = ms, "negative duration clamped to 0");
            Duration::ZERO
        }
    }
}
