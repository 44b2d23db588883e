//! Widget layer seam
//!
//! The scheduler never touches widgets directly. It selects them by group
//! tag and asks the registry to hide or show them with an animation time and
//! an optional lock token.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use carousel_types::WidgetConfig;
use tracing::debug;

use crate::pages::GroupSet;

pub type WidgetId = String;

/// Which widgets a query returns, by their group tags.
#[derive(Debug, Clone, Copy)]
pub enum GroupFilter<'a> {
    All,
    /// Widgets carrying at least one of these tags.
    WithAny(&'a GroupSet),
    /// Widgets carrying none of these tags.
    WithoutAny(&'a GroupSet),
}

impl GroupFilter<'_> {
    pub fn matches<'t>(&self, tags: impl IntoIterator<Item = &'t String>) -> bool {
        match self {
            Self::All => true,
            Self::WithAny(set) => tags.into_iter().any(|tag| set.contains(tag)),
            Self::WithoutAny(set) => !tags.into_iter().any(|tag| set.contains(tag)),
        }
    }
}

/// The external widget layer.
pub trait WidgetRegistry {
    /// Ids of the widgets matching `filter`, in a stable order.
    fn select(&self, filter: GroupFilter<'_>) -> Vec<WidgetId>;
    fn is_hidden(&self, id: &str) -> bool;
    fn hide(&mut self, id: &str, duration: Duration, lock: Option<&str>);
    fn show(&mut self, id: &str, duration: Duration, lock: Option<&str>);
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory board
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hide,
    Show,
}

/// One hide or show request as the board received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityChange {
    pub widget: WidgetId,
    pub visibility: Visibility,
    pub duration: Duration,
    pub lock: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: WidgetId,
    pub tags: BTreeSet<String>,
    pub hidden: bool,
    locks: BTreeSet<String>,
}

impl Widget {
    pub fn locks(&self) -> &BTreeSet<String> {
        &self.locks
    }
}

/// In-memory widget registry with lock semantics: a hide with a lock token
/// adds the lock, a show with a token removes it, and a widget only becomes
/// visible once no locks remain. Every request is journaled.
#[derive(Debug, Clone, Default)]
pub struct WidgetBoard {
    widgets: Vec<Widget>,
    journal: Vec<VisibilityChange>,
}

impl WidgetBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(widgets: &[WidgetConfig]) -> Self {
        let mut board = Self::new();
        for widget in widgets {
            board.add(&widget.id, widget.tags.iter().cloned(), widget.hidden_on_startup);
        }
        board
    }

    pub fn add(
        &mut self,
        id: impl Into<WidgetId>,
        tags: impl IntoIterator<Item = String>,
        hidden: bool,
    ) -> &mut Self {
        self.widgets.push(Widget {
            id: id.into(),
            tags: tags.into_iter().collect(),
            hidden,
            locks: BTreeSet::new(),
        });
        self
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn visible_ids(&self) -> Vec<WidgetId> {
        self.widgets
            .iter()
            .filter(|w| !w.hidden)
            .map(|w| w.id.clone())
            .collect()
    }

    pub fn journal(&self) -> &[VisibilityChange] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<VisibilityChange> {
        std::mem::take(&mut self.journal)
    }

    fn record(&mut self, id: &str, visibility: Visibility, duration: Duration, lock: Option<&str>) {
        self.journal.push(VisibilityChange {
            widget: id.to_string(),
            visibility,
            duration,
            lock: lock.map(str::to_string),
        });
    }
}

impl WidgetRegistry for WidgetBoard {
    fn select(&self, filter: GroupFilter<'_>) -> Vec<WidgetId> {
        self.widgets
            .iter()
            .filter(|w| filter.matches(&w.tags))
            .map(|w| w.id.clone())
            .collect()
    }

    fn is_hidden(&self, id: &str) -> bool {
        self.widget(id).is_some_and(|w| w.hidden)
    }

    fn hide(&mut self, id: &str, duration: Duration, lock: Option<&str>) {
        self.record(id, Visibility::Hide, duration, lock);
        if let Some(widget) = self.widgets.iter_mut().find(|w| w.id == id) {
            if let Some(lock) = lock {
                widget.locks.insert(lock.to_string());
            }
            widget.hidden = true;
        }
    }

    fn show(&mut self, id: &str, duration: Duration, lock: Option<&str>) {
        self.record(id, Visibility::Show, duration, lock);
        if let Some(widget) = self.widgets.iter_mut().find(|w| w.id == id) {
            if let Some(lock) = lock {
                widget.locks.remove(lock);
            }
            if widget.locks.is_empty() {
                widget.hidden = false;
            } else {
                debug!(widget = %id, locks = ?widget.locks, "show blocked by remaining locks");
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared board
// ─────────────────────────────────────────────────────────────────────────────

/// A [`WidgetBoard`] shared between the scheduler task and observers.
#[derive(Debug, Clone, Default)]
pub struct SharedBoard(Arc<Mutex<WidgetBoard>>);

impl SharedBoard {
    pub fn new(board: WidgetBoard) -> Self {
        Self(Arc::new(Mutex::new(board)))
    }

    /// Lock the board. A poisoned lock is recovered; the board holds no
    /// invariants a panicking writer could break halfway.
    pub fn lock(&self) -> MutexGuard<'_, WidgetBoard> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WidgetRegistry for SharedBoard {
    fn select(&self, filter: GroupFilter<'_>) -> Vec<WidgetId> {
        self.lock().select(filter)
    }

    fn is_hidden(&self, id: &str) -> bool {
        self.lock().is_hidden(id)
    }

    fn hide(&mut self, id: &str, duration: Duration, lock: Option<&str>) {
        self.lock().hide(id, duration, lock);
    }

    fn show(&mut self, id: &str, duration: Duration, lock: Option<&str>) {
        self.lock().show(id, duration, lock);
    }
}
