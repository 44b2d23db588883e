//! Outbound notifications and the bus they are published on

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::command::{Command, names};
use crate::pages::PageLayout;

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Number of rotation pages, announced once when ready.
    MaxPagesChanged(usize),
    /// Current page after a transition.
    NewPage(usize),
    /// Answer to a page number query.
    PageNumberIs(usize),
    /// Control-surface actions for an external automation module.
    RegisterApi(ApiRegistration),
    /// A timer-generated command, echoed so other modules see it.
    Relay(Command),
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MaxPagesChanged(_) => names::MAX_PAGES_CHANGED,
            Self::NewPage(_) => names::NEW_PAGE,
            Self::PageNumberIs(_) => names::PAGE_NUMBER_IS,
            Self::RegisterApi(_) => names::REGISTER_API,
            Self::Relay(command) => command.name(),
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::MaxPagesChanged(count) => Value::from(*count),
            Self::NewPage(page) | Self::PageNumberIs(page) => Value::from(*page),
            Self::RegisterApi(registration) => serde_json::to_value(registration)
                .unwrap_or_else(|err| {
                    error!(
                        error = %err,
                        module = %registration.module,
                        "failed to encode API registration"
                    );
                    Value::Null
                }),
            Self::Relay(command) => command.payload(),
        }
    }
}

/// Where the scheduler publishes notifications.
pub trait NotificationBus {
    fn publish(&mut self, notification: Notification);
}

impl NotificationBus for mpsc::UnboundedSender<Notification> {
    fn publish(&mut self, notification: Notification) {
        if let Err(err) = self.send(notification) {
            debug!(notification = err.0.name(), "notification receiver dropped");
        }
    }
}

/// Bus that only logs what would be published.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBus;

impl NotificationBus for LogBus {
    fn publish(&mut self, notification: Notification) {
        info!(
            notification = notification.name(),
            payload = %notification.payload(),
            "publish"
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Control surface
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAction {
    pub notification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub pretty_name: String,
}

impl ApiAction {
    fn new(notification: &str, payload: Option<Value>, pretty_name: impl Into<String>) -> Self {
        Self {
            notification: notification.to_string(),
            payload,
            pretty_name: pretty_name.into(),
        }
    }
}

/// Payload of `REGISTER_API`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRegistration {
    pub module: String,
    pub path: String,
    pub actions: BTreeMap<String, ApiAction>,
}

impl ApiRegistration {
    pub const PATH: &'static str = "pages";

    /// Fixed actions, one `page<i>` action per page and one `show<name>`
    /// action per hidden page.
    pub fn for_layout(module: &str, layout: &PageLayout) -> Self {
        let mut actions = BTreeMap::new();
        let fixed = [
            ("next", names::PAGE_INCREMENT, "Next Page"),
            ("previous", names::PAGE_DECREMENT, "Previous Page"),
            ("home", names::HOME_PAGE, "Home Page"),
            ("pause", names::PAUSE_ROTATION, "Pause Rotation"),
            ("resume", names::RESUME_ROTATION, "Resume Rotation"),
            ("leave", names::LEAVE_HIDDEN_PAGE, "Leave Hidden Page"),
        ];
        for (key, notification, pretty) in fixed {
            actions.insert(key.to_string(), ApiAction::new(notification, None, pretty));
        }

        for page in 0..layout.page_count() {
            actions.insert(
                format!("page{page}"),
                ApiAction::new(
                    names::PAGE_SELECT,
                    Some(Value::from(page)),
                    format!("Display page {page}"),
                ),
            );
        }

        for name in layout.overlay_names() {
            actions.insert(
                format!("show{name}"),
                ApiAction::new(
                    names::SHOW_HIDDEN_PAGE,
                    Some(Value::from(name)),
                    format!("Show hidden page {name}"),
                ),
            );
        }

        Self {
            module: module.to_string(),
            path: Self::PATH.to_string(),
            actions,
        }
    }
}
