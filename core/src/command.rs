//! Inbound commands and their wire names
//!
//! Notifications arrive as a name plus a JSON payload. [`Command::decode`]
//! is the only place wire names are interpreted; the scheduler only sees
//! [`Command`] values.

use serde_json::Value;
use tracing::warn;

use crate::scheduler::SchedulerError;

/// Notification names understood and emitted by the scheduler.
pub mod names {
    pub const PAGE_SELECT: &str = "PAGE_SELECT";
    pub const PAGE_INCREMENT: &str = "PAGE_INCREMENT";
    pub const PAGE_DECREMENT: &str = "PAGE_DECREMENT";
    pub const HOME_PAGE: &str = "HOME_PAGE";
    pub const QUERY_PAGE_NUMBER: &str = "QUERY_PAGE_NUMBER";
    pub const PAUSE_ROTATION: &str = "PAUSE_ROTATION";
    pub const RESUME_ROTATION: &str = "RESUME_ROTATION";
    pub const SHOW_HIDDEN_PAGE: &str = "SHOW_HIDDEN_PAGE";
    pub const LEAVE_HIDDEN_PAGE: &str = "LEAVE_HIDDEN_PAGE";
    pub const DOM_OBJECTS_CREATED: &str = "DOM_OBJECTS_CREATED";
    /// Deprecated alias of [`PAGE_SELECT`].
    pub const PAGE_CHANGED: &str = "PAGE_CHANGED";

    pub const MAX_PAGES_CHANGED: &str = "MAX_PAGES_CHANGED";
    pub const NEW_PAGE: &str = "NEW_PAGE";
    pub const PAGE_NUMBER_IS: &str = "PAGE_NUMBER_IS";
    pub const REGISTER_API: &str = "REGISTER_API";
}

/// Where a command came from. Only manual navigation starts a cool-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Manual,
    Timer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Go to a page. Out-of-range handling follows the configured bounds.
    Select(i64),
    /// Move forward; `None` means one page.
    Increment(Option<i64>),
    /// Move backward; `None` means one page.
    Decrement(Option<i64>),
    Home,
    Query,
    Pause,
    Resume,
    EnterOverlay(String),
    LeaveOverlay,
    /// The widget layer finished building; starts everything.
    Ready,
}

impl Command {
    /// Map a notification to a command. Unknown names are not ours and
    /// yield `Ok(None)`.
    pub fn decode(name: &str, payload: &Value) -> Result<Option<Self>, SchedulerError> {
        let command = match name {
            names::PAGE_SELECT => Self::Select(select_target(names::PAGE_SELECT, payload)?),
            names::PAGE_CHANGED => {
                warn!(
                    notification = names::PAGE_CHANGED,
                    replacement = names::PAGE_SELECT,
                    "deprecated notification"
                );
                Self::Select(select_target(names::PAGE_CHANGED, payload)?)
            }
            names::PAGE_INCREMENT => Self::Increment(integer(payload)),
            names::PAGE_DECREMENT => Self::Decrement(integer(payload)),
            names::HOME_PAGE => Self::Home,
            names::QUERY_PAGE_NUMBER => Self::Query,
            names::PAUSE_ROTATION => Self::Pause,
            names::RESUME_ROTATION => Self::Resume,
            names::SHOW_HIDDEN_PAGE => match payload.as_str() {
                Some(overlay) => Self::EnterOverlay(overlay.to_string()),
                None => {
                    return Err(SchedulerError::UnknownOverlay {
                        name: payload.to_string(),
                    });
                }
            },
            names::LEAVE_HIDDEN_PAGE => Self::LeaveOverlay,
            names::DOM_OBJECTS_CREATED => Self::Ready,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    /// Wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => names::PAGE_SELECT,
            Self::Increment(_) => names::PAGE_INCREMENT,
            Self::Decrement(_) => names::PAGE_DECREMENT,
            Self::Home => names::HOME_PAGE,
            Self::Query => names::QUERY_PAGE_NUMBER,
            Self::Pause => names::PAUSE_ROTATION,
            Self::Resume => names::RESUME_ROTATION,
            Self::EnterOverlay(_) => names::SHOW_HIDDEN_PAGE,
            Self::LeaveOverlay => names::LEAVE_HIDDEN_PAGE,
            Self::Ready => names::DOM_OBJECTS_CREATED,
        }
    }

    /// Wire payload of this command.
    pub fn payload(&self) -> Value {
        match self {
            Self::Select(page) => Value::from(*page),
            Self::Increment(Some(amount)) | Self::Decrement(Some(amount)) => Value::from(*amount),
            Self::EnterOverlay(name) => Value::from(name.as_str()),
            _ => Value::Null,
        }
    }
}

/// Integer payloads, including whole floats such as `2.0`.
fn integer(payload: &Value) -> Option<i64> {
    payload.as_i64().or_else(|| {
        payload
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn select_target(command: &'static str, payload: &Value) -> Result<i64, SchedulerError> {
    integer(payload).ok_or_else(|| SchedulerError::InvalidNavigation {
        command,
        input: payload.to_string(),
    })
}
