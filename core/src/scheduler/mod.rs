//! Page rotation scheduler
//!
//! [`PageScheduler`] owns the rotation state and the timers, and drives the
//! widget layer and notification bus through their traits. It is not
//! thread-safe on its own; the service actor serializes all access.
//!
//! # States
//!
//! - `Running`: timers rotate pages (or return home after idling)
//! - `Paused`: no rotation timers; manual navigation still works
//! - `OnOverlay`: a hidden page is shown, with an optional auto-return timeout

mod error;
mod page_scheduler;
mod state;

pub use error::SchedulerError;
pub use page_scheduler::{PageScheduler, SchedulerSnapshot};
pub use state::{RotationMode, RotationState};
