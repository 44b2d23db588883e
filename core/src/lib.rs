pub mod bus;
pub mod command;
pub mod config;
pub mod pages;
pub mod scheduler;
pub mod service;
pub mod timers;
pub mod widgets;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use bus::{ApiAction, ApiRegistration, LogBus, Notification, NotificationBus};
pub use command::{Command, Origin};
pub use config::{ConfigError, PageBounds, PagesConfig, PagesConfigExt, Settings, TimingsConfig};
pub use pages::{GroupSet, PageKey, PageLayout, TimingTable};
pub use scheduler::{PageScheduler, RotationMode, RotationState, SchedulerError, SchedulerSnapshot};
pub use service::{PagesService, ServiceCommand, ServiceError, ServiceHandle};
pub use timers::{TimerAction, TimerEvent, TimerKind, TimerSet};
pub use widgets::{GroupFilter, SharedBoard, WidgetBoard, WidgetId, WidgetRegistry};
