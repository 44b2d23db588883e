//! Page service - runs the scheduler on its own task
//!
//! Architecture:
//! - PagesService: background task that owns the scheduler and its timers
//! - ServiceHandle: cloneable sender for commands, notifications and snapshots
//!
//! Commands and timer events are handled one at a time on the service task,
//! so the scheduler never sees concurrent access.

mod handler;

pub use handler::{ServiceError, ServiceHandle};

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::bus::NotificationBus;
use crate::command::{Command, Origin};
use crate::config::Settings;
use crate::scheduler::{PageScheduler, SchedulerSnapshot};
use crate::timers::{TimerEvent, TimerSet};
use crate::widgets::WidgetRegistry;

// ─────────────────────────────────────────────────────────────────────────────
// Service Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Messages sent to the service through a [`ServiceHandle`]
#[derive(Debug)]
pub enum ServiceCommand {
    /// An already decoded command.
    Apply(Command),
    /// A raw notification; decoded on the service task.
    Notify { name: String, payload: Value },
    Snapshot(oneshot::Sender<SchedulerSnapshot>),
    Shutdown,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pages Service
// ─────────────────────────────────────────────────────────────────────────────

pub struct PagesService<W, B> {
    scheduler: PageScheduler<W, B>,
    cmd_rx: mpsc::Receiver<ServiceCommand>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
}

impl<W, B> PagesService<W, B>
where
    W: WidgetRegistry + Send + 'static,
    B: NotificationBus + Send + 'static,
{
    /// Create a service and the handle to talk to it. Nothing runs until
    /// [`PagesService::run`] is spawned and `Ready` is sent.
    pub fn new(settings: Settings, widgets: W, bus: B) -> (Self, ServiceHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (timers, timer_rx) = TimerSet::channel();

        let service = Self {
            scheduler: PageScheduler::new(settings, widgets, bus, timers),
            cmd_rx,
            timer_rx,
        };
        (service, ServiceHandle::new(cmd_tx))
    }

    pub async fn run(mut self) {
        info!(
            pages = self.scheduler.settings().layout.page_count(),
            "page service started"
        );

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(ServiceCommand::Shutdown) | None => break,
                        Some(cmd) => self.handle_command(cmd),
                    }
                }
                Some(event) = self.timer_rx.recv() => {
                    self.scheduler.on_timer(event);
                }
            }
        }

        self.scheduler.shutdown();
        info!("page service stopped");
    }

    fn handle_command(&mut self, cmd: ServiceCommand) {
        match cmd {
            ServiceCommand::Apply(command) => self.apply(command),
            ServiceCommand::Notify { name, payload } => match Command::decode(&name, &payload) {
                Ok(Some(command)) => self.apply(command),
                Ok(None) => debug!(notification = %name, "ignoring foreign notification"),
                Err(err) => err.report(),
            },
            ServiceCommand::Snapshot(reply) => {
                let _ = reply.send(self.scheduler.snapshot());
            }
            ServiceCommand::Shutdown => {}
        }
    }

    fn apply(&mut self, command: Command) {
        if let Err(err) = self.scheduler.apply(command, Origin::Manual) {
            err.report();
        }
    }
}
