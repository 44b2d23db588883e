use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::ServiceCommand;
use crate::command::Command;
use crate::scheduler::SchedulerSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("page service is not running")]
    Closed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to communicate with the page service
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    cmd_tx: mpsc::Sender<ServiceCommand>,
}

impl ServiceHandle {
    pub(super) fn new(cmd_tx: mpsc::Sender<ServiceCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Send a decoded command
    pub async fn send(&self, command: Command) -> Result<(), ServiceError> {
        self.dispatch(ServiceCommand::Apply(command)).await
    }

    /// Send a raw notification, as another module would
    pub async fn notify(&self, name: impl Into<String>, payload: Value) -> Result<(), ServiceError> {
        self.dispatch(ServiceCommand::Notify {
            name: name.into(),
            payload,
        })
        .await
    }

    /// Current scheduler state, after every command sent before this call
    pub async fn snapshot(&self) -> Result<SchedulerSnapshot, ServiceError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.dispatch(ServiceCommand::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| ServiceError::Closed)
    }

    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.dispatch(ServiceCommand::Shutdown).await
    }

    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    async fn dispatch(&self, cmd: ServiceCommand) -> Result<(), ServiceError> {
        self.cmd_tx.send(cmd).await.map_err(|_| ServiceError::Closed)
    }
}
