use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use carousel_core::{
    ConfigError, LogBus, Notification, PagesConfig, PagesConfigExt, PagesService, ServiceHandle,
    SharedBoard, WidgetBoard,
};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

/// Tasks spawned for the session, aborted on exit.
#[derive(Default)]
pub struct BackgroundTasks {
    pub service: Option<JoinHandle<()>>,
    pub notifications: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn abort_all(&mut self) {
        if let Some(handle) = self.notifications.take() {
            handle.abort();
        }
        if let Some(handle) = self.service.take() {
            handle.abort();
        }
    }
}

/// Holds all shared state for the CLI.
#[derive(Clone)]
pub struct CliContext {
    pub service: ServiceHandle,
    /// The widget board the scheduler drives, readable from the prompt.
    pub board: SharedBoard,
    pub config_path: Option<PathBuf>,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
}

impl CliContext {
    /// Load configuration, build the board and spawn the page service.
    /// With `quiet`, notifications go to the log instead of the terminal.
    /// Must be called inside the tokio runtime.
    pub fn start(config_path: Option<&Path>, quiet: bool) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => PagesConfig::load_from(path)?,
            None => PagesConfig::load(),
        };

        let board = SharedBoard::new(build_board(&config));
        let mut tasks = BackgroundTasks::default();

        let handle = if quiet {
            let (service, handle) = PagesService::new(config.settings(), board.clone(), LogBus);
            tasks.service = Some(tokio::spawn(service.run()));
            handle
        } else {
            let (bus, notifications) = mpsc::unbounded_channel();
            let (service, handle) = PagesService::new(config.settings(), board.clone(), bus);
            tasks.service = Some(tokio::spawn(service.run()));
            tasks.notifications = Some(tokio::spawn(print_notifications(notifications)));
            handle
        };

        info!(config = ?config_path, pages = config.pages.len(), "session started");

        Ok(Self {
            service: handle,
            board,
            config_path: config_path.map(Path::to_path_buf),
            tasks: Arc::new(Mutex::new(tasks)),
        })
    }

    /// Where this session's configuration came from.
    pub fn config_source(&self) -> String {
        describe_config_source(self.config_path.as_deref())
    }

    pub async fn shutdown(&self) {
        let _ = self.service.shutdown().await;
        self.tasks.lock().await.abort_all();
    }
}

fn describe_config_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "platform config directory".to_string(),
    }
}

/// Widgets from the config, or one widget per known tag when none are
/// declared.
fn build_board(config: &PagesConfig) -> WidgetBoard {
    if !config.widgets.is_empty() {
        return WidgetBoard::from_config(&config.widgets);
    }

    let tags: BTreeSet<&String> = config
        .pages
        .iter()
        .flatten()
        .chain(&config.fixed)
        .chain(config.hidden_pages.values().flatten())
        .collect();

    let mut board = WidgetBoard::new();
    for tag in tags {
        board.add(tag.clone(), [tag.clone()], false);
    }
    board
}

async fn print_notifications(mut notifications: mpsc::UnboundedReceiver<Notification>) {
    while let Some(notification) = notifications.recv().await {
        println!("<- {} {}", notification.name(), notification.payload());
    }
}
