//! Test doubles shared by the scheduler and service tests.

use crate::bus::{Notification, NotificationBus};
use crate::widgets::WidgetBoard;

/// Bus that keeps everything published.
#[derive(Debug, Default)]
pub struct RecordingBus {
    pub published: Vec<Notification>,
}

impl RecordingBus {
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.published)
    }

    /// Pages announced with `NEW_PAGE`, in order.
    pub fn new_pages(&self) -> Vec<usize> {
        self.published
            .iter()
            .filter_map(|n| match n {
                Notification::NewPage(page) => Some(*page),
                _ => None,
            })
            .collect()
    }
}

impl NotificationBus for RecordingBus {
    fn publish(&mut self, notification: Notification) {
        self.published.push(notification);
    }
}

/// One widget per tag, named after it, all visible.
pub fn board_for(tags: &[&str]) -> WidgetBoard {
    let mut board = WidgetBoard::new();
    for tag in tags {
        board.add(*tag, [tag.to_string()], false);
    }
    board
}
