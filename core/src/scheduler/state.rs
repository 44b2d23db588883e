use std::fmt;

/// Mutable rotation state, owned by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationState {
    pub current_page: usize,
    pub paused: bool,
    /// Name of the hidden page being shown, if any.
    pub overlay: Option<String>,
}

impl RotationState {
    pub fn at_page(page: usize) -> Self {
        Self {
            current_page: page,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> RotationMode {
        if self.overlay.is_some() {
            RotationMode::OnOverlay
        } else if self.paused {
            RotationMode::Paused
        } else {
            RotationMode::Running
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    Running,
    Paused,
    OnOverlay,
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::OnOverlay => "on hidden page",
        })
    }
}
