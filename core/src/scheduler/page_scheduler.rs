use std::collections::BTreeSet;
use std::time::Duration;

use carousel_types::PageBounds;
use tracing::{debug, info, warn};

use super::{RotationMode, RotationState, SchedulerError};
use crate::bus::{ApiRegistration, Notification, NotificationBus};
use crate::command::{Command, Origin};
use crate::config::Settings;
use crate::pages::{GroupSet, PageKey, navigation};
use crate::timers::{TimerAction, TimerEvent, TimerKind, TimerSet};
use crate::widgets::{GroupFilter, WidgetId, WidgetRegistry};

/// Point-in-time view of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSnapshot {
    pub ready: bool,
    pub current_page: usize,
    pub page_count: usize,
    pub mode: RotationMode,
    pub overlay: Option<String>,
    pub visible_groups: GroupSet,
    pub shown_widgets: Vec<WidgetId>,
    pub timers: Vec<(TimerKind, Duration)>,
}

/// The page rotation state machine.
///
/// Every state change recomputes the visible group set, hides everything
/// outside it, shows what is inside it half an animation later, and
/// reprograms the timers. Widgets hidden when the widget layer became ready
/// are never shown by a transition.
pub struct PageScheduler<W, B> {
    settings: Settings,
    state: RotationState,
    ready: bool,
    startup_hidden: BTreeSet<WidgetId>,
    pending_reveal: Option<GroupSet>,
    widgets: W,
    bus: B,
    timers: TimerSet,
}

impl<W: WidgetRegistry, B: NotificationBus> PageScheduler<W, B> {
    pub fn new(settings: Settings, widgets: W, bus: B, timers: TimerSet) -> Self {
        Self {
            state: RotationState::at_page(settings.home_page),
            settings,
            ready: false,
            startup_hidden: BTreeSet::new(),
            pending_reveal: None,
            widgets,
            bus,
            timers,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn mode(&self) -> RotationMode {
        self.state.mode()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn startup_hidden(&self) -> &BTreeSet<WidgetId> {
        &self.startup_hidden
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn widgets(&self) -> &W {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut W {
        &mut self.widgets
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Group tags that should be on screen in the current state.
    pub fn visible_groups(&self) -> GroupSet {
        match &self.state.overlay {
            Some(name) => self
                .settings
                .layout
                .overlay_groups(name)
                .cloned()
                .unwrap_or_default(),
            None => self.settings.layout.page_groups(self.state.current_page),
        }
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        let shown_widgets = self
            .widgets
            .select(GroupFilter::All)
            .into_iter()
            .filter(|id| !self.widgets.is_hidden(id))
            .collect();

        SchedulerSnapshot {
            ready: self.ready,
            current_page: self.state.current_page,
            page_count: self.settings.layout.page_count(),
            mode: self.state.mode(),
            overlay: self.state.overlay.clone(),
            visible_groups: self.visible_groups(),
            shown_widgets,
            timers: self.timers.armed(),
        }
    }

    /// Interval and action of the rotation timer the current state calls for.
    ///
    /// Per-page rotation wins whenever any rotation timing is configured;
    /// otherwise the idle-return-home delay applies. `None` means no timer.
    pub fn rotation_plan(&self) -> Option<(Duration, TimerAction)> {
        let timings = &self.settings.timings;
        if timings.rotates() {
            if self.state.overlay.is_some() {
                return None;
            }
            return timings
                .effective_interval(PageKey::Page(self.state.current_page))
                .map(|interval| (interval, TimerAction::Advance));
        }

        let idle = if self.state.overlay.is_some() {
            self.settings.overlay_idle
        } else {
            self.settings.home_idle
        };
        (!idle.is_zero()).then_some((idle, TimerAction::ReturnHome))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    pub fn apply(&mut self, command: Command, origin: Origin) -> Result<(), SchedulerError> {
        debug!(?command, ?origin, "applying command");
        match command {
            Command::Select(page) => {
                let target = self.resolve_selection(page)?;
                self.navigate(target, origin)
            }
            Command::Increment(amount) => self.step(amount.unwrap_or(1), origin),
            Command::Decrement(amount) => self.step(amount.unwrap_or(1).saturating_neg(), origin),
            Command::Home => self.navigate(self.settings.home_page, origin),
            Command::Query => {
                self.bus.publish(Notification::PageNumberIs(self.state.current_page));
                Ok(())
            }
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::EnterOverlay(name) => self.enter_overlay(name),
            Command::LeaveOverlay => self.leave_overlay(),
            Command::Ready => self.ready(),
        }
    }

    /// Handle a fired timer. Stale events are dropped.
    pub fn on_timer(&mut self, event: TimerEvent) {
        let Some(action) = self.timers.accept(event) else {
            debug!(?event, "discarding stale timer event");
            return;
        };

        let result = match action {
            TimerAction::Advance => self.relay(Command::Increment(Some(1))),
            TimerAction::ReturnHome => self.relay(Command::Select(self.settings.home_page as i64)),
            TimerAction::LeaveOverlay => self.relay(Command::LeaveOverlay),
            TimerAction::EndCooldown => {
                self.arm_rotation();
                Ok(())
            }
            TimerAction::Reveal => {
                if let Some(visible) = self.pending_reveal.take() {
                    self.reveal(&visible);
                }
                Ok(())
            }
        };

        if let Err(err) = result {
            err.report();
        }
    }

    /// Cancel every timer; used when the service stops.
    pub fn shutdown(&mut self) {
        self.timers.cancel_all();
        self.pending_reveal = None;
    }

    fn ready(&mut self) -> Result<(), SchedulerError> {
        if self.ready {
            warn!("widget layer reported ready twice, ignoring");
            return Ok(());
        }
        self.ready = true;

        let hidden: BTreeSet<WidgetId> = self
            .widgets
            .select(GroupFilter::All)
            .into_iter()
            .filter(|id| self.widgets.is_hidden(id))
            .collect();
        self.startup_hidden = hidden;

        let page_count = self.settings.layout.page_count();
        info!(
            pages = page_count,
            startup_hidden = self.startup_hidden.len(),
            "widget layer ready"
        );

        self.bus.publish(Notification::MaxPagesChanged(page_count));
        self.bus.publish(Notification::RegisterApi(ApiRegistration::for_layout(
            &self.settings.identifier,
            &self.settings.layout,
        )));

        self.transition()?;
        if self.state.overlay.is_some() {
            self.bus.publish(Notification::NewPage(self.state.current_page));
            self.arm_overlay_timeout();
        }
        if !self.state.paused {
            self.restart_rotation(Duration::ZERO);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), SchedulerError> {
        if self.state.paused {
            return Err(SchedulerError::AlreadyPaused);
        }
        self.state.paused = true;
        self.halt_rotation();
        info!(page = self.state.current_page, "rotation paused");
        Ok(())
    }

    fn resume(&mut self) -> Result<(), SchedulerError> {
        if !self.state.paused {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.state.paused = false;
        info!(page = self.state.current_page, "rotation resumed");
        if self.ready {
            self.restart_rotation(self.settings.rotation_delay);
        }
        Ok(())
    }

    fn enter_overlay(&mut self, name: String) -> Result<(), SchedulerError> {
        if !self.settings.layout.has_overlay(&name) {
            return Err(SchedulerError::UnknownOverlay { name });
        }

        info!(overlay = %name, "showing hidden page");
        self.state.paused = true;
        self.halt_rotation();

        self.state.overlay = Some(name);
        self.timers.cancel(TimerKind::Overlay);
        if self.ready {
            self.transition()?;
            self.arm_overlay_timeout();
        }
        Ok(())
    }

    /// Arm the auto-return of the shown hidden page, if it has a timeout.
    fn arm_overlay_timeout(&mut self) {
        let timeout = self
            .state
            .overlay
            .as_deref()
            .and_then(|name| self.settings.timings.overlay_timeout(name));
        if let Some(timeout) = timeout {
            self.timers.arm_one_shot(TimerKind::Overlay, timeout, TimerAction::LeaveOverlay);
        }
    }

    fn leave_overlay(&mut self) -> Result<(), SchedulerError> {
        let Some(name) = self.state.overlay.take() else {
            return Err(SchedulerError::NotOnOverlay);
        };
        self.timers.cancel(TimerKind::Overlay);
        self.state.paused = false;
        info!(overlay = %name, page = self.state.current_page, "leaving hidden page");

        if self.ready {
            self.transition()?;
            self.restart_rotation(self.settings.rotation_delay);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    fn page_count(&self) -> Result<usize, SchedulerError> {
        match self.settings.layout.page_count() {
            0 => Err(SchedulerError::NoPages),
            count => Ok(count),
        }
    }

    fn resolve_selection(&self, page: i64) -> Result<usize, SchedulerError> {
        let count = self.page_count()?;
        match self.settings.page_bounds {
            PageBounds::Wrap => Ok(navigation::true_mod(page, count)),
            PageBounds::Reject => usize::try_from(page)
                .ok()
                .filter(|target| *target < count)
                .ok_or_else(|| SchedulerError::InvalidNavigation {
                    command: Command::Select(page).name(),
                    input: page.to_string(),
                }),
        }
    }

    fn step(&mut self, amount: i64, origin: Origin) -> Result<(), SchedulerError> {
        let count = self.page_count()?;
        let target = navigation::step(self.state.current_page, amount, count);
        self.navigate(target, origin)
    }

    fn navigate(&mut self, target: usize, origin: Origin) -> Result<(), SchedulerError> {
        // Page navigation always lands on a rotation page
        if let Some(name) = self.state.overlay.take() {
            info!(overlay = %name, "leaving hidden page for navigation");
            self.timers.cancel(TimerKind::Overlay);
            self.state.paused = false;
        }

        let previous = self.state.current_page;
        self.state.current_page = target;
        debug!(from = previous, to = target, ?origin, "page changed");

        if !self.ready {
            return Ok(());
        }

        self.transition()?;
        if !self.state.paused {
            let hold_off = match origin {
                Origin::Manual => self.settings.rotation_delay,
                Origin::Timer => Duration::ZERO,
            };
            self.restart_rotation(hold_off);
        }
        Ok(())
    }

    /// Publish a timer-generated command, then run it.
    fn relay(&mut self, command: Command) -> Result<(), SchedulerError> {
        self.bus.publish(Notification::Relay(command.clone()));
        self.apply(command, Origin::Timer)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    fn transition(&mut self) -> Result<(), SchedulerError> {
        if self.state.overlay.is_none() && self.settings.layout.is_empty() {
            return Err(SchedulerError::NoPages);
        }

        let visible = self.visible_groups();
        let half = self.settings.half_animation();
        let lock = self.settings.lock_token.as_deref();

        let outgoing = self.widgets.select(GroupFilter::WithoutAny(&visible));
        for id in &outgoing {
            self.widgets.hide(id, half, lock);
        }
        debug!(hidden = outgoing.len(), groups = ?visible, "transition started");

        self.timers.cancel(TimerKind::Reveal);
        if half.is_zero() {
            self.pending_reveal = None;
            self.reveal(&visible);
        } else {
            self.pending_reveal = Some(visible);
            self.timers.arm_one_shot(TimerKind::Reveal, half, TimerAction::Reveal);
        }

        if self.state.overlay.is_none() {
            self.bus.publish(Notification::NewPage(self.state.current_page));
        }
        Ok(())
    }

    fn reveal(&mut self, visible: &GroupSet) {
        let half = self.settings.half_animation();
        let lock = self.settings.lock_token.as_deref();

        let mut shown = 0;
        for id in self.widgets.select(GroupFilter::WithAny(visible)) {
            if self.startup_hidden.contains(&id) {
                continue;
            }
            self.widgets.show(&id, half, lock);
            shown += 1;
        }
        debug!(shown, "transition finished");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timer pipeline
    // ─────────────────────────────────────────────────────────────────────────

    fn halt_rotation(&mut self) {
        self.timers.cancel(TimerKind::Rotation);
        self.timers.cancel(TimerKind::Cooldown);
    }

    /// Restart rotation after `hold_off`, or immediately when it is zero.
    fn restart_rotation(&mut self, hold_off: Duration) {
        self.halt_rotation();
        if self.rotation_plan().is_none() {
            return;
        }
        if hold_off.is_zero() {
            self.arm_rotation();
        } else {
            self.timers.arm_one_shot(TimerKind::Cooldown, hold_off, TimerAction::EndCooldown);
        }
    }

    fn arm_rotation(&mut self) {
        match self.rotation_plan() {
            Some((interval, action)) => {
                self.timers.arm_periodic(TimerKind::Rotation, interval, action)
            }
            None => {
                self.timers.cancel(TimerKind::Rotation);
            }
        }
    }
}
