use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// A timer slot. At most one timer of each kind is armed at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Repeating page advance or idle return home.
    Rotation,
    /// Hold-off after manual navigation before rotation restarts.
    Cooldown,
    /// Auto-return timeout of a hidden page.
    Overlay,
    /// Second half of a transition: show the new page.
    Reveal,
}

/// What the scheduler does when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Advance,
    ReturnHome,
    EndCooldown,
    LeaveOverlay,
    Reveal,
}

/// Sent by a timer task each time it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub kind: TimerKind,
    pub ticket: u64,
}

#[derive(Debug)]
struct ArmedTimer {
    ticket: u64,
    period: Duration,
    action: TimerAction,
    repeating: bool,
    task: JoinHandle<()>,
}

/// Owns every armed timer task.
///
/// Arming a kind replaces whatever was armed under it. Dropping the set
/// aborts every task. Arming spawns onto the current tokio runtime.
#[derive(Debug)]
pub struct TimerSet {
    events: mpsc::UnboundedSender<TimerEvent>,
    armed: HashMap<TimerKind, ArmedTimer>,
    next_ticket: u64,
}

impl TimerSet {
    pub fn new(events: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            events,
            armed: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// A set together with the receiver its events arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Fire `action` every `interval`, first after one full interval.
    pub fn arm_periodic(&mut self, kind: TimerKind, interval: Duration, action: TimerAction) {
        self.cancel(kind);
        if interval.is_zero() {
            warn!(?kind, "refusing to arm a zero-length periodic timer");
            return;
        }

        let ticket = self.issue_ticket();
        let event = TimerEvent { kind, ticket };
        let events = self.events.clone();
        let first = Instant::now() + interval;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(first, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.send(event).is_err() {
                    break;
                }
            }
        });

        debug!(?kind, ?action, ?interval, ticket, "armed periodic timer");
        self.armed.insert(
            kind,
            ArmedTimer {
                ticket,
                period: interval,
                action,
                repeating: true,
                task,
            },
        );
    }

    /// Fire `action` once after `delay`.
    pub fn arm_one_shot(&mut self, kind: TimerKind, delay: Duration, action: TimerAction) {
        self.cancel(kind);

        let ticket = self.issue_ticket();
        let events = self.events.clone();
        let deadline = Instant::now() + delay;

        let task = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            let _ = events.send(TimerEvent { kind, ticket });
        });

        debug!(?kind, ?action, ?delay, ticket, "armed one-shot timer");
        self.armed.insert(
            kind,
            ArmedTimer {
                ticket,
                period: delay,
                action,
                repeating: false,
                task,
            },
        );
    }

    /// Cancel the timer of `kind`. Returns whether one was armed.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        match self.armed.remove(&kind) {
            Some(timer) => {
                timer.task.abort();
                debug!(?kind, ticket = timer.ticket, "cancelled timer");
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, timer) in self.armed.drain() {
            timer.task.abort();
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }

    /// Interval or delay of the armed timer of `kind`.
    pub fn period(&self, kind: TimerKind) -> Option<Duration> {
        self.armed.get(&kind).map(|t| t.period)
    }

    /// Armed timers sorted by kind.
    pub fn armed(&self) -> Vec<(TimerKind, Duration)> {
        let mut armed: Vec<_> = self.armed.iter().map(|(k, t)| (*k, t.period)).collect();
        armed.sort_by_key(|(kind, _)| *kind);
        armed
    }

    /// Validate a fired event against the armed slot. Returns the action to
    /// run, or `None` for a stale event. One-shot slots are cleared.
    pub fn accept(&mut self, event: TimerEvent) -> Option<TimerAction> {
        let timer = self.armed.get(&event.kind)?;
        if timer.ticket != event.ticket {
            return None;
        }
        let action = timer.action;
        if !timer.repeating {
            self.armed.remove(&event.kind);
        }
        Some(action)
    }

    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
