//! Tests for TimerSet arming, cancellation and stale-event filtering
//!
//! All tests run on a paused clock; awaiting a receiver auto-advances time
//! to the next timer deadline.

use std::time::Duration;

use tokio::time::{self, Instant};

use super::{TimerAction, TimerEvent, TimerKind, TimerSet};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[tokio::test(start_paused = true)]
async fn one_shot_fires_once_after_delay() {
    let (mut timers, mut rx) = TimerSet::channel();
    let start = Instant::now();

    timers.arm_one_shot(TimerKind::Cooldown, ms(250), TimerAction::EndCooldown);
    let event = rx.recv().await.unwrap();

    assert_eq!(start.elapsed(), ms(250));
    assert_eq!(event.kind, TimerKind::Cooldown);
    assert_eq!(timers.accept(event), Some(TimerAction::EndCooldown));

    // The one-shot slot is cleared once accepted
    assert!(!timers.is_armed(TimerKind::Cooldown));
    assert_eq!(timers.accept(event), None);
}

#[tokio::test(start_paused = true)]
async fn periodic_fires_every_interval() {
    let (mut timers, mut rx) = TimerSet::channel();
    let start = Instant::now();

    timers.arm_periodic(TimerKind::Rotation, ms(1000), TimerAction::Advance);

    for tick in 1..=3u64 {
        let event = rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), ms(1000 * tick));
        assert_eq!(timers.accept(event), Some(TimerAction::Advance));
    }
    assert!(timers.is_armed(TimerKind::Rotation));
    assert_eq!(timers.period(TimerKind::Rotation), Some(ms(1000)));
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_delivery() {
    let (mut timers, mut rx) = TimerSet::channel();

    timers.arm_periodic(TimerKind::Rotation, ms(100), TimerAction::Advance);
    assert!(timers.cancel(TimerKind::Rotation));
    assert!(!timers.cancel(TimerKind::Rotation));

    time::advance(ms(1000)).await;
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn rearming_replaces_previous_timer() {
    let (mut timers, mut rx) = TimerSet::channel();
    let start = Instant::now();

    timers.arm_one_shot(TimerKind::Overlay, ms(100), TimerAction::LeaveOverlay);
    timers.arm_one_shot(TimerKind::Overlay, ms(500), TimerAction::LeaveOverlay);

    let event = rx.recv().await.unwrap();
    assert_eq!(start.elapsed(), ms(500));
    assert_eq!(timers.accept(event), Some(TimerAction::LeaveOverlay));
}

#[tokio::test(start_paused = true)]
async fn event_from_replaced_timer_is_stale() {
    let (mut timers, mut rx) = TimerSet::channel();

    timers.arm_one_shot(TimerKind::Cooldown, ms(100), TimerAction::EndCooldown);
    let fired = rx.recv().await.unwrap();

    // Re-armed after the first one already fired but before it was handled
    timers.arm_one_shot(TimerKind::Cooldown, ms(100), TimerAction::EndCooldown);
    assert_eq!(timers.accept(fired), None);
    assert!(timers.is_armed(TimerKind::Cooldown));

    let fresh = rx.recv().await.unwrap();
    assert_ne!(fresh.ticket, fired.ticket);
    assert_eq!(timers.accept(fresh), Some(TimerAction::EndCooldown));
}

#[tokio::test(start_paused = true)]
async fn event_after_cancel_is_stale() {
    let (mut timers, mut rx) = TimerSet::channel();

    timers.arm_periodic(TimerKind::Rotation, ms(100), TimerAction::Advance);
    let fired = rx.recv().await.unwrap();
    timers.cancel(TimerKind::Rotation);

    assert_eq!(timers.accept(fired), None);
}

#[tokio::test(start_paused = true)]
async fn kinds_are_independent() {
    let (mut timers, mut rx) = TimerSet::channel();

    timers.arm_periodic(TimerKind::Rotation, ms(300), TimerAction::Advance);
    timers.arm_one_shot(TimerKind::Overlay, ms(100), TimerAction::LeaveOverlay);
    timers.cancel(TimerKind::Overlay);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind, TimerKind::Rotation);
    assert_eq!(
        timers.armed(),
        vec![(TimerKind::Rotation, ms(300))]
    );
}

#[tokio::test(start_paused = true)]
async fn zero_interval_periodic_is_not_armed() {
    let (mut timers, _rx) = TimerSet::channel();
    timers.arm_periodic(TimerKind::Rotation, Duration::ZERO, TimerAction::Advance);
    assert!(!timers.is_armed(TimerKind::Rotation));
}

#[tokio::test(start_paused = true)]
async fn cancel_all_and_drop_stop_everything() {
    let (mut timers, mut rx) = TimerSet::channel();
    timers.arm_periodic(TimerKind::Rotation, ms(100), TimerAction::Advance);
    timers.arm_one_shot(TimerKind::Reveal, ms(50), TimerAction::Reveal);
    timers.cancel_all();
    assert!(timers.armed().is_empty());

    timers.arm_periodic(TimerKind::Rotation, ms(100), TimerAction::Advance);
    drop(timers);

    time::advance(ms(1000)).await;
    tokio::task::yield_now().await;
    // Sender side is gone with the set and its aborted tasks
    assert_eq!(rx.recv().await, None::<TimerEvent>);
}
