//! Timer system
//!
//! This module provides:
//! - **Kinds**: the four timer slots the scheduler uses
//! - **Actions**: what the scheduler does when an armed timer fires
//! - **TimerSet**: owner of every armed timer task
//!
//! # Staleness
//!
//! Each arming gets a fresh ticket. Fired events carry the ticket, and
//! [`TimerSet::accept`] drops events whose ticket no longer matches the armed
//! slot, so a timer cancelled or replaced after it already fired can never
//! act twice.

mod set;

pub use set::{TimerAction, TimerEvent, TimerKind, TimerSet};

#[cfg(test)]
mod set_tests;
