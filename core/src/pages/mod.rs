//! Page model
//!
//! This module provides:
//! - **Layout**: the immutable pages, fixed tags and hidden pages
//! - **Navigation**: wraparound arithmetic over page indices
//! - **Timing**: typed lookups into the rotation timing table

mod layout;
pub mod navigation;
mod timing;

pub use layout::{GroupSet, PageLayout};
pub use timing::{PageKey, TimingTable};
