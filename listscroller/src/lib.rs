//! A headless windowed list virtualizer.
//!
//! For host wiring (viewport, size observer, item mounting, lifecycle), see the
//! `listscroller-adapter` crate.
//!
//! Given a long list of items whose heights are unknown or only approximately known, this crate
//! keeps a small contiguous window of items mounted, positions it where it would sit in the
//! fully rendered list, and reconciles its height estimates with real sizes as they are
//! reported:
//!
//! - [`HeightModel`]: nominal height, sparse measured heights, cumulative queries, the margin
//!   correction and the offset → index search (incremental walk or jump).
//! - [`WindowController`]: the render window, overscan sizing, scroll stabilization nudges,
//!   throttled scroll/resize handling and the bottom-reached signal.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - viewport size and scroll offset (relative to the top of the list)
//! - measured item heights once items are mounted
//! - a clock (`now_ms`) for throttling
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod fenwick;
mod height;
mod options;
mod table;
mod throttle;
mod types;


pub use controller::WindowController;
pub use height::{HeightModel, MIN_HEIGHT, Recorded};
pub use options::{DEFAULT_THROTTLE_MS, OnBottomReachedCallback, ScrollerOptions};
pub use throttle::Throttle;
pub use types::{Estimate, Phase, Reconcile, RenderWindow, SearchMode, Size, Spacers};
