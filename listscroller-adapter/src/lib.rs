//! Host wiring for the `listscroller` crate.
//!
//! `listscroller` is UI-agnostic: it turns viewport notifications and size reports into window
//! updates. This crate connects it to a host through three small capability traits:
//!
//! - [`Viewport`]: the native scroll container (offset, size, event subscription)
//! - [`SizeObserver`]: the service that measures mounted items
//! - [`ItemHost`]: mounts and unmounts items and lays out the spacers around them
//!
//! [`ListScroller`] owns the lifecycle (`attach`, `detach`, `pause`, `resume`), maps size
//! reports from item handles back to indexes and applies every update in a fixed order.
//!
//! This crate is intentionally framework-agnostic (no DOM or toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod host;
mod observed;
mod scroller;

#[cfg(test)]
mod tests;

pub use host::{ItemHost, SizeObserver, Viewport};
pub use observed::{ItemHandle, ObservedItems};
pub use scroller::ListScroller;

pub use listscroller::{Reconcile, RenderWindow, ScrollerOptions, Size, Spacers};
