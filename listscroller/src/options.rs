use alloc::sync::Arc;

use crate::WindowController;

/// A callback fired when the bottom of the list becomes visible.
pub type OnBottomReachedCallback = Arc<dyn Fn(&WindowController) + Send + Sync>;

/// Scroll/resize notifications are coalesced to one per display refresh.
pub const DEFAULT_THROTTLE_MS: u64 = 17;

/// Configuration for [`crate::WindowController`].
///
/// Cheap to clone: the callback is stored in an `Arc`.
#[derive(Clone)]
pub struct ScrollerOptions {
    pub count: usize,

    /// Estimated height of an item that has not been measured yet.
    ///
    /// When `None`, the first measured item defines it.
    pub nominal_height: Option<u32>,

    /// Height assumed before any nominal height is known. Defaults to the viewport height.
    pub fallback_height: Option<u32>,

    /// Screens of content kept mounted beyond each edge of the viewport.
    pub overscan_pages: usize,

    /// Scroll distance, in nominal item heights, above which index lookup stops walking and
    /// divides by the nominal height instead.
    ///
    /// Defaults to two pages worth of items.
    pub jump_threshold_items: Option<usize>,

    /// Coalescing interval for scroll and resize notifications.
    pub throttle_ms: u64,

    pub on_bottom_reached: Option<OnBottomReachedCallback>,
}

impl ScrollerOptions {
    /// Creates options for `count` items estimated at `nominal_height` pixels each.
    pub fn new(count: usize, nominal_height: u32) -> Self {
        Self {
            nominal_height: Some(nominal_height),
            ..Self::measured(count)
        }
    }

    /// Creates options for `count` items whose nominal height is taken from the first
    /// measurement.
    pub fn measured(count: usize) -> Self {
        Self {
            count,
            nominal_height: None,
            fallback_height: None,
            overscan_pages: 1,
            jump_threshold_items: None,
            throttle_ms: DEFAULT_THROTTLE_MS,
            on_bottom_reached: None,
        }
    }

    pub fn with_nominal_height(mut self, nominal_height: Option<u32>) -> Self {
        self.nominal_height = nominal_height;
        self
    }

    pub fn with_fallback_height(mut self, fallback_height: Option<u32>) -> Self {
        self.fallback_height = fallback_height;
        self
    }

    pub fn with_overscan_pages(mut self, overscan_pages: usize) -> Self {
        self.overscan_pages = overscan_pages;
        self
    }

    pub fn with_jump_threshold_items(mut self, items: Option<usize>) -> Self {
        self.jump_threshold_items = items;
        self
    }

    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    pub fn with_on_bottom_reached(
        mut self,
        on_bottom_reached: Option<impl Fn(&WindowController) + Send + Sync + 'static>,
    ) -> Self {
        self.on_bottom_reached = on_bottom_reached.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ScrollerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollerOptions")
            .field("count", &self.count)
            .field("nominal_height", &self.nominal_height)
            .field("fallback_height", &self.fallback_height)
            .field("overscan_pages", &self.overscan_pages)
            .field("jump_threshold_items", &self.jump_threshold_items)
            .field("throttle_ms", &self.throttle_ms)
            .finish_non_exhaustive()
    }
}
