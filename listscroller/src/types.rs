/// The half-open range of item indexes currently mounted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderWindow {
    pub start: usize,
    pub end: usize, // exclusive
}

impl RenderWindow {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "RenderWindow: start > end ({start} > {end})");
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Viewport geometry. `height` is the scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub height: u32,
    pub width: u32,
}

impl Size {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }
}

/// Sizes of the layout spacers surrounding the mounted window.
///
/// `top` is the leading offset of the first mounted item (it carries the margin correction),
/// `bottom` is the estimated height of everything after the last mounted item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spacers {
    pub top: u64,
    pub bottom: u64,
}

/// Strategy used to locate an index for a scroll offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMode {
    /// Walk from the current anchor, summing real heights where known.
    Incremental,
    /// Divide the offset by the nominal height.
    Jump,
}

/// Result of [`crate::HeightModel::estimate_index_at_offset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimate {
    pub index: usize,
    /// Layout offset of `index`. May be negative while the model is inconsistent with the
    /// physical layout (the controller clamps it when placing the window).
    pub offset: i64,
    pub mode: SearchMode,
}

/// Window lifecycle phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Idle,
    /// The window moved or resized and mounted items are waiting for measurements.
    Recomputing,
    /// Every mounted item has reported a size since the last recomputation.
    Settled,
}

/// The synchronous effect of a single notification handled by the controller.
///
/// Hosts apply it in order: unmount, mount, re-observe (if `remeasure`), lay out spacers, and
/// finally move the scroll position by `scroll_adjustment`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reconcile {
    pub previous: RenderWindow,
    pub window: RenderWindow,
    /// Scroll-position nudge to apply after the layout update.
    pub scroll_adjustment: i64,
    /// Mounted items must be measured again (their width changed).
    pub remeasure: bool,
    /// The bottom of the list became visible during this update.
    pub reached_bottom: bool,
    /// The item collection was replaced: every previously mounted item is stale.
    pub replaced: bool,
}

impl Reconcile {
    pub(crate) fn unchanged(window: RenderWindow) -> Self {
        Self {
            previous: window,
            window,
            scroll_adjustment: 0,
            remeasure: false,
            reached_bottom: false,
            replaced: false,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.previous == self.window
            && self.scroll_adjustment == 0
            && !self.remeasure
            && !self.reached_bottom
            && !self.replaced
    }

    /// Folds a later update into this one.
    pub fn merge(self, later: Reconcile) -> Reconcile {
        Reconcile {
            previous: self.previous,
            window: later.window,
            scroll_adjustment: self.scroll_adjustment + later.scroll_adjustment,
            remeasure: self.remeasure || later.remeasure,
            reached_bottom: self.reached_bottom || later.reached_bottom,
            replaced: self.replaced || later.replaced,
        }
    }

    /// Indexes that were mounted before this update and must be unmounted.
    pub fn for_each_unmounted(&self, mut f: impl FnMut(usize)) {
        for i in self.previous.start..self.previous.end {
            if self.replaced || !self.window.contains(i) {
                f(i);
            }
        }
    }

    /// Indexes that must be mounted by this update.
    pub fn for_each_mounted(&self, mut f: impl FnMut(usize)) {
        for i in self.window.start..self.window.end {
            if self.replaced || !self.previous.contains(i) {
                f(i);
            }
        }
    }
}
