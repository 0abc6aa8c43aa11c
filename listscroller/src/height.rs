use alloc::vec::Vec;
use core::ops::Range;

use crate::fenwick::Fenwick;
use crate::table::HeightTable;
use crate::{Estimate, SearchMode};

/// Lower bound for every height used in division or stepping.
pub const MIN_HEIGHT: u32 = 1;

/// Outcome of [`HeightModel::record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    /// The index already had exactly this height (or is out of range).
    Unchanged,
    /// `height_of(index)` changed by `delta`.
    Updated { delta: i64 },
}

/// Per-item height bookkeeping for a virtualized list.
///
/// Items without a measurement are assumed to have the nominal height. Measured heights are kept
/// in a sparse table; two Fenwick trees (sum of measured heights, number of measured entries)
/// make cumulative queries `O(log n)` regardless of how many items were measured.
///
/// The model also owns the layout anchor of the render window: the index of its first item and
/// the leading offset at which that item is laid out. The difference between the leading offset
/// and `nominal × start` is the margin.
#[derive(Clone, Debug)]
pub struct HeightModel {
    count: usize,
    configured: Option<u32>,
    nominal: Option<u32>,
    fallback: u32,
    table: HeightTable,
    measured_sum: Fenwick,
    measured_count: Fenwick,

    start: usize,
    leading: u64,

    jump_threshold_items: usize,
}

impl HeightModel {
    /// Creates a model for `count` items.
    ///
    /// When `nominal` is `None`, `fallback` is used until the first measurement arrives, which
    /// then becomes the nominal height.
    pub fn new(count: usize, nominal: Option<u32>, fallback: u32) -> Self {
        Self {
            count,
            configured: nominal,
            nominal,
            fallback,
            table: HeightTable::new(),
            measured_sum: Fenwick::new(count),
            measured_count: Fenwick::new(count),
            start: 0,
            leading: 0,
            jump_threshold_items: 8,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn nominal_height(&self) -> u32 {
        self.nominal.unwrap_or(self.fallback).max(MIN_HEIGHT)
    }

    /// Whether the nominal height is known (configured or derived), as opposed to the fallback.
    pub fn has_nominal_height(&self) -> bool {
        self.nominal.is_some()
    }

    pub fn set_fallback_height(&mut self, fallback: u32) {
        self.fallback = fallback;
    }

    pub fn jump_threshold_items(&self) -> usize {
        self.jump_threshold_items
    }

    pub fn set_jump_threshold_items(&mut self, items: usize) {
        self.jump_threshold_items = items;
    }

    /// Scroll distance (in pixels) above which index lookup switches to jump mode.
    pub fn jump_threshold(&self) -> u64 {
        (self.jump_threshold_items as u64).saturating_mul(self.nominal_height() as u64)
    }

    pub fn height_of(&self, index: usize) -> u32 {
        if index >= self.count {
            return 0;
        }
        self.table
            .get(&index)
            .copied()
            .unwrap_or_else(|| self.nominal_height())
    }

    pub fn measured(&self, index: usize) -> Option<u32> {
        self.table.get(&index).copied()
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.table.contains_key(&index)
    }

    /// Number of entries in the height table.
    pub fn measured_len(&self) -> usize {
        self.table.len()
    }

    /// Number of measured entries in `[from, to)`.
    pub fn measured_in(&self, from: usize, to: usize) -> usize {
        let to = to.min(self.count);
        self.measured_count.range_sum(from, to) as usize
    }

    /// Mean of the measured heights in `[from, to)`, if any item there was measured.
    pub fn mean_measured_height(&self, from: usize, to: usize) -> Option<u32> {
        let to = to.min(self.count);
        let n = self.measured_count.range_sum(from, to);
        if n == 0 {
            return None;
        }
        let sum = self.measured_sum.range_sum(from, to);
        Some(((sum + n / 2) / n) as u32)
    }

    /// Stores a measured height.
    ///
    /// Re-reporting the same value is a no-op. The first measurement derives the nominal height
    /// when none was configured.
    pub fn record(&mut self, index: usize, height: u32) -> Recorded {
        if index >= self.count {
            lwarn!(index, count = self.count, "HeightModel::record: index out of range");
            return Recorded::Unchanged;
        }
        let previous = self.height_of(index);
        match self.table.insert(index, height) {
            Some(old) if old == height => return Recorded::Unchanged,
            Some(old) => {
                self.measured_sum.add(index, height as i64 - old as i64);
            }
            None => {
                self.measured_sum.add(index, height as i64);
                self.measured_count.add(index, 1);
                if self.nominal.is_none() {
                    ldebug!(height, "HeightModel: nominal height derived from first measurement");
                    self.nominal = Some(height.max(MIN_HEIGHT));
                }
            }
        }
        lstrace!(index, height, previous, "HeightModel::record");
        Recorded::Updated {
            delta: height as i64 - previous as i64,
        }
    }

    /// Drops the measurements in `range`, returning what was removed.
    pub fn forget(&mut self, range: Range<usize>) -> Vec<(usize, u32)> {
        let mut removed = Vec::new();
        for index in range.start..range.end.min(self.count) {
            if let Some(old) = self.table.remove(&index) {
                self.measured_sum.add(index, -(old as i64));
                self.measured_count.add(index, -1);
                removed.push((index, old));
            }
        }
        removed
    }

    /// Sum of `height_of` over `[from, to)`.
    pub fn cumulative_height(&self, from: usize, to: usize) -> u64 {
        let to = to.min(self.count);
        if to <= from {
            return 0;
        }
        let n = (to - from) as u64;
        let measured = self.measured_count.range_sum(from, to);
        let sum = self.measured_sum.range_sum(from, to);
        (self.nominal_height() as u64)
            .saturating_mul(n - measured)
            .saturating_add(sum)
    }

    /// Accumulated difference between measured and nominal heights before `up_to`.
    ///
    /// Unmeasured items contribute nothing (they are assumed to be nominal).
    pub fn recompute_margin(&self, up_to: usize) -> i64 {
        let up_to = up_to.min(self.count);
        let sum = self.measured_sum.prefix_sum(up_to) as i64;
        let measured = self.measured_count.prefix_sum(up_to) as i64;
        sum - measured * self.nominal_height() as i64
    }

    /// Index of the first item of the render window.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Layout offset of the first item of the render window (the top spacer).
    pub fn leading_offset(&self) -> u64 {
        self.leading
    }

    /// `leading_offset - nominal × start`.
    pub fn margin(&self) -> i64 {
        self.leading as i64 - self.start as i64 * self.nominal_height() as i64
    }

    /// Estimated height of the whole list.
    ///
    /// Everything before the window is represented by the leading offset; everything from the
    /// window on uses measured heights where known.
    pub fn total_height(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        self.leading
            .saturating_add(self.cumulative_height(self.start, self.count))
    }

    /// Locates the item laid out at `offset`.
    ///
    /// When `offset` is within the jump threshold of `previous_offset`, walks from the current
    /// anchor using real heights (exact). Otherwise divides by the nominal height (approximate,
    /// `O(1)`); the returned item then spans `offset` unless `offset` lies past the last item.
    pub fn estimate_index_at_offset(&self, offset: u64, previous_offset: u64) -> Estimate {
        if self.count == 0 {
            return Estimate {
                index: 0,
                offset: 0,
                mode: SearchMode::Jump,
            };
        }
        if offset.abs_diff(previous_offset) > self.jump_threshold() {
            self.jump_to(offset)
        } else {
            self.walk_to(offset)
        }
    }

    pub(crate) fn walk_to(&self, offset: u64) -> Estimate {
        let target = offset.min(i64::MAX as u64) as i64;
        let mut index = self.start.min(self.count.saturating_sub(1));
        let mut pos = self.leading as i64;
        if target >= pos {
            while index + 1 < self.count {
                let h = self.height_of(index) as i64;
                if pos + h > target {
                    break;
                }
                pos += h;
                index += 1;
            }
        } else {
            while index > 0 && pos > target {
                index -= 1;
                pos -= self.height_of(index) as i64;
            }
        }
        Estimate {
            index,
            offset: pos,
            mode: SearchMode::Incremental,
        }
    }

    /// Divides by the nominal height.
    ///
    /// The layout offset uses the corrections learned before the index when the item laid out
    /// there still spans `offset`; otherwise the item is placed at `offset` itself.
    pub(crate) fn jump_to(&self, offset: u64) -> Estimate {
        let nominal = self.nominal_height() as u64;
        let index = ((offset / nominal) as usize).min(self.count.saturating_sub(1));
        let target = offset.min(i64::MAX as u64) as i64;
        let modeled = (index as u64 * nominal) as i64 + self.recompute_margin(index);
        let spans = modeled <= target && target < modeled + self.height_of(index) as i64;
        let pos = if spans || index + 1 == self.count {
            modeled.clamp(0, target)
        } else {
            target
        };
        Estimate {
            index,
            offset: pos,
            mode: SearchMode::Jump,
        }
    }

    /// Walks `items` steps back from `index` laid out at `offset`.
    pub fn step_back(&self, mut index: usize, mut offset: i64, items: usize) -> (usize, i64) {
        for _ in 0..items {
            if index == 0 {
                break;
            }
            index -= 1;
            offset -= self.height_of(index) as i64;
        }
        (index, offset)
    }

    /// Anchors the window at `start`, laid out at `offset`.
    ///
    /// The leading offset can never be negative and is exactly zero for the first item. Returns
    /// the difference between the enforced and the requested offset: the scroll nudge that keeps
    /// the mounted items where they appear.
    pub fn place(&mut self, start: usize, offset: i64) -> i64 {
        let start = start.min(self.count.saturating_sub(1));
        let forced = if start == 0 { 0 } else { offset.max(0) };
        self.start = start;
        self.leading = forced as u64;
        forced - offset
    }

    /// Moves the leading offset by `delta`, returning how far the mounted items actually moved.
    pub fn shift_leading(&mut self, delta: i64) -> i64 {
        let old = self.leading as i64;
        self.place(self.start, old + delta);
        self.leading as i64 - old
    }

    /// Scales the nominal height, the leading offset and every measurement by `num / den`.
    pub fn rescale(&mut self, num: u64, den: u64) {
        if den == 0 || num == den {
            return;
        }
        let scale = |v: u64| -> u64 {
            ((v as u128 * num as u128 + den as u128 / 2) / den as u128).min(u64::MAX as u128) as u64
        };
        if let Some(nominal) = self.nominal {
            self.nominal = Some((scale(nominal as u64) as u32).max(MIN_HEIGHT));
        }
        self.leading = if self.start == 0 { 0 } else { scale(self.leading) };
        for h in self.table.values_mut() {
            *h = scale(*h as u64).min(u32::MAX as u64) as u32;
        }
        self.rebuild_sums();
        ldebug!(num, den, nominal = self.nominal_height(), "HeightModel::rescale");
    }

    /// Adjusts to a new item count, dropping measurements past the end.
    pub fn set_count(&mut self, count: usize) {
        if count == self.count {
            return;
        }
        if count < self.count {
            self.table.retain(|&i, _| i < count);
        }
        self.count = count;
        self.measured_sum.resize(count);
        self.measured_count.resize(count);
        if self.start >= count {
            self.start = count.saturating_sub(1);
            if count == 0 {
                self.leading = 0;
            }
        }
    }

    /// Forgets everything learned, as if the model was just created for `count` items.
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.nominal = self.configured;
        self.table.clear();
        self.measured_sum = Fenwick::new(count);
        self.measured_count = Fenwick::new(count);
        self.start = 0;
        self.leading = 0;
    }

    fn rebuild_sums(&mut self) {
        let mut sums = alloc::vec![0u64; self.count];
        let mut counts = alloc::vec![0u64; self.count];
        for (&i, &h) in self.table.iter() {
            sums[i] = h as u64;
            counts[i] = 1;
        }
        self.measured_sum = Fenwick::from_values(&sums);
        self.measured_count = Fenwick::from_values(&counts);
        debug_assert_eq!(self.measured_count.total() as usize, self.table.len());
    }
}
