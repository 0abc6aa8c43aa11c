use alloc::vec::Vec;

use crate::height::{MIN_HEIGHT, Recorded};
use crate::throttle::Throttle;
use crate::{
    HeightModel, Phase, Reconcile, RenderWindow, ScrollerOptions, SearchMode, Size, Spacers,
};

/// Measurements invalidated by a width change, waiting for their replacements.
#[derive(Clone, Debug)]
struct PendingRescale {
    previous: Vec<(usize, u32)>, // sorted by index
    /// Reports taken at the new width while waiting; the rescale must not touch them.
    fresh: Vec<(usize, u32)>,
    /// First visible item when the width changed.
    anchor_index: usize,
}

impl PendingRescale {
    fn previous_height(&self, index: usize) -> Option<u32> {
        self.previous
            .binary_search_by_key(&index, |&(i, _)| i)
            .ok()
            .map(|pos| self.previous[pos].1)
    }
}

/// Owns the render window of a virtualized list and keeps it consistent with the viewport.
///
/// This type holds no UI objects. The host feeds it viewport notifications (scroll, resize),
/// size reports for mounted items and data changes; every handler returns a [`Reconcile`]
/// describing what to mount, unmount and how far to nudge the scroll position.
///
/// Scroll offsets are relative to the top of the list.
#[derive(Clone, Debug)]
pub struct WindowController {
    options: ScrollerOptions,
    heights: HeightModel,
    window: RenderWindow,
    viewport: Size,
    scroll_offset: u64,

    phase: Phase,
    at_bottom: bool,
    attached: bool,
    paused: bool,
    needs_layout: bool,
    adjustment: i64,

    scroll_events: Throttle<u64>,
    resize_events: Throttle<Size>,
    rescale: Option<PendingRescale>,
}

impl WindowController {
    pub fn new(options: ScrollerOptions) -> Self {
        let heights = HeightModel::new(
            options.count,
            options.nominal_height,
            options.fallback_height.unwrap_or(0),
        );
        ldebug!(
            count = options.count,
            nominal_height = options.nominal_height,
            overscan_pages = options.overscan_pages,
            "WindowController::new"
        );
        Self {
            heights,
            window: RenderWindow::EMPTY,
            viewport: Size::default(),
            scroll_offset: 0,
            phase: Phase::Idle,
            at_bottom: false,
            attached: false,
            paused: false,
            needs_layout: true,
            adjustment: 0,
            scroll_events: Throttle::new(options.throttle_ms),
            resize_events: Throttle::new(options.throttle_ms),
            rescale: None,
            options,
        }
    }

    pub fn options(&self) -> &ScrollerOptions {
        &self.options
    }

    pub fn heights(&self) -> &HeightModel {
        &self.heights
    }

    pub fn count(&self) -> usize {
        self.heights.count()
    }

    pub fn current_window(&self) -> RenderWindow {
        self.window
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The last processed scroll offset, including nudges handed out in [`Reconcile`]s.
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the bottom signal fired and has not re-armed yet.
    ///
    /// It re-arms once the window no longer reaches the last item.
    pub fn is_at_bottom(&self) -> bool {
        self.at_bottom
    }

    pub fn total_height(&self) -> u64 {
        self.heights.total_height()
    }

    pub fn margin(&self) -> i64 {
        self.heights.margin()
    }

    pub fn leading_offset(&self) -> u64 {
        self.heights.leading_offset()
    }

    pub fn spacers(&self) -> Spacers {
        Spacers {
            top: self.heights.leading_offset(),
            bottom: self
                .heights
                .cumulative_height(self.window.end, self.heights.count()),
        }
    }

    /// Layout offset of `index`, if it is mounted.
    pub fn item_offset(&self, index: usize) -> Option<u64> {
        self.window.contains(index).then(|| {
            self.heights
                .leading_offset()
                .saturating_add(self.heights.cumulative_height(self.window.start, index))
        })
    }

    /// Items needed to cover one viewport height with the current estimates.
    ///
    /// The estimate is the mean measured height of the mounted items, or the nominal height
    /// when none of them was measured yet.
    pub fn page_len(&self) -> usize {
        if self.viewport.height == 0 || self.viewport.width == 0 {
            return 0;
        }
        let page_height = self
            .heights
            .mean_measured_height(self.window.start, self.window.end)
            .unwrap_or_else(|| self.heights.nominal_height())
            .max(MIN_HEIGHT);
        self.viewport.height.div_ceil(page_height) as usize
    }

    /// Number of items the window holds: the visible page plus the overscan pages.
    pub fn window_len(&self) -> usize {
        let page = self.page_len();
        if page == 0 {
            return 1;
        }
        page.saturating_mul(1 + 2 * self.options.overscan_pages)
    }

    fn overscan_len(&self) -> usize {
        self.page_len().saturating_mul(self.options.overscan_pages)
    }

    /// Applies a scroll offset immediately.
    ///
    /// Returns an empty update when `offset` is the last processed offset, so feeding back the
    /// host's own nudges is harmless.
    pub fn on_scroll(&mut self, offset: u64) -> Reconcile {
        if offset == self.scroll_offset && !self.needs_layout {
            return Reconcile::unchanged(self.window);
        }
        lstrace!(offset, previous = self.scroll_offset, "WindowController::on_scroll");
        let previous = self.window;
        let previous_offset = self.scroll_offset;
        self.scroll_offset = offset;
        self.reposition(offset, previous_offset);
        self.finish(previous, false)
    }

    /// Applies a viewport size change immediately.
    ///
    /// The window keeps its start and only changes length. When the width changes, the mounted
    /// items' measurements are dropped and the host is asked to measure them again; once their
    /// new sizes arrive the whole model is rescaled proportionally.
    pub fn on_resize(&mut self, size: Size) -> Reconcile {
        if size == self.viewport && !self.needs_layout {
            return Reconcile::unchanged(self.window);
        }
        ldebug!(
            height = size.height,
            width = size.width,
            "WindowController::on_resize"
        );
        let previous = self.window;
        let width_changed = self.viewport.width != 0 && size.width != self.viewport.width;
        self.set_viewport(size);

        if self.needs_layout {
            self.reposition(self.scroll_offset, self.scroll_offset);
            return self.finish(previous, false);
        }

        let mut remeasure = false;
        if width_changed && !self.window.is_empty() {
            remeasure = self.invalidate_window();
        }
        self.resize_window();
        self.finish(previous, remeasure)
    }

    /// Applies a single size report.
    pub fn on_size_report(&mut self, index: usize, height: u32) -> Reconcile {
        self.on_size_reports([(index, height)])
    }

    /// Applies a batch of size reports, in order.
    ///
    /// Reports never move the window start. A changed height before the window shifts the
    /// leading offset; a changed height laid out above the viewport top nudges the scroll
    /// position by the same amount so visible content stays put. Reports for items past the
    /// window only update the height table.
    pub fn on_size_reports(
        &mut self,
        reports: impl IntoIterator<Item = (usize, u32)>,
    ) -> Reconcile {
        let previous = self.window;
        let mut remeasured: Vec<(usize, u32, u32)> = Vec::new();
        let mut changed = false;

        for (index, height) in reports {
            if index >= self.heights.count() {
                lwarn!(index, count = self.heights.count(), "size report out of range");
                continue;
            }
            if let Some(pending) = self.rescale.as_mut() {
                if let Some(old) = pending.previous_height(index) {
                    remeasured.retain(|&(i, _, _)| i != index);
                    remeasured.push((index, old, height));
                    changed = true;
                    continue;
                }
                pending.fresh.retain(|&(i, _)| i != index);
                pending.fresh.push((index, height));
            }
            changed |= self.apply_report(index, height);
        }

        if !remeasured.is_empty() {
            self.resolve_rescale(remeasured);
        }
        if changed {
            self.resize_window();
        }
        self.finish(previous, false)
    }

    fn apply_report(&mut self, index: usize, height: u32) -> bool {
        let item_offset = self.item_offset(index);
        let Recorded::Updated { delta } = self.heights.record(index, height) else {
            return false;
        };
        lstrace!(index, height, delta, "WindowController::apply_report");
        if index < self.window.start {
            let moved = self.heights.shift_leading(delta);
            self.nudge(moved);
        } else if item_offset.is_some_and(|off| off < self.scroll_offset) {
            self.nudge(delta);
        }
        true
    }

    /// Queues a scroll notification; it is applied by a later [`Self::tick`].
    pub fn on_scroll_event(&mut self, offset: u64, now_ms: u64) {
        if self.paused || !self.attached {
            return;
        }
        self.scroll_events.push(offset, now_ms);
    }

    /// Queues a resize notification; it is applied by a later [`Self::tick`].
    pub fn on_resize_event(&mut self, size: Size, now_ms: u64) {
        if self.paused || !self.attached {
            return;
        }
        self.resize_events.push(size, now_ms);
    }

    /// Earliest time at which [`Self::tick`] has queued work to apply.
    pub fn next_tick_ms(&self) -> Option<u64> {
        match (self.scroll_events.due_ms(), self.resize_events.due_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Applies queued notifications whose throttle interval elapsed.
    pub fn tick(&mut self, now_ms: u64) -> Option<Reconcile> {
        if self.phase == Phase::Settled {
            self.phase = Phase::Idle;
        }
        let resize = self.resize_events.poll(now_ms);
        let scroll = self.scroll_events.poll(now_ms);

        let mut out: Option<Reconcile> = None;
        if let Some(size) = resize {
            let r = self.on_resize(size);
            out = Some(r);
        }
        if let Some(offset) = scroll {
            let r = self.on_scroll(offset);
            out = Some(match out {
                Some(prev) => prev.merge(r),
                None => r,
            });
        }
        out
    }

    /// Starts driving the window from the given viewport state.
    pub fn on_attach(&mut self, offset: u64, size: Size) -> Reconcile {
        ldebug!(offset, height = size.height, width = size.width, "WindowController::on_attach");
        let previous = self.window;
        self.attached = true;
        self.paused = false;
        self.needs_layout = true;
        self.set_viewport(size);
        self.scroll_offset = offset;
        let anchor = self.heights.leading_offset();
        self.reposition(offset, anchor);
        self.finish(previous, false)
    }

    /// Stops driving the window; every mounted item must be unmounted.
    ///
    /// Learned heights are kept for a later [`Self::on_attach`].
    pub fn on_detach(&mut self) -> Reconcile {
        ldebug!("WindowController::on_detach");
        let previous = self.window;
        self.attached = false;
        self.paused = false;
        self.scroll_events.clear();
        self.resize_events.clear();
        self.rescale = None;
        self.window = RenderWindow::EMPTY;
        self.needs_layout = true;
        self.phase = Phase::Idle;
        Reconcile {
            previous,
            ..Reconcile::unchanged(self.window)
        }
    }

    /// Suspends event handling without touching the window.
    pub fn on_pause(&mut self) {
        ldebug!("WindowController::on_pause");
        self.paused = true;
        self.scroll_events.clear();
        self.resize_events.clear();
    }

    /// Resumes event handling and re-synchronizes with the current viewport.
    ///
    /// When neither the offset nor the size changed while paused, this is a no-op.
    pub fn on_resume(&mut self, offset: u64, size: Size) -> Reconcile {
        ldebug!(offset, "WindowController::on_resume");
        self.paused = false;
        let resized = self.on_resize(size);
        let scrolled = self.on_scroll(offset);
        resized.merge(scrolled)
    }

    /// Replaces the item collection. Everything learned about the old items is dropped.
    pub fn replace_items(&mut self, count: usize) -> Reconcile {
        ldebug!(count, "WindowController::replace_items");
        let previous = self.window;
        self.options.count = count;
        self.heights.reset(count);
        self.rescale = None;
        self.at_bottom = false;
        self.needs_layout = true;
        self.window = RenderWindow::EMPTY;
        self.reposition(self.scroll_offset, 0);
        let mut out = self.finish(previous, false);
        out.replaced = true;
        out
    }

    /// Changes the number of items without changing their identity.
    pub fn set_item_count(&mut self, count: usize) -> Reconcile {
        if count == self.heights.count() {
            return Reconcile::unchanged(self.window);
        }
        ldebug!(count, previous = self.heights.count(), "WindowController::set_item_count");
        let previous = self.window;
        self.options.count = count;
        self.heights.set_count(count);
        if count == 0 {
            self.heights.place(0, 0);
            self.window = RenderWindow::EMPTY;
        } else if self.window.start >= count || self.window.is_empty() {
            self.reposition(self.scroll_offset, self.scroll_offset);
        } else {
            self.resize_window();
        }
        self.finish(previous, false)
    }

    fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
        if self.options.fallback_height.is_none() {
            self.heights.set_fallback_height(size.height);
        }
    }

    /// Moves the window so that it covers `offset`.
    fn reposition(&mut self, offset: u64, previous_offset: u64) {
        let count = self.heights.count();
        if count == 0 {
            self.heights.place(0, 0);
            self.window = RenderWindow::EMPTY;
            return;
        }
        self.sync_jump_threshold();
        let len = self.window_len();
        let estimate = self.heights.estimate_index_at_offset(offset, previous_offset);
        let (mut start, mut pos) = match estimate.mode {
            SearchMode::Incremental => {
                self.heights
                    .step_back(estimate.index, estimate.offset, self.overscan_len())
            }
            SearchMode::Jump => (estimate.index, estimate.offset),
        };
        if start + len > count {
            let back = (start + len - count).min(start);
            (start, pos) = self.heights.step_back(start, pos, back);
        }
        lstrace!(
            offset,
            index = estimate.index,
            start,
            pos,
            jump = estimate.mode == SearchMode::Jump,
            "WindowController::reposition"
        );
        let nudge = self.heights.place(start, pos);
        let visible = offset.saturating_add_signed(nudge);
        let end = self.covered_end(start, (start + len).min(count), visible);
        self.window = RenderWindow::new(start, end);
        self.nudge(nudge);
    }

    /// Recomputes the window length, keeping its start.
    fn resize_window(&mut self) {
        let count = self.heights.count();
        let start = self.window.start.min(count);
        let len = self.window_len();
        let end = self.covered_end(start, (start + len).min(count), self.scroll_offset);
        self.window = RenderWindow::new(start, end);
    }

    /// Extends `end` until the window, laid out from the leading offset, reaches the bottom of
    /// the viewport at `offset`.
    fn covered_end(&self, start: usize, mut end: usize, offset: u64) -> usize {
        let count = self.heights.count();
        let target = offset.saturating_add(self.viewport.height as u64);
        let mut bottom = self
            .heights
            .leading_offset()
            .saturating_add(self.heights.cumulative_height(start, end));
        while end < count && bottom < target {
            bottom = bottom.saturating_add(self.heights.height_of(end) as u64);
            end += 1;
        }
        end
    }

    fn invalidate_window(&mut self) -> bool {
        let anchor = self.heights.walk_to(self.scroll_offset);
        let forgotten = self.heights.forget(self.window.start..self.window.end);
        if forgotten.is_empty() {
            return false;
        }
        ldebug!(
            items = forgotten.len(),
            anchor = anchor.index,
            "width changed: re-measuring mounted items"
        );
        match &mut self.rescale {
            Some(pending) => {
                pending.previous.extend(forgotten);
                pending.previous.sort_unstable_by_key(|&(i, _)| i);
                pending.previous.dedup_by_key(|&mut (i, _)| i);
            }
            None => {
                self.rescale = Some(PendingRescale {
                    previous: forgotten,
                    fresh: Vec::new(),
                    anchor_index: anchor.index,
                });
            }
        }
        true
    }

    /// Rescales the model by the ratio between the new and the old heights of the re-measured
    /// items.
    ///
    /// The mounted items are already laid out at their new size, so only the top spacer moves
    /// with the rescale. The scroll position follows it, plus the growth of the mounted items
    /// above the first visible one. Heights reported at the new width in the meantime are
    /// restored after scaling.
    fn resolve_rescale(&mut self, remeasured: Vec<(usize, u32, u32)>) {
        let Some(pending) = self.rescale.take() else {
            return;
        };
        let old: u64 = remeasured.iter().map(|&(_, old, _)| old as u64).sum();
        let new: u64 = remeasured.iter().map(|&(_, _, new)| new as u64).sum();
        let leading_before = self.heights.leading_offset() as i64;
        if old > 0 && new > 0 {
            self.heights.rescale(new, old);
        }
        for &(index, _, height) in &remeasured {
            self.heights.record(index, height);
        }
        let mut moved = self.heights.leading_offset() as i64 - leading_before;
        for &(index, old, new) in &remeasured {
            if self.window.contains(index) && index < pending.anchor_index {
                moved += new as i64 - old as i64;
            }
        }
        for &(index, height) in &pending.fresh {
            let recorded = self.heights.record(index, height);
            if let Recorded::Updated { delta } = recorded {
                if index < self.window.start {
                    moved += self.heights.shift_leading(delta);
                }
            }
        }
        ldebug!(old, new, moved, "rescaled after width change");
        self.nudge(moved);
    }

    fn sync_jump_threshold(&mut self) {
        let items = self
            .options
            .jump_threshold_items
            .unwrap_or_else(|| 2 * self.page_len().max(1));
        self.heights.set_jump_threshold_items(items);
    }

    fn nudge(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        self.adjustment += delta;
        self.scroll_offset = (self.scroll_offset as i64 + delta).max(0) as u64;
    }

    fn finish(&mut self, previous: RenderWindow, remeasure: bool) -> Reconcile {
        self.needs_layout = false;
        let scroll_adjustment = core::mem::take(&mut self.adjustment);
        let measured = self.heights.measured_in(self.window.start, self.window.end);
        self.phase = if measured == self.window.len() {
            Phase::Settled
        } else {
            Phase::Recomputing
        };
        let reached_bottom = self.check_bottom();
        Reconcile {
            previous,
            window: self.window,
            scroll_adjustment,
            remeasure,
            reached_bottom,
            replaced: false,
        }
    }

    fn check_bottom(&mut self) -> bool {
        let count = self.heights.count();
        let at_bottom = count > 0
            && self.window.end == count
            && self.heights.is_measured(count - 1)
            && self.heights.total_height()
                <= self
                    .scroll_offset
                    .saturating_add(self.viewport.height as u64);
        let fired = at_bottom && !self.at_bottom;
        if at_bottom {
            self.at_bottom = true;
        } else if self.window.end < count {
            self.at_bottom = false;
        }
        if fired {
            ldebug!(count, offset = self.scroll_offset, "bottom reached");
            if let Some(cb) = self.options.on_bottom_reached.clone() {
                cb(self);
            }
        }
        fired
    }
}
