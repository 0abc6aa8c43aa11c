use alloc::vec::Vec;

use listscroller::{Reconcile, ScrollerOptions, WindowController};

use crate::{ItemHandle, ItemHost, ObservedItems, SizeObserver, Viewport};

/// Drives a [`WindowController`] against a concrete viewport, size observer and item host.
///
/// The host's event loop forwards native notifications:
/// - `handle_scroll` / `handle_resize` when the viewport reports an event
/// - `tick(now_ms)` from a timer, at the latest by [`ListScroller::next_tick_ms`]
/// - `handle_size_reports` when the size observer delivers measurements
///
/// Every update is applied to the host in the same order: unmount, mount, re-observe, spacer
/// layout, and the scroll nudge last.
pub struct ListScroller<V, O, H: ItemHost> {
    controller: WindowController,
    viewport: V,
    observer: O,
    host: H,
    items: ObservedItems<H::Handle>,
}

impl<V, O, H> ListScroller<V, O, H>
where
    V: Viewport,
    H: ItemHost,
    H::Handle: ItemHandle,
    O: SizeObserver<H::Handle>,
{
    pub fn new(options: ScrollerOptions, viewport: V, observer: O, host: H) -> Self {
        Self {
            controller: WindowController::new(options),
            viewport,
            observer,
            host,
            items: ObservedItems::new(),
        }
    }

    pub fn controller(&self) -> &WindowController {
        &self.controller
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn observed(&self) -> &ObservedItems<H::Handle> {
        &self.items
    }

    pub fn into_parts(self) -> (WindowController, V, O, H) {
        (self.controller, self.viewport, self.observer, self.host)
    }

    /// Subscribes to the viewport and mounts the initial window.
    pub fn attach(&mut self) -> Reconcile {
        self.viewport.listen();
        let r = self
            .controller
            .on_attach(self.viewport.scroll_offset(), self.viewport.size());
        self.apply(&r);
        r
    }

    /// Unmounts every item and unsubscribes from the viewport.
    pub fn detach(&mut self) -> Reconcile {
        let r = self.controller.on_detach();
        self.apply(&r);
        self.viewport.unlisten();
        r
    }

    /// Stops listening while keeping the mounted items.
    pub fn pause(&mut self) {
        self.controller.on_pause();
        self.viewport.unlisten();
    }

    /// Listens again and catches up with whatever changed while paused.
    pub fn resume(&mut self) -> Reconcile {
        self.viewport.listen();
        let r = self
            .controller
            .on_resume(self.viewport.scroll_offset(), self.viewport.size());
        self.apply(&r);
        r
    }

    pub fn handle_scroll(&mut self, now_ms: u64) {
        self.controller
            .on_scroll_event(self.viewport.scroll_offset(), now_ms);
    }

    pub fn handle_resize(&mut self, now_ms: u64) {
        self.controller.on_resize_event(self.viewport.size(), now_ms);
    }

    pub fn next_tick_ms(&self) -> Option<u64> {
        self.controller.next_tick_ms()
    }

    /// Applies throttled notifications that became due.
    pub fn tick(&mut self, now_ms: u64) -> Option<Reconcile> {
        let r = self.controller.tick(now_ms)?;
        self.apply(&r);
        Some(r)
    }

    /// Applies measurements delivered by the size observer, in order.
    ///
    /// Reports for handles that are no longer mounted are dropped.
    pub fn handle_size_reports(
        &mut self,
        reports: impl IntoIterator<Item = (H::Handle, u32)>,
    ) -> Reconcile {
        let mut indexed = Vec::new();
        for (handle, height) in reports {
            match self.items.index_of(&handle) {
                Some(index) => indexed.push((index, height)),
                None => {
                    atrace!(height, "size report for an unmounted item");
                }
            }
        }
        let r = self.controller.on_size_reports(indexed);
        self.apply(&r);
        r
    }

    /// Swaps in a new item collection of `count` items.
    pub fn replace_items(&mut self, count: usize) -> Reconcile {
        let r = self.controller.replace_items(count);
        self.apply(&r);
        r
    }

    /// Records that items were appended or removed at the end.
    pub fn set_item_count(&mut self, count: usize) -> Reconcile {
        let r = self.controller.set_item_count(count);
        self.apply(&r);
        r
    }

    fn apply(&mut self, r: &Reconcile) {
        if r.is_noop() {
            return;
        }
        let mut unmounted = 0usize;
        r.for_each_unmounted(|index| {
            if let Some(handle) = self.items.remove(index) {
                self.observer.unobserve(&handle);
                self.host.unmount(index, handle);
                unmounted += 1;
            }
        });
        let mut mounted = 0usize;
        r.for_each_mounted(|index| {
            let handle = self.host.mount(index);
            self.observer.observe(&handle);
            self.items.insert(index, handle);
            mounted += 1;
        });
        if r.remeasure {
            for (_, handle) in self.items.iter() {
                self.observer.unobserve(handle);
                self.observer.observe(handle);
            }
        }
        self.host.layout(self.controller.spacers());

        if r.scroll_adjustment != 0 {
            let current = self.viewport.scroll_offset();
            let target = current.saturating_add_signed(r.scroll_adjustment);
            adebug!(current, target, "applying scroll adjustment");
            self.viewport.set_scroll_offset(target);
        }
        atrace!(
            start = r.window.start,
            end = r.window.end,
            mounted,
            unmounted,
            "ListScroller::apply"
        );
        if unmounted == 0 && mounted == 0 {
            return;
        }
        if self.items.len() != r.window.len() {
            awarn!(
                items = self.items.len(),
                window = r.window.len(),
                "mounted items out of sync with the window"
            );
        }
    }
}

impl<V: core::fmt::Debug, O: core::fmt::Debug, H: ItemHost + core::fmt::Debug> core::fmt::Debug
    for ListScroller<V, O, H>
where
    H::Handle: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListScroller")
            .field("controller", &self.controller)
            .field("viewport", &self.viewport)
            .field("observer", &self.observer)
            .field("host", &self.host)
            .field("items", &self.items)
            .finish()
    }
}
