use listscroller::{Size, Spacers};

/// The native scroll container.
pub trait Viewport {
    /// Starts delivering scroll and resize notifications to the host's event loop.
    fn listen(&mut self);

    fn unlisten(&mut self);

    /// Current scroll offset, relative to the top of the list.
    fn scroll_offset(&self) -> u64;

    fn size(&self) -> Size;

    fn set_scroll_offset(&mut self, offset: u64);
}

/// The size-observation service. Reports come back through
/// [`crate::ListScroller::handle_size_reports`].
pub trait SizeObserver<H> {
    fn observe(&mut self, handle: &H);

    fn unobserve(&mut self, handle: &H);
}

/// Renders items and the spacers around them.
pub trait ItemHost {
    /// Identifies a mounted item in size reports.
    type Handle;

    fn mount(&mut self, index: usize) -> Self::Handle;

    fn unmount(&mut self, index: usize, handle: Self::Handle);

    /// Sizes the spacers before and after the mounted items.
    fn layout(&mut self, spacers: Spacers);
}
