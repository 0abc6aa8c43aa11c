use crate::*;

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Call {
    Mount(usize),
    Unmount(usize),
    Observe(u32),
    Unobserve(u32),
    Layout(Spacers),
    SetScroll(u64),
}

type Log = Rc<RefCell<Vec<Call>>>;

#[derive(Debug)]
struct FakeViewport {
    offset: u64,
    size: Size,
    listening: bool,
    log: Log,
}

impl Viewport for FakeViewport {
    fn listen(&mut self) {
        self.listening = true;
    }

    fn unlisten(&mut self) {
        self.listening = false;
    }

    fn scroll_offset(&self) -> u64 {
        self.offset
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        self.offset = offset;
        self.log.borrow_mut().push(Call::SetScroll(offset));
    }
}

#[derive(Debug)]
struct FakeObserver {
    log: Log,
}

impl SizeObserver<u32> for FakeObserver {
    fn observe(&mut self, handle: &u32) {
        self.log.borrow_mut().push(Call::Observe(*handle));
    }

    fn unobserve(&mut self, handle: &u32) {
        self.log.borrow_mut().push(Call::Unobserve(*handle));
    }
}

#[derive(Debug)]
struct FakeHost {
    next_handle: u32,
    mounted: usize,
    log: Log,
}

impl ItemHost for FakeHost {
    type Handle = u32;

    fn mount(&mut self, index: usize) -> u32 {
        self.next_handle += 1;
        self.mounted += 1;
        self.log.borrow_mut().push(Call::Mount(index));
        self.next_handle
    }

    fn unmount(&mut self, index: usize, _handle: u32) {
        self.mounted -= 1;
        self.log.borrow_mut().push(Call::Unmount(index));
    }

    fn layout(&mut self, spacers: Spacers) {
        self.log.borrow_mut().push(Call::Layout(spacers));
    }
}

type Scroller = ListScroller<FakeViewport, FakeObserver, FakeHost>;

fn scroller(count: usize, nominal: u32) -> (Scroller, Log) {
    let log = Log::default();
    let s = ListScroller::new(
        ScrollerOptions::new(count, nominal),
        FakeViewport {
            offset: 0,
            size: Size::new(70, 50),
            listening: false,
            log: Rc::clone(&log),
        },
        FakeObserver {
            log: Rc::clone(&log),
        },
        FakeHost {
            next_handle: 100,
            mounted: 0,
            log: Rc::clone(&log),
        },
    );
    (s, log)
}

fn take(log: &Log) -> Vec<Call> {
    core::mem::take(&mut *log.borrow_mut())
}

fn count(calls: &[Call], pred: impl Fn(&Call) -> bool) -> usize {
    calls.iter().filter(|c| pred(c)).count()
}

fn scroll_to(s: &mut Scroller, offset: u64, now_ms: u64) -> Option<Reconcile> {
    s.viewport_mut().offset = offset;
    s.handle_scroll(now_ms);
    s.tick(now_ms + listscroller::DEFAULT_THROTTLE_MS)
}

fn report_all(s: &mut Scroller, height: u32) -> Reconcile {
    let reports: Vec<(u32, u32)> = s.observed().iter().map(|(_, &h)| (h, height)).collect();
    s.handle_size_reports(reports)
}

#[test]
fn attach_mounts_and_observes_initial_window() {
    let (mut s, log) = scroller(1000, 20);
    let r = s.attach();
    assert_eq!(r.window, RenderWindow::new(0, 12));
    assert!(s.viewport().listening);

    let calls = take(&log);
    assert_eq!(count(&calls, |c| matches!(c, Call::Mount(_))), 12);
    assert_eq!(count(&calls, |c| matches!(c, Call::Observe(_))), 12);
    assert_eq!(
        calls.last(),
        Some(&Call::Layout(Spacers {
            top: 0,
            bottom: 988 * 20
        }))
    );
    assert_eq!(s.observed().len(), 12);
    assert_eq!(s.host().mounted, 12);
}

#[test]
fn scrolling_swaps_observed_items() {
    let (mut s, log) = scroller(1000, 20);
    s.attach();
    take(&log);

    let r = scroll_to(&mut s, 170, 0).unwrap();
    assert_eq!(r.window, RenderWindow::new(8, 20));
    let calls = take(&log);
    assert_eq!(count(&calls, |c| matches!(c, Call::Observe(_))), 8);
    assert_eq!(count(&calls, |c| matches!(c, Call::Unobserve(_))), 8);

    let r = scroll_to(&mut s, 140, 100).unwrap();
    assert_eq!(r.window, RenderWindow::new(3, 15));
    let calls = take(&log);
    assert_eq!(count(&calls, |c| matches!(c, Call::Observe(_))), 5);
    assert_eq!(count(&calls, |c| matches!(c, Call::Unobserve(_))), 5);
    assert_eq!(s.observed().len(), 12);
}

#[test]
fn scroll_events_are_throttled() {
    let (mut s, _log) = scroller(1000, 20);
    s.attach();
    s.viewport_mut().offset = 50;
    s.handle_scroll(0);
    s.viewport_mut().offset = 170;
    s.handle_scroll(8);
    assert!(s.tick(10).is_none());
    assert_eq!(s.next_tick_ms(), Some(17));
    let r = s.tick(17).unwrap();
    assert_eq!(r.window, RenderWindow::new(8, 20));
}

#[test]
fn scroll_adjustment_is_applied_last() {
    let (mut s, log) = scroller(1000, 20);
    s.attach();
    scroll_to(&mut s, 170, 0);
    take(&log);

    let Some(&handle) = s.observed().handle(8) else {
        panic!("item 8 is not mounted");
    };
    let r = s.handle_size_reports([(handle, 30)]);
    assert_eq!(r.scroll_adjustment, 10);
    assert_eq!(r.window, RenderWindow::new(8, 17));

    let calls = take(&log);
    assert_eq!(count(&calls, |c| matches!(c, Call::Unmount(_))), 3);
    assert_eq!(calls.last(), Some(&Call::SetScroll(180)));
    assert!(matches!(calls[calls.len() - 2], Call::Layout(_)));
    assert_eq!(s.viewport().offset, 180);

    // The host echoes the nudge back as a scroll event.
    assert!(scroll_to(&mut s, 180, 100).unwrap().is_noop());
}

#[test]
fn reports_for_unmounted_items_are_dropped() {
    let (mut s, _log) = scroller(1000, 20);
    s.attach();
    let Some(&handle) = s.observed().handle(0) else {
        panic!("item 0 is not mounted");
    };
    scroll_to(&mut s, 170, 0);
    assert_eq!(s.observed().index_of(&handle), None);

    let r = s.handle_size_reports([(handle, 50), (9999, 50)]);
    assert!(r.is_noop());
    assert_eq!(s.controller().heights().measured_len(), 0);
}

#[test]
fn width_change_reobserves_mounted_items() {
    let (mut s, log) = scroller(1000, 20);
    s.attach();
    report_all(&mut s, 20);
    take(&log);

    s.viewport_mut().size = Size::new(70, 65);
    s.handle_resize(100);
    let r = s.tick(117).unwrap();
    assert!(r.remeasure);
    let calls = take(&log);
    assert_eq!(count(&calls, |c| matches!(c, Call::Unobserve(_))), 12);
    assert_eq!(count(&calls, |c| matches!(c, Call::Observe(_))), 12);
    assert_eq!(count(&calls, |c| matches!(c, Call::Mount(_))), 0);

    let r = report_all(&mut s, 30);
    assert_eq!(r.window, RenderWindow::new(0, 9));
    assert_eq!(s.controller().total_height(), 30_000);
    assert_eq!(s.observed().len(), 9);
}

#[test]
fn pause_stops_listening_until_resume() {
    let (mut s, log) = scroller(1000, 20);
    s.attach();
    scroll_to(&mut s, 170, 0);
    take(&log);

    s.pause();
    assert!(!s.viewport().listening);
    s.viewport_mut().offset = 600;
    s.handle_scroll(100);
    assert_eq!(s.next_tick_ms(), None);

    s.viewport_mut().offset = 170;
    let r = s.resume();
    assert!(s.viewport().listening);
    assert!(r.is_noop());
    assert!(take(&log).is_empty());
    assert_eq!(s.controller().current_window(), RenderWindow::new(8, 20));
}

#[test]
fn resume_catches_up_with_scroll() {
    let (mut s, _log) = scroller(1000, 20);
    s.attach();
    s.pause();
    s.viewport_mut().offset = 170;
    let r = s.resume();
    assert_eq!(r.window, RenderWindow::new(8, 20));
    assert!(s.observed().handle(8).is_some());
}

#[test]
fn detach_unmounts_everything() {
    let (mut s, log) = scroller(1000, 20);
    s.attach();
    take(&log);
    let r = s.detach();
    assert!(r.window.is_empty());
    assert!(s.observed().is_empty());
    assert_eq!(s.host().mounted, 0);
    assert!(!s.viewport().listening);
    let calls = take(&log);
    assert_eq!(count(&calls, |c| matches!(c, Call::Unobserve(_))), 12);
}

#[test]
fn replacing_items_remounts_window() {
    let (mut s, log) = scroller(1000, 20);
    s.attach();
    report_all(&mut s, 30);
    take(&log);

    let r = s.replace_items(50);
    assert!(r.replaced);
    let calls = take(&log);
    assert_eq!(count(&calls, |c| matches!(c, Call::Unmount(_))), r.previous.len());
    assert_eq!(count(&calls, |c| matches!(c, Call::Mount(_))), r.window.len());
    assert_eq!(s.observed().len(), 12);
    assert_eq!(s.host().mounted, 12);
}

#[test]
fn shrinking_item_count_unmounts_tail() {
    let (mut s, _log) = scroller(1000, 20);
    s.attach();
    let r = s.set_item_count(5);
    assert_eq!(r.window, RenderWindow::new(0, 5));
    assert_eq!(s.observed().len(), 5);
    assert_eq!(s.host().mounted, 5);
}

#[test]
fn observed_items_map_both_ways() {
    let mut items = ObservedItems::new();
    items.insert(3, 'a');
    items.insert(4, 'b');
    assert_eq!(items.index_of(&'b'), Some(4));
    assert_eq!(items.handle(3), Some(&'a'));

    items.insert(5, 'a');
    assert_eq!(items.handle(3), None);
    assert_eq!(items.index_of(&'a'), Some(5));
    assert_eq!(items.len(), 2);

    assert_eq!(items.remove(4), Some('b'));
    assert_eq!(items.index_of(&'b'), None);
    assert_eq!(items.iter().collect::<Vec<_>>(), [(5, &'a')]);
}
