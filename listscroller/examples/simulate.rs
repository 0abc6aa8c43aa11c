use listscroller::{ScrollerOptions, Size, WindowController};

// Item heights the "renderer" reports once an item is mounted.
fn real_height(index: usize) -> u32 {
    18 + (index % 5) as u32 * 4
}

fn main() {
    let opts = ScrollerOptions::measured(10_000).with_on_bottom_reached(Some(
        |c: &WindowController| {
            println!("bottom reached at offset {}", c.scroll_offset());
        },
    ));
    let mut c = WindowController::new(opts);

    let r = c.on_attach(0, Size::new(300, 400));
    println!("attached: window={:?}", r.window);

    let mut scroll = 0u64;
    for step in 0..10 {
        let w = c.current_window();
        let r = c.on_size_reports((w.start..w.end).map(|i| (i, real_height(i))));
        scroll = scroll.saturating_add_signed(r.scroll_adjustment);

        scroll += 250;
        let r = c.on_scroll(scroll);
        scroll = scroll.saturating_add_signed(r.scroll_adjustment);
        println!(
            "step {step}: offset={scroll} window={:?} spacers={:?} total={} nominal={}",
            r.window,
            c.spacers(),
            c.total_height(),
            c.heights().nominal_height(),
        );
    }

    // A jump far down the list lands on an estimate.
    let r = c.on_scroll(150_000);
    println!("jump: window={:?} margin={}", r.window, c.margin());

    // Narrower viewport: items reflow and get taller.
    let r = c.on_resize(Size::new(300, 200));
    println!("resize: window={:?} remeasure={}", r.window, r.remeasure);
    let w = c.current_window();
    let r = c.on_size_reports((w.start..w.end).map(|i| (i, real_height(i) * 2)));
    println!(
        "rescaled: window={:?} nudge={} total={}",
        r.window,
        r.scroll_adjustment,
        c.total_height()
    );

    // Append-only growth keeps everything learned so far.
    c.set_item_count(12_000);
    println!("count={} measured={}", c.count(), c.heights().measured_len());
}
