use core::cell::Cell;

use eventline_core::{
    Button, DigitalPinSource, EventSource, Eventline, Level, ManualClock, Millis, PinDriver,
    PinId, PinTiming, Tag, Tick, Toggle,
};
use heapless::Vec;

const FAST: PinTiming = PinTiming::new(10, 50, 10);

struct Wire<'a> {
    level: &'a Cell<Level>,
    setups: &'a Cell<u8>,
}

impl PinDriver for Wire<'_> {
    fn setup(&mut self, _pin: PinId) {
        self.setups.set(self.setups.get() + 1);
    }

    fn read(&mut self, _pin: PinId) -> Level {
        self.level.get()
    }
}

#[derive(Default)]
struct Log {
    events: Vec<(&'static str, Tag), 32>,
}

impl Log {
    fn push(&mut self, name: &'static str, tag: Tag) {
        self.events.push((name, tag)).expect("log capacity");
    }

    fn names(&self) -> Vec<&'static str, 32> {
        self.events.iter().map(|(name, _)| *name).collect()
    }
}

fn changed(tag: Tag, log: &mut Log) {
    log.push("changed", tag);
}

fn pressed(tag: Tag, log: &mut Log) {
    log.push("pressed", tag);
}

fn released(tag: Tag, log: &mut Log) {
    log.push("released", tag);
}

fn activated(tag: Tag, log: &mut Log) {
    log.push("activated", tag);
}

fn deactivated(tag: Tag, log: &mut Log) {
    log.push("deactivated", tag);
}

fn flipped(tag: Tag, log: &mut Log) {
    log.push("flipped", tag);
}

fn long_press(tag: Tag, log: &mut Log) {
    log.push("long", tag);
}

/// Polls `source` once per millisecond over `from..=to` at a fixed level.
fn hold<S: EventSource<Log>>(
    source: &mut S,
    wire: &Cell<Level>,
    level: Level,
    from: Millis,
    to: Millis,
    log: &mut Log,
) {
    wire.set(level);
    for now in from..=to {
        source.poll(Tick::new(now, FAST), log);
    }
}

#[test]
fn oscillation_faster_than_window_commits_once() {
    let level = Cell::new(Level::High);
    let setups = Cell::new(0);
    let mut source = DigitalPinSource::new(
        PinId(4),
        7,
        Wire {
            level: &level,
            setups: &setups,
        },
    )
    .with_on_change(changed);
    let mut log = Log::default();

    // Wiggle every 3 ms for 60 ms: never steady for more than the window.
    for now in 1_000..1_060 {
        if now % 3 == 0 {
            level.set(level.get().toggled());
        }
        source.poll(Tick::new(now, FAST), &mut log);
    }
    assert!(log.events.is_empty(), "bouncing input must not commit");

    hold(&mut source, &level, Level::Low, 1_060, 1_100, &mut log);

    assert_eq!(log.events.as_slice(), &[("changed", 7)]);
    assert!(source.is_active());
}

#[test]
fn endless_bounce_never_fires() {
    let level = Cell::new(Level::High);
    let setups = Cell::new(0);
    let mut source = DigitalPinSource::new(
        PinId(0),
        1,
        Wire {
            level: &level,
            setups: &setups,
        },
    )
    .with_on_change(changed);
    let mut log = Log::default();

    for now in 0..2_000 {
        if now % 10 == 0 {
            level.set(level.get().toggled());
        }
        source.poll(Tick::new(now, FAST), &mut log);
    }

    assert!(log.events.is_empty());
    assert!(!source.is_active());
}

#[test]
fn bouncy_press_and_release_report_once_each() {
    let level = Cell::new(Level::High);
    let setups = Cell::new(0);
    let mut button = Button::new(
        PinId(2),
        3,
        Wire {
            level: &level,
            setups: &setups,
        },
    );
    button.on_pressed = Some(pressed);
    button.on_released = Some(released);
    let mut log = Log::default();

    button.setup();
    assert_eq!(setups.get(), 1);

    // Low, high, low within a millisecond each, then settle.
    hold(&mut button, &level, Level::Low, 100, 100, &mut log);
    hold(&mut button, &level, Level::High, 101, 101, &mut log);
    hold(&mut button, &level, Level::Low, 102, 120, &mut log);
    assert!(button.is_pressed());

    hold(&mut button, &level, Level::High, 121, 121, &mut log);
    hold(&mut button, &level, Level::Low, 122, 122, &mut log);
    hold(&mut button, &level, Level::High, 123, 140, &mut log);
    assert!(!button.is_pressed());

    assert_eq!(log.names().as_slice(), &["pressed", "released"]);
    assert!(log.events.iter().all(|(_, tag)| *tag == 3));
}

#[test]
fn toggle_reports_direction_then_flip_and_ignores_long_hold() {
    let level = Cell::new(Level::High);
    let setups = Cell::new(0);
    let mut toggle = Toggle::new(
        PinId(5),
        9,
        Wire {
            level: &level,
            setups: &setups,
        },
    );
    toggle.on_activate = Some(activated);
    toggle.on_deactivate = Some(deactivated);
    toggle.on_flip = Some(flipped);
    let mut log = Log::default();

    hold(&mut toggle, &level, Level::Low, 0, 500, &mut log);
    assert!(toggle.is_activated());
    hold(&mut toggle, &level, Level::High, 501, 600, &mut log);
    assert!(!toggle.is_activated());

    assert_eq!(
        log.names().as_slice(),
        &["activated", "flipped", "deactivated", "flipped"]
    );
}

#[test]
fn cleared_callbacks_stay_silent() {
    let level = Cell::new(Level::High);
    let setups = Cell::new(0);
    let mut button = Button::new(
        PinId(2),
        3,
        Wire {
            level: &level,
            setups: &setups,
        },
    );
    button.on_pressed = Some(pressed);
    button.on_long_press = Some(long_press);
    button.clear_callbacks();
    let mut log = Log::default();

    hold(&mut button, &level, Level::Low, 0, 200, &mut log);

    assert!(button.is_long_pressed());
    assert!(log.events.is_empty());
}

#[test]
fn dispatchers_keep_their_own_thresholds() {
    let level = Cell::new(Level::Low);
    let setups = Cell::new(0);
    let clock = ManualClock::new(0);

    let slow = PinTiming::default();
    let mut line = Eventline::with_timing(
        &clock,
        DigitalPinSource::new(
            PinId(1),
            1,
            Wire {
                level: &level,
                setups: &setups,
            },
        )
        .with_on_change(changed),
        slow,
    );
    let mut log = Log::default();

    for _ in 0..=20 {
        line.poll(&mut log);
        clock.advance(1);
    }
    assert!(log.events.is_empty(), "default 75 ms window still open");

    line.set_debounce_ms(10);
    line.poll(&mut log);
    assert_eq!(log.events.as_slice(), &[("changed", 1)]);
    assert_eq!(setups.get(), 1);
}
