#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Front panel behaviour, kept free of HAL types so it runs on the host.
//!
//! Callbacks only record what happened in [`PanelState`]; [`Panel::tick`]
//! then starts or cancels timers and decides what the LED should do:
//!
//! - short press: pulse the LED for [`config::BLINK`]
//! - long press: start or stop the heartbeat
//! - toggle switch on: mute the LED until the switch is turned off again

use core::mem;

use eventline_core::{
    Button, Clock, Eventline, IntervalTimer32, PinDriver, Tag, Timer16, TimerError, Toggle,
};

use crate::config;
use crate::indicator::LedCommand;
use crate::status;

/// Callback context for every panel source.
#[derive(Debug, Default)]
pub struct PanelState {
    blink_requested: bool,
    heartbeat_requested: bool,
    muted: bool,
    led: Option<LedCommand>,
}

fn pressed(_tag: Tag, state: &mut PanelState) {
    status::record_press();
    state.blink_requested = true;
}

fn long_pressed(_tag: Tag, state: &mut PanelState) {
    status::record_long_press();
    state.heartbeat_requested = true;
}

fn muted(_tag: Tag, state: &mut PanelState) {
    state.muted = true;
    state.led = Some(LedCommand::Off);
}

fn unmuted(_tag: Tag, state: &mut PanelState) {
    state.muted = false;
}

fn flipped(_tag: Tag, _state: &mut PanelState) {
    status::record_flip();
}

fn blink_done(_tag: Tag, state: &mut PanelState) {
    state.led = Some(LedCommand::Off);
}

fn heartbeat(_tag: Tag, state: &mut PanelState) {
    state.led = Some(LedCommand::Toggle);
}

pub type PanelSources<D> = (
    Button<D, PanelState>,
    Toggle<D, PanelState>,
    Timer16<PanelState>,
    IntervalTimer32<PanelState>,
);

pub struct Panel<K, D> {
    line: Eventline<K, PanelSources<D>, PanelState>,
    state: PanelState,
}

impl<K, D> Panel<K, D>
where
    K: Clock,
    D: PinDriver,
{
    pub fn new(clock: K, button: D, toggle: D) -> Self {
        let mut press = Button::new(config::BUTTON_PIN, config::BUTTON_TAG, button);
        press.on_pressed = Some(pressed);
        press.on_long_press = Some(long_pressed);

        let mut switch = Toggle::new(config::TOGGLE_PIN, config::TOGGLE_TAG, toggle);
        switch.on_activate = Some(muted);
        switch.on_deactivate = Some(unmuted);
        switch.on_flip = Some(flipped);

        let sources = (
            press,
            switch,
            Timer16::new(config::BLINK_TAG).with_on_expire(blink_done),
            IntervalTimer32::new(config::HEARTBEAT_TAG).with_on_expire(heartbeat),
        );

        Self {
            line: Eventline::with_timing(clock, sources, config::PANEL_TIMING),
            state: PanelState::default(),
        }
    }

    /// Runs one poll pass and returns the LED command it produced, if any.
    pub fn tick(&mut self) -> Result<Option<LedCommand>, TimerError> {
        self.line.poll(&mut self.state);

        let now = self.line.now();
        let (_, _, blink, heartbeat) = self.line.sources_mut();
        let state = &mut self.state;

        if mem::take(&mut state.blink_requested) && !state.muted {
            blink.start(now, config::BLINK)?;
            state.led = Some(LedCommand::On);
        }

        if mem::take(&mut state.heartbeat_requested) {
            if heartbeat.is_active() {
                heartbeat.cancel();
                state.led = Some(LedCommand::Off);
            } else {
                heartbeat.start(now, config::HEARTBEAT)?;
            }
        }

        let muted = state.muted;
        Ok(state
            .led
            .take()
            .filter(|command| !muted || *command == LedCommand::Off))
    }

    pub fn is_muted(&self) -> bool {
        self.state.muted
    }

    pub fn heartbeat_active(&self) -> bool {
        self.line.sources().3.is_active()
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use eventline_core::{Level, ManualClock, Millis, PinId};

    use super::*;

    struct Wire<'a>(&'a Cell<Level>);

    impl PinDriver for Wire<'_> {
        fn read(&mut self, _pin: PinId) -> Level {
            self.0.get()
        }
    }

    type TestPanel<'a> = Panel<&'a ManualClock, Wire<'a>>;

    /// Ticks every 5 ms until the clock reaches `until`.
    fn run(
        panel: &mut TestPanel<'_>,
        clock: &ManualClock,
        until: Millis,
        seen: &mut Vec<(Millis, LedCommand)>,
    ) {
        while clock.get() < until {
            if let Some(command) = panel.tick().expect("panel timers fit") {
                seen.push((clock.get(), command));
            }
            clock.advance(5);
        }
    }

    #[test]
    fn short_press_pulses_the_led() {
        let clock = ManualClock::new(0);
        let button = Cell::new(Level::Low);
        let toggle = Cell::new(Level::High);
        let mut panel = Panel::new(&clock, Wire(&button), Wire(&toggle));
        let mut seen = Vec::new();

        run(&mut panel, &clock, 100, &mut seen);
        button.set(Level::High);
        run(&mut panel, &clock, 1_000, &mut seen);

        assert_eq!(seen, [(35, LedCommand::On), (155, LedCommand::Off)]);
        assert!(!panel.heartbeat_active());
    }

    #[test]
    fn long_press_starts_and_stops_heartbeat() {
        let clock = ManualClock::new(0);
        let button = Cell::new(Level::Low);
        let toggle = Cell::new(Level::High);
        let mut panel = Panel::new(&clock, Wire(&button), Wire(&toggle));
        let mut seen = Vec::new();

        run(&mut panel, &clock, 1_000, &mut seen);
        assert!(panel.heartbeat_active());
        button.set(Level::High);
        run(&mut panel, &clock, 2_200, &mut seen);
        button.set(Level::Low);
        run(&mut panel, &clock, 3_100, &mut seen);
        button.set(Level::High);
        run(&mut panel, &clock, 5_000, &mut seen);

        assert_eq!(
            seen,
            [
                (35, LedCommand::On),
                (155, LedCommand::Off),
                (1_805, LedCommand::Toggle),
                (2_235, LedCommand::On),
                (2_355, LedCommand::Off),
                (2_805, LedCommand::Toggle),
                (3_005, LedCommand::Off),
            ]
        );
        assert!(!panel.heartbeat_active());
    }

    #[test]
    fn toggle_mutes_everything_but_off() {
        let clock = ManualClock::new(0);
        let button = Cell::new(Level::High);
        let toggle = Cell::new(Level::Low);
        let mut panel = Panel::new(&clock, Wire(&button), Wire(&toggle));
        let mut seen = Vec::new();

        run(&mut panel, &clock, 100, &mut seen);
        assert!(panel.is_muted());
        button.set(Level::Low);
        run(&mut panel, &clock, 2_000, &mut seen);
        toggle.set(Level::High);
        run(&mut panel, &clock, 3_000, &mut seen);

        assert!(!panel.is_muted());
        assert!(panel.heartbeat_active());
        assert_eq!(seen, [(35, LedCommand::Off), (2_905, LedCommand::Toggle)]);
    }
}
