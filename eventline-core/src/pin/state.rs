//! Debounce and long-hold state machine for a single digital input.
//!
//! The whole state is five bytes of payload: one packed flag byte and two 16-bit
//! truncated millisecond marks. Elapsed times are computed with wrapping
//! subtraction, so thresholds must stay below 65 536 ms.
//! The hold time wraps too: an input held past 65.5 s sees repeats pause for one
//! long-hold window before they resume.
//!
//! Flag byte layout (bit 0 is least significant):
//!
//! | bit | meaning                                   |
//! |-----|-------------------------------------------|
//! | 0   | last sampled level (1 = high)             |
//! | 1   | last committed level (1 = high)           |
//! | 2   | long hold engaged                         |
//! | 3   | active                                    |
//! | 4   | repeat enabled                            |
//! | 5   | polarity (1 = active high)                |
//! | 6-7 | unused                                    |

use crate::clock::Millis;
use crate::config::PinTiming;

use super::{Level, PinEvent, Polarity};

const RAW_PREVIOUS: u8 = 1 << 0;
const RAW_COMMITTED: u8 = 1 << 1;
const LONG_HOLD: u8 = 1 << 2;
const ACTIVE: u8 = 1 << 3;
const REPEAT: u8 = 1 << 4;
const ACTIVE_HIGH: u8 = 1 << 5;

/// Packed state of one debounced input.
#[derive(Debug, Eq, PartialEq)]
pub struct PinState {
    flags: u8,
    toggled_at: u16,
    last_repeat_at: u16,
}

impl PinState {
    /// Creates an inactive state for an input with the given polarity.
    ///
    /// Both raw readings start at the idle level so an input that is already
    /// engaged at power-up reports an activation once it has settled.
    #[must_use]
    pub const fn new(polarity: Polarity) -> Self {
        let flags = match polarity {
            Polarity::ActiveLow => RAW_PREVIOUS | RAW_COMMITTED,
            Polarity::ActiveHigh => ACTIVE_HIGH,
        };
        Self {
            flags,
            toggled_at: 0,
            last_repeat_at: 0,
        }
    }

    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        if self.flags & ACTIVE_HIGH != 0 {
            Polarity::ActiveHigh
        } else {
            Polarity::ActiveLow
        }
    }

    /// Returns `true` while the committed reading is at the active level.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.flags & ACTIVE != 0
    }

    /// Returns `true` once an active input has crossed the long-hold threshold.
    #[must_use]
    pub const fn is_long_hold(&self) -> bool {
        self.flags & LONG_HOLD != 0
    }

    #[must_use]
    pub const fn repeat_enabled(&self) -> bool {
        self.flags & REPEAT != 0
    }

    /// Enables or disables repeated long-hold events.
    pub fn set_repeat(&mut self, enabled: bool) {
        self.set(REPEAT, enabled);
    }

    /// Last raw level seen, before debouncing.
    #[must_use]
    pub const fn raw_level(&self) -> Level {
        Level::from_high(self.flags & RAW_PREVIOUS != 0)
    }

    /// Last level that survived the debounce window.
    #[must_use]
    pub const fn committed_level(&self) -> Level {
        Level::from_high(self.flags & RAW_COMMITTED != 0)
    }

    /// Feeds one raw sample taken at `now` and reports the resulting event.
    pub fn update(&mut self, level: Level, now: Millis, timing: &PinTiming) -> Option<PinEvent> {
        // Truncation to 16 bits is intentional; only differences are used.
        #[allow(clippy::cast_possible_truncation)]
        let now = now as u16;

        if level != self.raw_level() {
            // Any wiggle restarts the debounce window.
            self.toggled_at = now;
            self.set(RAW_PREVIOUS, level.is_high());
        }

        let since_toggle = now.wrapping_sub(self.toggled_at);
        if since_toggle <= timing.debounce_ms {
            return None;
        }

        let committed = self.committed_level();
        self.set(RAW_COMMITTED, level.is_high());

        if level != committed {
            return Some(self.commit(level, now));
        }

        if !self.is_active()
            || since_toggle <= timing.long_hold_ms
            || now.wrapping_sub(self.last_repeat_at) <= timing.repeat_ms
        {
            return None;
        }

        let first = !self.is_long_hold();
        self.set(LONG_HOLD, true);
        if first {
            self.last_repeat_at = now;
            Some(PinEvent::LongHold)
        } else if self.repeat_enabled() {
            self.last_repeat_at = now;
            Some(PinEvent::Repeat)
        } else {
            None
        }
    }

    fn commit(&mut self, level: Level, now: u16) -> PinEvent {
        if self.polarity().is_active(level) {
            self.last_repeat_at = now;
            self.set(ACTIVE, true);
            PinEvent::Activated
        } else {
            self.toggled_at = 0;
            self.last_repeat_at = 0;
            self.set(ACTIVE, false);
            self.set(LONG_HOLD, false);
            PinEvent::Deactivated
        }
    }

    fn set(&mut self, mask: u8, on: bool) {
        if on {
            self.flags |= mask;
        } else {
            self.flags &= !mask;
        }
    }
}

impl Default for PinState {
    fn default() -> Self {
        Self::new(Polarity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: PinTiming = PinTiming::new(10, 50, 10);

    fn feed(
        state: &mut PinState,
        level: Level,
        from: Millis,
        to: Millis,
    ) -> heapless::Vec<(Millis, PinEvent), 16> {
        let mut events = heapless::Vec::new();
        for now in from..=to {
            if let Some(event) = state.update(level, now, &FAST) {
                events.push((now, event)).unwrap();
            }
        }
        events
    }

    #[test]
    fn stays_compact() {
        // Five bytes of payload plus alignment padding.
        assert!(core::mem::size_of::<PinState>() <= 6);
    }

    #[test]
    fn commits_only_after_debounce_window() {
        let mut state = PinState::default();
        let events = feed(&mut state, Level::Low, 100, 110);
        assert!(events.is_empty());
        assert!(!state.is_active());

        assert_eq!(state.update(Level::Low, 111, &FAST), Some(PinEvent::Activated));
        assert!(state.is_active());
        assert_eq!(state.committed_level(), Level::Low);
    }

    #[test]
    fn idle_reading_at_startup_is_quiet() {
        let mut state = PinState::default();
        assert!(feed(&mut state, Level::High, 0, 200).is_empty());
    }

    #[test]
    fn long_hold_fires_once_without_repeat() {
        let mut state = PinState::default();
        let events = feed(&mut state, Level::Low, 1_000, 1_200);
        assert_eq!(
            events.as_slice(),
            &[(1_011, PinEvent::Activated), (1_051, PinEvent::LongHold)]
        );
        assert!(state.is_long_hold());
    }

    #[test]
    fn repeat_fires_at_interval() {
        let mut state = PinState::default();
        state.set_repeat(true);
        let events = feed(&mut state, Level::Low, 1_000, 1_080);
        assert_eq!(
            events.as_slice(),
            &[
                (1_011, PinEvent::Activated),
                (1_051, PinEvent::LongHold),
                (1_062, PinEvent::Repeat),
                (1_073, PinEvent::Repeat),
            ]
        );
    }

    #[test]
    fn release_clears_long_hold() {
        let mut state = PinState::default();
        feed(&mut state, Level::Low, 1_000, 1_100);
        assert!(state.is_long_hold());

        let events = feed(&mut state, Level::High, 1_101, 1_120);
        assert_eq!(events.as_slice(), &[(1_112, PinEvent::Deactivated)]);
        assert!(!state.is_active());
        assert!(!state.is_long_hold());
    }

    #[test]
    fn hold_past_timestamp_range_pauses_repeats_for_one_window() {
        let mut state = PinState::default();
        state.set_repeat(true);

        let mut last = None;
        for now in 0..=65_535 {
            if let Some(event) = state.update(Level::Low, now, &FAST) {
                last = Some((now, event));
            }
        }
        assert_eq!(last, Some((65_534, PinEvent::Repeat)));

        // The hold time reads as zero again at 65 536 ms.
        let events = feed(&mut state, Level::Low, 65_536, 65_590);
        assert_eq!(events.as_slice(), &[(65_587, PinEvent::Repeat)]);
        assert!(state.is_long_hold());
    }

    #[test]
    fn active_high_polarity_inverts_levels() {
        let mut state = PinState::new(Polarity::ActiveHigh);
        assert!(feed(&mut state, Level::Low, 0, 50).is_empty());
        let events = feed(&mut state, Level::High, 100, 111);
        assert_eq!(events.as_slice(), &[(111, PinEvent::Activated)]);
    }

    #[test]
    fn elapsed_time_survives_16_bit_wrap() {
        let mut state = PinState::default();
        // 65_530 truncates close to the 16-bit boundary.
        let events = feed(&mut state, Level::Low, 65_530, 65_545);
        assert_eq!(events.as_slice(), &[(65_541, PinEvent::Activated)]);
    }
}
