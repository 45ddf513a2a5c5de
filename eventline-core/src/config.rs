//! Timing thresholds shared by every digital pin source.
//!
//! A single [`PinTiming`] value is owned by the dispatcher and handed to each
//! pin source on every tick, so a change applies to all of them from the next
//! poll onwards. Values are whole milliseconds and must stay below the 16-bit
//! timestamp period used by the pin state machine.

use core::time::Duration;

/// Default debounce window.
pub const DEFAULT_DEBOUNCE_MS: u16 = 75;
/// Default delay before an active input counts as a long hold.
pub const DEFAULT_LONG_HOLD_MS: u16 = 1_000;
/// Default spacing between repeated long-hold events.
pub const DEFAULT_REPEAT_MS: u16 = 200;

/// Debounce, long-hold and repeat thresholds in milliseconds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinTiming {
    /// Time a raw reading must stay steady before it is committed.
    pub debounce_ms: u16,
    /// Time since the last raw toggle after which an active input is held long.
    pub long_hold_ms: u16,
    /// Minimum spacing between long-hold callbacks while repeating.
    pub repeat_ms: u16,
}

impl PinTiming {
    /// Thresholds used when nothing else is configured.
    pub const DEFAULT: Self =
        Self::new(DEFAULT_DEBOUNCE_MS, DEFAULT_LONG_HOLD_MS, DEFAULT_REPEAT_MS);

    #[must_use]
    pub const fn new(debounce_ms: u16, long_hold_ms: u16, repeat_ms: u16) -> Self {
        Self {
            debounce_ms,
            long_hold_ms,
            repeat_ms,
        }
    }

    #[must_use]
    pub const fn with_debounce_ms(mut self, debounce_ms: u16) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub const fn with_long_hold_ms(mut self, long_hold_ms: u16) -> Self {
        self.long_hold_ms = long_hold_ms;
        self
    }

    #[must_use]
    pub const fn with_repeat_ms(mut self, repeat_ms: u16) -> Self {
        self.repeat_ms = repeat_ms;
        self
    }

    /// Returns the debounce window as a [`Duration`].
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms as u64)
    }

    /// Returns the long-hold threshold as a [`Duration`].
    #[must_use]
    pub const fn long_hold(&self) -> Duration {
        Duration::from_millis(self.long_hold_ms as u64)
    }

    /// Returns the repeat interval as a [`Duration`].
    #[must_use]
    pub const fn repeat(&self) -> Duration {
        Duration::from_millis(self.repeat_ms as u64)
    }
}

impl Default for PinTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let timing = PinTiming::default();
        assert_eq!(timing.debounce(), Duration::from_millis(75));
        assert_eq!(timing.long_hold(), Duration::from_millis(1_000));
        assert_eq!(timing.repeat(), Duration::from_millis(200));
    }

    #[test]
    fn builders_replace_single_thresholds() {
        let timing = PinTiming::DEFAULT.with_debounce_ms(10).with_repeat_ms(5);
        assert_eq!(timing, PinTiming::new(10, DEFAULT_LONG_HOLD_MS, 5));
    }
}
