//! Debounced digital inputs.
//!
//! A [`PinState`] turns raw samples into committed active/inactive changes and
//! long-hold events; [`DigitalPin`] binds that state machine to one physical
//! input through a [`PinDriver`]; [`DigitalPinSource`] exposes it as an
//! [`EventSource`](crate::source::EventSource) with plain callbacks. Buttons
//! and toggles build on [`DigitalPin`] as well.

pub mod driver;
pub mod source;
pub mod state;

pub use driver::{FnPinDriver, HalInput, PinDriver};
pub use source::{DigitalPin, DigitalPinSource};
pub use state::PinState;

/// Electrical level reported by a pin read.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    #[must_use]
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }

    #[must_use]
    pub const fn from_high(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }

    /// Returns the other level.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Which electrical level counts as "active".
///
/// Inputs wired to ground with a pull-up read low when engaged, so
/// [`Polarity::ActiveLow`] is the default.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    #[default]
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    /// Level that represents the engaged state.
    #[must_use]
    pub const fn active_level(self) -> Level {
        match self {
            Polarity::ActiveLow => Level::Low,
            Polarity::ActiveHigh => Level::High,
        }
    }

    /// Level that represents the released state.
    #[must_use]
    pub const fn idle_level(self) -> Level {
        self.active_level().toggled()
    }

    #[must_use]
    pub const fn is_active(self, level: Level) -> bool {
        matches!(
            (self, level),
            (Polarity::ActiveLow, Level::Low) | (Polarity::ActiveHigh, Level::High)
        )
    }
}

/// Opaque identifier of a physical input, passed back to the pin driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

impl PinId {
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for PinId {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

/// Event derived from a debounced pin during one poll.
///
/// At most one is produced per poll: changes happen on transition ticks,
/// long holds only on steady ticks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinEvent {
    /// Committed reading moved to the active level.
    Activated,
    /// Committed reading moved to the idle level.
    Deactivated,
    /// Input has been active past the long-hold threshold for the first time.
    LongHold,
    /// Repeated long-hold while the input stays active and repeat is enabled.
    Repeat,
}

impl PinEvent {
    /// Returns `true` for [`PinEvent::Activated`] and [`PinEvent::Deactivated`].
    #[must_use]
    pub const fn is_change(self) -> bool {
        matches!(self, PinEvent::Activated | PinEvent::Deactivated)
    }

    /// Returns `true` for [`PinEvent::LongHold`] and [`PinEvent::Repeat`].
    #[must_use]
    pub const fn is_long_hold(self) -> bool {
        matches!(self, PinEvent::LongHold | PinEvent::Repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_maps_levels() {
        assert!(Polarity::ActiveLow.is_active(Level::Low));
        assert!(!Polarity::ActiveLow.is_active(Level::High));
        assert!(Polarity::ActiveHigh.is_active(Level::High));
        assert_eq!(Polarity::ActiveHigh.idle_level(), Level::Low);
        assert_eq!(Polarity::default(), Polarity::ActiveLow);
    }

    #[test]
    fn event_classification() {
        assert!(PinEvent::Activated.is_change());
        assert!(PinEvent::Repeat.is_long_hold());
        assert!(!PinEvent::LongHold.is_change());
    }
}
