//! Pin setup and read primitives.
//!
//! The state machine never touches hardware itself. Each pin binding owns a
//! [`PinDriver`], which lets a pin live on the MCU, behind a port expander, or
//! in a test script.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use super::{Level, PinId};

/// Abstraction over the physical pin primitives.
pub trait PinDriver {
    /// Configures the pin, e.g. enabling its pull-up. Called once before polling.
    fn setup(&mut self, _pin: PinId) {}

    /// Reads the current electrical level.
    fn read(&mut self, pin: PinId) -> Level;
}

impl<D> PinDriver for &mut D
where
    D: PinDriver + ?Sized,
{
    fn setup(&mut self, pin: PinId) {
        (**self).setup(pin);
    }

    fn read(&mut self, pin: PinId) -> Level {
        (**self).read(pin)
    }
}

/// Driver built from a plain setup/read function pair.
///
/// Useful when pins are reached through shared peripherals such as an I/O
/// expander, where the functions look the pin up by id.
#[derive(Copy, Clone, Debug)]
pub struct FnPinDriver {
    setup: Option<fn(PinId)>,
    read: fn(PinId) -> Level,
}

impl FnPinDriver {
    #[must_use]
    pub const fn new(setup: fn(PinId), read: fn(PinId) -> Level) -> Self {
        Self {
            setup: Some(setup),
            read,
        }
    }

    /// Driver for pins that need no configuration.
    #[must_use]
    pub const fn read_only(read: fn(PinId) -> Level) -> Self {
        Self { setup: None, read }
    }
}

impl PinDriver for FnPinDriver {
    fn setup(&mut self, pin: PinId) {
        if let Some(setup) = self.setup {
            setup(pin);
        }
    }

    fn read(&mut self, pin: PinId) -> Level {
        (self.read)(pin)
    }
}

/// Adapter for `embedded-hal` input pins whose reads cannot fail.
///
/// The HAL pin is expected to be configured (pull resistors, mode) when it is
/// constructed, so `setup` does nothing.
#[derive(Debug)]
pub struct HalInput<P> {
    pin: P,
}

impl<P> HalInput<P>
where
    P: InputPin<Error = Infallible>,
{
    #[must_use]
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Releases the wrapped HAL pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> PinDriver for HalInput<P>
where
    P: InputPin<Error = Infallible>,
{
    fn read(&mut self, _pin: PinId) -> Level {
        let Ok(high) = self.pin.is_high();
        Level::from_high(high)
    }
}
