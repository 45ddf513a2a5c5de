//! Momentary switch with press, release and long-press callbacks.
//!
//! The pin is expected to sit at its idle level (high for the default
//! active-low wiring) while the button is not pressed.

use core::marker::PhantomData;

use crate::pin::{DigitalPin, PinDriver, PinEvent, PinId, Polarity};
use crate::source::{Callback, EventSource, Tag, Tick, fire};

pub struct Button<D, C = ()> {
    pin: DigitalPin<D>,
    pub on_pressed: Option<Callback<C>>,
    pub on_released: Option<Callback<C>>,
    pub on_long_press: Option<Callback<C>>,
    _context: PhantomData<fn(&mut C)>,
}

impl<D, C> Button<D, C>
where
    D: PinDriver,
{
    pub fn new(pin: PinId, tag: Tag, driver: D) -> Self {
        Self::from_pin(DigitalPin::new(pin, tag, driver))
    }

    pub fn with_polarity(pin: PinId, tag: Tag, driver: D, polarity: Polarity) -> Self {
        Self::from_pin(DigitalPin::with_polarity(pin, tag, driver, polarity))
    }

    pub fn from_pin(pin: DigitalPin<D>) -> Self {
        Self {
            pin,
            on_pressed: None,
            on_released: None,
            on_long_press: None,
            _context: PhantomData,
        }
    }

    /// Drops every registered callback.
    pub fn clear_callbacks(&mut self) {
        self.on_pressed = None;
        self.on_released = None;
        self.on_long_press = None;
    }

    /// Keeps calling `on_long_press` every repeat interval while held.
    pub fn enable_repeat(&mut self, enabled: bool) {
        self.pin.enable_repeat(enabled);
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pin.is_active()
    }

    #[must_use]
    pub fn is_long_pressed(&self) -> bool {
        self.pin.is_long_hold()
    }

    #[must_use]
    pub fn tag(&self) -> Tag {
        self.pin.tag()
    }

    pub fn pin_mut(&mut self) -> &mut DigitalPin<D> {
        &mut self.pin
    }
}

impl<D, C> EventSource<C> for Button<D, C>
where
    D: PinDriver,
{
    fn setup(&mut self) {
        self.pin.setup();
    }

    fn poll(&mut self, tick: Tick, context: &mut C) {
        let callback = match self.pin.sample(&tick) {
            None => return,
            Some(PinEvent::Activated) => self.on_pressed,
            Some(PinEvent::Deactivated) => self.on_released,
            Some(PinEvent::LongHold | PinEvent::Repeat) => self.on_long_press,
        };
        fire(callback, self.pin.tag(), context);
    }
}
