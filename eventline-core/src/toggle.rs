//! Latched switch reporting activation, deactivation and every flip.
//!
//! Long holds mean nothing for a latched switch, so they are never reported
//! and repeat stays disabled.

use core::marker::PhantomData;

use crate::pin::{DigitalPin, PinDriver, PinEvent, PinId, Polarity};
use crate::source::{Callback, EventSource, Tag, Tick, fire};

pub struct Toggle<D, C = ()> {
    pin: DigitalPin<D>,
    /// Called after `on_activate`/`on_deactivate` on every committed change.
    pub on_flip: Option<Callback<C>>,
    pub on_activate: Option<Callback<C>>,
    pub on_deactivate: Option<Callback<C>>,
    _context: PhantomData<fn(&mut C)>,
}

impl<D, C> Toggle<D, C>
where
    D: PinDriver,
{
    pub fn new(pin: PinId, tag: Tag, driver: D) -> Self {
        Self::from_pin(DigitalPin::new(pin, tag, driver))
    }

    pub fn with_polarity(pin: PinId, tag: Tag, driver: D, polarity: Polarity) -> Self {
        Self::from_pin(DigitalPin::with_polarity(pin, tag, driver, polarity))
    }

    pub fn from_pin(mut pin: DigitalPin<D>) -> Self {
        pin.enable_repeat(false);
        Self {
            pin,
            on_flip: None,
            on_activate: None,
            on_deactivate: None,
            _context: PhantomData,
        }
    }

    /// Drops every registered callback.
    pub fn clear_callbacks(&mut self) {
        self.on_flip = None;
        self.on_activate = None;
        self.on_deactivate = None;
    }

    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.pin.is_active()
    }

    #[must_use]
    pub fn tag(&self) -> Tag {
        self.pin.tag()
    }

    pub fn pin_mut(&mut self) -> &mut DigitalPin<D> {
        &mut self.pin
    }
}

impl<D, C> EventSource<C> for Toggle<D, C>
where
    D: PinDriver,
{
    fn setup(&mut self) {
        self.pin.setup();
    }

    fn poll(&mut self, tick: Tick, context: &mut C) {
        let tag = self.pin.tag();
        match self.pin.sample(&tick) {
            Some(PinEvent::Activated) => fire(self.on_activate, tag, context),
            Some(PinEvent::Deactivated) => fire(self.on_deactivate, tag, context),
            _ => return,
        }
        fire(self.on_flip, tag, context);
    }
}
