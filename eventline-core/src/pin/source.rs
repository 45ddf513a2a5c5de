//! Binding of the pin state machine to one physical input.

use core::marker::PhantomData;

use crate::source::{Callback, EventSource, Tag, Tick, fire};

use super::{PinDriver, PinEvent, PinId, PinState, Polarity};

/// One physical input: its id, driver, tag and debounce state.
///
/// Not `Clone`: a second binding to the same pin would report the input
/// twice.
#[derive(Debug)]
pub struct DigitalPin<D> {
    pin: PinId,
    tag: Tag,
    driver: D,
    state: PinState,
}

impl<D> DigitalPin<D>
where
    D: PinDriver,
{
    /// Binds an active-low input.
    pub fn new(pin: PinId, tag: Tag, driver: D) -> Self {
        Self::with_polarity(pin, tag, driver, Polarity::ActiveLow)
    }

    pub fn with_polarity(pin: PinId, tag: Tag, driver: D, polarity: Polarity) -> Self {
        Self {
            pin,
            tag,
            driver,
            state: PinState::new(polarity),
        }
    }

    #[must_use]
    pub const fn pin(&self) -> PinId {
        self.pin
    }

    #[must_use]
    pub const fn tag(&self) -> Tag {
        self.tag
    }

    #[must_use]
    pub const fn state(&self) -> &PinState {
        &self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }

    #[must_use]
    pub const fn is_long_hold(&self) -> bool {
        self.state.is_long_hold()
    }

    pub fn enable_repeat(&mut self, enabled: bool) {
        self.state.set_repeat(enabled);
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Runs the driver's pin setup.
    pub fn setup(&mut self) {
        self.driver.setup(self.pin);
    }

    /// Reads the pin once and advances the state machine.
    pub fn sample(&mut self, tick: &Tick) -> Option<PinEvent> {
        let level = self.driver.read(self.pin);
        self.state.update(level, tick.now, &tick.timing)
    }
}

/// Generic debounced source with a change callback and a long-hold callback.
///
/// `on_change_state` fires on every committed transition; use
/// [`DigitalPinSource::is_active`] afterwards to tell the direction.
/// `on_long_hold` fires on the first long hold and, when repeat is enabled,
/// on every repeat.
pub struct DigitalPinSource<D, C = ()> {
    pin: DigitalPin<D>,
    pub on_change_state: Option<Callback<C>>,
    pub on_long_hold: Option<Callback<C>>,
    _context: PhantomData<fn(&mut C)>,
}

impl<D, C> DigitalPinSource<D, C>
where
    D: PinDriver,
{
    pub fn new(pin: PinId, tag: Tag, driver: D) -> Self {
        Self::from_pin(DigitalPin::new(pin, tag, driver))
    }

    pub fn from_pin(pin: DigitalPin<D>) -> Self {
        Self {
            pin,
            on_change_state: None,
            on_long_hold: None,
            _context: PhantomData,
        }
    }

    #[must_use]
    pub fn with_on_change(mut self, callback: Callback<C>) -> Self {
        self.on_change_state = Some(callback);
        self
    }

    #[must_use]
    pub fn with_on_long_hold(mut self, callback: Callback<C>) -> Self {
        self.on_long_hold = Some(callback);
        self
    }

    pub fn enable_repeat(&mut self, enabled: bool) {
        self.pin.enable_repeat(enabled);
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pin.is_active()
    }

    #[must_use]
    pub fn is_long_hold(&self) -> bool {
        self.pin.is_long_hold()
    }

    #[must_use]
    pub fn tag(&self) -> Tag {
        self.pin.tag()
    }

    pub fn pin(&self) -> &DigitalPin<D> {
        &self.pin
    }

    pub fn pin_mut(&mut self) -> &mut DigitalPin<D> {
        &mut self.pin
    }
}

impl<D, C> EventSource<C> for DigitalPinSource<D, C>
where
    D: PinDriver,
{
    fn setup(&mut self) {
        self.pin.setup();
    }

    fn poll(&mut self, tick: Tick, context: &mut C) {
        let Some(event) = self.pin.sample(&tick) else {
            return;
        };
        let callback = if event.is_change() {
            self.on_change_state
        } else {
            self.on_long_hold
        };
        fire(callback, self.pin.tag(), context);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PinTiming;
    use crate::pin::Level;

    use super::*;

    struct Scripted {
        level: Level,
        setups: u8,
    }

    impl PinDriver for Scripted {
        fn setup(&mut self, _pin: PinId) {
            self.setups += 1;
        }

        fn read(&mut self, _pin: PinId) -> Level {
            self.level
        }
    }

    #[derive(Default)]
    struct Seen {
        changes: u8,
        holds: u8,
        last_tag: Option<Tag>,
    }

    fn changed(tag: Tag, seen: &mut Seen) {
        seen.changes += 1;
        seen.last_tag = Some(tag);
    }

    fn held(tag: Tag, seen: &mut Seen) {
        seen.holds += 1;
        seen.last_tag = Some(tag);
    }

    const TIMING: PinTiming = PinTiming::new(10, 50, 10);

    #[test]
    fn routes_events_to_callbacks_with_tag() {
        let driver = Scripted {
            level: Level::High,
            setups: 0,
        };
        let mut source = DigitalPinSource::new(PinId(3), 42, driver)
            .with_on_change(changed)
            .with_on_long_hold(held);
        let mut seen = Seen::default();

        source.setup();
        assert_eq!(source.pin().driver.setups, 1);

        source.pin_mut().driver_mut().level = Level::Low;
        for now in 500..=600 {
            source.poll(Tick::new(now, TIMING), &mut seen);
        }

        assert!(source.is_active());
        assert!(source.is_long_hold());
        assert_eq!(seen.changes, 1);
        assert_eq!(seen.holds, 1);
        assert_eq!(seen.last_tag, Some(42));
    }

    #[test]
    fn missing_callbacks_are_skipped() {
        let driver = Scripted {
            level: Level::Low,
            setups: 0,
        };
        let mut source: DigitalPinSource<_, Seen> = DigitalPinSource::new(PinId(1), 1, driver);
        let mut seen = Seen::default();
        for now in 0..=200 {
            source.poll(Tick::new(now, TIMING), &mut seen);
        }
        assert!(source.is_active());
        assert_eq!(seen.changes, 0);
    }
}
