//! Poll loop driver tying a clock, the pin thresholds and a set of sources together.
//!
//! The sources are owned as one value, usually a struct or tuple that
//! implements [`EventSource`], so the application can still reach individual
//! timers through [`Eventline::sources_mut`] between ticks. The set is fixed
//! when the dispatcher is built.

use core::marker::PhantomData;

use crate::clock::{Clock, Millis};
use crate::config::PinTiming;
use crate::source::{EventSource, Tick};

/// Runs `setup` once and `poll` on every tick for a fixed set of sources.
pub struct Eventline<K, S, C = ()> {
    clock: K,
    timing: PinTiming,
    sources: S,
    started: bool,
    _context: PhantomData<fn(&mut C)>,
}

impl<K, S, C> Eventline<K, S, C>
where
    K: Clock,
    S: EventSource<C>,
{
    /// Creates a dispatcher using the default pin thresholds.
    pub fn new(clock: K, sources: S) -> Self {
        Self::with_timing(clock, sources, PinTiming::DEFAULT)
    }

    pub fn with_timing(clock: K, sources: S, timing: PinTiming) -> Self {
        Self {
            clock,
            timing,
            sources,
            started: false,
            _context: PhantomData,
        }
    }

    /// Calls `setup` on every source. Only the first call has any effect.
    pub fn begin(&mut self) {
        if self.started {
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::trace!("eventline: setting up sources");
        self.sources.setup();
        self.started = true;
    }

    /// Polls every source once with a single clock reading.
    ///
    /// Runs [`Eventline::begin`] first if it has not been called yet.
    pub fn poll(&mut self, context: &mut C) {
        self.begin();
        let tick = self.tick();
        self.sources.poll(tick, context);
    }

    /// Builds the tick the next poll would use.
    pub fn tick(&self) -> Tick {
        Tick::new(self.clock.now_millis(), self.timing)
    }

    /// Current clock reading, for starting timers.
    pub fn now(&self) -> Millis {
        self.clock.now_millis()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn timing(&self) -> PinTiming {
        self.timing
    }

    /// Replaces all pin thresholds; applies from the next poll.
    pub fn set_timing(&mut self, timing: PinTiming) {
        self.timing = timing;
    }

    pub fn set_debounce_ms(&mut self, debounce_ms: u16) {
        self.timing.debounce_ms = debounce_ms;
    }

    pub fn set_long_hold_ms(&mut self, long_hold_ms: u16) {
        self.timing.long_hold_ms = long_hold_ms;
    }

    pub fn set_repeat_ms(&mut self, repeat_ms: u16) {
        self.timing.repeat_ms = repeat_ms;
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn sources(&self) -> &S {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut S {
        &mut self.sources
    }

    /// Splits the dispatcher back into its clock and sources.
    pub fn into_parts(self) -> (K, S) {
        (self.clock, self.sources)
    }
}
