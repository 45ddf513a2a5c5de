//! The polled source interface and the callback plumbing shared by all sources.
//!
//! Every source is driven the same way: `setup` once, then `poll` on each tick
//! with a [`Tick`] describing the current time and pin thresholds, plus a
//! caller-owned context that is forwarded untouched to the callbacks.

use crate::clock::Millis;
use crate::config::PinTiming;

/// Application-defined value passed to every callback of a source.
pub type Tag = u8;

/// Event handler. `None` in a callback slot means "no handler".
pub type Callback<C = ()> = fn(Tag, &mut C);

/// Invokes `callback` when one is registered.
#[inline]
pub fn fire<C>(callback: Option<Callback<C>>, tag: Tag, context: &mut C) {
    if let Some(callback) = callback {
        callback(tag, context);
    }
}

/// Snapshot handed to every source for a single poll pass.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// Clock reading taken once for the whole pass.
    pub now: Millis,
    /// Thresholds applied by digital pin sources during this pass.
    pub timing: PinTiming,
}

impl Tick {
    #[must_use]
    pub const fn new(now: Millis, timing: PinTiming) -> Self {
        Self { now, timing }
    }

    /// Tick at `now` using the default thresholds.
    #[must_use]
    pub const fn at(now: Millis) -> Self {
        Self::new(now, PinTiming::DEFAULT)
    }
}

/// Anything that can be set up once and polled repeatedly.
///
/// `C` is the context type forwarded to callbacks; use `()` when callbacks do
/// not need outside state.
pub trait EventSource<C = ()> {
    /// Prepares the source, typically configuring its input pin.
    fn setup(&mut self) {}

    /// Samples the source and invokes any callbacks that are due.
    fn poll(&mut self, tick: Tick, context: &mut C);
}

impl<C, T> EventSource<C> for &mut T
where
    T: EventSource<C> + ?Sized,
{
    fn setup(&mut self) {
        (**self).setup();
    }

    fn poll(&mut self, tick: Tick, context: &mut C) {
        (**self).poll(tick, context);
    }
}

impl<C, T> EventSource<C> for [T]
where
    T: EventSource<C>,
{
    fn setup(&mut self) {
        for source in self.iter_mut() {
            source.setup();
        }
    }

    fn poll(&mut self, tick: Tick, context: &mut C) {
        for source in self.iter_mut() {
            source.poll(tick, context);
        }
    }
}

impl<C, T, const N: usize> EventSource<C> for [T; N]
where
    T: EventSource<C>,
{
    fn setup(&mut self) {
        EventSource::<C>::setup(self.as_mut_slice());
    }

    fn poll(&mut self, tick: Tick, context: &mut C) {
        self.as_mut_slice().poll(tick, context);
    }
}

impl<C, T, const N: usize> EventSource<C> for heapless::Vec<T, N>
where
    T: EventSource<C>,
{
    fn setup(&mut self) {
        EventSource::<C>::setup(self.as_mut_slice());
    }

    fn poll(&mut self, tick: Tick, context: &mut C) {
        self.as_mut_slice().poll(tick, context);
    }
}

macro_rules! tuple_sources {
    ($($member:ident),+) => {
        impl<Ctx, $($member),+> EventSource<Ctx> for ($($member,)+)
        where
            $($member: EventSource<Ctx>,)+
        {
            fn setup(&mut self) {
                #[allow(non_snake_case)]
                let ($($member,)+) = self;
                $($member.setup();)+
            }

            fn poll(&mut self, tick: Tick, context: &mut Ctx) {
                #[allow(non_snake_case)]
                let ($($member,)+) = self;
                $($member.poll(tick, context);)+
            }
        }
    };
}

tuple_sources!(A);
tuple_sources!(A, B);
tuple_sources!(A, B, D);
tuple_sources!(A, B, D, E);
tuple_sources!(A, B, D, E, F);
tuple_sources!(A, B, D, E, F, G);
tuple_sources!(A, B, D, E, F, G, H);
tuple_sources!(A, B, D, E, F, G, H, I);
