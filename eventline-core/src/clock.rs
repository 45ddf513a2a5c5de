//! Millisecond clock abstraction.
//!
//! Every source measures time against a free-running `u32` millisecond
//! counter that wraps after roughly 49.7 days. Firmware backs the trait with
//! its monotonic timer; hosts and tests use [`ManualClock`].

use core::cell::Cell;

/// Monotonic milliseconds, wrapping at `u32::MAX`.
pub type Millis = u32;

/// Source of the monotonic millisecond counter.
pub trait Clock {
    /// Returns the current counter value. Must be cheap enough to call every poll.
    fn now_millis(&self) -> Millis;
}

impl<K> Clock for &K
where
    K: Clock + ?Sized,
{
    fn now_millis(&self) -> Millis {
        (**self).now_millis()
    }
}

/// Adapter turning a plain function or closure into a [`Clock`].
///
/// ```
/// use eventline_core::{Clock, FnClock};
///
/// let clock = FnClock(|| 42);
/// assert_eq!(clock.now_millis(), 42);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct FnClock<F>(pub F);

impl<F> Clock for FnClock<F>
where
    F: Fn() -> Millis,
{
    fn now_millis(&self) -> Millis {
        (self.0)()
    }
}

/// Clock whose value only moves when told to.
///
/// Interior mutability lets a dispatcher hold a shared reference while the
/// owner keeps advancing time between polls.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub const fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jumps the clock to an absolute value.
    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    /// Moves the clock forward, wrapping like the hardware counter would.
    pub fn advance(&self, millis: Millis) -> Millis {
        let next = self.now.get().wrapping_add(millis);
        self.now.set(next);
        next
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> Millis {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Millis {
        self.now.get()
    }
}
