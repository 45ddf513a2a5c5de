//! Timer that keeps firing at a fixed period until cancelled.
//!
//! Each expiration is scheduled from the previous scheduled time rather than
//! from the moment the poll noticed it, so late polls and slow callbacks do
//! not stretch the period.

use core::marker::PhantomData;
use core::time::Duration;

use crate::clock::Millis;
use crate::source::{Callback, EventSource, Tag, Tick};

use super::{Deadline, TimerError, TimerWord, duration_to_millis};

pub struct IntervalTimer<W, C = ()> {
    tag: Tag,
    deadline: Deadline<W>,
    period_ms: u32,
    base: Millis,
    pub on_expire: Option<Callback<C>>,
    _context: PhantomData<fn(&mut C)>,
}

impl<W, C> IntervalTimer<W, C>
where
    W: TimerWord,
{
    /// Longest period accepted by [`IntervalTimer::start`].
    pub const MAX_PERIOD: Duration = Duration::from_millis(Deadline::<W>::MAX_MILLIS as u64);

    #[must_use]
    pub const fn new(tag: Tag) -> Self {
        Self {
            tag,
            deadline: Deadline::idle(),
            period_ms: 0,
            base: 0,
            on_expire: None,
            _context: PhantomData,
        }
    }

    #[must_use]
    pub fn with_on_expire(mut self, callback: Callback<C>) -> Self {
        self.on_expire = Some(callback);
        self
    }

    #[must_use]
    pub const fn tag(&self) -> Tag {
        self.tag
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deadline.is_armed()
    }

    /// Configured period, zero while idle.
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(u64::from(self.period_ms))
    }

    /// Starts firing every `period`, the first time `period` after `now`.
    ///
    /// Restarts a running timer. Without an `on_expire` callback the call
    /// succeeds but leaves the timer idle.
    pub fn start(&mut self, now: Millis, period: Duration) -> Result<(), TimerError> {
        let millis = duration_to_millis(period, Deadline::<W>::MAX_MILLIS)?;
        if millis == 0 {
            return Err(TimerError::ZeroInterval);
        }
        if self.on_expire.is_none() {
            return Ok(());
        }
        self.period_ms = millis;
        self.base = now;
        self.deadline.arm(now, millis);
        Ok(())
    }

    /// Stops the timer and forgets its period. Safe to call when idle.
    pub fn cancel(&mut self) {
        self.deadline.disarm();
        self.period_ms = 0;
        self.base = 0;
    }

    /// Absolute clock value of the next scheduled expiration.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.is_active()
            .then_some(self.base.wrapping_add(self.period_ms))
    }

    /// Time left before the next expiration, or `None` when idle.
    #[must_use]
    pub fn remaining(&self, now: Millis) -> Option<Duration> {
        self.deadline
            .remaining(now)
            .map(|millis| Duration::from_millis(u64::from(millis)))
    }
}

impl<W, C> EventSource<C> for IntervalTimer<W, C>
where
    W: TimerWord,
{
    fn poll(&mut self, tick: Tick, context: &mut C) {
        if !self.deadline.is_armed() {
            return;
        }
        let Some(callback) = self.on_expire else {
            #[cfg(feature = "defmt")]
            defmt::debug!("interval {=u8}: no expiry callback, cancelling", self.tag);
            self.cancel();
            return;
        };
        if self.deadline.poll_expired(tick.now) {
            self.base = self.base.wrapping_add(self.period_ms);
            self.deadline.arm(self.base, self.period_ms);
            callback(self.tag, context);
        }
    }
}
