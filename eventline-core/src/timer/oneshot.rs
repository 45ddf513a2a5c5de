//! Timer that fires once and then goes idle.

use core::marker::PhantomData;
use core::time::Duration;

use crate::clock::Millis;
use crate::source::{Callback, EventSource, Tag, Tick};

use super::{Deadline, TimerError, TimerWord, duration_to_millis};

/// One-shot timer. Reusable after it fires or after [`Timer::cancel`].
pub struct Timer<W, C = ()> {
    tag: Tag,
    deadline: Deadline<W>,
    pub on_expire: Option<Callback<C>>,
    _context: PhantomData<fn(&mut C)>,
}

impl<W, C> Timer<W, C>
where
    W: TimerWord,
{
    /// Longest duration accepted by [`Timer::start`].
    pub const MAX_DURATION: Duration = Duration::from_millis(Deadline::<W>::MAX_MILLIS as u64);

    #[must_use]
    pub const fn new(tag: Tag) -> Self {
        Self {
            tag,
            deadline: Deadline::idle(),
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

    /// Arms the timer to fire no sooner than `duration` after `now`.
    ///
    /// Restarts a running timer. Without an `on_expire` callback the call
    /// succeeds but leaves the timer idle.
    pub fn start(&mut self, now: Millis, duration: Duration) -> Result<(), TimerError> {
        let millis = duration_to_millis(duration, Deadline::<W>::MAX_MILLIS)?;
        if self.on_expire.is_some() {
            self.deadline.arm(now, millis);
        }
        Ok(())
    }

    /// Stops the timer. Safe to call when idle.
    pub fn cancel(&mut self) {
        self.deadline.disarm();
    }

    /// Time left before the timer is due, or `None` when idle.
    #[must_use]
    pub fn remaining(&self, now: Millis) -> Option<Duration> {
        self.deadline
            .remaining(now)
            .map(|millis| Duration::from_millis(u64::from(millis)))
    }
}

impl<W, C> EventSource<C> for Timer<W, C>
where
    W: TimerWord,
{
    fn poll(&mut self, tick: Tick, context: &mut C) {
        if !self.deadline.is_armed() {
            return;
        }
        let Some(callback) = self.on_expire else {
            #[cfg(feature = "defmt")]
            defmt::debug!("timer {=u8}: no expiry callback, cancelling", self.tag);
            self.cancel();
            return;
        };
        if self.deadline.poll_expired(tick.now) {
            self.deadline.disarm();
            callback(self.tag, context);
        }
    }
}
