//! Wraparound-tolerant expiration check over a truncated timestamp.
//!
//! A deadline packs three things into one word of `S` bits:
//!
//! ```text
//!  S-1        S-2                 S-3 ..................... 0
//! [active] [overflow suspected] [low S-2 bits of the expiration time]
//! ```
//!
//! Only the low `S-2` bits of the millisecond clock take part in the
//! comparison, so the stored field wraps every `2^(S-2)` ms (16 384 ms for a
//! 16-bit word). Durations are limited to half that period, which keeps every
//! pending deadline within half a field period of "now" and makes the signed
//! field difference between the two unambiguous.
//!
//! When arming carries the expiration past the top of the field, the
//! overflow-suspected bit is set: the deadline belongs to the next field
//! period and cannot be due until the truncated clock has wrapped too, which
//! is observed as the clock's top field bit clearing.
//!
//! A deadline polled more than half a field period late may be missed until
//! the field comes round again. Polling is expected to be far more frequent.

use crate::clock::Millis;

use super::TimerWord;

/// Packed expiration state of one timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Deadline<W> {
    word: W,
}

impl<W> Deadline<W>
where
    W: TimerWord,
{
    const ACTIVE: u32 = 1 << (W::BITS - 1);
    const SUSPECT: u32 = 1 << (W::BITS - 2);
    const FIELD_MASK: u32 = Self::SUSPECT - 1;
    const FIELD_TOP: u32 = 1 << (W::BITS - 3);

    /// Longest duration that can be armed, in milliseconds.
    pub const MAX_MILLIS: u32 = Self::FIELD_TOP;

    /// An inactive deadline.
    #[must_use]
    pub const fn idle() -> Self {
        Self { word: W::ZERO }
    }

    fn bits(self) -> u32 {
        self.word.into_bits()
    }

    #[must_use]
    pub fn is_armed(self) -> bool {
        self.bits() & Self::ACTIVE != 0
    }

    /// Internal hint that the stored expiration lies past a field wrap.
    #[must_use]
    pub fn overflow_suspected(self) -> bool {
        self.bits() & Self::SUSPECT != 0
    }

    /// Truncated expiration field. Meaningful only while armed.
    #[must_use]
    pub fn expiration_field(self) -> u32 {
        self.bits() & Self::FIELD_MASK
    }

    /// Arms the deadline `duration_ms` after `now`.
    ///
    /// `duration_ms` must not exceed [`Self::MAX_MILLIS`]; timers validate it
    /// before calling.
    pub fn arm(&mut self, now: Millis, duration_ms: u32) {
        debug_assert!(duration_ms <= Self::MAX_MILLIS);
        let now = now & Self::FIELD_MASK;
        let expires = now.wrapping_add(duration_ms) & Self::FIELD_MASK;

        let mut bits = Self::ACTIVE | expires;
        if now & Self::FIELD_TOP != 0 && expires & Self::FIELD_TOP == 0 {
            bits |= Self::SUSPECT;
        }
        self.word = W::from_bits(bits);
    }

    /// Clears the whole word.
    pub fn disarm(&mut self) {
        self.word = W::ZERO;
    }

    /// Checks the deadline against `now`, resolving a pending overflow
    /// suspicion once the clock has wrapped as well.
    pub fn poll_expired(&mut self, now: Millis) -> bool {
        if !self.is_armed() {
            return false;
        }
        let now = now & Self::FIELD_MASK;
        if self.overflow_suspected() && now & Self::FIELD_TOP == 0 {
            self.word = W::from_bits(self.bits() & !Self::SUSPECT);
        }
        self.is_due(now)
    }

    /// Milliseconds left until the deadline, `Some(0)` once due, `None` when idle.
    #[must_use]
    pub fn remaining(self, now: Millis) -> Option<u32> {
        if !self.is_armed() {
            return None;
        }
        let now = now & Self::FIELD_MASK;
        if self.is_due(now) {
            Some(0)
        } else {
            Some(self.expiration_field().wrapping_sub(now) & Self::FIELD_MASK)
        }
    }

    fn is_due(self, now: u32) -> bool {
        if self.overflow_suspected() && now & Self::FIELD_TOP != 0 {
            // The clock has not wrapped yet; the deadline sits in the next
            // field period.
            return false;
        }
        // Signed field difference: non-negative once `now` has reached the
        // expiration.
        now.wrapping_sub(self.expiration_field()) & Self::FIELD_MASK < Self::FIELD_TOP
    }
}

impl<W> Default for Deadline<W>
where
    W: TimerWord,
{
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Narrow = Deadline<u16>;

    #[test]
    fn field_geometry_matches_word_width() {
        assert_eq!(Narrow::MAX_MILLIS, 8_192);
        assert_eq!(Deadline::<u32>::MAX_MILLIS, 536_870_912);
        assert_eq!(core::mem::size_of::<Narrow>(), 2);
    }

    #[test]
    fn fires_at_expiration() {
        let mut deadline = Narrow::idle();
        deadline.arm(1_000, 100);
        assert!(!deadline.poll_expired(1_099));
        assert_eq!(deadline.remaining(1_050), Some(50));
        assert!(deadline.poll_expired(1_100));
        assert!(deadline.poll_expired(1_250));
    }

    #[test]
    fn carry_past_field_top_sets_suspicion() {
        let mut deadline = Narrow::idle();
        // 16_380 is near the top of the 14-bit field.
        deadline.arm(16_380, 10);
        assert!(deadline.overflow_suspected());
        assert_eq!(deadline.expiration_field(), 6);

        assert!(!deadline.poll_expired(16_383));
        assert!(deadline.overflow_suspected());
        assert!(!deadline.poll_expired(16_385));
        assert!(!deadline.overflow_suspected());
        assert!(deadline.poll_expired(16_390));
    }

    #[test]
    fn late_poll_after_field_wrap_still_fires() {
        let mut deadline = Narrow::idle();
        deadline.arm(16_370, 10);
        assert!(!deadline.overflow_suspected());
        assert!(deadline.poll_expired(16_386));
    }

    #[test]
    fn idle_deadline_never_expires() {
        let mut deadline = Narrow::idle();
        assert!(!deadline.poll_expired(0));
        assert_eq!(deadline.remaining(0), None);
        deadline.arm(5, 5);
        deadline.disarm();
        assert!(!deadline.is_armed());
        assert!(!deadline.poll_expired(100));
    }

    #[test]
    fn max_duration_is_not_due_immediately() {
        let mut deadline = Narrow::idle();
        deadline.arm(12_000, Narrow::MAX_MILLIS);
        assert!(!deadline.poll_expired(12_000));
        assert!(!deadline.poll_expired(12_000 + Narrow::MAX_MILLIS - 1));
        assert!(deadline.poll_expired(12_000 + Narrow::MAX_MILLIS));
    }
}
