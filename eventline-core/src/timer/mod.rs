//! One-shot and interval timers backed by a packed, truncated deadline.
//!
//! Timers store only the low bits of their expiration time, packed with two
//! status bits into a single `u16` or `u32` word (see [`Deadline`]). The 16-bit
//! flavour covers a little over eight seconds in two bytes; the 32-bit flavour
//! covers about six days.

use core::fmt;
use core::time::Duration;

pub mod deadline;
pub mod interval;
pub mod oneshot;

pub use deadline::Deadline;
pub use interval::IntervalTimer;
pub use oneshot::Timer;

/// One-shot timer in a 16-bit word. Durations top out at 8 192 ms.
pub type Timer16<C = ()> = Timer<u16, C>;
/// One-shot timer in a 32-bit word.
pub type Timer32<C = ()> = Timer<u32, C>;
/// Repeating timer in a 16-bit word. Periods top out at 8 192 ms.
pub type IntervalTimer16<C = ()> = IntervalTimer<u16, C>;
/// Repeating timer in a 32-bit word.
pub type IntervalTimer32<C = ()> = IntervalTimer<u32, C>;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// Unsigned word a [`Deadline`] can be packed into.
pub trait TimerWord: Copy + Eq + fmt::Debug + sealed::Sealed {
    /// Width of the word in bits.
    const BITS: u32;
    /// All bits clear: an idle deadline.
    const ZERO: Self;

    /// Narrows `bits` to this width, dropping high bits.
    fn from_bits(bits: u32) -> Self;

    /// Widens the word.
    fn into_bits(self) -> u32;
}

impl TimerWord for u16 {
    const BITS: u32 = u16::BITS;
    const ZERO: Self = 0;

    #[allow(clippy::cast_possible_truncation)]
    fn from_bits(bits: u32) -> Self {
        bits as u16
    }

    fn into_bits(self) -> u32 {
        u32::from(self)
    }
}

impl TimerWord for u32 {
    const BITS: u32 = u32::BITS;
    const ZERO: Self = 0;

    fn from_bits(bits: u32) -> Self {
        bits
    }

    fn into_bits(self) -> u32 {
        self
    }
}

/// Reasons a timer refuses to start.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Duration does not fit the timer's truncated deadline field.
    DurationOutOfRange { requested_ms: u64, max_ms: u32 },
    /// Interval timers need a non-zero period.
    ZeroInterval,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::DurationOutOfRange {
                requested_ms,
                max_ms,
            } => write!(f, "duration {requested_ms} ms exceeds timer range of {max_ms} ms"),
            TimerError::ZeroInterval => f.write_str("interval must be at least 1 ms"),
        }
    }
}

/// Converts `duration` to whole milliseconds, rounding up so a timer never
/// fires early, and checks it against `max_ms`.
pub(crate) fn duration_to_millis(duration: Duration, max_ms: u32) -> Result<u32, TimerError> {
    let millis = duration.as_nanos().div_ceil(1_000_000);
    u32::try_from(millis)
        .ok()
        .filter(|&millis| millis <= max_ms)
        .ok_or(TimerError::DurationOutOfRange {
            requested_ms: u64::try_from(millis).unwrap_or(u64::MAX),
            max_ms,
        })
        .inspect_err(|error| {
            #[cfg(feature = "defmt")]
            defmt::debug!("timer: {}", error);
            #[cfg(not(feature = "defmt"))]
            let _ = error;
        })
}
