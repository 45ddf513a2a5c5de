#![no_std]

// Polled event sources for microcontroller inputs.
//
// Debounced digital pins, buttons, toggles and wraparound-tolerant timers that
// turn sampled signals into callback invocations. Nothing here allocates or
// touches hardware directly: the clock and pin reads are supplied by the
// firmware or host that embeds the crate.

pub mod button;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod pin;
pub mod source;
pub mod timer;
pub mod toggle;

pub use button::Button;
pub use clock::{Clock, FnClock, ManualClock, Millis};
pub use config::PinTiming;
pub use dispatch::Eventline;
pub use pin::{
    DigitalPin, DigitalPinSource, FnPinDriver, HalInput, Level, PinDriver, PinEvent, PinId,
    PinState, Polarity,
};
pub use source::{Callback, EventSource, Tag, Tick};
pub use timer::{
    IntervalTimer, IntervalTimer16, IntervalTimer32, Timer, Timer16, Timer32, TimerError,
    TimerWord,
};
pub use toggle::Toggle;
