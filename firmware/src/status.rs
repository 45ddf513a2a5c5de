#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Shared counters for panel activity.
//!
//! Callbacks bump these from the poll task; the indicator task reads them for
//! its periodic status line.

use portable_atomic::{AtomicU32, Ordering};

static PRESSES: AtomicU32 = AtomicU32::new(0);
static LONG_PRESSES: AtomicU32 = AtomicU32::new(0);
static FLIPS: AtomicU32 = AtomicU32::new(0);

/// Point-in-time copy of the counters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct PanelCounters {
    pub presses: u32,
    pub long_presses: u32,
    pub flips: u32,
}

pub fn record_press() {
    PRESSES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_long_press() {
    LONG_PRESSES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_flip() {
    FLIPS.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> PanelCounters {
    PanelCounters {
        presses: PRESSES.load(Ordering::Relaxed),
        long_presses: LONG_PRESSES.load(Ordering::Relaxed),
        flips: FLIPS.load(Ordering::Relaxed),
    }
}
