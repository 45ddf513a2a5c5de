#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Board constants for the front panel.
//!
//! Wiring on the STM32G0B1 board:
//!
//! | Signal        | Pin | Notes                                   |
//! |---------------|-----|-----------------------------------------|
//! | push button   | PB2 | to ground, internal pull-up, active low |
//! | toggle switch | PB3 | to ground, internal pull-up, active low |
//! | status LED    | PA6 | push-pull, lit when high                |

use core::time::Duration;

use eventline_core::{PinId, PinTiming, Tag};

/// How often the poll task samples inputs and timers.
pub const POLL_PERIOD: embassy_time::Duration = embassy_time::Duration::from_millis(5);

/// How long the indicator task waits for LED work before logging counters.
pub const STATUS_PERIOD: embassy_time::Duration = embassy_time::Duration::from_secs(30);

/// Panel switches are noisier than the library defaults assume.
pub const PANEL_TIMING: PinTiming = PinTiming::new(30, 800, 250);

/// LED pulse length after a short press.
pub const BLINK: Duration = Duration::from_millis(120);

/// Heartbeat period toggled by a long press.
pub const HEARTBEAT: Duration = Duration::from_millis(1_000);

/// Port B line numbers, used only to identify inputs in logs.
pub const BUTTON_PIN: PinId = PinId(2);
pub const TOGGLE_PIN: PinId = PinId(3);

pub const BUTTON_TAG: Tag = 0;
pub const TOGGLE_TAG: Tag = 1;
pub const BLINK_TAG: Tag = 2;
pub const HEARTBEAT_TAG: Tag = 3;
