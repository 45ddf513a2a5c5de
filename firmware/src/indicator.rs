#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Status LED commands and the state the indicator task keeps for them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Request sent from the poll task to the indicator task.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum LedCommand {
    On,
    Off,
    Toggle,
}

/// Latest-wins mailbox between the poll task and the indicator task.
pub type LedSignal = Signal<CriticalSectionRawMutex, LedCommand>;

/// Tracks whether the LED is lit.
#[derive(Debug, Default)]
pub struct Indicator {
    lit: bool,
}

impl Indicator {
    /// Applies `command` and returns the level the LED should now show.
    pub fn apply(&mut self, command: LedCommand) -> bool {
        self.lit = match command {
            LedCommand::On => true,
            LedCommand::Off => false,
            LedCommand::Toggle => !self.lit,
        };
        self.lit
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
