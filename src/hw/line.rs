// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Digital output that remembers its active level and last logical state.

use embedded_hal::digital::v2::OutputPin;

/// Whether the line is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

pub struct OutputLine<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin> OutputLine<PIN> {
    /// Wrap `pin`, initialising it to the inactive level.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut line = Self {
            pin,
            active,
            is_on: false,
        };
        line.set(false);
        line
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Drive the line logically active (true) or inactive (false).
    pub fn set(&mut self, on: bool) {
        match (self.active, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high().ok(),
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low().ok(),
        };
        self.is_on = on;
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}
