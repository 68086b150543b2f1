// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Collaborator interfaces between the panel engine and the board.
//!
//! The engine never touches registers. It drives named signal lines through [`PanelIo`] and
//! moves bytes through the shared shift-register chain with [`ShiftBus`], so the same engine
//! runs against the STM32 board in `hw` and against recording mocks on the host.

/// Named output lines of the panel board.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// Drive enable, positive coil polarity.
    DrivePositive,
    /// Drive enable, negative coil polarity.
    DriveNegative,
    /// Routes the "moved" opto bank onto the sensor chain.
    SenseMoved,
    /// Routes the "reset" opto bank onto the sensor chain.
    SenseReset,
    /// Output latch of the drive shift registers (CD4094).
    Strobe,
    /// Parallel load of the sensor shift registers (CD4021).
    Load,
    /// Relay connecting side A to the shared bus.
    RelayA,
    /// Relay connecting side B to the shared bus.
    RelayB,
    LedGreen,
    LedYellow,
    LedRed,
}

/// Signal-level output capability.
pub trait PanelIo {
    /// Drive `line` logically active (`true`) or inactive (`false`).
    fn set_line(&mut self, line: Line, active: bool);

    #[inline]
    fn assert(&mut self, line: Line) {
        self.set_line(line, true);
    }

    #[inline]
    fn deassert(&mut self, line: Line) {
        self.set_line(line, false);
    }
}

/// Byte transport over the shared shift-register chain.
pub trait ShiftBus {
    type Error;

    /// Shift `bytes` out to the drive registers, first byte first.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Shift `buf.len()` bytes in from the sensor registers.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}
