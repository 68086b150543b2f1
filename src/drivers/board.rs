// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Solari control board: sensor chain, drive chain and coil drivers.
//!
//! Both shift-register chains share one bus. The sensor chain is a row of CD4021 parallel-in
//! registers behind two opto banks; the drive chain is a row of CD4094 serial-in registers
//! feeding the coil drivers. Bank order and settle delays are a hardware contract: the moved
//! bank is captured before the reset bank, each after `SENSOR_SETTLE_US`.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::config::{DRIVE_SETUP_US, FLAP_BYTES, LATCH_PULSE_US, SENSOR_SETTLE_US};
use crate::drivers::io::{Line, PanelIo, ShiftBus};
use crate::panel::bitmap::{Active, UnitBitmap};

/// Coil current direction of one drive pulse.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }

    fn line(self) -> Line {
        match self {
            Polarity::Positive => Line::DrivePositive,
            Polarity::Negative => Line::DriveNegative,
        }
    }
}

/// One capture of both sensor banks, decoded into unit order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SensorCapture {
    pub moved: UnitBitmap,
    pub reset: UnitBitmap,
}

/// Board driver owning the I/O lines, the shift bus and a blocking delay.
pub struct PanelDriver<IO, BUS, D> {
    io: IO,
    bus: BUS,
    delay: D,
}

impl<IO, BUS, D> PanelDriver<IO, BUS, D>
where
    IO: PanelIo,
    BUS: ShiftBus,
    D: DelayUs<u32> + DelayMs<u32>,
{
    pub fn new(io: IO, bus: BUS, delay: D) -> Self {
        Self { io, bus, delay }
    }

    /// Release the collaborators.
    pub fn free(self) -> (IO, BUS, D) {
        (self.io, self.bus, self.delay)
    }

    #[inline]
    pub fn io(&mut self) -> &mut IO {
        &mut self.io
    }

    #[inline]
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Capture the moved bank, then the reset bank, of the connected side.
    pub fn read_sensors(&mut self) -> Result<SensorCapture, BUS::Error> {
        let captured = self.capture_banks();

        // Leave both banks deselected even when the bus failed.
        self.io.deassert(Line::SenseMoved);
        self.io.deassert(Line::SenseReset);

        let (moved, reset) = captured?;
        Ok(SensorCapture {
            moved: UnitBitmap::from_sensor(&moved, Active::High),
            reset: UnitBitmap::from_sensor(&reset, Active::Low),
        })
    }

    fn capture_banks(&mut self) -> Result<([u8; FLAP_BYTES], [u8; FLAP_BYTES]), BUS::Error> {
        let moved = self.capture_bank(Line::SenseMoved, Line::SenseReset)?;
        let reset = self.capture_bank(Line::SenseReset, Line::SenseMoved)?;
        Ok((moved, reset))
    }

    fn capture_bank(&mut self, bank: Line, other: Line) -> Result<[u8; FLAP_BYTES], BUS::Error> {
        self.io.deassert(other);
        self.io.assert(bank);
        self.delay.delay_us(SENSOR_SETTLE_US);

        self.io.assert(Line::Load);
        self.delay.delay_us(LATCH_PULSE_US);
        self.io.deassert(Line::Load);
        self.delay.delay_us(LATCH_PULSE_US);

        let mut raw = [0u8; FLAP_BYTES];
        self.bus.read(&mut raw)?;
        Ok(raw)
    }

    /// Switch both coil driver enables off.
    pub fn drive_off(&mut self) {
        self.io.deassert(Line::DrivePositive);
        self.io.deassert(Line::DriveNegative);
    }

    /// Latch `pulse` into the drive chain and energise it with `polarity`.
    pub fn pulse(&mut self, pulse: &UnitBitmap, polarity: Polarity) -> Result<(), BUS::Error> {
        self.drive_off();
        self.delay.delay_us(DRIVE_SETUP_US);

        self.io.deassert(Line::Strobe);
        self.delay.delay_us(LATCH_PULSE_US);
        self.bus.write(&pulse.to_drive())?;
        self.io.assert(Line::Strobe);
        self.delay.delay_us(DRIVE_SETUP_US);

        self.io.assert(polarity.line());
        Ok(())
    }
}
