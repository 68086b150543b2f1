// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) abstraction layer.
//!
//! `SpiBus` wraps a configured HAL SPI instance with 8-bit words and serves as the shared
//! shift-register bus of the panel. The latch lines (strobe, parallel load) are plain GPIO and
//! are driven by the board driver, not here.

use stm32f7xx_hal::{
    prelude::*,
    spi::{self, Enabled, Spi},
};

use crate::drivers::ShiftBus;

/// Wrapper around an enabled HAL SPI instance (8-bit words).
pub struct SpiBus<I, P> {
    spi: Spi<I, P, Enabled<u8>>,
}

impl<I, P> SpiBus<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    pub fn new(spi: Spi<I, P, Enabled<u8>>) -> Self {
        Self { spi }
    }

    /// Perform a blocking, full-duplex transfer of one byte.
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8, spi::Error> {
        let mut tmp = [byte];
        self.spi.transfer(&mut tmp)?;
        Ok(tmp[0])
    }

    /// Transfer a byte buffer in-place.
    pub fn transfer_in_place(&mut self, buf: &mut [u8]) -> Result<(), spi::Error> {
        for b in buf.iter_mut() {
            *b = self.transfer_byte(*b)?;
        }
        Ok(())
    }

    pub fn free(self) -> Spi<I, P, Enabled<u8>> {
        self.spi
    }
}

impl<I, P> ShiftBus for SpiBus<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    type Error = spi::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), spi::Error> {
        for &b in bytes {
            self.transfer_byte(b)?;
        }
        Ok(())
    }

    /// Clock the sensor chain in, sending zeros.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), spi::Error> {
        buf.fill(0);
        self.transfer_in_place(buf)
    }
}
