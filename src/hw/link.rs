// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt-driven host link on USART2.
//!
//! The HAL sets up baud rate and pins; the interrupt path then talks to the USART registers
//! directly so receive errors can be told apart from data and the transmit-complete event can
//! pace the outgoing frame.

use core::convert::Infallible;

use embedded_hal::serial;
use stm32f7xx_hal::{
    pac,
    serial::{Pins, Serial},
};

use crate::protocol::{FrameReceiver, FrameTransmitter};

/// Byte-level access to USART2. Writes go straight to TDR.
pub struct HostPort {
    _private: (),
}

impl HostPort {
    #[inline]
    fn regs() -> &'static pac::usart1::RegisterBlock {
        // SAFETY: HostLink owns USART2 through the HAL `Serial`; this is the only register user.
        unsafe { &*pac::USART2::ptr() }
    }
}

impl serial::Write<u8> for HostPort {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        let usart = Self::regs();
        if usart.isr.read().txe().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        usart.tdr.write(|w| unsafe { w.tdr().bits(byte.into()) });
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if Self::regs().isr.read().tc().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }
}

/// Receiver, transmitter and port bundled for use from the USART2 interrupt and the main loop.
pub struct HostLink<PINS> {
    _serial: Serial<pac::USART2, PINS>,
    port: HostPort,
    pub rx: FrameReceiver,
    pub tx: FrameTransmitter,
}

impl<PINS: Pins<pac::USART2>> HostLink<PINS> {
    /// Take a configured serial port and enable the RX and TX-complete interrupts.
    pub fn new(serial: Serial<pac::USART2, PINS>) -> Self {
        HostPort::regs()
            .cr1
            .modify(|_, w| w.rxneie().set_bit().tcie().set_bit());
        Self {
            _serial: serial,
            port: HostPort { _private: () },
            rx: FrameReceiver::new(),
            tx: FrameTransmitter::new(),
        }
    }

    /// Start sending the frame currently held by the transmitter.
    pub fn start_send(&mut self) -> bool {
        self.tx.send(&mut self.port).is_ok()
    }

    /// Service the USART2 interrupt.
    pub fn on_interrupt(&mut self) {
        let usart = HostPort::regs();
        let isr = usart.isr.read();

        if isr.fe().bit_is_set() || isr.ore().bit_is_set() || isr.pe().bit_is_set() {
            let _ = usart.rdr.read().bits();
            usart
                .icr
                .write(|w| w.fecf().set_bit().orecf().set_bit().pecf().set_bit());
            self.rx.on_line_error();
        } else if isr.rxne().bit_is_set() {
            let byte = usart.rdr.read().rdr().bits() as u8;
            self.rx.on_byte(byte);
        }

        if isr.tc().bit_is_set() && !self.tx.on_transmit_complete(&mut self.port) {
            usart.icr.write(|w| w.tccf().set_bit());
        }
    }
}
