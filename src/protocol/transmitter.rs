// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Single-frame transmitter.
//!
//! The frame is assembled in place, checksummed, and then sent one byte per transmit-complete
//! interrupt. The first byte is written synchronously. There is no queue: while a frame is in
//! flight the buffer is locked and [`FrameTransmitter::can_fill`] is `false`.

use embedded_hal::serial;
use nb::block;

use crate::config::{FRAME_CAPACITY, SEND_MAGIC};
use crate::protocol::messages::FRAME_OVERHEAD;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SendError {
    /// A frame is still being transmitted.
    Busy,
    /// The frame does not fit the transmit buffer.
    TooLarge,
}

pub struct FrameTransmitter {
    buf: [u8; FRAME_CAPACITY],
    next: usize,
    sending: bool,
}

impl Default for FrameTransmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTransmitter {
    pub fn new() -> Self {
        let mut buf = [0; FRAME_CAPACITY];
        buf[0] = SEND_MAGIC;
        Self {
            buf,
            next: 0,
            sending: false,
        }
    }

    /// `true` when a new frame may be written into the buffer.
    #[inline]
    pub fn can_fill(&self) -> bool {
        !self.sending
    }

    #[inline]
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Raw access to the frame buffer, refused while sending.
    pub fn buffer_mut(&mut self) -> Result<&mut [u8; FRAME_CAPACITY], SendError> {
        if self.sending {
            return Err(SendError::Busy);
        }
        Ok(&mut self.buf)
    }

    /// Bytes of the frame currently in the buffer, as given by its length field.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.buf[1] as usize + FRAME_OVERHEAD
    }

    /// Assemble `magic, len, command, payload` in the buffer. The checksum is added by `send`.
    pub fn fill(&mut self, command: u8, payload: &[u8]) -> Result<(), SendError> {
        if self.sending {
            return Err(SendError::Busy);
        }
        if payload.len() + FRAME_OVERHEAD > FRAME_CAPACITY {
            return Err(SendError::TooLarge);
        }

        self.buf[0] = SEND_MAGIC;
        self.buf[1] = payload.len() as u8;
        self.buf[2] = command;
        self.buf[3..3 + payload.len()].copy_from_slice(payload);
        Ok(())
    }

    /// Checksum the buffered frame and start sending it.
    ///
    /// Blocks until the transmit register takes the first byte; the rest goes out from
    /// [`on_transmit_complete`](Self::on_transmit_complete).
    pub fn send<W: serial::Write<u8>>(&mut self, tx: &mut W) -> Result<(), SendError> {
        if self.sending {
            return Err(SendError::Busy);
        }
        let total = self.frame_len();
        if total > FRAME_CAPACITY {
            return Err(SendError::TooLarge);
        }

        self.buf[total - 1] = self.buf[..total - 1].iter().fold(0, |acc, b| acc ^ b);
        self.sending = true;
        self.next = 0;
        self.write_next(tx);
        Ok(())
    }

    /// Transmit-complete interrupt: push the next byte or release the buffer.
    ///
    /// Returns `true` while the frame is still in flight.
    pub fn on_transmit_complete<W: serial::Write<u8>>(&mut self, tx: &mut W) -> bool {
        if !self.sending {
            return false;
        }
        if self.next < self.frame_len() {
            self.write_next(tx);
        } else {
            self.sending = false;
        }
        self.sending
    }

    fn write_next<W: serial::Write<u8>>(&mut self, tx: &mut W) {
        let _ = block!(tx.write(self.buf[self.next]));
        self.next += 1;
    }
}
