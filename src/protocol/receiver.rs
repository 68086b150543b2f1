// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt-driven frame receiver.
//!
//! Bytes are pushed one at a time from the RX interrupt. A frame starts with the receive magic,
//! its second byte gives the payload length, and it is accepted only if the exclusive-or of all
//! its bytes is zero. One finished frame is buffered at a time: no new frame starts until the
//! main loop has taken the pending one. Errors are never reported upstream; the host retries
//! on its own timeout.

use crate::config::{FRAME_CAPACITY, RECEIVE_MAGIC, RECEIVE_TIMEOUT_MS};
use crate::protocol::messages::{Frame, FRAME_OVERHEAD};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Idle,
    Receiving { next: usize, xor: u8 },
}

pub struct FrameReceiver {
    state: State,
    buf: [u8; FRAME_CAPACITY],
    idle_ms: u8,
    pending: bool,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReceiver {
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            buf: [0; FRAME_CAPACITY],
            idle_ms: 0,
            pending: false,
        }
    }

    /// Advance the inter-byte gap timer by 1 ms.
    #[inline]
    pub fn tick_1ms(&mut self) {
        self.idle_ms = self.idle_ms.saturating_add(1);
    }

    /// Framing, parity or overrun error on the line: drop the frame in progress.
    #[inline]
    pub fn on_line_error(&mut self) {
        self.state = State::Idle;
    }

    /// `true` while a frame is partially received.
    #[inline]
    pub fn is_receiving(&self) -> bool {
        matches!(self.state, State::Receiving { .. })
    }

    /// A verified frame is waiting for [`take_frame`](Self::take_frame).
    #[inline]
    pub fn frame_ready(&self) -> bool {
        self.pending
    }

    /// Hand the pending frame to the consumer and free the buffer.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(Frame::from_buffer(self.buf))
    }

    /// Process one received byte.
    pub fn on_byte(&mut self, byte: u8) {
        if self.is_receiving() && self.idle_ms > RECEIVE_TIMEOUT_MS {
            self.state = State::Idle;
        }
        self.idle_ms = 0;

        match self.state {
            State::Idle => {
                if !self.pending && byte == RECEIVE_MAGIC {
                    self.buf[0] = byte;
                    self.state = State::Receiving { next: 1, xor: byte };
                }
            }
            State::Receiving { next, xor } => {
                self.buf[next] = byte;
                let next = next + 1;
                let xor = xor ^ byte;

                // buf[1] is the length byte and is present from here on.
                let total = self.buf[1] as usize + FRAME_OVERHEAD;
                if total > FRAME_CAPACITY {
                    self.state = State::Idle;
                } else if next == total {
                    self.state = State::Idle;
                    self.pending = xor == 0;
                } else {
                    self.state = State::Receiving { next, xor };
                }
            }
        }
    }
}
