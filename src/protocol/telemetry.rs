// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Set of telemetry frames waiting to be sent, keyed by kind and side.
//!
//! Frames go out in a fixed order: sensors before positions before targets, side A before
//! side B within each kind.

use crate::panel::Side;
use crate::protocol::messages::{MSG_POS, MSG_SENS, MSG_TARGET};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryKind {
    Sensors,
    Positions,
    Targets,
}

impl TelemetryKind {
    /// Send order.
    pub const ALL: [TelemetryKind; 3] = [
        TelemetryKind::Sensors,
        TelemetryKind::Positions,
        TelemetryKind::Targets,
    ];

    /// Command byte of the outgoing frame.
    pub fn command(self) -> u8 {
        match self {
            TelemetryKind::Sensors => MSG_SENS,
            TelemetryKind::Positions => MSG_POS,
            TelemetryKind::Targets => MSG_TARGET,
        }
    }

    fn ordinal(self) -> usize {
        match self {
            TelemetryKind::Sensors => 0,
            TelemetryKind::Positions => 1,
            TelemetryKind::Targets => 2,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PendingTelemetry {
    bits: u8,
}

impl PendingTelemetry {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    #[inline]
    fn bit(kind: TelemetryKind, side: Side) -> u8 {
        1 << (kind.ordinal() * Side::ALL.len() + side.index())
    }

    pub fn mark(&mut self, kind: TelemetryKind, side: Side) {
        self.bits |= Self::bit(kind, side);
    }

    pub fn mark_sides(&mut self, kind: TelemetryKind, sides: &[Side]) {
        for &side in sides {
            self.mark(kind, side);
        }
    }

    #[inline]
    pub fn is_marked(&self, kind: TelemetryKind, side: Side) -> bool {
        self.bits & Self::bit(kind, side) != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// The next frame to send, without removing it.
    pub fn peek(&self) -> Option<(TelemetryKind, Side)> {
        TelemetryKind::ALL
            .into_iter()
            .flat_map(|kind| Side::ALL.into_iter().map(move |side| (kind, side)))
            .find(|&(kind, side)| self.is_marked(kind, side))
    }

    /// Remove and return the next frame to send.
    pub fn pop(&mut self) -> Option<(TelemetryKind, Side)> {
        let next = self.peek()?;
        self.bits &= !Self::bit(next.0, next.1);
        Some(next)
    }
}
