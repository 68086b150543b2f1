// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Glue between the host link and the panel engine.
//!
//! Typical main-loop usage:
//!
//! ```ignore
//! if let Some(frame) = receiver.take_frame() {
//!     dispatcher.handle_frame(&mut panel, &frame);
//! }
//! if let Some(side) = panel.tick_1ms()? {
//!     dispatcher.state_changed(side);
//! }
//! if dispatcher.fill_next(&panel, &mut transmitter).is_some() {
//!     transmitter.send(&mut tx)?;
//! }
//! ```

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use log::debug;

use crate::control::scheduler::SidePolicy;
use crate::drivers::{PanelIo, ShiftBus};
use crate::panel::{Panel, Side};
use crate::protocol::messages::{
    encode_positions, encode_sensors, encode_targets, Command, Frame, MAX_PAYLOAD,
};
use crate::protocol::telemetry::{PendingTelemetry, TelemetryKind};
use crate::protocol::transmitter::FrameTransmitter;

pub struct Dispatcher {
    policy: SidePolicy,
    pending: PendingTelemetry,
}

impl Dispatcher {
    pub const fn new(policy: SidePolicy) -> Self {
        Self {
            policy,
            pending: PendingTelemetry::new(),
        }
    }

    #[inline]
    pub fn policy(&self) -> SidePolicy {
        self.policy
    }

    #[inline]
    pub fn pending(&self) -> &PendingTelemetry {
        &self.pending
    }

    /// Queue a telemetry frame.
    pub fn request(&mut self, kind: TelemetryKind, side: Option<Side>) {
        match side {
            Some(side) => self.pending.mark(kind, side),
            None => self.pending.mark_sides(kind, self.policy.sides()),
        }
    }

    /// New sensor data was folded into `side`.
    pub fn state_changed(&mut self, side: Side) {
        self.pending.mark(TelemetryKind::Positions, side);
    }

    /// Decode and execute one received frame. Malformed commands are dropped.
    pub fn handle_frame<IO, BUS, D>(&mut self, panel: &mut Panel<IO, BUS, D>, frame: &Frame)
    where
        IO: PanelIo,
        BUS: ShiftBus,
        D: DelayUs<u32> + DelayMs<u32>,
    {
        match Command::parse(frame) {
            Some(cmd) => self.handle(panel, cmd),
            None => debug!(
                "dropped command {:#04x} ({} payload bytes)",
                frame.command(),
                frame.payload().len()
            ),
        }
    }

    pub fn handle<IO, BUS, D>(&mut self, panel: &mut Panel<IO, BUS, D>, cmd: Command)
    where
        IO: PanelIo,
        BUS: ShiftBus,
        D: DelayUs<u32> + DelayMs<u32>,
    {
        match cmd {
            Command::GetSensors(side) => self.request(TelemetryKind::Sensors, side),
            Command::GetPositions(side) => self.request(TelemetryKind::Positions, side),
            Command::GetTargets(side) => self.request(TelemetryKind::Targets, side),
            Command::Flap { side, unit } => {
                if panel.advance_target(side, unit as usize) {
                    self.pending.mark(TelemetryKind::Targets, side);
                }
            }
            Command::SetSingle { side, unit, target } => {
                if panel.set_target(side, unit as usize, target) {
                    self.pending.mark(TelemetryKind::Targets, side);
                }
            }
            Command::SetAll { side, targets } => {
                panel.set_all_targets(side, &targets);
                self.pending.mark(TelemetryKind::Targets, side);
            }
        }
    }

    /// Write the next pending telemetry frame into `tx` if its buffer is free.
    ///
    /// Returns what was filled; the caller then starts the transmission.
    pub fn fill_next<IO, BUS, D>(
        &mut self,
        panel: &Panel<IO, BUS, D>,
        tx: &mut FrameTransmitter,
    ) -> Option<(TelemetryKind, Side)>
    where
        IO: PanelIo,
        BUS: ShiftBus,
        D: DelayUs<u32> + DelayMs<u32>,
    {
        if !tx.can_fill() {
            return None;
        }
        let (kind, side) = self.pending.pop()?;

        let state = panel.side(side);
        let mut payload = [0u8; MAX_PAYLOAD];
        let len = match kind {
            TelemetryKind::Sensors => encode_sensors(side, state, &mut payload),
            TelemetryKind::Positions => encode_positions(side, state, &mut payload),
            TelemetryKind::Targets => encode_targets(side, state, &mut payload),
        };

        // Every telemetry payload fits the buffer and the buffer is free.
        if tx.fill(kind.command(), &payload[..len]).is_err() {
            self.pending.mark(kind, side);
            return None;
        }
        Some((kind, side))
    }
}
