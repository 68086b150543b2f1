// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Position tracking of a single flap unit.
//!
//! Every toggle of the "moved" opto is one physical step. The "reset" opto is the only ground
//! truth: it marks slot 0, and the position reached just before it teaches the unit's cycle
//! length, which differs from unit to unit.

use log::info;

/// Largest trackable position. `0xFF` is reserved as "unknown" on the wire.
pub const MAX_POSITION: u8 = 0xFE;

/// Wire encoding of an unknown position.
pub const UNKNOWN_POSITION: u8 = 0xFF;

/// Tracked state of one flap unit.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FlapUnit {
    position: Option<u8>,
    target: u8,
    cycle_length: Option<u8>,
    last_moved: bool,
}

impl FlapUnit {
    /// Power-on state: nothing known, target slot 0.
    pub const fn new() -> Self {
        Self {
            position: None,
            target: 0,
            cycle_length: None,
            last_moved: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Option<u8> {
        self.position
    }

    #[inline]
    pub fn target(&self) -> u8 {
        self.target
    }

    #[inline]
    pub fn cycle_length(&self) -> Option<u8> {
        self.cycle_length
    }

    #[inline]
    pub fn last_moved(&self) -> bool {
        self.last_moved
    }

    /// Position as sent to the host.
    #[inline]
    pub fn position_byte(&self) -> u8 {
        self.position.unwrap_or(UNKNOWN_POSITION)
    }

    /// `true` when the unit is known to show its target.
    #[inline]
    pub fn at_target(&self) -> bool {
        self.position == Some(self.target)
    }

    /// `true` when the unit still has to be driven, including units that are not homed yet.
    #[inline]
    pub fn needs_drive(&self) -> bool {
        !self.at_target()
    }

    /// Record the moved-sensor level without counting an edge.
    ///
    /// Used after a side is first connected so the first update does not see a phantom step.
    pub fn seed(&mut self, moved: bool) {
        self.last_moved = moved;
    }

    /// Fold one sensor sample into the unit state. `unit` is only used for logging.
    pub fn observe(&mut self, unit: usize, moved: bool, reset: bool) {
        if moved != self.last_moved {
            if let Some(pos) = self.position {
                self.position = Some(self.step(pos));
            }
        }

        if reset {
            if let Some(pos) = self.position.filter(|&p| p != 0) {
                if self.cycle_length != Some(pos) {
                    info!("unit {}: learned cycle length {}", unit, pos);
                }
                self.cycle_length = Some(pos);
            }
            self.position = Some(0);
        }

        self.clamp_target();
        self.last_moved = moved;
    }

    /// Set a new target; anything past a known cycle length becomes slot 0.
    pub fn set_target(&mut self, target: u8) {
        self.target = target;
        self.clamp_target();
    }

    /// Advance the target by one slot, wrapping at a known cycle length.
    pub fn advance_target(&mut self) {
        self.set_target(self.target.saturating_add(1).min(MAX_POSITION));
    }

    /// Count one edge. Runs past a known cycle length if an edge was spurious; the next
    /// homing relearns the cycle.
    fn step(&self, pos: u8) -> u8 {
        pos.saturating_add(1).min(MAX_POSITION)
    }

    fn clamp_target(&mut self) {
        if let Some(cycle) = self.cycle_length {
            if self.target >= cycle {
                self.target = 0;
            }
        }
    }
}
