// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Physical panel sides and the per-side unit arrays.

use crate::config::FLAP_UNITS;
use crate::panel::bitmap::UnitBitmap;
use crate::panel::unit::FlapUnit;

/// One of the two panels sharing the driver bus.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    /// Decode the side byte used on the wire.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Side::A),
            1 => Some(Side::B),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Sensor snapshot and tracked units of one side.
#[derive(Clone, Debug)]
pub struct SideState {
    units: [FlapUnit; FLAP_UNITS],
    moved: UnitBitmap,
    reset: UnitBitmap,
}

impl Default for SideState {
    fn default() -> Self {
        Self::new()
    }
}

impl SideState {
    pub const fn new() -> Self {
        Self {
            units: [FlapUnit::new(); FLAP_UNITS],
            moved: UnitBitmap::empty(),
            reset: UnitBitmap::empty(),
        }
    }

    #[inline]
    pub fn units(&self) -> &[FlapUnit; FLAP_UNITS] {
        &self.units
    }

    /// Unit `index`, or `None` when out of range.
    #[inline]
    pub fn unit(&self, index: usize) -> Option<&FlapUnit> {
        self.units.get(index)
    }

    #[inline]
    pub fn unit_mut(&mut self, index: usize) -> Option<&mut FlapUnit> {
        self.units.get_mut(index)
    }

    #[inline]
    pub fn moved(&self) -> &UnitBitmap {
        &self.moved
    }

    #[inline]
    pub fn reset(&self) -> &UnitBitmap {
        &self.reset
    }

    /// Store a fresh capture of both sensor banks.
    pub fn store_sensors(&mut self, moved: UnitBitmap, reset: UnitBitmap) {
        self.moved = moved;
        self.reset = reset;
    }

    /// Take the current moved levels as the edge reference without counting steps.
    pub fn seed_edges(&mut self) {
        for (i, unit) in self.units.iter_mut().enumerate() {
            unit.seed(self.moved.get(i));
        }
    }

    /// Fold the stored sensor snapshot into every unit.
    pub fn update_positions(&mut self) {
        for (i, unit) in self.units.iter_mut().enumerate() {
            unit.observe(i, self.moved.get(i), self.reset.get(i));
        }
    }

    /// Set the target of unit `index`; out-of-range units are ignored.
    pub fn set_target(&mut self, index: usize, target: u8) -> bool {
        match self.units.get_mut(index) {
            Some(unit) => {
                unit.set_target(target);
                true
            }
            None => false,
        }
    }

    /// Set every target from `targets`, unit 0 first.
    pub fn set_all_targets(&mut self, targets: &[u8; FLAP_UNITS]) {
        for (unit, &target) in self.units.iter_mut().zip(targets.iter()) {
            unit.set_target(target);
        }
    }

    /// Units that still have to be driven.
    pub fn pending(&self) -> UnitBitmap {
        self.units.iter().map(FlapUnit::needs_drive).collect()
    }

    /// Every unit is homed and at its target.
    pub fn all_at_target(&self) -> bool {
        self.units.iter().all(FlapUnit::at_target)
    }

    /// Every unit with a known position is at its target.
    pub fn at_target_ignoring_unknown(&self) -> bool {
        self.units
            .iter()
            .all(|u| u.position().is_none() || u.at_target())
    }

    /// Some unit has not been homed yet.
    pub fn any_unknown(&self) -> bool {
        self.units.iter().any(|u| u.position().is_none())
    }
}
