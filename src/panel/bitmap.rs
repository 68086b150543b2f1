// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! One bit per flap unit.
//!
//! Unit `i` lives in byte `i / 8`, bit `i % 8`. The sensor chain delivers its bytes in reverse
//! order with every byte bit-reversed, and the reset bank is active-low; [`UnitBitmap::from_sensor`]
//! undoes both. The drive chain expects every bit inverted, see [`UnitBitmap::to_drive`].

use crate::config::{FLAP_BYTES, FLAP_UNITS};

/// Bitmap over the flap units of one side.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UnitBitmap {
    raw: [u8; FLAP_BYTES],
}

/// Electrical level of a sensor bank.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Active {
    High,
    Low,
}

impl UnitBitmap {
    pub const fn empty() -> Self {
        Self {
            raw: [0; FLAP_BYTES],
        }
    }

    /// Wrap bytes that are already in unit order.
    pub const fn from_bytes(raw: [u8; FLAP_BYTES]) -> Self {
        Self { raw }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; FLAP_BYTES] {
        &self.raw
    }

    /// Decode a raw capture from the sensor chain.
    pub fn from_sensor(wire: &[u8; FLAP_BYTES], active: Active) -> Self {
        let mut raw = [0u8; FLAP_BYTES];
        for (dst, src) in raw.iter_mut().zip(wire.iter().rev()) {
            *dst = match active {
                Active::High => src.reverse_bits(),
                Active::Low => !src.reverse_bits(),
            };
        }
        let mut map = Self { raw };
        map.clear_padding();
        map
    }

    /// Encode for the drive chain: same order, every bit inverted.
    pub fn to_drive(&self) -> [u8; FLAP_BYTES] {
        let mut wire = self.raw;
        for b in wire.iter_mut() {
            *b = !*b;
        }
        wire
    }

    /// State of `unit`. Panics if `unit >= FLAP_UNITS`.
    #[inline]
    pub fn get(&self, unit: usize) -> bool {
        assert!(unit < FLAP_UNITS);
        (self.raw[unit / 8] >> (unit % 8)) & 1 != 0
    }

    /// Set or clear `unit`. Panics if `unit >= FLAP_UNITS`.
    #[inline]
    pub fn set(&mut self, unit: usize, on: bool) {
        assert!(unit < FLAP_UNITS);
        let mask = 1 << (unit % 8);
        if on {
            self.raw[unit / 8] |= mask;
        } else {
            self.raw[unit / 8] &= !mask;
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.iter().all(|&b| b == 0)
    }

    pub fn count(&self) -> u32 {
        self.raw.iter().map(|b| b.count_ones()).sum()
    }

    fn clear_padding(&mut self) {
        let used = FLAP_UNITS % 8;
        if used != 0 {
            self.raw[FLAP_BYTES - 1] &= (1u8 << used) - 1;
        }
    }
}

impl FromIterator<bool> for UnitBitmap {
    /// Collect per-unit flags; anything past `FLAP_UNITS` is ignored.
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut map = Self::empty();
        for (unit, on) in iter.into_iter().take(FLAP_UNITS).enumerate() {
            map.set(unit, on);
        }
        map
    }
}
