// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Relay switch connecting one side at a time to the shared driver bus.
//!
//! Like the motor drivers, the mux does not own the I/O: it is passed in per call so the mux,
//! the sensor chain and the drive outputs can share one board handle.

use log::debug;

use crate::drivers::{Line, PanelIo};
use crate::panel::side::Side;

#[derive(Debug, Default)]
pub struct SideMux {
    active: Option<Side>,
}

impl SideMux {
    /// Mux with both relays released.
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Currently connected side, `None` when idle.
    #[inline]
    pub fn active(&self) -> Option<Side> {
        self.active
    }

    /// Force both relays off, regardless of the remembered state.
    pub fn release<IO: PanelIo>(&mut self, io: &mut IO) {
        io.deassert(Line::RelayA);
        io.deassert(Line::RelayB);
        self.active = None;
    }

    /// Connect `side` (or nothing). The other relay is always released first.
    ///
    /// Returns `false` when `side` was already selected and no line was touched.
    pub fn select<IO: PanelIo>(&mut self, io: &mut IO, side: Option<Side>) -> bool {
        if side == self.active {
            return false;
        }

        match side {
            Some(Side::A) => {
                io.deassert(Line::RelayB);
                io.assert(Line::RelayA);
            }
            Some(Side::B) => {
                io.deassert(Line::RelayA);
                io.assert(Line::RelayB);
            }
            None => {
                io.deassert(Line::RelayA);
                io.deassert(Line::RelayB);
            }
        }

        debug!("side {:?} -> {:?}", self.active, side);
        self.active = side;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Relays {
        a: bool,
        b: bool,
        writes: usize,
    }

    impl PanelIo for Relays {
        fn set_line(&mut self, line: Line, active: bool) {
            self.writes += 1;
            match line {
                Line::RelayA => self.a = active,
                Line::RelayB => self.b = active,
                _ => {}
            }
        }
    }

    #[test]
    fn at_most_one_relay_is_closed() {
        let mut io = Relays::default();
        let mut mux = SideMux::new();

        for side in [Some(Side::A), Some(Side::B), None, Some(Side::B), Some(Side::A)] {
            mux.select(&mut io, side);
            assert!(!(io.a && io.b));
            assert_eq!(io.a, side == Some(Side::A));
            assert_eq!(io.b, side == Some(Side::B));
            assert_eq!(mux.active(), side);
        }
    }

    #[test]
    fn reselecting_active_side_is_silent() {
        let mut io = Relays::default();
        let mut mux = SideMux::new();
        assert!(mux.select(&mut io, Some(Side::A)));
        let writes = io.writes;
        assert!(!mux.select(&mut io, Some(Side::A)));
        assert_eq!(io.writes, writes);
    }

    #[test]
    fn release_opens_both_relays() {
        let mut io = Relays::default();
        let mut mux = SideMux::new();
        mux.select(&mut io, Some(Side::B));
        mux.release(&mut io);
        assert!(!io.a && !io.b);
        assert_eq!(mux.active(), None);
    }
}
