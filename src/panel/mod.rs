// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Panel Engine
//!
//! Position tracking and drive for both sides of a split-flap panel.
//!
//! ## Modules
//!
//! - [`bitmap`] - one bit per unit, sensor/drive wire encoding.
//! - [`unit`] - position counter and cycle-length learning of a single unit.
//! - [`side`] - the unit array and sensor snapshot of one side.
//! - [`mux`] - relay switch selecting the connected side.
//!
//! [`Panel`] ties them to the board driver and the drive scheduler. It is owned by the main loop;
//! the 1 ms tick reaches it through [`Panel::tick_1ms`], the clap period through
//! [`Panel::single_clap`].

pub mod bitmap;
pub mod mux;
pub mod side;
pub mod unit;

pub use bitmap::UnitBitmap;
pub use mux::SideMux;
pub use side::{Side, SideState};
pub use unit::FlapUnit;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use log::debug;

use crate::config::{FLAP_UNITS, LAMP_TEST_MS, SIDES, SIDE_SETTLE_MS};
use crate::control::scheduler::{plan_clap, ClapOutcome, DriveScheduler, SidePolicy};
use crate::drivers::{Line, PanelDriver, PanelIo, Polarity, ShiftBus};

const STATUS_LEDS: [Line; 3] = [Line::LedGreen, Line::LedYellow, Line::LedRed];

pub struct Panel<IO, BUS, D> {
    driver: PanelDriver<IO, BUS, D>,
    sides: [SideState; SIDES],
    mux: SideMux,
    scheduler: DriveScheduler,
}

impl<IO, BUS, D> Panel<IO, BUS, D>
where
    IO: PanelIo,
    BUS: ShiftBus,
    D: DelayUs<u32> + DelayMs<u32>,
{
    /// Power-on state: nothing homed, no side connected, drive idle.
    pub fn new(driver: PanelDriver<IO, BUS, D>) -> Self {
        Self {
            driver,
            sides: [SideState::new(), SideState::new()],
            mux: SideMux::new(),
            scheduler: DriveScheduler::new(),
        }
    }

    /// Run the lamp test, then connect every side served by `policy` in turn, let its relay
    /// settle and take the first sensor snapshot. Units sitting at home are homed right away.
    pub fn init(&mut self, policy: SidePolicy) -> Result<(), BUS::Error> {
        self.driver.drive_off();
        self.mux.release(self.driver.io());
        self.lamp_test();

        for &side in policy.sides() {
            self.mux.select(self.driver.io(), Some(side));
            self.driver.delay_ms(SIDE_SETTLE_MS);
            self.read_sensors(side)?;
            self.sides[side.index()].seed_edges();
            self.update_positions(side);
        }
        Ok(())
    }

    fn lamp_test(&mut self) {
        for led in STATUS_LEDS {
            self.driver.io().assert(led);
        }
        self.driver.delay_ms(LAMP_TEST_MS);
        for led in STATUS_LEDS {
            self.driver.io().deassert(led);
        }
    }

    pub fn free(self) -> PanelDriver<IO, BUS, D> {
        self.driver
    }

    #[inline]
    pub fn driver(&mut self) -> &mut PanelDriver<IO, BUS, D> {
        &mut self.driver
    }

    #[inline]
    pub fn side(&self, side: Side) -> &SideState {
        &self.sides[side.index()]
    }

    #[inline]
    pub fn active_side(&self) -> Option<Side> {
        self.mux.active()
    }

    #[inline]
    pub fn is_settling(&self) -> bool {
        self.scheduler.is_settling()
    }

    #[inline]
    pub fn next_polarity(&self) -> Polarity {
        self.scheduler.next_polarity()
    }

    /// Capture both sensor banks of `side` into its snapshot.
    ///
    /// Returns `Ok(false)` without touching the bus while a pulse is settling. Reading a side
    /// that is not connected is a programming error and panics.
    pub fn read_sensors(&mut self, side: Side) -> Result<bool, BUS::Error> {
        assert_eq!(
            self.mux.active(),
            Some(side),
            "sensor read on a disconnected side"
        );
        if self.scheduler.is_settling() {
            return Ok(false);
        }

        let capture = self.driver.read_sensors()?;
        self.sides[side.index()].store_sensors(capture.moved, capture.reset);
        Ok(true)
    }

    /// Fold the last snapshot of `side` into its units.
    pub fn update_positions(&mut self, side: Side) {
        self.sides[side.index()].update_positions();
    }

    /// Issue one drive pulse to the units set in `pulse` on the connected side.
    ///
    /// Returns `Ok(false)` and changes nothing while the previous pulse is settling.
    pub fn flap(&mut self, pulse: &UnitBitmap) -> Result<bool, BUS::Error> {
        if self.scheduler.is_settling() {
            return Ok(false);
        }

        let polarity = self.scheduler.next_polarity();
        self.driver.pulse(pulse, polarity)?;
        self.scheduler.pulse_started();
        debug!("pulse {} units, {:?}", pulse.count(), polarity);
        Ok(true)
    }

    /// 1 ms tick. When a pulse's settle window closes, the drive is switched off and the
    /// connected side is re-read; that side is returned as changed.
    pub fn tick_1ms(&mut self) -> Result<Option<Side>, BUS::Error> {
        if !self.scheduler.tick_1ms() {
            return Ok(None);
        }

        self.driver.drive_off();
        match self.mux.active() {
            Some(side) => {
                self.read_sensors(side)?;
                self.update_positions(side);
                Ok(Some(side))
            }
            None => Ok(None),
        }
    }

    /// One periodic clap: switch sides or pulse the units that are off target.
    pub fn single_clap(&mut self, policy: SidePolicy) -> Result<ClapOutcome, BUS::Error> {
        let sides = &self.sides;
        let outcome = plan_clap(
            policy,
            self.scheduler.is_settling(),
            self.mux.active(),
            |side| !sides[side.index()].all_at_target(),
        );

        match outcome {
            ClapOutcome::Switched(side) => {
                self.mux.select(self.driver.io(), side);
            }
            ClapOutcome::Pulsed(side) => {
                let pulse = self.sides[side.index()].pending();
                self.flap(&pulse)?;
            }
            ClapOutcome::Settling | ClapOutcome::Idle => {}
        }
        Ok(outcome)
    }

    /// Set one target. Returns `false` if `unit` is out of range.
    pub fn set_target(&mut self, side: Side, unit: usize, target: u8) -> bool {
        self.sides[side.index()].set_target(unit, target)
    }

    pub fn set_all_targets(&mut self, side: Side, targets: &[u8; FLAP_UNITS]) {
        self.sides[side.index()].set_all_targets(targets);
    }

    /// Move the target of `unit` one slot on. Returns `false` if `unit` is out of range.
    pub fn advance_target(&mut self, side: Side, unit: usize) -> bool {
        match self.sides[side.index()].unit_mut(unit) {
            Some(u) => {
                u.advance_target();
                true
            }
            None => false,
        }
    }

    /// Show the panel state on the status LEDs.
    ///
    /// green: every served side at target, yellow: pulse in flight, red: some unit not homed.
    pub fn update_leds(&mut self, policy: SidePolicy) {
        let sides = policy.sides();
        let done = sides.iter().all(|&s| self.side(s).all_at_target());
        let unknown = sides.iter().any(|&s| self.side(s).any_unknown());
        let settling = self.scheduler.is_settling();

        let io = self.driver.io();
        io.set_line(Line::LedGreen, done);
        io.set_line(Line::LedYellow, settling);
        io.set_line(Line::LedRed, unknown);
    }
}
