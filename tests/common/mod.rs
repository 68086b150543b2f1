// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated control board shared by the integration tests.
//!
//! `SimIo` and `SimBus` share one [`Rig`]: relays pick the side, the sense lines pick the
//! bank that `SimBus::read` encodes onto the wire, the strobe latches what was written, and
//! asserting a drive line steps every latched flap of the connected side.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::serial;

use solari::config::{FLAP_BYTES, FLAP_CLAP_PERIOD_MS, FLAP_UNITS};
use solari::control::{ClapOutcome, Dispatcher, SidePolicy};
use solari::drivers::{Line, PanelDriver, PanelIo, ShiftBus};
use solari::panel::{Panel, Side, UnitBitmap};
use solari::protocol::{FrameReceiver, FrameTransmitter};

/// One mechanical flap unit.
#[derive(Copy, Clone, Debug)]
pub struct SimFlap {
    pub slot: u8,
    pub cycle: u8,
    pub moved: bool,
    /// Upcoming steps whose moved toggle the opto fails to register.
    pub missed_edges: u8,
}

impl SimFlap {
    fn advance(&mut self) {
        self.slot = (self.slot + 1) % self.cycle;
        if self.missed_edges > 0 {
            self.missed_edges -= 1;
        } else {
            self.moved = !self.moved;
        }
    }

    fn at_home(&self) -> bool {
        self.slot == 0
    }
}

#[derive(Debug, Default)]
pub struct Rig {
    pub flaps: [Vec<SimFlap>; 2],
    pub levels: Vec<(Line, bool)>,
    pub events: Vec<(Line, bool)>,
    pub shifted: Vec<u8>,
    pub latched: Vec<u8>,
    pub writes: Vec<Vec<u8>>,
    pub reads: usize,
    pub fail_reads: bool,
}

impl Rig {
    /// Every unit on both sides at `slot` of a `cycle`-slot drum.
    pub fn uniform(slot: u8, cycle: u8) -> Self {
        let flap = SimFlap {
            slot,
            cycle,
            moved: false,
            missed_edges: 0,
        };
        Self {
            flaps: [vec![flap; FLAP_UNITS], vec![flap; FLAP_UNITS]],
            ..Self::default()
        }
    }

    /// Toggle the moved opto of one unit without turning its drum.
    pub fn glitch(&mut self, side: Side, unit: usize) {
        let flap = &mut self.flaps[side.index()][unit];
        flap.moved = !flap.moved;
    }

    pub fn level(&self, line: Line) -> bool {
        self.levels
            .iter()
            .find(|(l, _)| *l == line)
            .map_or(false, |&(_, on)| on)
    }

    /// Side whose relay is closed. Both relays closed at once is a wiring fault.
    pub fn connected(&self) -> Option<Side> {
        match (self.level(Line::RelayA), self.level(Line::RelayB)) {
            (true, false) => Some(Side::A),
            (false, true) => Some(Side::B),
            (false, false) => None,
            (true, true) => panic!("both relays closed"),
        }
    }

    /// Number of times `line` was driven active.
    pub fn asserts(&self, line: Line) -> usize {
        self.events
            .iter()
            .filter(|&&(l, on)| l == line && on)
            .count()
    }

    /// Drive lines in the order they were energised.
    pub fn polarities(&self) -> Vec<Line> {
        self.events
            .iter()
            .filter(|&&(l, on)| on && matches!(l, Line::DrivePositive | Line::DriveNegative))
            .map(|&(l, _)| l)
            .collect()
    }

    fn set(&mut self, line: Line, on: bool) {
        self.events.push((line, on));
        match self.levels.iter_mut().find(|(l, _)| *l == line) {
            Some(entry) => entry.1 = on,
            None => self.levels.push((line, on)),
        }

        match (line, on) {
            (Line::Strobe, true) => self.latched = self.shifted.clone(),
            (Line::DrivePositive | Line::DriveNegative, true) => self.energise(),
            _ => {}
        }
    }

    fn energise(&mut self) {
        let side = self.connected().expect("drive pulse with no side connected");
        let mut raw = [0u8; FLAP_BYTES];
        for (dst, wire) in raw.iter_mut().zip(self.latched.iter()) {
            *dst = !wire;
        }
        let pulse = UnitBitmap::from_bytes(raw);
        for (unit, flap) in self.flaps[side.index()].iter_mut().enumerate() {
            if pulse.get(unit) {
                flap.advance();
            }
        }
    }

    fn sample(&self) -> [u8; FLAP_BYTES] {
        let side = self.connected().expect("sensor read with no side connected");
        let flaps = &self.flaps[side.index()];
        match (self.level(Line::SenseMoved), self.level(Line::SenseReset)) {
            (true, false) => to_wire(flaps.iter().map(|f| f.moved).collect(), false),
            (false, true) => to_wire(flaps.iter().map(|f| f.at_home()).collect(), true),
            other => panic!("sensor read with banks {:?}", other),
        }
    }
}

/// Encode a unit-order bitmap the way the CD4021 chain shifts it out.
pub fn to_wire(map: UnitBitmap, active_low: bool) -> [u8; FLAP_BYTES] {
    let mut wire = [0u8; FLAP_BYTES];
    for (dst, src) in wire.iter_mut().rev().zip(map.as_bytes().iter()) {
        let b = src.reverse_bits();
        *dst = if active_low { !b } else { b };
    }
    wire
}

pub struct SimIo(pub Rc<RefCell<Rig>>);

impl PanelIo for SimIo {
    fn set_line(&mut self, line: Line, active: bool) {
        self.0.borrow_mut().set(line, active);
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BusFault;

pub struct SimBus(pub Rc<RefCell<Rig>>);

impl ShiftBus for SimBus {
    type Error = BusFault;

    fn write(&mut self, bytes: &[u8]) -> Result<(), BusFault> {
        let mut rig = self.0.borrow_mut();
        rig.shifted = bytes.to_vec();
        rig.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), BusFault> {
        let mut rig = self.0.borrow_mut();
        if rig.fail_reads {
            return Err(BusFault);
        }
        rig.reads += 1;
        buf.copy_from_slice(&rig.sample());
        Ok(())
    }
}

/// Delay that only adds up the requested time.
#[derive(Debug, Default)]
pub struct NoDelay {
    pub us: u64,
    pub ms: u64,
}

impl DelayUs<u32> for NoDelay {
    fn delay_us(&mut self, us: u32) {
        self.us += u64::from(us);
    }
}

impl DelayMs<u32> for NoDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.ms += u64::from(ms);
    }
}

/// Transmit register that is always ready.
#[derive(Debug, Default)]
pub struct Wire {
    pub bytes: Vec<u8>,
}

impl serial::Write<u8> for Wire {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        self.bytes.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

pub type SimPanel = Panel<SimIo, SimBus, NoDelay>;

pub fn panel(rig: Rig) -> (SimPanel, Rc<RefCell<Rig>>) {
    let rig = Rc::new(RefCell::new(rig));
    let driver = PanelDriver::new(SimIo(rig.clone()), SimBus(rig.clone()), NoDelay::default());
    (Panel::new(driver), rig)
}

/// Build a host frame with a correct checksum.
pub fn host_frame(command: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0xCA, payload.len() as u8, command];
    frame.extend_from_slice(payload);
    let xor = frame.iter().fold(0, |acc, b| acc ^ b);
    frame.push(xor);
    frame
}

/// The main loop of the firmware, driven by simulated milliseconds.
pub struct Firmware {
    pub panel: SimPanel,
    pub rig: Rc<RefCell<Rig>>,
    pub dispatcher: Dispatcher,
    pub policy: SidePolicy,
    pub rx: FrameReceiver,
    pub tx: FrameTransmitter,
    pub wire: Wire,
    pub claps: Vec<ClapOutcome>,
    clap_ms: u32,
}

impl Firmware {
    /// Power on and initialise every side of `policy`.
    pub fn boot(rig: Rig, policy: SidePolicy) -> Self {
        let (mut panel, rig) = panel(rig);
        panel.init(policy).expect("init");
        Self {
            panel,
            rig,
            dispatcher: Dispatcher::new(policy),
            policy,
            rx: FrameReceiver::new(),
            tx: FrameTransmitter::new(),
            wire: Wire::default(),
            claps: Vec::new(),
            clap_ms: 0,
        }
    }

    /// Feed host bytes into the receiver as the USART interrupt would.
    pub fn receive(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.rx.on_byte(b);
        }
    }

    /// One main-loop pass after `ms` milliseconds have elapsed.
    pub fn run_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.rx.tick_1ms();
            if let Some(side) = self.panel.tick_1ms().expect("tick") {
                self.dispatcher.state_changed(side);
            }
            self.clap_ms += 1;
            if self.clap_ms >= FLAP_CLAP_PERIOD_MS {
                self.clap_ms = 0;
                let outcome = self.panel.single_clap(self.policy).expect("clap");
                self.claps.push(outcome);
            }
            self.poll();
        }
    }

    fn poll(&mut self) {
        if let Some(frame) = self.rx.take_frame() {
            self.dispatcher.handle_frame(&mut self.panel, &frame);
        }
        if self.dispatcher.fill_next(&self.panel, &mut self.tx).is_some() {
            self.tx.send(&mut self.wire).expect("send");
        }
        while self.tx.on_transmit_complete(&mut self.wire) {}
        self.panel.update_leds(self.policy);
    }

    /// Split the transmitted bytes into `(command, payload)` frames, checking framing.
    pub fn sent_frames(&self) -> Vec<(u8, Vec<u8>)> {
        let mut frames = Vec::new();
        let mut rest = &self.wire.bytes[..];
        while !rest.is_empty() {
            assert_eq!(rest[0], 0xB7, "send magic");
            let total = rest[1] as usize + 4;
            let (frame, tail) = rest.split_at(total);
            assert_eq!(frame.iter().fold(0, |acc, b| acc ^ b), 0, "checksum");
            frames.push((frame[2], frame[3..total - 1].to_vec()));
            rest = tail;
        }
        frames
    }
}
