// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host link messages.
//!
//! Every frame is `MAGIC LEN CMD PAYLOAD[LEN] XOR`, where `XOR` makes the exclusive-or of the
//! whole frame zero. The magic differs per direction, see [`crate::config`].

use crate::config::{FLAP_BYTES, FLAP_UNITS, FRAME_CAPACITY};
use crate::panel::{Side, SideState};

/// Magic, length, command and checksum bytes around the payload.
pub const FRAME_OVERHEAD: usize = 4;

/// Largest payload that fits the frame buffers.
pub const MAX_PAYLOAD: usize = FRAME_CAPACITY - FRAME_OVERHEAD;

// Host → panel
pub const MSG_GET_SENS: u8 = 0x01;
pub const MSG_GET_POS: u8 = 0x02;
pub const MSG_GET_TARGET: u8 = 0x03;
pub const MSG_FLAP: u8 = 0x10;
pub const MSG_SET_SINGLE: u8 = 0x11;
pub const MSG_SET_ALL: u8 = 0x12;

// Panel → host
pub const MSG_SENS: u8 = 0x01;
pub const MSG_POS: u8 = 0x02;
pub const MSG_TARGET: u8 = 0x03;

/// POS status flag: every unit is homed and at its target.
pub const POS_FLAG_AT_TARGET: u8 = 1 << 0;
/// POS status flag: every homed unit is at its target.
pub const POS_FLAG_AT_TARGET_IGNORING_UNKNOWN: u8 = 1 << 1;

/// A complete, checksum-verified frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    raw: [u8; FRAME_CAPACITY],
}

impl Frame {
    /// Wrap a receive buffer. The caller guarantees `raw` holds a complete frame.
    pub(crate) fn from_buffer(raw: [u8; FRAME_CAPACITY]) -> Self {
        Self { raw }
    }

    /// Total frame length including magic, length and checksum.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.payload_len() + FRAME_OVERHEAD
    }

    #[inline]
    fn payload_len(&self) -> usize {
        self.raw[1] as usize
    }

    #[inline]
    pub fn command(&self) -> u8 {
        self.raw[2]
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.raw[3..3 + self.payload_len()]
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw[..self.total_len()]
    }
}

/// Decoded host command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Report sensor bitmaps of one side, or of every served side.
    GetSensors(Option<Side>),
    GetPositions(Option<Side>),
    GetTargets(Option<Side>),
    /// Move the target of one unit a single slot on.
    Flap { side: Side, unit: u8 },
    SetSingle { side: Side, unit: u8, target: u8 },
    SetAll { side: Side, targets: [u8; FLAP_UNITS] },
}

impl Command {
    /// Decode a command frame. Unknown commands, unknown sides and malformed payload lengths
    /// yield `None`.
    ///
    /// Payloads without the leading side byte (the single-sided layout) address side A.
    pub fn parse(frame: &Frame) -> Option<Self> {
        Self::decode(frame.command(), frame.payload())
    }

    pub fn decode(command: u8, payload: &[u8]) -> Option<Self> {
        match (command, payload) {
            (MSG_GET_SENS, p) => optional_side(p).map(Command::GetSensors),
            (MSG_GET_POS, p) => optional_side(p).map(Command::GetPositions),
            (MSG_GET_TARGET, p) => optional_side(p).map(Command::GetTargets),

            (MSG_FLAP, &[side, unit]) => Some(Command::Flap {
                side: Side::from_index(side)?,
                unit,
            }),
            (MSG_FLAP, &[unit]) => Some(Command::Flap {
                side: Side::A,
                unit,
            }),

            (MSG_SET_SINGLE, &[side, unit, target]) => Some(Command::SetSingle {
                side: Side::from_index(side)?,
                unit,
                target,
            }),
            (MSG_SET_SINGLE, &[unit, target]) => Some(Command::SetSingle {
                side: Side::A,
                unit,
                target,
            }),

            (MSG_SET_ALL, p) if p.len() == FLAP_UNITS + 1 => Some(Command::SetAll {
                side: Side::from_index(p[0])?,
                targets: targets(&p[1..])?,
            }),
            (MSG_SET_ALL, p) if p.len() == FLAP_UNITS => Some(Command::SetAll {
                side: Side::A,
                targets: targets(p)?,
            }),

            _ => None,
        }
    }
}

fn optional_side(payload: &[u8]) -> Option<Option<Side>> {
    match payload {
        [] => Some(None),
        [side] => Side::from_index(*side).map(Some),
        _ => None,
    }
}

fn targets(bytes: &[u8]) -> Option<[u8; FLAP_UNITS]> {
    bytes.try_into().ok()
}

/// SENS payload: `[side, moved[FLAP_BYTES], reset[FLAP_BYTES]]`. Returns the payload length.
pub fn encode_sensors(side: Side, state: &SideState, out: &mut [u8; MAX_PAYLOAD]) -> usize {
    out[0] = side.index() as u8;
    out[1..1 + FLAP_BYTES].copy_from_slice(state.moved().as_bytes());
    out[1 + FLAP_BYTES..1 + 2 * FLAP_BYTES].copy_from_slice(state.reset().as_bytes());
    1 + 2 * FLAP_BYTES
}

/// POS payload: `[side, flags, position[FLAP_UNITS]]` with `0xFF` for unknown positions.
pub fn encode_positions(side: Side, state: &SideState, out: &mut [u8; MAX_PAYLOAD]) -> usize {
    let mut flags = 0;
    if state.all_at_target() {
        flags |= POS_FLAG_AT_TARGET;
    }
    if state.at_target_ignoring_unknown() {
        flags |= POS_FLAG_AT_TARGET_IGNORING_UNKNOWN;
    }

    out[0] = side.index() as u8;
    out[1] = flags;
    for (dst, unit) in out[2..2 + FLAP_UNITS].iter_mut().zip(state.units()) {
        *dst = unit.position_byte();
    }
    2 + FLAP_UNITS
}

/// TARGET payload: `[side, target[FLAP_UNITS]]`.
pub fn encode_targets(side: Side, state: &SideState, out: &mut [u8; MAX_PAYLOAD]) -> usize {
    out[0] = side.index() as u8;
    for (dst, unit) in out[1..1 + FLAP_UNITS].iter_mut().zip(state.units()) {
        *dst = unit.target();
    }
    1 + FLAP_UNITS
}
