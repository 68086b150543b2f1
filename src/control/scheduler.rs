// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Drive scheduling: settle timer, pulse polarity and the periodic clap decision.
//!
//! The settle timer is the mutex of the shared drive bus. While it runs no pulse is issued and
//! no sensor is read. Coil current alternates direction on every pulse so the magnets do not
//! saturate.

use crate::config::ACTIVE_OUT_MS;
use crate::drivers::Polarity;
use crate::panel::Side;

/// Polarity of the first pulse after power-on.
pub const INITIAL_POLARITY: Polarity = Polarity::Positive;

/// State of the shared drive bus.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DriveState {
    Idle,
    Settling { remaining_ms: u8 },
}

#[derive(Debug)]
pub struct DriveScheduler {
    state: DriveState,
    next_polarity: Polarity,
}

impl Default for DriveScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveScheduler {
    pub const fn new() -> Self {
        Self {
            state: DriveState::Idle,
            next_polarity: INITIAL_POLARITY,
        }
    }

    #[inline]
    pub fn state(&self) -> DriveState {
        self.state
    }

    #[inline]
    pub fn is_settling(&self) -> bool {
        matches!(self.state, DriveState::Settling { .. })
    }

    /// Polarity the next pulse will use.
    #[inline]
    pub fn next_polarity(&self) -> Polarity {
        self.next_polarity
    }

    /// Start the settle window of a pulse that was just issued with `next_polarity()`.
    pub fn pulse_started(&mut self) {
        debug_assert!(!self.is_settling());
        self.state = DriveState::Settling {
            remaining_ms: ACTIVE_OUT_MS,
        };
        self.next_polarity = self.next_polarity.flipped();
    }

    /// Advance the settle timer by 1 ms. Returns `true` on the tick the window closes.
    pub fn tick_1ms(&mut self) -> bool {
        match self.state {
            DriveState::Idle => false,
            DriveState::Settling { remaining_ms } if remaining_ms <= 1 => {
                self.state = DriveState::Idle;
                true
            }
            DriveState::Settling { remaining_ms } => {
                self.state = DriveState::Settling {
                    remaining_ms: remaining_ms - 1,
                };
                false
            }
        }
    }
}

/// Which sides the clap loop serves.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SidePolicy {
    /// Keep one side connected at all times.
    Single(Side),
    /// Serve both sides, switching the relays as each reaches its targets.
    Both,
}

impl SidePolicy {
    /// Default policy for the configured wiring.
    pub const fn configured() -> Self {
        if cfg!(feature = "single-side") {
            SidePolicy::Single(Side::A)
        } else {
            SidePolicy::Both
        }
    }

    /// Sides served by this policy, in service order.
    pub fn sides(&self) -> &'static [Side] {
        match self {
            SidePolicy::Single(Side::A) => &[Side::A],
            SidePolicy::Single(Side::B) => &[Side::B],
            SidePolicy::Both => &Side::ALL,
        }
    }
}

/// What one clap should do.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ClapOutcome {
    /// A pulse is still settling; nothing was done.
    Settling,
    /// Every served side is at target; nothing was done.
    Idle,
    /// The relays were switched; pulsing waits for the next clap.
    Switched(Option<Side>),
    /// The connected side was pulsed.
    Pulsed(Side),
}

/// Decide the next clap step from the connected side and which sides still have work.
///
/// Switching and pulsing never happen in the same step: after a switch the relay gets a full
/// clap period to settle.
pub fn plan_clap(
    policy: SidePolicy,
    settling: bool,
    active: Option<Side>,
    has_work: impl Fn(Side) -> bool,
) -> ClapOutcome {
    if settling {
        return ClapOutcome::Settling;
    }

    match policy {
        SidePolicy::Single(side) => {
            if active != Some(side) {
                ClapOutcome::Switched(Some(side))
            } else if has_work(side) {
                ClapOutcome::Pulsed(side)
            } else {
                ClapOutcome::Idle
            }
        }
        SidePolicy::Both => match active {
            None => match Side::ALL.into_iter().find(|&s| has_work(s)) {
                Some(side) => ClapOutcome::Switched(Some(side)),
                None => ClapOutcome::Idle,
            },
            Some(side) if has_work(side) => ClapOutcome::Pulsed(side),
            Some(side) if has_work(side.other()) => ClapOutcome::Switched(Some(side.other())),
            Some(_) => ClapOutcome::Switched(None),
        },
    }
}
