// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration of the panel and its link.
//!
//! Panel revision and wiring are selected with Cargo features:
//!
//! | Feature | Effect |
//! | ------- | ------ |
//! | `panel-24` | 24 flap units per side instead of 26 |
//! | `single-side` | only side A is wired, only relay A is ever closed |

use log::LevelFilter;

/// Number of flap units on one side of the panel.
#[cfg(not(feature = "panel-24"))]
pub const FLAP_UNITS: usize = 26;
#[cfg(feature = "panel-24")]
pub const FLAP_UNITS: usize = 24;

/// Bytes in one sensor/drive shift-register chain.
pub const FLAP_BYTES: usize = FLAP_UNITS.div_ceil(8);

/// Physical sides sharing the driver bus.
pub const SIDES: usize = 2;

/// How long the drive outputs stay energised after a pulse.
pub const ACTIVE_OUT_MS: u8 = 80;

/// Period of the clap decision.
pub const FLAP_CLAP_PERIOD_MS: u32 = 150;

/// Power-on lamp test: every status LED lit for this long.
pub const LAMP_TEST_MS: u32 = 1_000;

/// Relay make/settle time before the first sensor read of a side.
pub const SIDE_SETTLE_MS: u32 = 500;

/// Opto-coupler settle time after selecting a sensor bank. Shorter gaps corrupt the reading.
pub const SENSOR_SETTLE_US: u32 = 50;

/// Setup time around the drive-enable lines.
pub const DRIVE_SETUP_US: u32 = 10;

/// Width of the strobe / parallel-load pulses of the shift-register chain.
pub const LATCH_PULSE_US: u32 = 1;

/// Start byte of host → panel frames.
pub const RECEIVE_MAGIC: u8 = 0xCA;

/// Start byte of panel → host frames.
pub const SEND_MAGIC: u8 = 0xB7;

/// Size of the receive and transmit frame buffers.
pub const FRAME_CAPACITY: usize = 64;

/// Inter-byte gap after which a partially received frame is abandoned.
pub const RECEIVE_TIMEOUT_MS: u8 = 10;

/// Host link baud rate.
pub const LINK_BAUD: u32 = 115_200;

/// Default verbosity of the debug log.
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;
