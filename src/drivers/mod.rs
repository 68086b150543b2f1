// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module sits between the raw `hw/` layer and the panel logic.
//!
//! ## Existing drivers
//!
//! - [`io`] – collaborator traits for signal lines and the shift-register bus
//! - [`board`] – Solari control board: sensor chain, drive chain, coil drivers

pub mod board;
pub mod io;

pub use board::{PanelDriver, Polarity, SensorCapture};
pub use io::{Line, PanelIo, ShiftBus};
