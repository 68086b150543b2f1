// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Solari Panel Firmware
//!
//! This crate contains the firmware for a two-sided split-flap (Solari) platform display, written
//! in Rust, targeting an STM32F777 MCU.
//!
//! Each flap unit is tracked from two opto sensors ("moved" toggles once per step, "reset" marks
//! slot 0) and advanced by pulsing its coil through a shared shift-register driver bus. Both
//! sides of the panel hang off the same bus behind a relay. A host sets target positions and
//! reads back state over a framed, checksummed serial link.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Panel size, timings, link constants |
//! | [`drivers`] | Collaborator traits and the control-board driver (sensor/drive chains) |
//! | [`panel`] | Position tracking, cycle learning, side multiplexing |
//! | [`control`] | Drive scheduling and host command dispatch |
//! | [`protocol`] | Frame receiver/transmitter and message codec |
//! | `hw` | MCU-level wrappers around USART, SPI, GPIO and timers (target only) |
//!
//! Everything except `hw` builds on the host, so the engine and protocol are tested there
//! against recording mocks.
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod panel;
pub mod protocol;

#[cfg(target_os = "none")]
pub mod hw;
