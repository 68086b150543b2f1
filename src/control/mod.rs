// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control
//!
//! Decisions on top of the panel engine.
//!
//! ## Modules
//!
//! - [`scheduler`] - settle timer, pulse polarity and the periodic clap decision.
//! - [`dispatch`] - maps host commands onto the panel and queues telemetry.

pub mod dispatch;
pub mod scheduler;

pub use dispatch::Dispatcher;
pub use scheduler::{ClapOutcome, DriveScheduler, DriveState, SidePolicy};
