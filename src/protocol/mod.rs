// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Framed serial protocol used to talk to the host.

pub mod messages;
pub mod receiver;
pub mod telemetry;
pub mod transmitter;

pub use messages::{Command, Frame};
pub use receiver::FrameReceiver;
pub use telemetry::{PendingTelemetry, TelemetryKind};
pub use transmitter::{FrameTransmitter, SendError};
