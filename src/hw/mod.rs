// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers for the STM32F777 control board.

pub mod io;
pub mod line;
pub mod link;
pub mod pins;
pub mod spi;
pub mod tick;
pub mod usart;

pub use io::BoardIo;
pub use line::OutputLine;
pub use link::HostLink;
pub use pins::BoardPins;
pub use spi::SpiBus;
pub use usart::Usart;
