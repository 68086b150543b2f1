// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 Solari control board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiod, gpioe, Alternate, ErasedPin, Output, PushPull},
    pac,
    prelude::*,
};

/// Push-pull output with its port/pin erased, so every panel line has one type.
pub type OutPin = ErasedPin<Output<PushPull>>;

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub usart2: Usart2Pins,
    pub spi4: Spi4Pins,
    pub panel: PanelPins,
}

pub struct LedPins {
    pub red: OutPin,
    pub yellow: OutPin,
    pub green: OutPin,
}

/// Debug terminal.
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Host link.
pub struct Usart2Pins {
    pub tx: gpiod::PD5<Alternate<7>>,
    pub rx: gpiod::PD6<Alternate<7>>,
}

/// Shared shift-register bus (SPI4 SCK/MISO/MOSI).
pub struct Spi4Pins {
    pub sck: gpioe::PE12<Alternate<5>>,
    pub miso: gpioe::PE13<Alternate<5>>,
    pub mosi: gpioe::PE14<Alternate<5>>,
}

/// Panel control lines.
pub struct PanelPins {
    pub drive_positive: OutPin,
    pub drive_negative: OutPin,
    pub sense_moved: OutPin,
    pub sense_reset: OutPin,
    pub strobe: OutPin, // CD4094 STR
    pub load: OutPin,   // CD4021 P/S
    pub relay_a: OutPin,
    pub relay_b: OutPin,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: LedPins {
                red: gpiod.pd8.into_push_pull_output().erase(),
                yellow: gpiod.pd9.into_push_pull_output().erase(),
                green: gpiod.pd10.into_push_pull_output().erase(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            usart2: Usart2Pins {
                tx: gpiod.pd5.into_alternate::<7>(),
                rx: gpiod.pd6.into_alternate::<7>(),
            },

            spi4: Spi4Pins {
                sck: gpioe.pe12.into_alternate::<5>(),
                miso: gpioe.pe13.into_alternate::<5>(),
                mosi: gpioe.pe14.into_alternate::<5>(),
            },

            panel: PanelPins {
                drive_positive: gpiod.pd12.into_push_pull_output().erase(),
                drive_negative: gpiod.pd13.into_push_pull_output().erase(),
                sense_moved: gpioa.pa3.into_push_pull_output().erase(),
                sense_reset: gpioa.pa4.into_push_pull_output().erase(),
                strobe: gpioe.pe4.into_push_pull_output().erase(),
                load: gpioe.pe11.into_push_pull_output().erase(),
                relay_a: gpiod.pd1.into_push_pull_output().erase(),
                relay_b: gpiod.pd2.into_push_pull_output().erase(),
            },
        }
    }
}
