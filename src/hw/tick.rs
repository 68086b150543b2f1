// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! 1 kHz system tick on TIM2.

use stm32f7xx_hal::{pac, rcc::Clocks};

const TICK_HZ: u32 = 1_000;
const COUNTER_HZ: u32 = 1_000_000;

pub struct Tick {
    tim: pac::TIM2,
}

impl Tick {
    /// Configure TIM2 to raise an update interrupt every millisecond.
    pub fn tim2(tim2: pac::TIM2, clocks: &Clocks) -> Self {
        let tim = tim2;

        // SAFETY: single read-modify-write of the TIM2 enable bit during startup.
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 MHz counter, reload every 1000 counts
        let psc = clocks.timclk1().raw() / COUNTER_HZ - 1;
        tim.psc.write(|w| w.psc().bits(psc as u16));
        tim.arr.write(|w| w.bits(COUNTER_HZ / TICK_HZ - 1));

        // Latch PSC/ARR, then drop the update flag that generates
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }

    /// Acknowledge the update interrupt.
    #[inline]
    pub fn clear_interrupt() {
        // SAFETY: write-zero-to-clear of UIF only; called from the TIM2 handler.
        unsafe { (*pac::TIM2::ptr()).sr.modify(|_, w| w.uif().clear_bit()) };
    }

    #[inline]
    pub fn free(self) -> pac::TIM2 {
        self.tim
    }
}
