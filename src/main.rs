// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Panel firmware entry point.
//!
//! TIM2 ticks every millisecond; USART2 feeds the frame receiver and paces the transmitter.
//! Everything else runs in the main loop, which turns elapsed milliseconds into engine ticks
//! and claps.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::cell::RefCell;
    use core::sync::atomic::{AtomicU32, Ordering};

    use cortex_m::{delay::Delay, interrupt::Mutex, peripheral::NVIC};
    use cortex_m_rt::entry;
    use log::{info, warn};
    use panic_halt as _;

    use hal::{
        gpio::{gpiod, Alternate},
        pac::{self, interrupt},
        prelude::*,
        serial::{Config, Serial},
        spi::{Mode, Phase, Polarity, Spi},
    };
    use stm32f7xx_hal as hal;

    use solari::config::{FLAP_CLAP_PERIOD_MS, LINK_BAUD, LOG_LEVEL};
    use solari::control::{Dispatcher, SidePolicy};
    use solari::drivers::PanelDriver;
    use solari::hw::{tick::Tick, usart::init_logger, BoardIo, BoardPins, HostLink, SpiBus, Usart};
    use solari::panel::Panel;

    type Link = HostLink<(gpiod::PD5<Alternate<7>>, gpiod::PD6<Alternate<7>>)>;

    static MILLIS: AtomicU32 = AtomicU32::new(0);
    static LINK: Mutex<RefCell<Option<Link>>> = Mutex::new(RefCell::new(None));

    #[entry]
    fn main() -> ! {
        // Peripherals
        let dp = pac::Peripherals::take().unwrap();
        let cp = cortex_m::Peripherals::take().unwrap();

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.freeze();
        let mut apb2 = rcc.apb2;

        // GPIO
        let pins = BoardPins::new(dp.GPIOA, dp.GPIOD, dp.GPIOE);

        // USART1 (DBG)
        let dbg_cfg = Config {
            baud_rate: 115_200.bps(),
            ..Default::default()
        };
        let serial = Serial::new(
            dp.USART1,
            (pins.usart1.tx, pins.usart1.rx),
            &clocks,
            dbg_cfg,
        );
        init_logger(Usart::new(serial), LOG_LEVEL);

        // USART2 (host link)
        let link_cfg = Config {
            baud_rate: LINK_BAUD.bps(),
            ..Default::default()
        };
        let serial = Serial::new(
            dp.USART2,
            (pins.usart2.tx, pins.usart2.rx),
            &clocks,
            link_cfg,
        );
        cortex_m::interrupt::free(|cs| {
            LINK.borrow(cs).replace(Some(HostLink::new(serial)));
        });

        // SPI4 (sensor and drive chains)
        let spi_mode = Mode {
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
        };
        let spi4_raw = Spi::new(dp.SPI4, (pins.spi4.sck, pins.spi4.miso, pins.spi4.mosi));
        let spi4_enabled = spi4_raw.enable::<u8>(spi_mode, 500.kHz(), &clocks, &mut apb2);
        let bus = SpiBus::new(spi4_enabled);

        let delay = Delay::new(cp.SYST, clocks.sysclk().raw());
        let io = BoardIo::new(pins.panel, pins.leds);
        let mut panel = Panel::new(PanelDriver::new(io, bus, delay));

        let policy = SidePolicy::configured();
        let mut dispatcher = Dispatcher::new(policy);

        if let Err(e) = panel.init(policy) {
            warn!("initial sensor read failed: {:?}", e);
        }
        info!("panel ready, {:?}", policy);

        let _tick = Tick::tim2(dp.TIM2, &clocks);
        // SAFETY: both handlers only touch MILLIS and LINK, which are set up above.
        unsafe {
            NVIC::unmask(pac::Interrupt::TIM2);
            NVIC::unmask(pac::Interrupt::USART2);
        }

        let mut last_ms = MILLIS.load(Ordering::Relaxed);
        let mut clap_ms: u32 = 0;

        loop {
            let now = MILLIS.load(Ordering::Relaxed);
            while last_ms != now {
                last_ms = last_ms.wrapping_add(1);

                match panel.tick_1ms() {
                    Ok(Some(side)) => dispatcher.state_changed(side),
                    Ok(None) => {}
                    Err(e) => warn!("sensor read failed: {:?}", e),
                }

                clap_ms += 1;
                if clap_ms >= FLAP_CLAP_PERIOD_MS {
                    clap_ms = 0;
                    if let Err(e) = panel.single_clap(policy) {
                        warn!("drive pulse failed: {:?}", e);
                    }
                }
            }

            let frame = cortex_m::interrupt::free(|cs| {
                LINK.borrow(cs)
                    .borrow_mut()
                    .as_mut()
                    .and_then(|link| link.rx.take_frame())
            });
            if let Some(frame) = frame {
                dispatcher.handle_frame(&mut panel, &frame);
            }

            cortex_m::interrupt::free(|cs| {
                if let Some(link) = LINK.borrow(cs).borrow_mut().as_mut() {
                    if dispatcher.fill_next(&panel, &mut link.tx).is_some() {
                        link.start_send();
                    }
                }
            });

            panel.update_leds(policy);
        }
    }

    #[interrupt]
    fn TIM2() {
        Tick::clear_interrupt();
        MILLIS.fetch_add(1, Ordering::Relaxed);
        cortex_m::interrupt::free(|cs| {
            if let Some(link) = LINK.borrow(cs).borrow_mut().as_mut() {
                link.rx.tick_1ms();
            }
        });
    }

    #[interrupt]
    fn USART2() {
        cortex_m::interrupt::free(|cs| {
            if let Some(link) = LINK.borrow(cs).borrow_mut().as_mut() {
                link.on_interrupt();
            }
        });
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
