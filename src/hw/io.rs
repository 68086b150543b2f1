// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! [`PanelIo`] over the board's GPIO lines.

use crate::drivers::{Line, PanelIo};
use crate::hw::line::OutputLine;
use crate::hw::pins::{LedPins, OutPin, PanelPins};

pub struct BoardIo {
    drive_positive: OutputLine<OutPin>,
    drive_negative: OutputLine<OutPin>,
    sense_moved: OutputLine<OutPin>,
    sense_reset: OutputLine<OutPin>,
    strobe: OutputLine<OutPin>,
    load: OutputLine<OutPin>,
    relay_a: OutputLine<OutPin>,
    relay_b: OutputLine<OutPin>,
    led_green: OutputLine<OutPin>,
    led_yellow: OutputLine<OutPin>,
    led_red: OutputLine<OutPin>,
}

impl BoardIo {
    /// Take over the panel and LED pins. Every line starts inactive.
    pub fn new(panel: PanelPins, leds: LedPins) -> Self {
        Self {
            drive_positive: OutputLine::active_high(panel.drive_positive),
            drive_negative: OutputLine::active_high(panel.drive_negative),
            sense_moved: OutputLine::active_high(panel.sense_moved),
            sense_reset: OutputLine::active_high(panel.sense_reset),
            strobe: OutputLine::active_high(panel.strobe),
            load: OutputLine::active_high(panel.load),
            relay_a: OutputLine::active_high(panel.relay_a),
            relay_b: OutputLine::active_high(panel.relay_b),
            led_green: OutputLine::active_low(leds.green),
            led_yellow: OutputLine::active_low(leds.yellow),
            led_red: OutputLine::active_low(leds.red),
        }
    }

    fn line(&mut self, line: Line) -> &mut OutputLine<OutPin> {
        match line {
            Line::DrivePositive => &mut self.drive_positive,
            Line::DriveNegative => &mut self.drive_negative,
            Line::SenseMoved => &mut self.sense_moved,
            Line::SenseReset => &mut self.sense_reset,
            Line::Strobe => &mut self.strobe,
            Line::Load => &mut self.load,
            Line::RelayA => &mut self.relay_a,
            Line::RelayB => &mut self.relay_b,
            Line::LedGreen => &mut self.led_green,
            Line::LedYellow => &mut self.led_yellow,
            Line::LedRed => &mut self.led_red,
        }
    }
}

impl PanelIo for BoardIo {
    #[inline]
    fn set_line(&mut self, line: Line, active: bool) {
        self.line(line).set(active);
    }
}
