// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Drive pulses, settle timing and side multiplexing against the simulated board.

mod common;

use common::{panel, BusFault, Firmware, Rig};
use solari::config::{ACTIVE_OUT_MS, FLAP_BYTES, LAMP_TEST_MS, SIDE_SETTLE_MS};
use solari::control::{ClapOutcome, SidePolicy};
use solari::drivers::{Line, Polarity};
use solari::panel::{Side, UnitBitmap};

fn first_units(n: usize) -> UnitBitmap {
    (0..n).map(|_| true).collect()
}

#[test]
fn init_connects_each_side_and_homes_units_at_rest() {
    let mut rig = Rig::uniform(2, 10);
    rig.flaps[1][7].slot = 0;
    let fw = Firmware::boot(rig, SidePolicy::Both);

    assert_eq!(fw.panel.side(Side::B).units()[7].position(), Some(0));
    assert_eq!(fw.panel.side(Side::A).units()[7].position(), None);
    assert_eq!(fw.panel.active_side(), Some(Side::B));
    assert!(!fw.panel.is_settling());

    let rig = fw.rig.borrow();
    assert_eq!(rig.asserts(Line::RelayA), 1);
    assert_eq!(rig.asserts(Line::RelayB), 1);
    assert_eq!(rig.reads, 4);
    // No pulse during init.
    assert!(rig.polarities().is_empty());
    drop(rig);

    let (_, _, delay) = fw.panel.free().free();
    assert_eq!(
        delay.ms,
        u64::from(LAMP_TEST_MS) + 2 * u64::from(SIDE_SETTLE_MS)
    );
}

#[test]
fn init_flashes_every_status_led_once() {
    let fw = Firmware::boot(Rig::uniform(0, 10), SidePolicy::Both);
    let rig = fw.rig.borrow();
    for led in [Line::LedGreen, Line::LedYellow, Line::LedRed] {
        assert_eq!(rig.asserts(led), 1);
        assert!(!rig.level(led));
    }

    // All lit before the first relay closes.
    let first_relay = rig
        .events
        .iter()
        .position(|&e| e == (Line::RelayA, true))
        .unwrap();
    let red_on = rig
        .events
        .iter()
        .position(|&e| e == (Line::LedRed, true))
        .unwrap();
    assert!(red_on < first_relay);
}

#[test]
fn polarity_alternates_across_pulses() {
    let (mut panel, rig) = panel(Rig::uniform(3, 10));
    panel.init(SidePolicy::Single(Side::A)).unwrap();

    for expected in [
        Polarity::Positive,
        Polarity::Negative,
        Polarity::Positive,
        Polarity::Negative,
    ] {
        assert_eq!(panel.next_polarity(), expected);
        assert!(panel.flap(&first_units(4)).unwrap());
        for _ in 0..ACTIVE_OUT_MS {
            panel.tick_1ms().unwrap();
        }
        assert!(!panel.is_settling());
    }

    assert_eq!(
        rig.borrow().polarities(),
        [
            Line::DrivePositive,
            Line::DriveNegative,
            Line::DrivePositive,
            Line::DriveNegative
        ]
    );
}

#[test]
fn flap_while_settling_changes_nothing() {
    let (mut panel, rig) = panel(Rig::uniform(3, 10));
    panel.init(SidePolicy::Single(Side::A)).unwrap();
    assert!(panel.flap(&first_units(2)).unwrap());

    let events = rig.borrow().events.len();
    let writes = rig.borrow().writes.len();
    let slots: Vec<u8> = rig.borrow().flaps[0].iter().map(|f| f.slot).collect();
    let polarity = panel.next_polarity();

    assert!(!panel.flap(&first_units(8)).unwrap());
    assert!(!panel.read_sensors(Side::A).unwrap());

    let rig = rig.borrow();
    assert_eq!(rig.events.len(), events);
    assert_eq!(rig.writes.len(), writes);
    assert_eq!(
        rig.flaps[0].iter().map(|f| f.slot).collect::<Vec<_>>(),
        slots
    );
    assert_eq!(panel.next_polarity(), polarity);
}

#[test]
fn pulse_latches_inverted_bitmap_then_energises_one_line() {
    let (mut panel, rig) = panel(Rig::uniform(3, 10));
    panel.init(SidePolicy::Single(Side::A)).unwrap();
    rig.borrow_mut().events.clear();

    let mut pulse = UnitBitmap::empty();
    pulse.set(0, true);
    pulse.set(9, true);
    panel.flap(&pulse).unwrap();

    let rig = rig.borrow();
    let mut expected = [0xFFu8; FLAP_BYTES];
    expected[0] = !0x01;
    expected[1] = !0x02;
    assert_eq!(rig.writes.last().unwrap(), &expected.to_vec());
    assert_eq!(
        rig.events,
        [
            (Line::DrivePositive, false),
            (Line::DriveNegative, false),
            (Line::Strobe, false),
            (Line::Strobe, true),
            (Line::DrivePositive, true),
        ]
    );
    assert_eq!(rig.flaps[0][0].slot, 4);
    assert_eq!(rig.flaps[0][9].slot, 4);
    assert_eq!(rig.flaps[0][1].slot, 3);
}

#[test]
fn settle_expiry_switches_drive_off_and_rereads() {
    let (mut panel, rig) = panel(Rig::uniform(0, 10));
    panel.init(SidePolicy::Single(Side::A)).unwrap();
    panel.set_target(Side::A, 0, 1);
    panel.flap(&first_units(1)).unwrap();

    for _ in 1..ACTIVE_OUT_MS {
        assert_eq!(panel.tick_1ms().unwrap(), None);
    }
    assert!(rig.borrow().level(Line::DrivePositive));

    assert_eq!(panel.tick_1ms().unwrap(), Some(Side::A));
    assert!(!rig.borrow().level(Line::DrivePositive));
    assert_eq!(panel.side(Side::A).units()[0].position(), Some(1));
    assert!(panel.side(Side::A).units()[0].at_target());
}

#[test]
fn both_policy_serves_sides_in_turn_then_releases() {
    let mut rig = Rig::uniform(0, 10);
    rig.flaps[0][2].slot = 8;
    rig.flaps[1][4].slot = 9;
    let mut fw = Firmware::boot(rig, SidePolicy::Both);

    fw.run_ms(3000);

    // Side B was connected last during init, so it is served first.
    let claps = &fw.claps;
    assert_eq!(claps[0], ClapOutcome::Pulsed(Side::B));
    let to_a = claps
        .iter()
        .position(|&c| c == ClapOutcome::Switched(Some(Side::A)))
        .expect("switched to A");
    assert!(claps[..to_a]
        .iter()
        .all(|&c| matches!(c, ClapOutcome::Pulsed(Side::B) | ClapOutcome::Settling)));
    assert_eq!(claps[to_a + 1], ClapOutcome::Pulsed(Side::A));
    assert!(claps.contains(&ClapOutcome::Switched(None)));
    assert_eq!(claps.last(), Some(&ClapOutcome::Idle));

    for side in Side::ALL {
        assert!(fw.panel.side(side).all_at_target());
    }
    assert_eq!(fw.panel.active_side(), None);

    let rig = fw.rig.borrow();
    assert_eq!(rig.flaps[0][2].slot, 0);
    assert_eq!(rig.flaps[1][4].slot, 0);
    assert!(!rig.level(Line::RelayA) && !rig.level(Line::RelayB));
}

#[test]
fn single_policy_never_touches_other_relay() {
    let mut fw = Firmware::boot(Rig::uniform(5, 10), SidePolicy::Single(Side::A));
    fw.run_ms(2000);

    let rig = fw.rig.borrow();
    assert_eq!(rig.asserts(Line::RelayB), 0);
    assert!(rig.level(Line::RelayA));
    assert!(fw.panel.side(Side::A).all_at_target());
    assert!(!fw.claps.iter().any(|c| matches!(c, ClapOutcome::Switched(_))));
}

#[test]
fn leds_follow_panel_state() {
    let mut fw = Firmware::boot(Rig::uniform(4, 10), SidePolicy::Single(Side::A));
    fw.run_ms(150);
    {
        let rig = fw.rig.borrow();
        assert!(rig.level(Line::LedRed));
        assert!(rig.level(Line::LedYellow));
        assert!(!rig.level(Line::LedGreen));
    }

    fw.run_ms(2000);
    let rig = fw.rig.borrow();
    assert!(!rig.level(Line::LedRed));
    assert!(!rig.level(Line::LedYellow));
    assert!(rig.level(Line::LedGreen));
}

#[test]
fn bus_failure_is_reported_and_releases_sense_lines() {
    let (mut panel, rig) = panel(Rig::uniform(0, 10));
    panel.init(SidePolicy::Single(Side::A)).unwrap();
    rig.borrow_mut().fail_reads = true;

    assert_eq!(panel.read_sensors(Side::A), Err(BusFault));
    let rig = rig.borrow();
    assert!(!rig.level(Line::SenseMoved));
    assert!(!rig.level(Line::SenseReset));
    assert!(!rig.level(Line::Load));
}

#[test]
#[should_panic(expected = "disconnected side")]
fn reading_a_disconnected_side_panics() {
    let (mut panel, _rig) = panel(Rig::uniform(0, 10));
    panel.init(SidePolicy::Single(Side::A)).unwrap();
    let _ = panel.read_sensors(Side::B);
}
