//! Online schedules: the fill phase, the per-capacity refill patterns, the
//! strategy ladder, and full reversals after `turn`.

mod common;

use revolve::{Action, Revolve, MAXINT};

/// The first 2C-1 actions alternate takeshot/advance, pinning steps 0..C-1
/// into slots 0..C-1.
#[test]
fn fill_phase_pins_one_slot_per_step() {
    let snaps = 5;
    let mut sched = Revolve::online(snaps);
    for step in 0..snaps {
        assert_eq!(sched.step(), Action::Takeshot, "takeshot for step {step}");
        assert_eq!(sched.check(), step);
        assert_eq!(sched.capo(), step);
        if step < snaps - 1 {
            assert_eq!(sched.step(), Action::Advance, "advance past step {step}");
            assert_eq!(sched.capo(), step + 1);
        }
    }
}

/// A single slot can only pin step 0; the scheme then runs the sweep out in
/// one giant advance.
#[test]
fn single_slot_advances_to_the_horizon() {
    let mut sched = Revolve::online(1);
    assert_eq!(sched.step(), Action::Takeshot);
    assert_eq!(sched.check(), 0);
    assert_eq!(sched.step(), Action::Advance);
    assert_eq!(sched.capo(), MAXINT - 1);
}

/// Two slots: slot 1 is re-pinned at triangular-number steps 1, 3, 6, 10...
#[test]
fn two_slots_follow_triangular_refill() {
    let mut sched = Revolve::online(2);
    assert_eq!(sched.step(), Action::Takeshot); // slot 0 @ 0
    assert_eq!(sched.step(), Action::Advance);
    assert_eq!(sched.step(), Action::Takeshot); // slot 1 @ 1
    assert_eq!(sched.check(), 1);
    let mut expected_capo = 1;
    for incr in 2..8 {
        expected_capo += incr;
        assert_eq!(sched.step(), Action::Advance);
        assert_eq!(sched.capo(), expected_capo, "advance with stride {incr}");
        assert_eq!(sched.step(), Action::Takeshot);
        assert_eq!(sched.check(), 1, "slot 1 is the only replaceable slot");
    }
}

/// Forward sweeps end-to-end at the capacity boundaries of each ladder
/// rung, then reverse completely.
#[test]
fn reversal_across_ladder_boundaries() {
    // C=4: r=2 covers up to (4+2)(4+1)/2 = 15 steps, r=3 up to
    // (4+3)(4+2)(4+1)/6 = 35.
    for final_step in [1, 2, 5, 14, 15, 16, 30, 34, 35, 36, 50, 80] {
        common::run_online(final_step, 4);
    }
}

#[test]
fn reversal_small_capacities() {
    // C in {1,2,3} never escalates; the r=2 patterns run unbounded.
    for final_step in [1, 2, 3, 5, 8, 30, 100] {
        common::run_online(final_step, 1);
        common::run_online(final_step, 2);
        common::run_online(final_step, 3);
    }
}

#[test]
fn reversal_wider_capacities() {
    for snaps in 5..=6 {
        for final_step in [7, 20, 21, 55, 56, 57, 100, 150] {
            common::run_online(final_step, snaps);
        }
    }
}

/// The host only ever sees advance/takeshot before `turn`; the internal
/// rung-to-rung terminate never leaks.
#[test]
fn ladder_escalation_is_invisible_to_the_host() {
    let snaps = 4;
    let mut sched = Revolve::online(snaps);
    let mut cur = 0;
    // Far enough to cross both ladder boundaries (15 and 35).
    while cur < 60 {
        match sched.step() {
            Action::Advance => cur = sched.capo().min(60),
            Action::Takeshot => {
                assert!(sched.check() >= 0 && sched.check() < snaps);
            }
            other => panic!("host saw {other} during the online forward sweep"),
        }
    }
    assert!(sched.is_online());
    sched.turn(60);
    assert!(!sched.is_online());
}
