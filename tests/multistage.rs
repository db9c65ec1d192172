//! Traffic prediction: the closed-form per-slot write/read counts must match
//! the counts an actual offline run produces, and the RAM/ROM split must
//! track them.

use revolve::{maxrange, reads_for_slot, writes_for_slot, Action, Revolve};

/// Drive an offline schedule to terminate and return its per-slot write and
/// read tallies.
fn driven_counts(steps: i32, snaps: i32) -> (Vec<i64>, Vec<i64>) {
    let mut sched = Revolve::offline(steps, snaps);
    for _ in 0..10_000_000 {
        match sched.step() {
            Action::Terminate => {
                return (
                    sched.number_of_writes().to_vec(),
                    sched.number_of_reads().to_vec(),
                )
            }
            Action::Error => panic!("schedule error: info = {}", sched.info()),
            _ => {}
        }
    }
    panic!("schedule does not terminate (L={steps}, C={snaps})");
}

/// The closed forms are exact over the whole range they are stated for
/// (up to β(C,3) steps).
#[test]
fn predicted_counts_match_driven_schedules() {
    for snaps in 3..=6 {
        let beta3 = maxrange(snaps, 3);
        for steps in 2..=beta3 {
            let (writes, reads) = driven_counts(steps, snaps);
            for slot in 0..snaps {
                assert_eq!(
                    i64::from(writes_for_slot(steps, snaps, slot)),
                    writes[slot as usize],
                    "writes of slot {slot} (L={steps}, C={snaps})"
                );
                assert_eq!(
                    i64::from(reads_for_slot(steps, snaps, slot)),
                    reads[slot as usize],
                    "reads of slot {slot} (L={steps}, C={snaps})"
                );
            }
        }
    }
}

/// For L=11, C=4 the predicted traffic per slot is [3, 5, 5, 3]: the
/// topmost slot only handles the tail once, so it is cooler than the middle
/// slots and the RAM budget must go to slots 1 and 2, not to the highest
/// indices.
#[test]
fn ram_follows_traffic_not_slot_order() {
    let (steps, snaps) = (11, 4);
    let traffic: Vec<i64> = (0..snaps)
        .map(|i| {
            i64::from(writes_for_slot(steps, snaps, i)) + i64::from(reads_for_slot(steps, snaps, i))
        })
        .collect();
    assert_eq!(traffic, vec![3, 5, 5, 3]);

    let mut sched = Revolve::multistage(steps, snaps, 2);
    loop {
        match sched.step() {
            Action::Takeshot | Action::Restore => {
                let slot = sched.check();
                assert_eq!(
                    sched.where_to_put(),
                    slot == 1 || slot == 2,
                    "slot {slot} landed in the wrong tier"
                );
            }
            Action::Terminate => break,
            Action::Error => panic!("schedule error: info = {}", sched.info()),
            _ => {}
        }
    }
}

/// The multi-stage façade puts exactly `snaps_ram` slots in RAM (the
/// busiest ones) and numbers each tier contiguously.
#[test]
fn ram_tier_holds_the_busiest_slots() {
    let (steps, snaps, snaps_ram) = (30, 6, 2);
    let mut sched = Revolve::multistage(steps, snaps, snaps_ram);
    assert!(sched.is_multistage());
    let mut seen_ram = Vec::new();
    let mut seen_rom = Vec::new();
    for _ in 0..10_000_000 {
        let act = sched.step();
        match act {
            Action::Takeshot | Action::Restore => {
                let slot = sched.check();
                if sched.where_to_put() {
                    assert!(
                        slot >= snaps - snaps_ram,
                        "RAM tier must hold the busiest slots, got slot {slot}"
                    );
                    seen_ram.push((slot, sched.check_ram()));
                } else {
                    assert!(slot < snaps - snaps_ram, "ROM slot {slot} misclassified");
                    seen_rom.push((slot, sched.check_rom()));
                }
            }
            Action::Terminate => break,
            Action::Error => panic!("schedule error: info = {}", sched.info()),
            _ => {}
        }
    }
    // Tier-local indices are contiguous from 0 in slot order.
    for (slot, ram_idx) in seen_ram {
        assert_eq!(ram_idx, slot - (snaps - snaps_ram));
    }
    for (slot, rom_idx) in seen_rom {
        assert_eq!(rom_idx, slot);
    }
}

#[test]
fn zero_ram_budget_puts_everything_in_rom() {
    let mut sched = Revolve::multistage(12, 4, 0);
    loop {
        match sched.step() {
            Action::Takeshot | Action::Restore => {
                assert!(!sched.where_to_put());
            }
            Action::Terminate => break,
            Action::Error => panic!("schedule error: info = {}", sched.info()),
            _ => {}
        }
    }
}
