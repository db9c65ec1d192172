//! Simulated host: drives a scheduler to completion while checking every
//! host-visible contract along the way.
//!
//! The "simulation" here is just a step counter; the checks are about the
//! scheduler's bookkeeping: advances start at the host position and move
//! strictly forward, takeshots store the host position, restores return
//! exactly to the step their slot stored, and the reverse actions visit
//! every step once, in descending order.

#![allow(dead_code)]

use revolve::{Action, Revolve};

pub struct Trace {
    pub actions: Vec<Action>,
    /// Steps reversed, in the order the scheduler handed them out.
    pub reversed: Vec<i32>,
    pub takeshots: i64,
    pub restores: i64,
}

/// Drive an offline scheduler from construction to terminate.
pub fn run_offline(steps: i32, snaps: i32) -> Trace {
    let mut sched = Revolve::offline(steps, snaps);
    let mut saved = vec![-1; snaps as usize];
    let trace = drive_reversal(&mut sched, 0, &mut saved, steps, snaps);
    assert_eq!(
        sched.check(),
        -1,
        "offline terminate must leave check = -1 (L={steps}, C={snaps})"
    );
    trace
}

/// Drive an online scheduler forward for `final_step` steps, turn, and run
/// the reverse sweep to terminate.
pub fn run_online(final_step: i32, snaps: i32) -> Trace {
    let mut sched = Revolve::online(snaps);
    let mut saved = vec![-1; snaps as usize];
    let mut cur = 0;
    let mut guard = 0;
    while cur < final_step {
        guard += 1;
        assert!(
            guard < 20_000_000,
            "online forward sweep stalls (L={final_step}, C={snaps})"
        );
        match sched.step() {
            Action::Advance => {
                assert_eq!(
                    sched.oldcapo(),
                    cur,
                    "online advance must start at the host position"
                );
                assert!(
                    sched.capo() > cur,
                    "online advance must move forward: {} -> {} (L={final_step}, C={snaps})",
                    cur,
                    sched.capo()
                );
                // The scheme may aim past the end of the trajectory; the
                // host stops where its data ends.
                cur = sched.capo().min(final_step);
            }
            Action::Takeshot => {
                let slot = sched.check();
                assert!(
                    slot >= 0 && slot < snaps,
                    "online takeshot slot {slot} out of range (C={snaps})"
                );
                assert_eq!(
                    sched.capo(),
                    cur,
                    "online takeshot must store the host position"
                );
                saved[slot as usize] = cur;
            }
            other => panic!("unexpected {other} during the online forward sweep"),
        }
    }
    sched.turn(final_step);
    drive_reversal(&mut sched, cur, &mut saved, final_step, snaps)
}

/// Run `sched` to terminate, checking the action contract at every step.
/// `cur` is the step the host currently holds; `saved` its snapshot slots.
fn drive_reversal(
    sched: &mut Revolve,
    mut cur: i32,
    saved: &mut [i32],
    steps: i32,
    snaps: i32,
) -> Trace {
    let mut actions = Vec::new();
    let mut reversed = Vec::new();
    let mut takeshots = 0;
    let mut restores = 0;
    let mut guard = 0;
    loop {
        guard += 1;
        assert!(
            guard < 20_000_000,
            "schedule does not terminate (L={steps}, C={snaps})"
        );
        let act = sched.step();
        actions.push(act);
        match act {
            Action::Advance => {
                assert_eq!(
                    sched.oldcapo(),
                    cur,
                    "advance must start at the host position (L={steps}, C={snaps})"
                );
                assert!(
                    sched.capo() > cur,
                    "advance must strictly increase capo: {} -> {} (L={steps}, C={snaps})",
                    cur,
                    sched.capo()
                );
                cur = sched.capo();
            }
            Action::Takeshot => {
                let slot = sched.check();
                assert!(
                    slot >= 0 && slot < snaps,
                    "takeshot slot {slot} out of range (C={snaps})"
                );
                assert_eq!(
                    sched.capo(),
                    cur,
                    "takeshot must store the host position (L={steps}, C={snaps})"
                );
                saved[slot as usize] = cur;
                takeshots += 1;
            }
            Action::Restore => {
                let slot = sched.check();
                assert!(
                    slot >= 0 && slot < snaps,
                    "restore slot {slot} out of range (C={snaps})"
                );
                assert_eq!(
                    saved[slot as usize],
                    sched.capo(),
                    "restore of slot {slot} must return to the step it stored \
                     (L={steps}, C={snaps})"
                );
                cur = sched.capo();
                restores += 1;
            }
            Action::Firsturn => {
                assert!(
                    reversed.is_empty(),
                    "firsturn must precede every youturn (L={steps}, C={snaps})"
                );
                assert_eq!(
                    sched.fine(),
                    steps - 1,
                    "firsturn reverses the last step of the trajectory"
                );
                reversed.push(sched.fine());
                // The host keeps the state below the reversed step.
                cur = sched.capo();
            }
            Action::Youturn => {
                assert!(
                    !reversed.is_empty(),
                    "youturn before firsturn (L={steps}, C={snaps})"
                );
                assert_eq!(sched.fine(), cur, "a youturn reverses the step the host is at");
                reversed.push(sched.fine());
            }
            Action::Terminate => break,
            Action::Error => {
                panic!("schedule error: info = {} (L={steps}, C={snaps})", sched.info())
            }
        }
    }
    assert_eq!(
        sched.capo(),
        sched.fine(),
        "terminate requires capo == fine (L={steps}, C={snaps})"
    );
    let expected: Vec<i32> = (0..steps).rev().collect();
    assert_eq!(
        reversed, expected,
        "every step must be reversed exactly once, newest first (L={steps}, C={snaps})"
    );
    Trace {
        actions,
        reversed,
        takeshots,
        restores,
    }
}
