//! Offline binomial schedule driver.
//!
//! Implements the Griewank/Walther reversal schedule for a known step count:
//! checkpoints are placed at binomial split points so that reversing `L`
//! steps with `C` slots costs `O(L·log C)` recomputed forward steps. The
//! driver is a pure state machine over `(capo, fine, check)`; the host owns
//! the simulation state and obeys the returned [`Action`]s.
//!
//! The same driver also reverses trajectories laid down by the online
//! schemes: [`Offline::from_online`] re-ranks the slots left behind at
//! [`turn`](crate::Revolve::turn) and switches restore/takeshot targeting to
//! rank order instead of slot order.

use crate::action::Action;
use crate::binomial::{numforw, reps_and_range, CHECKUP, REPSUP};
use crate::online::OnlineSnapshot;
use crate::store::CheckpointStore;

/// Binomial schedule over a fixed range of steps.
#[derive(Clone, Debug)]
pub struct Offline {
    snaps: i32,
    steps: i32,
    check: i32,
    capo: i32,
    fine: i32,
    oldfine: i32,
    oldsnaps: i32,
    turned: bool,
    info: i32,
    online: bool,
    /// Rank of each slot's stored step at handoff (from-online mode only).
    num_ch: Vec<i32>,
}

impl Offline {
    /// Schedule a reversal of `steps` time steps with `snaps` slots known
    /// a priori.
    pub fn new(steps: i32, snaps: i32, cp: &mut CheckpointStore) -> Self {
        cp.ch[0] = 0;
        Offline {
            snaps,
            steps,
            check: -1,
            capo: 0,
            fine: steps,
            oldfine: steps,
            oldsnaps: snaps,
            turned: false,
            info: 3,
            online: false,
            num_ch: vec![0; snaps.max(0) as usize],
        }
    }

    /// Reverse a trajectory recorded by an online scheme.
    ///
    /// The slots in `cp` hold the checkpoint layout frozen at the host's
    /// `turn(final)`; they are ranked by stored step so that restores can
    /// walk downward through an arbitrary (non-monotone-by-slot) layout.
    pub fn from_online(
        snaps: i32,
        cp: &mut CheckpointStore,
        snapshot: OnlineSnapshot,
        final_step: i32,
    ) -> Self {
        cp.ch[0] = 0;
        let n = snaps.max(0) as usize;
        let mut num_ch = vec![0_i32; n];
        for i in 0..n {
            for j in 0..n {
                if cp.ch[j] < cp.ch[i] {
                    num_ch[i] += 1;
                }
            }
            tracing::debug!(slot = i, rank = num_ch[i], step = cp.ch[i], "handoff slot rank");
        }
        // ord_ch[k] = the slot holding the k-th smallest step. Stored steps
        // are pairwise distinct, so ranks are a permutation.
        for (k, ord) in cp.ord_ch.iter_mut().enumerate() {
            for (j, &rank) in num_ch.iter().enumerate() {
                if rank == k as i32 {
                    *ord = j;
                }
            }
        }
        cp.advances = i64::from(final_step) - 1;
        Offline {
            snaps,
            steps: final_step,
            check: snapshot.check,
            capo: final_step - 1,
            fine: final_step,
            oldfine: final_step,
            oldsnaps: snaps,
            turned: false,
            info: snapshot.info,
            online: true,
            num_ch,
        }
    }

    #[inline]
    pub fn check(&self) -> i32 {
        self.check
    }

    #[inline]
    pub fn capo(&self) -> i32 {
        self.capo
    }

    #[inline]
    pub fn fine(&self) -> i32 {
        self.fine
    }

    #[inline]
    pub fn steps(&self) -> i32 {
        self.steps
    }

    #[inline]
    pub fn info(&self) -> i32 {
        self.info
    }

    #[inline]
    pub fn set_info(&mut self, info: i32) {
        self.info = info;
    }

    /// One scheduling decision. Dispatches on `fine - capo`.
    pub fn step(&mut self, cp: &mut CheckpointStore) -> Action {
        cp.commands += 1;
        if self.check < -1 || self.capo > self.fine {
            return Action::Error;
        }
        if self.check == -1 && self.capo < self.fine {
            self.turned = false;
            // Start sentinel: terminate fires when capo returns to ch[0].
            cp.ch[0] = self.capo - 1;
        }
        match self.fine - self.capo {
            0 => self.pop_or_terminate(cp),
            1 => self.reverse_one(cp),
            _ => {
                if self.check == -1 {
                    self.first_takeshot(cp)
                } else if cp.ch[self.check as usize] != self.capo {
                    self.takeshot(cp)
                } else {
                    self.advance(cp)
                }
            }
        }
    }

    /// `fine == capo`: drop back to the previous checkpoint, or finish.
    fn pop_or_terminate(&mut self, cp: &mut CheckpointStore) -> Action {
        if self.check == -1 || self.capo == cp.ch[0] {
            if self.info > 0 {
                tracing::info!(
                    advances = cp.advances,
                    takeshots = cp.takeshots,
                    commands = cp.commands,
                    "reversal complete"
                );
            }
            return Action::Terminate;
        }
        if self.online {
            // Slot order carries no meaning after an online sweep; restore
            // the slot with the largest step still below capo.
            let mut ind = 0;
            for i in 0..self.snaps as usize {
                if cp.ch[i] > cp.ch[ind] && cp.ch[i] < self.capo {
                    ind = i;
                }
            }
            self.check = ind as i32;
        }
        self.capo = cp.ch[self.check as usize];
        self.oldfine = self.fine;
        cp.number_of_reads[self.check as usize] += 1;
        Action::Restore
    }

    /// `fine - capo == 1`: combined forward/adjoint step, consuming the
    /// checkpoint at capo if one is live there.
    fn reverse_one(&mut self, cp: &mut CheckpointStore) -> Action {
        self.fine -= 1;
        if self.check >= 0 && cp.ch[self.check as usize] == self.capo {
            self.check -= 1;
        }
        self.oldfine = self.fine;
        if !self.turned {
            self.turned = true;
            Action::Firsturn
        } else {
            Action::Youturn
        }
    }

    /// Initial call with an empty slot set: seed slot 0 at capo.
    fn first_takeshot(&mut self, cp: &mut CheckpointStore) -> Action {
        cp.ch[0] = 0;
        self.check = 0;
        self.oldsnaps = self.snaps;
        if self.snaps > CHECKUP {
            self.info = 14;
            return Action::Error;
        }
        if self.info > 0 {
            let num = numforw(self.fine - self.capo, self.snaps);
            if num == -1 {
                self.info = 12;
                return Action::Error;
            }
            tracing::info!(
                forward_steps = num,
                slowdown = f64::from(num) / f64::from(self.fine - self.capo),
                "predicted recomputation"
            );
        }
        self.oldfine = self.fine;
        cp.number_of_writes[0] += 1;
        cp.takeshots += 1;
        Action::Takeshot
    }

    fn takeshot(&mut self, cp: &mut CheckpointStore) -> Action {
        if self.online {
            self.check = cp.ord_ch[(self.num_ch[self.check as usize] + 1) as usize] as i32;
        } else {
            self.check += 1;
        }
        if self.check >= CHECKUP {
            self.info = 10;
            return Action::Error;
        }
        if self.check + 1 > self.snaps {
            self.info = 11;
            return Action::Error;
        }
        cp.ch[self.check as usize] = self.capo;
        cp.takeshots += 1;
        self.oldfine = self.fine;
        cp.number_of_writes[self.check as usize] += 1;
        Action::Takeshot
    }

    /// Binomial advance: move capo to the split point of the current
    /// subrange, leaving the remaining slots an optimal partition.
    fn advance(&mut self, cp: &mut CheckpointStore) -> Action {
        if self.oldfine < self.fine && self.snaps == self.check + 1 {
            self.info = 13;
            return Action::Error;
        }
        let oldcapo = self.capo;
        let ds = if self.online {
            self.snaps - self.num_ch[self.check as usize]
        } else {
            self.snaps - self.check
        };
        if ds < 1 {
            self.info = 11;
            return Action::Error;
        }
        let (reps, range) = reps_and_range(self.fine - self.capo, ds);
        if reps > REPSUP {
            self.info = 15;
            return Action::Error;
        }
        if self.snaps != self.oldsnaps && self.snaps > CHECKUP {
            self.info = 14;
            return Action::Error;
        }

        let ds = i64::from(ds);
        let reps = i64::from(reps);
        let d = i64::from(self.fine - self.capo);
        let bino1 = range * reps / (ds + reps);
        let bino2 = if ds > 1 { bino1 * ds / (ds + reps - 1) } else { 1 };
        let bino3 = if ds == 1 {
            0
        } else if ds > 2 {
            bino2 * (ds - 1) / (ds + reps - 2)
        } else {
            1
        };
        let bino4 = bino2 * (reps - 1) / ds;
        let bino5 = if ds < 3 {
            0
        } else if ds > 3 {
            bino3 * (ds - 2) / reps
        } else {
            1
        };

        let mut capo = i64::from(self.capo);
        if d <= bino1 + bino3 {
            capo += bino4;
        } else if d >= range - bino5 {
            capo += bino1;
        } else {
            capo = i64::from(self.fine) - bino2 - bino3;
        }
        if capo == i64::from(oldcapo) {
            capo = i64::from(oldcapo) + 1;
        }
        self.capo = capo as i32;
        cp.advances += i64::from(self.capo - oldcapo);
        self.oldfine = self.fine;
        Action::Advance
    }
}
