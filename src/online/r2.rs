//! Incremental checkpoint placement at repetition count 2.
//!
//! The first `C` steps each get their own slot. From then on the scheme
//! refills slots in cycles: each cycle frees the oldest-but-one slot for the
//! current step and widens the gap to the next refill, so that no step is
//! ever recomputed more than twice during the eventual reversal. The slot
//! ordering lives in `ord_ch` and is rotated right on every refill.

use crate::action::Action;
use crate::binomial::MAXINT;
use crate::store::CheckpointStore;

/// Online scheme optimal over `[0, (C+2)(C+1)/2]` steps.
#[derive(Clone, Debug)]
pub struct OnlineR2 {
    snaps: i32,
    check: i32,
    capo: i32,
    oldcapo: i32,
    offset: i32,
    incr: i32,
    iter: i32,
    t: i32,
    oldind: i32,
    /// Doubles as a slot index (filling phase) and an `ord_ch` position
    /// (refill phase).
    ind: i32,
    num_rep: Vec<i32>,
}

impl OnlineR2 {
    pub fn new(snaps: i32) -> Self {
        OnlineR2 {
            snaps,
            check: -1,
            capo: 0,
            oldcapo: 0,
            offset: 0,
            incr: 0,
            iter: 0,
            t: 0,
            oldind: 0,
            ind: 0,
            num_rep: vec![0; snaps.max(0) as usize],
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

    pub fn step(&mut self, cp: &mut CheckpointStore) -> Action {
        cp.commands += 1;
        let snaps = self.snaps;
        if self.check == -1
            || (cp.ch[self.check as usize] != self.capo && self.capo <= snaps - 1)
        {
            return self.fill_slot(cp);
        }
        if self.capo < snaps - 1 {
            // One-step advance between the initial per-step takeshots.
            self.capo = self.oldcapo + 1;
            cp.advances += 1;
            return Action::Advance;
        }
        if cp.ch[self.check as usize] == self.capo {
            self.refill_advance(cp)
        } else {
            self.refill_takeshot(cp)
        }
    }

    /// Filling phase: one slot per step until all `C` slots are live.
    fn fill_slot(&mut self, cp: &mut CheckpointStore) -> Action {
        let snaps = self.snaps;
        self.oldcapo = self.capo;
        self.check += 1;
        cp.ch[self.check as usize] = self.capo;
        self.t = 0;
        if snaps < 4 {
            for rep in self.num_rep.iter_mut() {
                *rep = 2;
            }
            self.incr = 2;
            self.iter = 1;
            self.oldind = snaps - 1;
        } else {
            self.iter = 1;
            self.incr = 1;
            self.oldind = 1;
            for i in 0..snaps as usize {
                self.num_rep[i] = 1;
                cp.ord_ch[i] = i;
            }
            self.offset = snaps - 1;
        }
        if self.capo == snaps - 1 {
            self.ind = 2;
        }
        cp.takeshots += 1;
        Action::Takeshot
    }

    fn refill_advance(&mut self, cp: &mut CheckpointStore) -> Action {
        let snaps = self.snaps;
        match snaps {
            1 => {
                // A single slot pins step 0 forever; run the sweep out.
                self.capo = MAXINT - 1;
                cp.advances += 1;
                Action::Advance
            }
            2 => {
                self.capo = cp.ch[1] + self.incr;
                cp.advances += 1;
                Action::Advance
            }
            3 => {
                cp.advances += i64::from(self.incr);
                if self.iter == 0 {
                    self.capo = cp.ch[self.oldind as usize];
                    for _ in 0..=((self.t + 1) / 2) {
                        self.capo += self.incr;
                        self.incr += 1;
                        self.iter += 1;
                    }
                } else {
                    self.capo = cp.ch[self.ind as usize] + self.incr;
                    self.iter += 1;
                    self.incr += 1;
                }
                Action::Advance
            }
            _ => {
                if self.capo == snaps - 1 {
                    self.capo += 2;
                    self.ind = snaps - 1;
                    cp.advances += 2;
                    return Action::Advance;
                }
                tracing::trace!(
                    iter = self.iter,
                    incr = self.incr,
                    offset = self.offset,
                    "refill advance"
                );
                if self.t == 0 {
                    if self.iter < self.offset {
                        self.capo += 1;
                        cp.advances += 1;
                    } else {
                        self.capo += 2;
                        cp.advances += 2;
                    }
                    if self.offset == 1 {
                        self.t += 1;
                    }
                    return Action::Advance;
                }
                // Beyond the r=2 range no further advance target exists; the
                // façade must already have escalated by now.
                tracing::debug!(iter = self.iter, incr = self.incr, "advance past r=2 range");
                Action::Error
            }
        }
    }

    fn refill_takeshot(&mut self, cp: &mut CheckpointStore) -> Action {
        let snaps = self.snaps;
        match snaps {
            2 => {
                cp.ch[1] = self.capo;
                self.incr += 1;
                cp.takeshots += 1;
                Action::Takeshot
            }
            3 => {
                cp.ch[self.ind as usize] = self.capo;
                self.check = self.ind;
                tracing::trace!(
                    iter = self.iter,
                    num_rep = self.num_rep[1],
                    "triple-slot refill"
                );
                if self.iter == self.num_rep[1] {
                    self.iter = 0;
                    self.t += 1;
                    self.oldind = self.ind;
                    self.num_rep[1] += 1;
                    self.ind = 2 - self.num_rep[1] % 2;
                    self.incr = 1;
                }
                cp.takeshots += 1;
                Action::Takeshot
            }
            _ => {
                if self.capo < snaps + 2 {
                    cp.ch[self.ind as usize] = self.capo;
                    self.check = self.ind;
                    if self.capo == snaps + 1 {
                        // First rotation: the newest slot moves to position 1
                        // of the ordering; the ch writes along the way are
                        // identities that keep slot/step pairs intact.
                        self.oldind = cp.ord_ch[snaps as usize - 1] as i32;
                        self.ind = cp.ch[cp.ord_ch[snaps as usize - 1]];
                        for k in (2..snaps as usize).rev() {
                            cp.ord_ch[k] = cp.ord_ch[k - 1];
                            cp.ch[cp.ord_ch[k]] = cp.ch[cp.ord_ch[k - 1]];
                        }
                        cp.ord_ch[1] = self.oldind as usize;
                        cp.ch[cp.ord_ch[1]] = self.ind;
                        self.incr = 2;
                        self.ind = 2;
                    }
                    cp.takeshots += 1;
                    return Action::Takeshot;
                }
                if self.t == 0 {
                    if self.iter == self.offset {
                        // Cycle boundary: overwrite the last-ordered slot and
                        // rotate it into position `incr`; the usable gap
                        // shrinks by one.
                        self.offset -= 1;
                        self.iter = 1;
                        self.check = cp.ord_ch[snaps as usize - 1] as i32;
                        cp.ch[cp.ord_ch[snaps as usize - 1]] = self.capo;
                        self.oldind = cp.ord_ch[snaps as usize - 1] as i32;
                        self.ind = cp.ch[cp.ord_ch[snaps as usize - 1]];
                        for k in ((self.incr as usize + 1)..snaps as usize).rev() {
                            cp.ord_ch[k] = cp.ord_ch[k - 1];
                            cp.ch[cp.ord_ch[k]] = cp.ch[cp.ord_ch[k - 1]];
                        }
                        cp.ord_ch[self.incr as usize] = self.oldind as usize;
                        cp.ch[cp.ord_ch[self.incr as usize]] = self.ind;
                        self.incr += 1;
                        self.ind = self.incr;
                    } else {
                        cp.ch[cp.ord_ch[self.ind as usize]] = self.capo;
                        self.check = cp.ord_ch[self.ind as usize] as i32;
                        self.iter += 1;
                        self.ind += 1;
                    }
                    cp.takeshots += 1;
                    return Action::Takeshot;
                }
                // No slot can be freed without breaking the repetition
                // bound: hand the sweep to the next scheme.
                Action::Terminate
            }
        }
    }
}
