//! Checkpoint placement at repetition count 3.
//!
//! Installed when the r=2 range is exhausted. The scheme steers the slot
//! layout toward a precomputed final distribution `ch3` (the layout an
//! offline r=3 schedule would have chosen), tracking the gaps between
//! ordered checkpoints in `tdiff` and their target gaps in `tdiff_end`.
//! Slots that have landed on their final step are frozen via `cp_fest` and
//! never replaced again.

use crate::action::Action;
use crate::store::CheckpointStore;

/// Online scheme quasi-optimal over
/// `[(C+2)(C+1)/2 + 1, (C+3)(C+2)(C+1)/6]` steps.
#[derive(Clone, Debug)]
pub struct OnlineR3 {
    snaps: i32,
    check: i32,
    capo: i32,
    /// Steps to advance before the next takeshot.
    forward: i32,
    /// Next index of `ch3` still waiting for its slot.
    ind_now: i32,
    /// Position (from the back of `ord_ch`) of the slot to replace.
    victim: i32,
    /// Final checkpoint distribution this scheme converges to.
    ch3: Vec<i32>,
    /// Current gap between the i-th and (i-1)-th ordered checkpoints.
    tdiff: Vec<i32>,
    /// Target gaps of the final distribution.
    tdiff_end: Vec<i32>,
    /// Frozen slots (already at their final step).
    cp_fest: Vec<bool>,
}

impl OnlineR3 {
    /// Install over the slot layout the r=2 scheme left behind. Resets the
    /// ordering so that `ord_ch` counts down from the back.
    pub fn new(snaps: i32, cp: &mut CheckpointStore) -> Self {
        let n = snaps.max(0) as usize;
        let mut tdiff = vec![0_i32; n];
        let mut tdiff_end = vec![0_i32; n];
        let mut ch3 = vec![0_i32; n];
        let cp_fest = vec![false; n];
        for (i, td) in tdiff.iter_mut().enumerate() {
            *td = i as i32 + 3;
            cp.ord_ch[i] = (snaps - i as i32) as usize;
        }
        tdiff_end[0] = 6;
        for i in 1..n {
            tdiff_end[i] = tdiff_end[i - 1] + 3 + i as i32;
        }
        ch3[0] = 0;
        for i in 1..n {
            ch3[i] = ch3[i - 1] + tdiff_end[n - i - 1];
        }
        OnlineR3 {
            snaps,
            check: 1,
            capo: (snaps + 2) * (snaps + 1) / 2 - 1,
            forward: 0,
            ind_now: 0,
            victim: 0,
            ch3,
            tdiff,
            tdiff_end,
            cp_fest,
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
        if self.capo == (snaps + 2) * (snaps + 1) / 2 - 1 {
            // Entry from r=2.
            self.capo += 1;
            self.forward = 3;
            self.ind_now = 1;
            cp.advances += 3;
            self.victim = 0;
            return Action::Advance;
        }
        if self.capo == cp.ch[self.check as usize] {
            // Sitting on the newest checkpoint: move on. The stride drops to
            // 1 just below a ch3 target and once every target is placed.
            if self.ind_now == snaps || self.capo == self.ch3[self.ind_now as usize] - 1 {
                self.forward = 1;
            }
            self.capo += self.forward;
            cp.advances += i64::from(self.forward);
            return Action::Advance;
        }
        if self.capo <= (snaps + 3) * (snaps + 2) * (snaps + 1) / 6 - 4 {
            if !(self.victim == 0 && self.forward == 1) {
                let mut number = 1;
                self.victim = self.replaceable(number);
                while self.cp_fest[cp.ord_ch[(snaps - 1 - self.victim) as usize]] {
                    number += 1;
                    self.victim = self.replaceable(number);
                }
            }
            cp.ch[cp.ord_ch[(snaps - 1 - self.victim) as usize]] = self.capo;
            self.renew_tdiff();
            self.rotate_ord(cp);
            self.check = cp.ord_ch[snaps as usize - 1] as i32;
            if self.ind_now < snaps && cp.ch[self.check as usize] == self.ch3[self.ind_now as usize]
            {
                // Landed on a target step: freeze the slot for good.
                self.cp_fest[self.check as usize] = true;
                self.ind_now += 1;
            }
            self.forward = 3;
            cp.takeshots += 1;
            return Action::Takeshot;
        }
        // End of the r=3 range: the façade installs the level scheme.
        Action::Terminate
    }

    /// Replacement condition: index (from the back of the ordering) of the
    /// `number`-th checkpoint whose neighboring gaps still fit inside the
    /// target gap.
    fn replaceable(&self, mut number: i32) -> i32 {
        if self.tdiff[0] == 3 && number == 1 {
            return 0;
        }
        if self.tdiff[0] + self.tdiff[1] <= 10 && number <= 2 {
            return 1;
        }
        let mut i = 2_usize;
        while number > 0 {
            if self.tdiff[i - 1] + self.tdiff[i] <= self.tdiff_end[i] {
                number -= 1;
            }
            i += 1;
        }
        (i - 1) as i32
    }

    /// Fold the replaced checkpoint's gap into its successor and restart the
    /// leading gap at the base stride.
    fn renew_tdiff(&mut self) {
        let victim = self.victim as usize;
        if victim == 0 {
            if self.forward == 3 {
                self.tdiff[0] = 6;
            } else {
                self.tdiff[0] += 1;
            }
            return;
        }
        let mut sum = self.tdiff[0];
        for i in (1..victim).rev() {
            sum += self.tdiff[i] - self.tdiff[i - 1];
            self.tdiff[i] = self.tdiff[i - 1];
        }
        self.tdiff[victim] += sum;
        self.tdiff[0] = 3;
    }

    /// Cyclically rotate the tail of `ord_ch` so the replaced slot becomes
    /// the most recent.
    fn rotate_ord(&self, cp: &mut CheckpointStore) {
        if self.victim == 0 {
            return;
        }
        let snaps = self.snaps as usize;
        let victim = self.victim as usize;
        let value = cp.ord_ch[snaps - 1 - victim];
        for i in (1..=victim).rev() {
            cp.ord_ch[snaps - i - 1] = cp.ord_ch[snaps - i];
        }
        cp.ord_ch[snaps - 1] = value;
    }
}
