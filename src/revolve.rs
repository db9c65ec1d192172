//! The scheduling façade owned by the host.
//!
//! A [`Revolve`] bundles the checkpoint store with the currently active
//! scheduling scheme and drives the whole reversal through one entry point,
//! [`Revolve::step`]. Offline construction installs the binomial driver
//! directly; online construction starts at the r=2 scheme and climbs the
//! strategy ladder as the forward sweep outgrows each rung, swapping the
//! next scheme in over the same store. The host ends an online forward sweep
//! with [`Revolve::turn`], which freezes the slot layout and installs an
//! offline driver for the reverse sweep.

use crate::action::{Action, ScheduleError};
use crate::binomial::num_reps;
use crate::multistage::write_and_read_counts;
use crate::offline::Offline;
use crate::online::{Moin, OnlineR2, OnlineR3, OnlineSnapshot};
use crate::store::CheckpointStore;

/// The scheduler family, dispatched by variant.
///
/// Exactly one scheme is active at a time; it borrows the store for the
/// duration of a single step. Strategy transitions replace the variant.
#[derive(Clone, Debug)]
enum Strategy {
    Offline(Offline),
    R2(OnlineR2),
    R3(OnlineR3),
    Moin(Moin),
}

impl Strategy {
    fn step(&mut self, cp: &mut CheckpointStore) -> Action {
        match self {
            Strategy::Offline(s) => s.step(cp),
            Strategy::R2(s) => s.step(cp),
            Strategy::R3(s) => s.step(cp),
            Strategy::Moin(s) => s.step(cp),
        }
    }

    fn check(&self) -> i32 {
        match self {
            Strategy::Offline(s) => s.check(),
            Strategy::R2(s) => s.check(),
            Strategy::R3(s) => s.check(),
            Strategy::Moin(s) => s.check(),
        }
    }

    fn capo(&self) -> i32 {
        match self {
            Strategy::Offline(s) => s.capo(),
            Strategy::R2(s) => s.capo(),
            Strategy::R3(s) => s.capo(),
            Strategy::Moin(s) => s.capo(),
        }
    }

    /// The online schemes have no end in sight; they answer with sentinels.
    fn fine(&self) -> i32 {
        match self {
            Strategy::Offline(s) => s.fine(),
            Strategy::R2(_) | Strategy::R3(_) => -1,
            Strategy::Moin(_) => 0,
        }
    }

    fn info(&self) -> i32 {
        match self {
            Strategy::Offline(s) => s.info(),
            _ => 0,
        }
    }
}

/// Checkpointing scheduler for the reversal of a time-stepped simulation.
///
/// See the crate-level documentation for the host protocol.
#[derive(Clone, Debug)]
pub struct Revolve {
    store: CheckpointStore,
    strategy: Strategy,
    snaps: i32,
    steps: i32,
    check: i32,
    capo: i32,
    fine: i32,
    oldcapo: i32,
    info: i32,
    /// Current rung of the online strategy ladder (2, 3, 4).
    r: i32,
    online: bool,
    multi: bool,
    where_to_put: bool,
    /// Tier per slot: true = RAM, false = ROM.
    ram: Vec<bool>,
    /// Slot index within the RAM tier.
    ram_index: Vec<i32>,
    /// Slot index within the ROM tier.
    rom_index: Vec<i32>,
}

impl Revolve {
    /// Offline schedule: `steps` is known in advance, `snaps` slots are
    /// available, all of them in one storage tier.
    pub fn offline(steps: i32, snaps: i32) -> Self {
        let n = snaps.max(0) as usize;
        let mut store = CheckpointStore::new(n);
        let strategy = Strategy::Offline(Offline::new(steps, snaps, &mut store));
        Revolve {
            store,
            strategy,
            snaps,
            steps,
            check: -1,
            capo: 0,
            fine: steps,
            oldcapo: 0,
            info: 0,
            r: 0,
            online: false,
            multi: false,
            where_to_put: true,
            ram: vec![true; n],
            ram_index: vec![0; n],
            rom_index: vec![0; n],
        }
    }

    /// Offline schedule with a two-tier store: the `snaps_ram` slots with
    /// the highest predicted traffic go to the fast tier, the rest to the
    /// slow one. Query [`Revolve::where_to_put`] after each step.
    pub fn multistage(steps: i32, snaps: i32, snaps_ram: i32) -> Self {
        let mut sched = Self::offline(steps, snaps);
        sched.multi = true;
        let n = snaps.max(0) as usize;
        let costs = write_and_read_counts(steps, snaps);
        if snaps_ram <= 0 {
            sched.ram = vec![false; n];
        } else if snaps_ram < snaps {
            let mut sorted = costs.clone();
            sorted.sort_unstable();
            // At least snaps_ram slots meet the threshold; the cap keeps the
            // scan from marking more on ties.
            let mid = sorted[(snaps - snaps_ram) as usize];
            let mut num = 0;
            for i in (0..n).rev() {
                if costs[i] >= mid && num < snaps_ram {
                    sched.ram[i] = true;
                    num += 1;
                } else {
                    sched.ram[i] = false;
                }
            }
        }
        let mut j = 0;
        let mut k = 0;
        for i in 0..n {
            if sched.ram[i] {
                sched.ram_index[i] = j;
                j += 1;
            } else {
                sched.rom_index[i] = k;
                k += 1;
            }
        }
        tracing::debug!(snaps, snaps_ram, ?costs, "tier classification");
        sched
    }

    /// Online schedule: the step count is unknown. The scheduler starts at
    /// the r=2 scheme and escalates on its own; end the forward sweep with
    /// [`Revolve::turn`].
    pub fn online(snaps: i32) -> Self {
        let n = snaps.max(0) as usize;
        let store = CheckpointStore::new(n);
        Revolve {
            store,
            strategy: Strategy::R2(OnlineR2::new(snaps)),
            snaps,
            steps: 0,
            check: -1,
            capo: 0,
            fine: -1,
            oldcapo: 0,
            info: 0,
            r: 2,
            online: true,
            multi: false,
            where_to_put: true,
            ram: vec![true; n],
            ram_index: vec![0; n],
            rom_index: vec![0; n],
        }
    }

    /// One scheduling decision.
    ///
    /// Delegates to the active scheme; during an online forward sweep a
    /// `terminate` from the scheme is consumed here and answered by
    /// installing the next rung of the ladder over the same store. The host
    /// only ever sees `terminate` at the true end of a reversal.
    pub fn step(&mut self) -> Action {
        self.oldcapo = self.capo;
        let mut whatodo = self.strategy.step(&mut self.store);
        if self.online && whatodo == Action::Terminate && self.r == 2 {
            tracing::debug!(capo = self.strategy.capo(), "online ladder: r=2 -> r=3");
            let mut next = OnlineR3::new(self.snaps, &mut self.store);
            whatodo = next.step(&mut self.store);
            self.strategy = Strategy::R3(next);
            self.r += 1;
        }
        if self.online && whatodo == Action::Terminate && self.r == 3 {
            tracing::debug!(capo = self.strategy.capo(), "online ladder: r=3 -> level scheme");
            let mut next = Moin::new(self.snaps, &mut self.store);
            whatodo = next.step(&mut self.store);
            self.strategy = Strategy::Moin(next);
            self.r += 1;
        }
        self.check = self.strategy.check();
        self.capo = self.strategy.capo();
        self.fine = self.strategy.fine();
        self.info = self.strategy.info();
        if self.check <= -1 {
            return whatodo;
        }
        if !self.online {
            self.where_to_put = self.ram[self.check as usize];
        }
        whatodo
    }

    /// End the online forward sweep: the host has just performed step
    /// `final_step` and now knows the trajectory length.
    ///
    /// Freezes the active online scheme into a snapshot, installs an offline
    /// driver over the final slot layout, and positions it for the reverse
    /// sweep. No-op for offline construction.
    pub fn turn(&mut self, final_step: i32) {
        if !self.online {
            return;
        }
        let snapshot = OnlineSnapshot {
            check: self.strategy.check(),
            capo: self.strategy.capo(),
            info: self.strategy.info(),
        };
        tracing::debug!(final_step, check = snapshot.check, capo = snapshot.capo, "turn");
        self.fine = final_step;
        self.capo = final_step - 1;
        self.steps = final_step;
        self.strategy = Strategy::Offline(Offline::from_online(
            self.snaps,
            &mut self.store,
            snapshot,
            final_step,
        ));
        self.online = false;
    }

    /// Slot involved in the last action: the slot written by a `takeshot`,
    /// read by a `restore`. `-1` before the first takeshot and after
    /// terminate.
    #[inline]
    pub fn check(&self) -> i32 {
        self.check
    }

    /// First step of the subrange currently being processed.
    #[inline]
    pub fn capo(&self) -> i32 {
        self.capo
    }

    /// Last step of the subrange currently being processed. After a
    /// `firsturn`/`youturn` this is the step whose combined forward+adjoint
    /// the host must perform.
    #[inline]
    pub fn fine(&self) -> i32 {
        self.fine
    }

    /// Value of `capo` before the last `step()`; an `advance` runs the
    /// simulation from here to [`Revolve::capo`].
    #[inline]
    pub fn oldcapo(&self) -> i32 {
        self.oldcapo
    }

    /// Diagnostic verbosity, or the error code after [`Action::Error`].
    #[inline]
    pub fn info(&self) -> i32 {
        self.info
    }

    /// Typed view of the error behind an [`Action::Error`], if any.
    pub fn last_error(&self) -> Option<ScheduleError> {
        ScheduleError::from_info(self.info)
    }

    /// Set the diagnostic verbosity of the active scheme.
    pub fn set_info(&mut self, info: i32) {
        self.info = info;
        if let Strategy::Offline(s) = &mut self.strategy {
            s.set_info(info);
        }
    }

    /// Storage tier of the slot involved in the last action: true for RAM,
    /// false for ROM. Meaningful for multi-stage construction only.
    #[inline]
    pub fn where_to_put(&self) -> bool {
        self.where_to_put
    }

    /// Index of the last-involved slot within the RAM tier.
    pub fn check_ram(&self) -> i32 {
        self.ram_index[self.check as usize]
    }

    /// Index of the last-involved slot within the ROM tier.
    pub fn check_rom(&self) -> i32 {
        self.rom_index[self.check as usize]
    }

    /// Number of snapshot slots.
    #[inline]
    pub fn snaps(&self) -> i32 {
        self.snaps
    }

    /// True while an online forward sweep is in progress.
    #[inline]
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// True for multi-stage construction.
    #[inline]
    pub fn is_multistage(&self) -> bool {
        self.multi
    }

    /// Total steps advanced over all `advance` actions so far.
    #[inline]
    pub fn advances(&self) -> i64 {
        self.store.advances
    }

    /// Total `takeshot` actions so far.
    #[inline]
    pub fn takeshots(&self) -> i64 {
        self.store.takeshots
    }

    /// Total scheduler invocations so far.
    #[inline]
    pub fn commands(&self) -> i64 {
        self.store.commands
    }

    /// Writes per slot, tallied while the offline driver runs.
    pub fn number_of_writes(&self) -> &[i64] {
        &self.store.number_of_writes
    }

    /// Reads per slot, tallied while the offline driver runs.
    pub fn number_of_reads(&self) -> &[i64] {
        &self.store.number_of_reads
    }

    /// Repetition count of the configured schedule.
    pub fn reps(&self) -> i32 {
        num_reps(self.steps, self.snaps)
    }
}
