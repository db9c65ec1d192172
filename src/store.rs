//! Shared bookkeeping for every scheduling scheme.
//!
//! One [`CheckpointStore`] lives for the whole life of a
//! [`crate::Revolve`] façade and is handed from sub-scheduler to
//! sub-scheduler as the online strategy ladder escalates. It records which
//! step each slot holds, the slot ordering the online schemes maintain, the
//! moin scheme's level/dispensability flags, and the running action
//! counters. It never touches simulation state; slots are names, not
//! storage.

/// Slot-indexed bookkeeping shared by all schedulers of one façade.
///
/// All vectors have length `snaps`. `ch[slot]` is the step stored in `slot`
/// (`-1` doubles as the offline driver's start sentinel); `ord_ch` is a
/// permutation of slot indices ordered by the active scheme's replacement
/// policy; `l`/`d` belong to the moin scheme.
#[derive(Clone, Debug)]
pub struct CheckpointStore {
    /// Step index stored per slot.
    pub ch: Vec<i32>,
    /// Slot ordering maintained by the online schemes and the from-online
    /// offline reversal.
    pub ord_ch: Vec<usize>,
    /// Per-slot level counters (moin scheme).
    pub l: Vec<i32>,
    /// Per-slot dispensability flags (moin scheme).
    pub d: Vec<bool>,
    /// Writes per slot, tallied by the offline driver.
    pub number_of_writes: Vec<i64>,
    /// Reads per slot, tallied by the offline driver.
    pub number_of_reads: Vec<i64>,
    /// Total steps advanced across all `advance` actions.
    pub advances: i64,
    /// Total `takeshot` actions.
    pub takeshots: i64,
    /// Total scheduler invocations.
    pub commands: i64,
}

impl CheckpointStore {
    /// Allocate a store for `snaps` slots with zeroed counters, slot 0
    /// seeded at step 0, and `ord_ch` the identity permutation.
    pub fn new(snaps: usize) -> Self {
        CheckpointStore {
            ch: vec![0; snaps],
            ord_ch: (0..snaps).collect(),
            l: vec![0; snaps],
            d: vec![false; snaps],
            number_of_writes: vec![0; snaps],
            number_of_reads: vec![0; snaps],
            advances: 0,
            takeshots: 0,
            commands: 0,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn snaps(&self) -> usize {
        self.ch.len()
    }
}
