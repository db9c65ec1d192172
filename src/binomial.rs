//! Binomial bounds and cost estimates for checkpointing schedules.
//!
//! The binomial coefficient `C(s+t, t)` bounds the number of time steps a
//! schedule with `s` snapshot slots and `t` repetitions can reverse
//! (Griewank & Walther, "Algorithm 799: revolve"). The functions here answer
//! the sizing questions a host asks before committing to a schedule: how many
//! unrecorded forward steps the reversal will cost ([`numforw`]), the
//! slowdown relative to one plain forward sweep ([`expense`]), and a slot
//! count balancing space against time ([`adjust`]).

/// Compile-time cap on the number of snapshot slots.
pub const CHECKUP: i32 = 64;

/// Compile-time cap on the repetition count of a schedule.
pub const REPSUP: i32 = 64;

/// Largest representable step index.
pub const MAXINT: i32 = i32::MAX;

/// Binomial coefficient `C(ss+tt, tt)`, saturating at [`MAXINT`].
///
/// Returns `-1` if either argument is negative. If the coefficient is not
/// representable as an `i32` the clamped value [`MAXINT`] is returned and a
/// warning is emitted.
///
/// ```
/// assert_eq!(revolve::maxrange(3, 3), 20);
/// assert_eq!(revolve::maxrange(2, 2), 6);
/// assert_eq!(revolve::maxrange(1, 1), 2);
/// ```
pub fn maxrange(ss: i32, tt: i32) -> i32 {
    if tt < 0 || ss < 0 {
        tracing::warn!(ss, tt, "maxrange: negative parameter");
        return -1;
    }
    let mut res = 1.0_f64;
    for i in 1..=tt {
        res *= f64::from(ss + i);
        res /= f64::from(i);
        if res > f64::from(MAXINT) {
            tracing::warn!(ss, tt, "maxrange: binomial not representable, returning MAXINT");
            return MAXINT;
        }
    }
    res as i32
}

/// Number of forward steps the binomial schedule executes without recording.
///
/// `steps` is the total number of time steps (`fine - capo` at the first
/// call); `snaps` the slot budget. Returns `-1` when `snaps < 1`, when
/// `snaps` exceeds [`CHECKUP`], or when the required repetition count
/// exceeds [`REPSUP`].
///
/// The count is `r·steps − C(r+snaps, r)·r/(snaps+1)` with truncating integer
/// division, where `r` is the smallest repetition count whose binomial range
/// covers `steps`.
pub fn numforw(steps: i32, snaps: i32) -> i32 {
    if snaps < 1 {
        tracing::warn!(snaps, "numforw: snaps < 1");
        return -1;
    }
    if snaps > CHECKUP {
        tracing::warn!(snaps, checkup = CHECKUP, "numforw: snaps exceeds CHECKUP");
        return -1;
    }
    let (reps, range) = reps_and_range(steps, snaps);
    tracing::debug!(range, reps, "numforw");
    if reps > REPSUP {
        tracing::warn!(reps, repsup = REPSUP, "numforw: reps exceeds REPSUP");
        return -1;
    }
    (reps as i64 * steps as i64 - range * reps as i64 / (snaps as i64 + 1)) as i32
}

/// Run-time factor of the reversal relative to a single forward sweep:
/// `numforw(steps, snaps) / steps`. Returns `-1.0` on invalid arguments.
pub fn expense(steps: i32, snaps: i32) -> f64 {
    if snaps < 1 {
        tracing::warn!(snaps, "expense: snaps < 1");
        return -1.0;
    }
    if steps < 1 {
        tracing::warn!(steps, "expense: steps < 1");
        return -1.0;
    }
    let num = numforw(steps, snaps);
    if num == -1 {
        return -1.0;
    }
    f64::from(num) / f64::from(steps)
}

/// Slot count for which spatial and temporal complexity grow at roughly the
/// same rate, approximately `log4(steps)`.
///
/// Searches outward from `(1, 1)` along the diagonal of the binomial table
/// and then shrinks the larger coordinate until `C(snaps+reps, reps)` drops
/// below `steps`.
pub fn adjust(steps: i32) -> i32 {
    let mut snaps = 1;
    let mut reps = 1;
    let mut s = 0;
    while maxrange(snaps + s, reps + s) > steps {
        s -= 1;
    }
    while maxrange(snaps + s, reps + s) < steps {
        s += 1;
    }
    snaps += s;
    reps += s;
    s = -1;
    while maxrange(snaps, reps) >= steps {
        if snaps > reps {
            snaps -= 1;
            s = 0;
        } else {
            reps -= 1;
            s = 1;
        }
    }
    if s == 0 {
        snaps += 1;
    }
    if s == 1 {
        reps += 1;
    }
    snaps
}

/// Repetition count of the binomial schedule for `steps` steps and `snaps`
/// slots: the smallest `r` with `C(r+snaps, r) >= steps`.
///
/// Returns `-1` under the same argument checks as [`numforw`].
pub fn num_reps(steps: i32, snaps: i32) -> i32 {
    if snaps < 1 {
        tracing::warn!(snaps, "num_reps: snaps < 1");
        return -1;
    }
    if snaps > CHECKUP {
        tracing::warn!(snaps, checkup = CHECKUP, "num_reps: snaps exceeds CHECKUP");
        return -1;
    }
    let (reps, _) = reps_and_range(steps, snaps);
    if reps > REPSUP {
        tracing::warn!(reps, repsup = REPSUP, "num_reps: reps exceeds REPSUP");
        return -1;
    }
    reps
}

/// Smallest `reps` with `C(reps+snaps, reps) >= steps`, plus that range.
///
/// The running product is kept in `i64`: the iteration `range * (reps+snaps)
/// / reps` stays exact for every prefix of the binomial recurrence, and the
/// widening avoids overflow for step counts near [`MAXINT`].
pub(crate) fn reps_and_range(steps: i32, snaps: i32) -> (i32, i64) {
    let mut reps = 0_i32;
    let mut range = 1_i64;
    while range < i64::from(steps) {
        reps += 1;
        range = range * i64::from(reps + snaps) / i64::from(reps);
    }
    (reps, range)
}
