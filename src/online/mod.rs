//! Online checkpointing schemes for forward sweeps of unknown length.
//!
//! When the number of time steps is not known in advance the scheduler
//! cannot lay out binomial split points up front. Instead it escalates
//! through a ladder of placement strategies, each covering a longer range at
//! one higher repetition count:
//!
//! * [`OnlineR2`]: optimal up to `(C+2)(C+1)/2` steps,
//! * [`OnlineR3`]: quasi-optimal up to `(C+3)(C+2)(C+1)/6` steps,
//! * [`Moin`]: level-based placement beyond that.
//!
//! All three only ever answer `advance` or `takeshot`; a `terminate` from a
//! rung is an internal signal to the owning [`crate::Revolve`] façade
//! meaning "this scheme is exhausted, install the next one"; the host never
//! sees it. The reverse sweep is always driven by
//! [`crate::offline::Offline`], constructed over the final slot layout when
//! the host calls [`crate::Revolve::turn`].

mod moin;
mod r2;
mod r3;

pub use moin::Moin;
pub use r2::OnlineR2;
pub use r3::OnlineR3;

/// State frozen out of an online scheme at [`crate::Revolve::turn`].
///
/// Consumed by [`crate::offline::Offline::from_online`]; the slot arrays
/// themselves stay in the shared [`crate::store::CheckpointStore`].
#[derive(Clone, Copy, Debug)]
pub struct OnlineSnapshot {
    /// Slot written by the scheme's last takeshot.
    pub check: i32,
    /// Step the forward sweep had reached.
    pub capo: i32,
    /// Diagnostic verbosity carried into the reversal.
    pub info: i32,
}
