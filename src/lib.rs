//! Checkpointing schedules for reversing time-stepped simulations.
//!
//! Reverse-mode adjoint computation needs the forward trajectory backwards,
//! but storing every intermediate state costs O(steps) memory. A
//! checkpointing schedule keeps only `C` snapshots and recomputes the rest,
//! following the binomial strategy of Griewank & Walther ("Algorithm 799:
//! revolve"): O(L·log C) recomputation from O(log L) snapshots.
//!
//! The scheduler never touches simulation state. The host drives its own
//! time-stepper and snapshot storage, asking [`Revolve::step`] what to do
//! next:
//!
//! ```
//! use revolve::{Action, Revolve};
//!
//! let mut sched = Revolve::offline(4, 2);
//! let mut reversed = Vec::new();
//! loop {
//!     match sched.step() {
//!         Action::Advance => { /* run the simulation from oldcapo() to capo() */ }
//!         Action::Takeshot => { /* save the state of step capo() into slot check() */ }
//!         Action::Restore => { /* load slot check(), returning to step capo() */ }
//!         Action::Firsturn | Action::Youturn => {
//!             // combined forward + adjoint step for step fine()
//!             reversed.push(sched.fine());
//!         }
//!         Action::Terminate => break,
//!         Action::Error => panic!("schedule failed: info = {}", sched.info()),
//!     }
//! }
//! assert_eq!(reversed, vec![3, 2, 1, 0]);
//! assert_eq!(sched.advances(), revolve::numforw(4, 2) as i64);
//! ```
//!
//! When the number of steps is unknown, construct with [`Revolve::online`];
//! the scheduler escalates through a ladder of online placement schemes and
//! hands the reverse sweep to the offline driver once the host signals the
//! end of the trajectory with [`Revolve::turn`]. [`Revolve::multistage`]
//! additionally splits the slots into a fast and a slow storage tier by
//! predicted traffic.

pub mod action;
pub mod binomial;
pub mod multistage;
pub mod offline;
pub mod online;
pub mod revolve;
pub mod store;

pub use action::{Action, ScheduleError};
pub use binomial::{adjust, expense, maxrange, num_reps, numforw, CHECKUP, MAXINT, REPSUP};
pub use multistage::{reads_for_slot, writes_for_slot};
pub use revolve::Revolve;
