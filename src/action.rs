//! The command vocabulary spoken between the scheduler and the host.
//!
//! Every call to [`crate::Revolve::step`] returns one [`Action`] telling the
//! host what to do next with its simulation state. The host performs that
//! action (advancing the time-stepper, saving or loading a snapshot, or
//! running a combined forward/adjoint step) and then asks again.

use std::fmt;

/// One scheduler command.
///
/// The slot and step positions that parametrize the command are read from the
/// scheduler after the call ([`crate::Revolve::check`],
/// [`crate::Revolve::capo`], [`crate::Revolve::oldcapo`],
/// [`crate::Revolve::fine`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Run the forward simulation from `oldcapo` to `capo` without recording.
    Advance,
    /// Save the state of step `capo` into snapshot slot `check`.
    Takeshot,
    /// Load snapshot slot `check`, placing the simulation at step `capo`.
    Restore,
    /// First combined forward+adjoint step; inaugurates the reverse sweep.
    /// The step being reversed is `fine` (already decremented).
    Firsturn,
    /// Subsequent combined forward+adjoint step for step `fine`.
    Youturn,
    /// The reversal is complete. No further calls are expected.
    Terminate,
    /// The scheduler cannot continue; consult
    /// [`crate::Revolve::info`] / [`crate::Revolve::last_error`].
    Error,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Advance => "advance",
            Action::Takeshot => "takeshot",
            Action::Restore => "restore",
            Action::Firsturn => "firsturn",
            Action::Youturn => "youturn",
            Action::Terminate => "terminate",
            Action::Error => "error",
        };
        f.write_str(name)
    }
}

/// Faults reported through [`Action::Error`], keyed by the `info` code.
///
/// Codes 10–15 match the classic revolve error numbering, so hosts ported
/// from the reference implementation can keep their handling tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    /// Code 10: a slot index outgrew the compile-time cap [`crate::CHECKUP`].
    CheckupExceeded,
    /// Code 11: a slot index outgrew the configured capacity, or the
    /// remaining-slot count `ds` fell below 1.
    SnapsExceeded,
    /// Code 12: the forward-step prediction ([`crate::numforw`]) failed.
    NumforwFailed,
    /// Code 13: `fine` grew while every slot was already in use.
    FineGrown,
    /// Code 14: the configured capacity itself exceeds [`crate::CHECKUP`].
    SnapsAboveCheckup,
    /// Code 15: the repetition count outgrew [`crate::REPSUP`].
    RepsExceeded,
}

impl ScheduleError {
    /// Map an `info` code to its error, if the code denotes one.
    pub fn from_info(info: i32) -> Option<Self> {
        match info {
            10 => Some(ScheduleError::CheckupExceeded),
            11 => Some(ScheduleError::SnapsExceeded),
            12 => Some(ScheduleError::NumforwFailed),
            13 => Some(ScheduleError::FineGrown),
            14 => Some(ScheduleError::SnapsAboveCheckup),
            15 => Some(ScheduleError::RepsExceeded),
            _ => None,
        }
    }

    /// The classic `info` code for this error.
    pub fn info(self) -> i32 {
        match self {
            ScheduleError::CheckupExceeded => 10,
            ScheduleError::SnapsExceeded => 11,
            ScheduleError::NumforwFailed => 12,
            ScheduleError::FineGrown => 13,
            ScheduleError::SnapsAboveCheckup => 14,
            ScheduleError::RepsExceeded => 15,
        }
    }
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::CheckupExceeded => {
                write!(f, "slot index exceeds the compile-time cap CHECKUP")
            }
            ScheduleError::SnapsExceeded => {
                write!(f, "slot index exceeds the configured snapshot capacity")
            }
            ScheduleError::NumforwFailed => {
                write!(f, "forward-step prediction failed (numforw)")
            }
            ScheduleError::FineGrown => {
                write!(f, "fine increased while all snapshot slots were in use")
            }
            ScheduleError::SnapsAboveCheckup => {
                write!(f, "snapshot capacity exceeds the compile-time cap CHECKUP")
            }
            ScheduleError::RepsExceeded => {
                write!(f, "repetition count exceeds the compile-time cap REPSUP")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}
