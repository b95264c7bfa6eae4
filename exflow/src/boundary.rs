//! Function-boundary adapter: collapse the internal raise state into an
//! ordinary return value.
//!
//! A function using the protocol declares its context with [`throws`] at
//! entry and by convention returns a [`Status`]; the caller can feed that
//! status straight into [`crate::scope::scope`] as a new frame's input,
//! which is how propagation composes across function calls without any
//! unwinding.

use tracing::warn;

use crate::kind::Kind;
use crate::raise::{Raise, Step};

/// Caller-visible result of a protocol function: success, or the final
/// unhandled kind.
pub type Status = Result<(), Kind>;

/// Open a Function Error Context, run `f`, and return the final kind.
///
/// The early-return sentinel is mapped back to success here and only
/// here — an explicit early exit is never a caller-visible failure, no
/// matter how many frames it propagated through.
///
/// `declared` documents the kinds the function expects to surface, as
/// the original convention did; it has no behavioral effect, but an
/// undeclared kind escaping the outermost frame is noted at warn level.
///
/// ```
/// use exflow::{throws, scope, bind, throw, Kind, Status};
///
/// fn probe(available: bool) -> Status {
///     throws(&[Kind::Busy], || {
///         scope(bind::ensure(available))
///             .body(|_| throw(Kind::Busy))
///             .finally(|_| {})
///     })
/// }
///
/// assert_eq!(probe(true), Err(Kind::Busy));
/// assert_eq!(probe(false), Err(Kind::EnsureViolated));
/// ```
pub fn throws(declared: &[Kind], f: impl FnOnce() -> Step) -> Status {
    match f() {
        Ok(()) => Ok(()),
        Err(Raise::EarlyReturn) => Ok(()),
        Err(Raise::Kind(kind)) => {
            if !declared.contains(&kind) {
                warn!(kind = %kind, "undeclared kind escaped function boundary");
            }
            Err(kind)
        }
    }
}

/// Integer-code view of a status: `0` for success, the kind's platform
/// code otherwise.
pub fn status_code(status: &Status) -> i32 {
    match status {
        Ok(()) => 0,
        Err(kind) => kind.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raise::{early_return, throw};

    #[test]
    fn test_success_maps_to_ok() {
        assert_eq!(throws(&[], || Ok(())), Ok(()));
    }

    #[test]
    fn test_kind_surfaces() {
        assert_eq!(
            throws(&[Kind::TimedOut], || throw(Kind::TimedOut)),
            Err(Kind::TimedOut)
        );
    }

    #[test]
    fn test_early_return_is_invisible() {
        assert_eq!(throws(&[], early_return), Ok(()));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(status_code(&Ok(())), 0);
        assert_eq!(status_code(&Err(Kind::NotFound)), libc::ENOENT);
    }
}
