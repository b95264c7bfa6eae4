//! Propagation primitives: the raise value and the block outcome type.
//!
//! A protected block (body, handler, or finalizer) reports its outcome as
//! a [`Step`]: `Ok(())` falls through, `Err(Raise)` propagates. Raising
//! inside a block is therefore an ordinary early `return` through `?` —
//! the remainder of the block is skipped and the enclosing frame takes
//! over. Unlike the switch-based encoding this crate replaces, a raise
//! inside a loop or match arm needs no special restriction; it is just a
//! value.

use serde::{Deserialize, Serialize};

use crate::kind::Kind;

/// Integer code reported for an early return at the boundary view.
pub const EARLY_RETURN_CODE: i32 = -1;

/// What a block throws: a failure kind, or the early-return sentinel.
///
/// `EarlyReturn` is its own variant rather than a reserved [`Kind`]
/// value, so it can never collide with, or be caught as, a real failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Raise {
    /// A failure condition, subject to handler dispatch.
    Kind(Kind),
    /// Explicit non-error exit request; unwinds through finalizers and
    /// becomes success at the function boundary.
    EarlyReturn,
}

impl Raise {
    /// Integer-code view of the raise: `EarlyReturn` is `-1`, a kind is
    /// its platform code. Success (no raise) is `0` at the boundary.
    pub fn code(&self) -> i32 {
        match self {
            Raise::Kind(kind) => kind.code(),
            Raise::EarlyReturn => EARLY_RETURN_CODE,
        }
    }
}

impl From<Kind> for Raise {
    fn from(kind: Kind) -> Self {
        Raise::Kind(kind)
    }
}

/// Outcome of one body, handler, or finalizer block.
pub type Step = Result<(), Raise>;

/// Raise `kind` in the current block.
///
/// Written as the tail of a `?` expression so the rest of the block is
/// skipped:
///
/// ```
/// use exflow::{throw, Kind, Step};
///
/// fn body() -> Step {
///     throw(Kind::Unrecoverable)?;
///     unreachable!("skipped");
/// }
/// assert!(body().is_err());
/// ```
pub fn throw(kind: Kind) -> Step {
    Err(Raise::Kind(kind))
}

/// Re-raise the kind a wildcard handler received, unchanged.
///
/// Identical to [`throw`] in effect; the distinct name marks handler
/// sites that deliberately decline to handle.
pub fn rethrow(kind: Kind) -> Step {
    Err(Raise::Kind(kind))
}

/// Request an explicit, successful early exit from the function.
///
/// The sentinel propagates through every enclosing finalizer like any
/// raise, but [`crate::boundary::throws`] maps it back to success; no
/// caller ever observes it as a failure.
pub fn early_return() -> Step {
    Err(Raise::EarlyReturn)
}

static_assertions::assert_impl_all!(Raise: Copy, Send, Sync);
static_assertions::const_assert!(size_of::<Raise>() <= 2 * size_of::<i32>());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throw_skips_remainder() {
        fn block(flag: &mut bool) -> Step {
            throw(Kind::Busy)?;
            *flag = true;
            Ok(())
        }
        let mut reached = false;
        assert_eq!(block(&mut reached), Err(Raise::Kind(Kind::Busy)));
        assert!(!reached);
    }

    #[test]
    fn test_rethrow_preserves_kind() {
        assert_eq!(rethrow(Kind::TimedOut), Err(Raise::Kind(Kind::TimedOut)));
    }

    #[test]
    fn test_sentinel_is_not_a_kind() {
        let raise = early_return().unwrap_err();
        assert_eq!(raise, Raise::EarlyReturn);
        assert!(!matches!(raise, Raise::Kind(_)));
    }

    #[test]
    fn test_codes() {
        assert_eq!(Raise::EarlyReturn.code(), EARLY_RETURN_CODE);
        assert_eq!(Raise::Kind(Kind::NotFound).code(), libc::ENOENT);
    }
}
