//! Binding forms: adapters that classify possibly-failing expressions
//! into the taxonomy so they can open a scope frame.
//!
//! Each form evaluates its input exactly once and performs exactly one
//! classification — no retries, no hidden repetition. The result feeds
//! straight into [`crate::scope::scope`]:
//!
//! ```
//! use exflow::{scope, bind, Kind};
//!
//! let step = scope(bind::let_(Some(vec![0u8; 16])))
//!     .body(|buf| {
//!         buf.push(1);
//!         Ok(())
//!     })
//!     .finally(|buf| drop(buf));
//! assert!(step.is_ok());
//! ```

use nix::errno::Errno;

use crate::kind::Kind;

/// Bind a nullable result; `None` classifies as [`Kind::NullRef`].
pub fn let_<T>(value: Option<T>) -> Result<T, Kind> {
    value.ok_or(Kind::NullRef)
}

/// Bind a nullable result with a caller-chosen failure kind.
pub fn maybe<T>(value: Option<T>, kind: Kind) -> Result<T, Kind> {
    value.ok_or(kind)
}

/// Check a condition; `false` classifies as [`Kind::EnsureViolated`].
pub fn ensure(condition: bool) -> Result<(), Kind> {
    if condition {
        Ok(())
    } else {
        Err(Kind::EnsureViolated)
    }
}

/// Classify the raw return of a C-convention system call.
///
/// `-1` means failure: the ambient errno is read once and classified.
/// Any other value is success and is passed through for binding.
pub fn check(ret: libc::c_int) -> Result<libc::c_int, Kind> {
    Errno::result(ret).map_err(Kind::from)
}

/// Classify a `std::io` result into the taxonomy.
///
/// The OS error code is preferred; synthetic errors classify by
/// `io::ErrorKind`.
pub fn check_io<T>(result: std::io::Result<T>) -> Result<T, Kind> {
    result.map_err(Kind::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_let_binds_non_null() {
        assert_eq!(let_(Some(5)), Ok(5));
    }

    #[test]
    fn test_let_classifies_null() {
        assert_eq!(let_::<u8>(None), Err(Kind::NullRef));
    }

    #[test]
    fn test_maybe_uses_caller_kind() {
        assert_eq!(maybe::<u8>(None, Kind::OutOfMemory), Err(Kind::OutOfMemory));
        assert_eq!(maybe(Some(7), Kind::OutOfMemory), Ok(7));
    }

    #[test]
    fn test_ensure() {
        assert_eq!(ensure(true), Ok(()));
        assert_eq!(ensure(false), Err(Kind::EnsureViolated));
    }

    #[test]
    fn test_check_classifies_errno() {
        // close() on a descriptor that is certainly not open.
        let ret = unsafe { libc::close(-1) };
        assert_eq!(check(ret), Err(Kind::BadDescriptor));
    }

    #[test]
    fn test_check_passes_through_success() {
        assert_eq!(check(42), Ok(42));
        assert_eq!(check(0), Ok(0));
    }

    #[test]
    fn test_check_evaluates_once() {
        // The expression is evaluated before `check` sees it; calling
        // `check` must not re-run anything.
        let mut calls = 0;
        let ret = {
            calls += 1;
            0
        };
        let _ = check(ret);
        let _ = ret;
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_check_io() {
        let err = std::io::Error::from_raw_os_error(libc::ENOENT);
        assert_eq!(check_io::<()>(Err(err)), Err(Kind::NotFound));
        assert_eq!(check_io(Ok(3)), Ok(3));
    }
}
