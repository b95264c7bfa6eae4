//! Error-kind taxonomy compatible with the platform errno space.
//!
//! A [`Kind`] is a tag identifying one distinct failure condition. The set
//! is closed but application-extensible through [`Kind::Other`], which
//! carries a raw platform error code verbatim. Kinds support equality
//! comparison and exhaustive matching; nothing else is required of them.
//!
//! The two control sentinels (`NoError`, `EarlyReturn`) are deliberately
//! *not* kinds: success is the `Ok` arm of a `Result`, and the early-return
//! sentinel is a distinct variant of [`crate::raise::Raise`]. This removes
//! the integer-aliasing hazard the single-enum encoding would otherwise
//! carry (a kind and a sentinel sharing a value).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Taxonomy category for a [`Kind`], used in structured log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Resource acquisition: allocation, descriptor exhaustion.
    Resource,
    /// File and device I/O.
    Io,
    /// Network: connection, addressing, protocol.
    Net,
    /// Concurrency and IPC: locks, busy resources, interruption.
    Ipc,
    /// Protocol-level kinds raised by the binding forms themselves.
    Protocol,
}

/// One distinct failure condition.
///
/// Each variant maps to a canonical platform error code via
/// [`Kind::code`]; system-call failures funnel in through
/// [`Kind::from_code`] or the `From` conversions below.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    // ── Resource acquisition ────────────────────────────────────────
    /// Memory allocation failed.
    #[error("out of memory")]
    OutOfMemory,

    /// Per-process descriptor table is full.
    #[error("too many open files")]
    TooManyOpenFiles,

    /// System-wide file table is full.
    #[error("file table overflow")]
    FileTableFull,

    /// No space left on device.
    #[error("no space left on device")]
    NoSpace,

    // ── I/O ─────────────────────────────────────────────────────────
    /// Named object does not exist.
    #[error("not found")]
    NotFound,

    /// Access to the object was denied.
    #[error("permission denied")]
    PermissionDenied,

    /// Low-level read/write failure.
    #[error("i/o error")]
    Io,

    /// Operation used a stale or invalid descriptor.
    #[error("bad file descriptor")]
    BadDescriptor,

    /// Seek on a non-seekable object.
    #[error("illegal seek")]
    SeekFailed,

    /// Peer closed the write side.
    #[error("broken pipe")]
    BrokenPipe,

    // ── Network ─────────────────────────────────────────────────────
    /// Remote end refused the connection.
    #[error("connection refused")]
    ConnectionRefused,

    /// Connection reset by peer.
    #[error("connection reset")]
    ConnectionReset,

    /// Socket is not connected.
    #[error("not connected")]
    NotConnected,

    /// Local address already in use.
    #[error("address in use")]
    AddressInUse,

    /// No route to host.
    #[error("host unreachable")]
    HostUnreachable,

    /// Operation timed out.
    #[error("timed out")]
    TimedOut,

    /// Protocol-level error on the wire.
    #[error("protocol error")]
    ProtocolError,

    // ── Concurrency / IPC ───────────────────────────────────────────
    /// Operation would block on a non-blocking resource.
    #[error("would block")]
    WouldBlock,

    /// Resource busy (locks, mounts, devices).
    #[error("resource busy")]
    Busy,

    /// Lock acquisition would deadlock.
    #[error("deadlock avoided")]
    Deadlock,

    /// Call interrupted by a signal.
    #[error("interrupted")]
    Interrupted,

    // ── Protocol kinds ──────────────────────────────────────────────
    /// A `let_` binding produced an empty value.
    #[error("null reference")]
    NullRef,

    /// An `ensure` condition evaluated to false.
    #[error("ensure violated")]
    EnsureViolated,

    /// Failure the raising site considers beyond local recovery.
    #[error("unrecoverable")]
    Unrecoverable,

    /// Platform error code with no canonical kind.
    #[error("platform error {0}")]
    Other(i32),
}

impl Kind {
    /// Canonical platform error code for this kind.
    ///
    /// Protocol kinds borrow the nearest errno: `NullRef` reports
    /// `EFAULT`, `EnsureViolated` reports `EINVAL`, `Unrecoverable`
    /// reports `ECANCELED`. [`Kind::Other`] reports its stored code.
    pub fn code(&self) -> i32 {
        match self {
            Kind::OutOfMemory => libc::ENOMEM,
            Kind::TooManyOpenFiles => libc::EMFILE,
            Kind::FileTableFull => libc::ENFILE,
            Kind::NoSpace => libc::ENOSPC,
            Kind::NotFound => libc::ENOENT,
            Kind::PermissionDenied => libc::EACCES,
            Kind::Io => libc::EIO,
            Kind::BadDescriptor => libc::EBADF,
            Kind::SeekFailed => libc::ESPIPE,
            Kind::BrokenPipe => libc::EPIPE,
            Kind::ConnectionRefused => libc::ECONNREFUSED,
            Kind::ConnectionReset => libc::ECONNRESET,
            Kind::NotConnected => libc::ENOTCONN,
            Kind::AddressInUse => libc::EADDRINUSE,
            Kind::HostUnreachable => libc::EHOSTUNREACH,
            Kind::TimedOut => libc::ETIMEDOUT,
            Kind::ProtocolError => libc::EPROTO,
            Kind::WouldBlock => libc::EAGAIN,
            Kind::Busy => libc::EBUSY,
            Kind::Deadlock => libc::EDEADLK,
            Kind::Interrupted => libc::EINTR,
            Kind::NullRef => libc::EFAULT,
            Kind::EnsureViolated => libc::EINVAL,
            Kind::Unrecoverable => libc::ECANCELED,
            Kind::Other(code) => *code,
        }
    }

    /// Classify a raw platform error code.
    ///
    /// Where the platform gives one numeric value several meanings, the
    /// mapping picks a single canonical kind rather than merging
    /// semantics: `EAGAIN`/`EWOULDBLOCK` (same value on Linux) classify
    /// as [`Kind::WouldBlock`], `EACCES` as [`Kind::PermissionDenied`]
    /// (never `EPERM`, which stays [`Kind::Other`]), `EFAULT` as
    /// [`Kind::NullRef`], `EINVAL` as [`Kind::EnsureViolated`] and
    /// `ECANCELED` as [`Kind::Unrecoverable`]. Unlisted codes classify
    /// as [`Kind::Other`].
    pub fn from_code(code: i32) -> Kind {
        match code {
            libc::ENOMEM => Kind::OutOfMemory,
            libc::EMFILE => Kind::TooManyOpenFiles,
            libc::ENFILE => Kind::FileTableFull,
            libc::ENOSPC => Kind::NoSpace,
            libc::ENOENT => Kind::NotFound,
            libc::EACCES => Kind::PermissionDenied,
            libc::EIO => Kind::Io,
            libc::EBADF => Kind::BadDescriptor,
            libc::ESPIPE => Kind::SeekFailed,
            libc::EPIPE => Kind::BrokenPipe,
            libc::ECONNREFUSED => Kind::ConnectionRefused,
            libc::ECONNRESET => Kind::ConnectionReset,
            libc::ENOTCONN => Kind::NotConnected,
            libc::EADDRINUSE => Kind::AddressInUse,
            libc::EHOSTUNREACH => Kind::HostUnreachable,
            libc::ETIMEDOUT => Kind::TimedOut,
            libc::EPROTO => Kind::ProtocolError,
            libc::EAGAIN => Kind::WouldBlock,
            libc::EBUSY => Kind::Busy,
            libc::EDEADLK => Kind::Deadlock,
            libc::EINTR => Kind::Interrupted,
            libc::EFAULT => Kind::NullRef,
            libc::EINVAL => Kind::EnsureViolated,
            libc::ECANCELED => Kind::Unrecoverable,
            other => Kind::Other(other),
        }
    }

    /// Taxonomy category of this kind.
    pub fn category(&self) -> Category {
        match self {
            Kind::OutOfMemory
            | Kind::TooManyOpenFiles
            | Kind::FileTableFull
            | Kind::NoSpace => Category::Resource,
            Kind::NotFound
            | Kind::PermissionDenied
            | Kind::Io
            | Kind::BadDescriptor
            | Kind::SeekFailed
            | Kind::BrokenPipe => Category::Io,
            Kind::ConnectionRefused
            | Kind::ConnectionReset
            | Kind::NotConnected
            | Kind::AddressInUse
            | Kind::HostUnreachable
            | Kind::TimedOut
            | Kind::ProtocolError => Category::Net,
            Kind::WouldBlock | Kind::Busy | Kind::Deadlock | Kind::Interrupted => Category::Ipc,
            Kind::NullRef | Kind::EnsureViolated | Kind::Unrecoverable | Kind::Other(_) => {
                Category::Protocol
            }
        }
    }
}

impl From<nix::errno::Errno> for Kind {
    fn from(errno: nix::errno::Errno) -> Self {
        Kind::from_code(errno as i32)
    }
}

impl From<std::io::Error> for Kind {
    fn from(err: std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(code) => Kind::from_code(code),
            // Synthetic io::Errors (no OS code) classify by ErrorKind.
            None => match err.kind() {
                std::io::ErrorKind::NotFound => Kind::NotFound,
                std::io::ErrorKind::PermissionDenied => Kind::PermissionDenied,
                std::io::ErrorKind::ConnectionRefused => Kind::ConnectionRefused,
                std::io::ErrorKind::ConnectionReset => Kind::ConnectionReset,
                std::io::ErrorKind::NotConnected => Kind::NotConnected,
                std::io::ErrorKind::AddrInUse => Kind::AddressInUse,
                std::io::ErrorKind::BrokenPipe => Kind::BrokenPipe,
                std::io::ErrorKind::WouldBlock => Kind::WouldBlock,
                std::io::ErrorKind::TimedOut => Kind::TimedOut,
                std::io::ErrorKind::Interrupted => Kind::Interrupted,
                std::io::ErrorKind::OutOfMemory => Kind::OutOfMemory,
                _ => Kind::Io,
            },
        }
    }
}

static_assertions::assert_impl_all!(Kind: Copy, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for kind in [
            Kind::OutOfMemory,
            Kind::NotFound,
            Kind::ConnectionRefused,
            Kind::WouldBlock,
            Kind::NullRef,
            Kind::EnsureViolated,
            Kind::Unrecoverable,
        ] {
            assert_eq!(Kind::from_code(kind.code()), kind);
        }
    }

    #[test]
    fn test_unknown_code_is_other() {
        let kind = Kind::from_code(9999);
        assert_eq!(kind, Kind::Other(9999));
        assert_eq!(kind.code(), 9999);
    }

    #[test]
    fn test_errno_funnel() {
        let kind: Kind = nix::errno::Errno::ENOENT.into();
        assert_eq!(kind, Kind::NotFound);
    }

    #[test]
    fn test_io_error_funnel() {
        let os = std::io::Error::from_raw_os_error(libc::EACCES);
        assert_eq!(Kind::from(os), Kind::PermissionDenied);

        let synthetic = std::io::Error::new(std::io::ErrorKind::TimedOut, "t");
        assert_eq!(Kind::from(synthetic), Kind::TimedOut);
    }

    #[test]
    fn test_categories() {
        assert_eq!(Kind::OutOfMemory.category(), Category::Resource);
        assert_eq!(Kind::SeekFailed.category(), Category::Io);
        assert_eq!(Kind::AddressInUse.category(), Category::Net);
        assert_eq!(Kind::Deadlock.category(), Category::Ipc);
        assert_eq!(Kind::NullRef.category(), Category::Protocol);
    }

    #[test]
    fn test_display() {
        assert_eq!(Kind::OutOfMemory.to_string(), "out of memory");
        assert_eq!(Kind::Other(71).to_string(), "platform error 71");
    }
}
