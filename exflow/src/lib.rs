//! # Structured Error Propagation with Scoped Finalization
//!
//! A disciplined way to express try/handle/finally control flow, and to
//! bind possibly-failing expressions, for resource-heavy synchronous code
//! (allocations, file and socket handles, semaphores) that needs
//! deterministic cleanup and nested failure handling without manual
//! bookkeeping.
//!
//! ## Model
//!
//! - A [`Kind`](kind::Kind) names one failure condition and maps onto the
//!   platform errno space, so system-call failures funnel straight in.
//! - A [binding form](bind) classifies a nullable value, a boolean check,
//!   or a raw syscall return into the taxonomy.
//! - [`scope`](scope::scope) opens a protected frame over a classified
//!   input: a primary body runs on success, declared handlers match a
//!   raised kind (exact match first, then wildcard), and the mandatory
//!   finalizer runs exactly once on every exit path before anything
//!   propagates outward.
//! - [`throw`](raise::throw) / [`rethrow`](raise::rethrow) /
//!   [`early_return`](raise::early_return) drive transitions; a raise is
//!   an ordinary value carried by `?`, so loops and match arms inside
//!   bodies need no special care.
//! - [`throws`](boundary::throws) collapses the outermost frame into a
//!   plain [`Status`](boundary::Status) at the function boundary, mapping
//!   the early-return sentinel back to success.
//!
//! ## Example
//!
//! ```rust
//! use exflow::prelude::*;
//!
//! fn load(data: Option<Vec<u8>>) -> Status {
//!     throws(&[Kind::OutOfMemory, Kind::EnsureViolated], || {
//!         scope(maybe(data, Kind::OutOfMemory))
//!             .named("buffer")
//!             .body(|buf| {
//!                 ensure(!buf.is_empty())?;
//!                 buf.push(0);
//!                 Ok(())
//!             })
//!             .catch(Kind::EnsureViolated, |kind| rethrow(kind))
//!             .finally(|buf| drop(buf))
//!     })
//! }
//!
//! assert_eq!(load(Some(vec![1])), Ok(()));
//! assert_eq!(load(None), Err(Kind::OutOfMemory));
//! ```
//!
//! ## Guarantees
//!
//! - **Finalizer exactly once** per entered frame, on every exit path,
//!   including a raise from a handler and a panic inside the body.
//! - **Inner-before-outer**: a nested frame's finalizer completes before
//!   the enclosing frame observes the propagated kind.
//! - **Sentinel invisibility**: an early return is never caller-visible
//!   as a failure once it crosses [`throws`](boundary::throws).
//!
//! Everything is synchronous and stack-local; no state is shared between
//! threads and no operation suspends. Each call stack gets its own
//! context simply because contexts are local values.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod bind;
pub mod boundary;
pub mod kind;
pub mod prelude;
pub mod raise;
pub mod scope;

pub use bind::{check, check_io, ensure, let_, maybe};
pub use boundary::{status_code, throws, Status};
pub use kind::{Category, Kind};
pub use raise::{early_return, rethrow, throw, Raise, Step, EARLY_RETURN_CODE};
pub use scope::{scope, Phase, Scope};
