//! The scope machine: one protected block with guaranteed finalization.
//!
//! A frame is opened over a classified input (a binding form result, or a
//! callee's returned status), collects its primary body and handlers, and
//! executes when the mandatory finalizer is declared. The finalizer runs
//! exactly once on every exit path — normal completion, raised-and-handled,
//! raised-and-unhandled, early return, and even a panic inside the body —
//! before anything propagates to the enclosing frame.
//!
//! Frames are plain stack values: each one is owned by the function
//! activation that created it and never escapes its lexical scope. An
//! inner frame runs to completion (finalizer included) inside the outer
//! frame's body, which is what guarantees inner-before-outer ordering.
//!
//! ```
//! use exflow::{scope, bind, throw, Kind};
//!
//! let step = scope(bind::ensure(1 + 1 == 2))
//!     .body(|_| throw(Kind::Busy))
//!     .catch(Kind::Busy, |_| Ok(()))
//!     .finally(|_| {});
//! assert!(step.is_ok());
//! ```

use tracing::{debug, trace};

use crate::kind::Kind;
use crate::raise::{Raise, Step};

/// Lifecycle phase of a frame, recorded in trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Frame opened; input classified.
    Entered,
    /// Input and body completed without a raise.
    Success,
    /// A kind (or the early-return sentinel) is pending.
    Raised,
    /// Matching the pending kind against declared handlers.
    HandlerDispatch,
    /// Running the mandatory finalizer.
    Finalizing,
    /// Frame retired; outcome decided.
    Closed,
}

type Body<'a, T> = Box<dyn FnOnce(&mut T) -> Step + 'a>;
type Handler<'a> = Box<dyn FnOnce(Kind) -> Step + 'a>;
type Finalizer<'a, T> = Box<dyn FnOnce(Option<T>) -> Step + 'a>;

/// One protected block under construction.
///
/// Nothing executes until [`Scope::finally`] or [`Scope::try_finally`]
/// is called; the finalizer is structurally mandatory because it is the
/// only way to run the frame.
pub struct Scope<'a, T> {
    name: &'static str,
    input: Result<T, Kind>,
    body: Option<Body<'a, T>>,
    catches: Vec<(Kind, Handler<'a>)>,
    wildcard: Option<Handler<'a>>,
}

/// Open a frame over a classified input.
///
/// The input is a binding form result ([`crate::bind`]) or a callee's
/// [`crate::boundary::Status`], which makes caller/callee composition a
/// plain function call.
pub fn scope<'a, T>(input: Result<T, Kind>) -> Scope<'a, T> {
    Scope {
        name: "-",
        input,
        body: None,
        catches: Vec::new(),
        wildcard: None,
    }
}

impl<'a, T> Scope<'a, T> {
    /// Label the frame for trace output.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Declare the primary body, run only when the input classified as
    /// success. The bound value is visible; a `?`-raise skips the rest
    /// of the body.
    pub fn body(mut self, body: impl FnOnce(&mut T) -> Step + 'a) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    /// Declare a handler matched on exact kind equality.
    ///
    /// Handlers are matched in declaration order; at most one runs.
    pub fn catch(mut self, kind: Kind, handler: impl FnOnce(Kind) -> Step + 'a) -> Self {
        self.catches.push((kind, Box::new(handler)));
        self
    }

    /// Declare the wildcard handler, matched when no exact handler is.
    ///
    /// The handler receives the raised kind, so it can inspect it or
    /// [`crate::rethrow`] it unchanged. The early-return sentinel never
    /// reaches a handler.
    pub fn catch_any(mut self, handler: impl FnOnce(Kind) -> Step + 'a) -> Self {
        self.wildcard = Some(Box::new(handler));
        self
    }

    /// Declare the finalizer and run the frame.
    ///
    /// The finalizer receives `Some(bound value)` when the binding
    /// succeeded — even if the body later raised — and `None` when the
    /// binding itself failed, so release code must tolerate "nothing
    /// was acquired yet".
    pub fn finally(self, finalizer: impl FnOnce(Option<T>) + 'a) -> Step {
        self.run(Box::new(move |slot| {
            finalizer(slot);
            Ok(())
        }))
    }

    /// Declare a fallible finalizer and run the frame.
    ///
    /// A raise from the finalizer never re-enters this frame's handler
    /// dispatch: it supersedes any pending raise and propagates to the
    /// enclosing frame.
    pub fn try_finally(self, finalizer: impl FnOnce(Option<T>) -> Step + 'a) -> Step {
        self.run(Box::new(finalizer))
    }

    fn run(self, finalizer: Finalizer<'a, T>) -> Step {
        let Scope {
            name,
            input,
            body,
            catches,
            wildcard,
        } = self;
        trace!(frame = name, phase = ?Phase::Entered, "frame entered");

        // The guard owns the bound slot and the finalizer while foreign
        // code (body, handlers) runs; its Drop is the panic backstop for
        // the exactly-once guarantee. Normal paths drain it below.
        let mut guard = FinallyGuard {
            slot: None,
            finalizer: Some(finalizer),
        };

        let mut pending: Option<Raise> = None;
        match input {
            Ok(value) => {
                let bound = guard.slot.insert(value);
                if let Some(body) = body {
                    if let Err(raise) = body(bound) {
                        debug!(frame = name, raise = ?raise, phase = ?Phase::Raised, "body raised");
                        pending = Some(raise);
                    } else {
                        trace!(frame = name, phase = ?Phase::Success, "body completed");
                    }
                }
            }
            Err(kind) => {
                debug!(frame = name, kind = %kind, phase = ?Phase::Raised, "binding raised");
                pending = Some(Raise::Kind(kind));
            }
        }

        // HandlerDispatch. The early-return sentinel is not a failure
        // and bypasses dispatch entirely.
        if let Some(Raise::Kind(kind)) = pending {
            trace!(frame = name, kind = %kind, phase = ?Phase::HandlerDispatch, "dispatching");
            let handler = catches
                .into_iter()
                .find(|(declared, _)| *declared == kind)
                .map(|(_, handler)| handler)
                .or(wildcard);
            match handler {
                Some(handler) => {
                    debug!(frame = name, kind = %kind, "handler matched");
                    // A matched handler resets the pending raise unless
                    // it raises again itself.
                    pending = handler(kind).err();
                }
                None => {
                    trace!(frame = name, kind = %kind, "unmatched, will propagate");
                }
            }
        }

        trace!(frame = name, phase = ?Phase::Finalizing, "finalizing");
        if let Some(finalizer) = guard.finalizer.take() {
            let slot = guard.slot.take();
            if let Err(raise) = finalizer(slot) {
                debug!(frame = name, raise = ?raise, "finalizer raised");
                pending = Some(raise);
            }
        }

        trace!(frame = name, phase = ?Phase::Closed, propagating = pending.is_some(), "frame closed");
        match pending {
            None => Ok(()),
            Some(raise) => Err(raise),
        }
    }
}

/// Panic backstop: releases the bound slot through the finalizer if the
/// frame unwinds before reaching Finalizing on the normal path.
struct FinallyGuard<'a, T> {
    slot: Option<T>,
    finalizer: Option<Finalizer<'a, T>>,
}

impl<T> Drop for FinallyGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(finalizer) = self.finalizer.take() {
            // Unwinding; a raise from the finalizer has nowhere to go.
            let _ = finalizer(self.slot.take());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind;
    use crate::raise::throw;
    use std::cell::Cell;

    #[test]
    fn test_success_path_runs_body_and_finalizer() {
        let finalized = Cell::new(0);
        let step = scope(bind::let_(Some(10)))
            .body(|v| {
                *v += 1;
                Ok(())
            })
            .finally(|slot| {
                assert_eq!(slot, Some(11));
                finalized.set(finalized.get() + 1);
            });
        assert_eq!(step, Ok(()));
        assert_eq!(finalized.get(), 1);
    }

    #[test]
    fn test_failed_binding_skips_body_finalizer_sees_empty() {
        let body_ran = Cell::new(false);
        let step = scope(bind::let_::<u8>(None))
            .body(|_| {
                body_ran.set(true);
                Ok(())
            })
            .catch(Kind::NullRef, |_| Ok(()))
            .finally(|slot| assert_eq!(slot, None));
        assert_eq!(step, Ok(()));
        assert!(!body_ran.get());
    }

    #[test]
    fn test_first_declared_exact_match_wins() {
        let chosen = Cell::new(0u8);
        let step = scope(Ok(()))
            .body(|_| throw(Kind::Busy))
            .catch(Kind::Busy, |_| {
                chosen.set(1);
                Ok(())
            })
            .catch(Kind::Busy, |_| {
                chosen.set(2);
                Ok(())
            })
            .catch_any(|_| {
                chosen.set(3);
                Ok(())
            })
            .finally(|_| {});
        assert_eq!(step, Ok(()));
        assert_eq!(chosen.get(), 1);
    }

    #[test]
    fn test_unmatched_kind_propagates_after_finalizer() {
        let finalized = Cell::new(false);
        let step = scope(Ok(()))
            .body(|_| throw(Kind::TimedOut))
            .catch(Kind::Busy, |_| Ok(()))
            .finally(|_| finalized.set(true));
        assert_eq!(step, Err(Raise::Kind(Kind::TimedOut)));
        assert!(finalized.get());
    }

    #[test]
    fn test_handler_raise_propagates_after_finalizer() {
        let order = std::cell::RefCell::new(Vec::new());
        let step = scope(Ok(()))
            .body(|_| throw(Kind::Io))
            .catch(Kind::Io, |_| {
                order.borrow_mut().push("handler");
                throw(Kind::Unrecoverable)
            })
            .finally(|_| order.borrow_mut().push("finalizer"));
        assert_eq!(step, Err(Raise::Kind(Kind::Unrecoverable)));
        assert_eq!(*order.borrow(), ["handler", "finalizer"]);
    }

    #[test]
    fn test_finalizer_raise_supersedes_pending() {
        let step = scope::<()>(Err(Kind::NotFound)).try_finally(|_| throw(Kind::BadDescriptor));
        assert_eq!(step, Err(Raise::Kind(Kind::BadDescriptor)));
    }

    #[test]
    fn test_early_return_bypasses_handlers() {
        let handler_ran = Cell::new(false);
        let step = scope(Ok(()))
            .body(|_| crate::raise::early_return())
            .catch_any(|_| {
                handler_ran.set(true);
                Ok(())
            })
            .finally(|_| {});
        assert_eq!(step, Err(Raise::EarlyReturn));
        assert!(!handler_ran.get());
    }

    #[test]
    fn test_panic_in_body_still_finalizes() {
        let finalized = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let observed = finalized.clone();
        let result = std::panic::catch_unwind(move || {
            let _ = scope(bind::let_(Some(1)))
                .body(|_| panic!("boom"))
                .finally(move |_| {
                    observed.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                });
        });
        assert!(result.is_err());
        assert_eq!(finalized.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
