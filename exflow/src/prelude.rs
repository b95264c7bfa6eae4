//! Prelude module for common re-exports.
//!
//! Pulls in everything a protocol function needs so that consumers can
//! do `use exflow::prelude::*;` without listing individual paths.
//!
//! # Usage
//!
//! ```rust
//! use exflow::prelude::*;
//! ```

// ─── Taxonomy ───────────────────────────────────────────────────────
pub use crate::kind::{Category, Kind};

// ─── Propagation ────────────────────────────────────────────────────
pub use crate::raise::{early_return, rethrow, throw, Raise, Step};

// ─── Binding forms ──────────────────────────────────────────────────
pub use crate::bind::{check, check_io, ensure, let_, maybe};

// ─── Scope machine ──────────────────────────────────────────────────
pub use crate::scope::{scope, Scope};

// ─── Function boundary ──────────────────────────────────────────────
pub use crate::boundary::{status_code, throws, Status};
