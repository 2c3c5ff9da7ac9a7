//! Brickwork Search: certified branch-and-bound minimization over dyadic boxes.
//!
//! This crate provides the search layer. It depends only on
//! `brickwork_kernel`; it does NOT depend on `brickwork_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! brickwork_kernel  ←  brickwork_search  ←  brickwork_harness
//! (reals, intervals,   (boxes, orders,       (polynomial driver)
//!  moduli)              frontier, engine)
//! ```
//!
//! # Key types
//!
//! - [`SearchCandidate`] -- a box of dyadic inputs with its certified output
//! - [`SearchEngine`] -- the time-bounded search loop
//! - [`SearchOutcome`] -- global bound, local estimate and trace of one run
//! - [`SearchTrace`] -- per-iteration audit log with canonical bytes
//! - [`SearchPolicy`] -- budget, phase split and history cap
//! - [`Clock`] -- deadline source; [`IterationClock`] makes runs reproducible

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod candidate;
pub mod clock;
pub mod error;
pub mod frontier;
pub mod hash;
pub mod order;
pub mod policy;
pub mod search;
pub mod trace;

pub use candidate::{Objective, SearchCandidate};
pub use clock::{Clock, IterationClock, WallClock};
pub use error::SearchError;
pub use frontier::Frontier;
pub use hash::ContentHash;
pub use order::{compare_lower_bound, compare_upper_bound, eclipses, global_order, local_order};
pub use policy::SearchPolicy;
pub use search::{GlobalBound, Hull, LocalEstimate, SearchEngine, SearchOutcome};
pub use trace::{
    ChildOutcome, ChildRecord, IterationEvent, Phase, SearchTrace, TerminationReason, TraceMetadata,
};
