//! Animation module for the depth-by-depth growth reveal
//!
//! The scheduler is an explicit state machine: the host calls `tick` once per
//! frame and decides whether to schedule another based on the outcome.

mod scheduler;

pub use scheduler::{GrowthScheduler, TickOutcome};
