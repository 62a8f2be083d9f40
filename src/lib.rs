//! One-dimensional cutting stock: choose how to cut demanded piece widths
//! out of parent rolls of a single width using as few rolls as possible.
//!
//! Large demand lists are split into chunks that are each solved as a small
//! integer program; the combined result competes against a greedy packing
//! and the better one wins.

#[cfg(not(any(feature = "highs", feature = "microlp")))]
compile_error!("enable the `highs` or `microlp` feature to select an ILP backend");

pub mod assemble;
pub mod bounds;
pub mod chunk;
pub mod config;
pub mod error;
pub mod greedy;
pub mod host;
pub mod model;
pub mod render;
pub mod solver;
pub mod types;

pub use config::RunConfig;
pub use error::{CutError, HostError, SolveError};
pub use solver::Solver;
pub use types::{Demand, ParentRoll, RollPlan, Solution, SolutionSource};
