//! Multi-objective evolutionary optimization.
//!
//! Searches for a diverse approximation of the Pareto-optimal front of a
//! problem whose solutions are box-constrained real vectors and whose fitness
//! is a vector of objectives to minimize.
//!
//! - **NSGA-II**: Elitist non-dominated sorting genetic algorithm with Pareto
//!   ranking, crowding-distance diversity estimation, and a merge/truncate
//!   generational scheme over parents and offspring.
//!
//! # Architecture
//!
//! The crate is domain-agnostic. Users plug in their problem by implementing
//! [`nsga2::MoProblem`]; the engine never looks inside objective functions,
//! it only compares the vectors they return.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `parallel` | Objective evaluation of each batch via rayon | off |
//! | `serde` | `Serialize`/`Deserialize` on configuration and result types | off |
//!
//! Structured log events are emitted through [`tracing`]; the crate never
//! installs a subscriber.

mod error;
pub mod nsga2;

pub use error::{Error, Result};
