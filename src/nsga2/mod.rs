//! NSGA-II: elitist non-dominated sorting genetic algorithm.
//!
//! A multi-objective evolutionary engine over real-valued, box-constrained
//! decision vectors. Users define their problem by implementing
//! [`MoProblem`], which supplies dimensionality, constraints, and the
//! objective function.
//!
//! # Core Traits
//!
//! - [`MoProblem`]: Problem definition — dimensions, constraints, evaluation
//!
//! # Key Types
//!
//! - [`Nsga2Config`]: Algorithm parameters (population size, operators, diversity space)
//! - [`Nsga2Engine`]: Step-wise state machine over generations
//! - [`Nsga2Runner`]: Runs an engine to completion from a seed
//! - [`Nsga2Result`]: Final population, Pareto front, and per-generation statistics
//!
//! # Submodules
//!
//! - [`multi_objective`]: Pareto dominance, fast non-dominated sorting, crowding distance
//! - [`operators`]: BLX-alpha crossover, uniform mutation, constraint repair
//! - [`selection`]: Crowded binary tournament
//! - [`problems`]: Reference problems with known Pareto fronts
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Eshelman & Schaffer (1993), *Real-Coded Genetic Algorithms and Interval-Schemata*
//! - Srinivas & Deb (1994), *Multiobjective Optimization Using Nondominated Sorting in GAs*

mod config;
pub mod multi_objective;
pub mod operators;
pub mod problems;
mod runner;
pub mod selection;
mod types;

pub use config::{DiversitySpace, Nsga2Config};
pub use runner::{EngineState, GenerationStats, Nsga2Engine, Nsga2Result, Nsga2Runner};
pub use types::{Constraint, Individual, MoProblem, Population};
