//! Core type definitions for the NSGA-II engine.
//!
//! [`MoProblem`] is the contract between the generic engine and a
//! domain-specific objective function. [`Individual`] and [`Population`] are
//! the data the engine hands back.

/// A closed interval `[lower, upper]` bounding one decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Smallest admissible value.
    pub lower: f64,
    /// Largest admissible value.
    pub upper: f64,
}

impl Constraint {
    /// Creates a constraint. Validity is checked when an engine is built.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Returns `true` if `lower <= upper` and both the bounds and the
    /// width are finite.
    pub fn is_valid(&self) -> bool {
        self.lower.is_finite()
            && self.upper.is_finite()
            && self.lower <= self.upper
            && self.width().is_finite()
    }

    /// Returns `true` if `value` lies within the interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Clamps `value` into the interval.
    ///
    /// `NaN` is mapped to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() || value < self.lower {
            self.lower
        } else if value > self.upper {
            self.upper
        } else {
            value
        }
    }

    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl From<(f64, f64)> for Constraint {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self::new(lower, upper)
    }
}

/// Defines a multi-objective optimization problem.
///
/// All objectives are **minimized**. To maximize an objective, negate it
/// inside [`evaluate`](MoProblem::evaluate).
///
/// # Contract
///
/// `evaluate` must be pure and deterministic: the engine evaluates every
/// solution exactly once and caches the result, and front classification
/// across generations assumes the same input always maps to the same output.
/// It should return exactly [`num_objectives`](MoProblem::num_objectives)
/// finite values; malformed results are discarded and the solution is
/// resampled.
///
/// # Thread Safety
///
/// `MoProblem` must be `Send + Sync` because the engine may evaluate a batch
/// of solutions in parallel using rayon.
///
/// # Implementing
///
/// ```
/// use u_moea::nsga2::{Constraint, MoProblem};
///
/// /// Schaffer's function N.1: f1 = x², f2 = (x - 2)².
/// struct Schaffer;
///
/// impl MoProblem for Schaffer {
///     fn dimension(&self) -> usize { 1 }
///     fn num_objectives(&self) -> usize { 2 }
///     fn constraint(&self, _index: usize) -> Constraint { Constraint::new(-10.0, 10.0) }
///     fn evaluate(&self, x: &[f64]) -> Vec<f64> {
///         vec![x[0] * x[0], (x[0] - 2.0) * (x[0] - 2.0)]
///     }
/// }
///
/// assert_eq!(Schaffer.evaluate(&[1.0]), vec![1.0, 1.0]);
/// ```
pub trait MoProblem: Send + Sync {
    /// Number of decision variables `D`.
    fn dimension(&self) -> usize;

    /// Number of objectives `M`.
    fn num_objectives(&self) -> usize;

    /// Box constraint for decision variable `index` in `[0, D)`.
    fn constraint(&self, index: usize) -> Constraint;

    /// Maps a decision vector to its objective vector.
    fn evaluate(&self, solution: &[f64]) -> Vec<f64>;
}

/// An evaluated member of the population.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// Decision vector, within the problem's constraints.
    pub solution: Vec<f64>,

    /// Objective vector computed from `solution`.
    pub objectives: Vec<f64>,

    /// Index of the non-dominated front this individual belongs to (0 = best).
    pub rank: usize,

    /// Crowding distance within its front. `f64::INFINITY` for boundary members.
    pub crowding: f64,
}

impl Individual {
    /// Creates an unranked individual from an evaluated solution.
    pub fn new(solution: Vec<f64>, objectives: Vec<f64>) -> Self {
        Self {
            solution,
            objectives,
            rank: 0,
            crowding: 0.0,
        }
    }
}

/// One generation's population snapshot.
///
/// Holds the individuals together with the fronts they were classified into.
/// `fronts[r]` lists the indices of individuals whose `rank == r`, ordered by
/// descending crowding distance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    /// Individuals of this generation.
    pub individuals: Vec<Individual>,

    /// Indices grouped by front.
    pub fronts: Vec<Vec<usize>>,
}

impl Population {
    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Returns `true` if the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Decision vectors of all individuals.
    pub fn solutions(&self) -> Vec<Vec<f64>> {
        self.individuals.iter().map(|i| i.solution.clone()).collect()
    }

    /// Objective vectors of all individuals.
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.individuals.iter().map(|i| i.objectives.clone()).collect()
    }

    /// Members of front 0: the current Pareto-front approximation.
    pub fn pareto_front(&self) -> Vec<&Individual> {
        self.fronts
            .first()
            .map(|front| front.iter().map(|&i| &self.individuals[i]).collect())
            .unwrap_or_default()
    }

    /// Decision vectors of the front-0 members.
    pub fn best_solutions(&self) -> Vec<Vec<f64>> {
        self.pareto_front()
            .into_iter()
            .map(|i| i.solution.clone())
            .collect()
    }
}
