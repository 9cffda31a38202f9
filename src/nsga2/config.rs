//! NSGA-II configuration.
//!
//! [`Nsga2Config`] holds all parameters that control the generational loop.

use super::types::MoProblem;
use crate::error::{Error, Result};

/// Space in which crowding distance measures how isolated an individual is.
///
/// Chosen once at configuration time and handed to the crowding estimator
/// as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiversitySpace {
    /// Crowd on objective vectors (canonical NSGA-II).
    ///
    /// Spreads the approximation evenly along the Pareto front.
    #[default]
    Objective,

    /// Crowd on decision vectors.
    ///
    /// Spreads the population over the Pareto set in decision space, which
    /// helps when distinct solutions map to nearby objective values.
    Decision,
}

/// Configuration for NSGA-II.
///
/// # Defaults
///
/// ```
/// use u_moea::nsga2::{DiversitySpace, Nsga2Config};
///
/// let config = Nsga2Config::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// assert_eq!(config.diversity, DiversitySpace::Objective);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::nsga2::{DiversitySpace, Nsga2Config};
///
/// let config = Nsga2Config::default()
///     .with_population_size(60)
///     .with_max_generations(200)
///     .with_blx_alpha(0.2)
///     .with_mutation_range(-0.1, 0.1)
///     .with_diversity(DiversitySpace::Decision)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nsga2Config {
    /// Number of individuals `N` kept between generations.
    ///
    /// Offspring double it temporarily to `2N` before truncation.
    pub population_size: usize,

    /// Number of generations to run. There is no other stopping criterion.
    pub max_generations: usize,

    /// BLX blend factor: how far beyond the parents' span a child may land,
    /// as a fraction of that span.
    pub blx_alpha: f64,

    /// Lower end of the uniform mutation perturbation.
    pub mutation_lower: f64,

    /// Upper end of the uniform mutation perturbation.
    pub mutation_upper: f64,

    /// Probability that a single gene is perturbed (0.0–1.0).
    ///
    /// 1.0 perturbs every gene of every offspring.
    pub mutation_probability: f64,

    /// Space in which crowding distance is measured.
    pub diversity: DiversitySpace,

    /// Whether to evaluate batches in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature.
    pub parallel: bool,

    /// Random seed used by [`Nsga2Runner`](super::Nsga2Runner).
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            blx_alpha: 0.1,
            mutation_lower: -0.25,
            mutation_upper: 0.25,
            mutation_probability: 1.0,
            diversity: DiversitySpace::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl Nsga2Config {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the BLX blend factor.
    pub fn with_blx_alpha(mut self, alpha: f64) -> Self {
        self.blx_alpha = alpha;
        self
    }

    /// Sets the mutation perturbation range `[lower, upper)`.
    pub fn with_mutation_range(mut self, lower: f64, upper: f64) -> Self {
        self.mutation_lower = lower;
        self.mutation_upper = upper;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the diversity space used by crowding.
    pub fn with_diversity(mut self, diversity: DiversitySpace) -> Self {
        self.diversity = diversity;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if self.max_generations == 0 {
            return Err(Error::ZeroGenerations);
        }
        if !self.blx_alpha.is_finite() || self.blx_alpha < 0.0 {
            return Err(Error::InvalidBlendFactor(self.blx_alpha));
        }
        if !self.mutation_lower.is_finite()
            || !self.mutation_upper.is_finite()
            || self.mutation_lower > self.mutation_upper
        {
            return Err(Error::InvalidMutationRange {
                lower: self.mutation_lower,
                upper: self.mutation_upper,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(Error::InvalidMutationProbability(self.mutation_probability));
        }
        Ok(())
    }

    /// Validates the configuration together with the problem it will run on.
    ///
    /// Checks that the problem has at least one variable and one objective,
    /// and that every constraint is finite with `lower <= upper` and a finite
    /// width.
    pub fn validate_for<P: MoProblem>(&self, problem: &P) -> Result<()> {
        self.validate()?;
        if problem.dimension() == 0 {
            return Err(Error::EmptyDecisionSpace);
        }
        if problem.num_objectives() == 0 {
            return Err(Error::NoObjectives);
        }
        for index in 0..problem.dimension() {
            let c = problem.constraint(index);
            if !c.is_valid() {
                return Err(Error::InvalidConstraint {
                    index,
                    lower: c.lower,
                    upper: c.upper,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nsga2::Constraint;

    struct Boxed {
        dim: usize,
        objectives: usize,
        bounds: (f64, f64),
    }

    impl MoProblem for Boxed {
        fn dimension(&self) -> usize {
            self.dim
        }
        fn num_objectives(&self) -> usize {
            self.objectives
        }
        fn constraint(&self, _index: usize) -> Constraint {
            self.bounds.into()
        }
        fn evaluate(&self, solution: &[f64]) -> Vec<f64> {
            vec![solution.iter().sum(); self.objectives]
        }
    }

    #[test]
    fn test_default_config() {
        let config = Nsga2Config::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert!((config.blx_alpha - 0.1).abs() < 1e-12);
        assert!((config.mutation_lower + 0.25).abs() < 1e-12);
        assert!((config.mutation_upper - 0.25).abs() < 1e-12);
        assert!((config.mutation_probability - 1.0).abs() < 1e-12);
        assert_eq!(config.diversity, DiversitySpace::Objective);
        assert!(config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = Nsga2Config::default()
            .with_population_size(40)
            .with_max_generations(10)
            .with_blx_alpha(0.3)
            .with_mutation_range(-1.0, 0.5)
            .with_mutation_probability(0.2)
            .with_diversity(DiversitySpace::Decision)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 40);
        assert_eq!(config.max_generations, 10);
        assert!((config.blx_alpha - 0.3).abs() < 1e-12);
        assert!((config.mutation_lower + 1.0).abs() < 1e-12);
        assert!((config.mutation_upper - 0.5).abs() < 1e-12);
        assert!((config.mutation_probability - 0.2).abs() < 1e-12);
        assert_eq!(config.diversity, DiversitySpace::Decision);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_mutation_probability_clamped() {
        let config = Nsga2Config::default().with_mutation_probability(1.7);
        assert!((config.mutation_probability - 1.0).abs() < 1e-12);
        let config = Nsga2Config::default().with_mutation_probability(-0.3);
        assert!(config.mutation_probability.abs() < 1e-12);
    }

    #[test]
    fn test_validate_ok() {
        assert!(Nsga2Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = Nsga2Config::default().with_population_size(1);
        assert_eq!(
            config.validate(),
            Err(Error::PopulationTooSmall { size: 1 })
        );
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = Nsga2Config::default().with_max_generations(0);
        assert_eq!(config.validate(), Err(Error::ZeroGenerations));
    }

    #[test]
    fn test_validate_negative_alpha() {
        let config = Nsga2Config::default().with_blx_alpha(-0.1);
        assert!(matches!(config.validate(), Err(Error::InvalidBlendFactor(_))));
    }

    #[test]
    fn test_validate_inverted_mutation_range() {
        let config = Nsga2Config::default().with_mutation_range(0.5, -0.5);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidMutationRange { .. })
        ));
    }

    #[test]
    fn test_validate_probability_set_directly() {
        let mut config = Nsga2Config::default();
        config.mutation_probability = 2.0;
        assert_eq!(
            config.validate(),
            Err(Error::InvalidMutationProbability(2.0))
        );
    }

    #[test]
    fn test_validate_for_problem() {
        let config = Nsga2Config::default();
        let ok = Boxed {
            dim: 2,
            objectives: 2,
            bounds: (-1.0, 1.0),
        };
        assert!(config.validate_for(&ok).is_ok());

        let empty = Boxed {
            dim: 0,
            objectives: 2,
            bounds: (-1.0, 1.0),
        };
        assert_eq!(config.validate_for(&empty), Err(Error::EmptyDecisionSpace));

        let no_objectives = Boxed {
            dim: 2,
            objectives: 0,
            bounds: (-1.0, 1.0),
        };
        assert_eq!(config.validate_for(&no_objectives), Err(Error::NoObjectives));
    }

    #[test]
    fn test_validate_for_malformed_constraint() {
        let config = Nsga2Config::default();
        let inverted = Boxed {
            dim: 3,
            objectives: 2,
            bounds: (1.0, -1.0),
        };
        assert_eq!(
            config.validate_for(&inverted),
            Err(Error::InvalidConstraint {
                index: 0,
                lower: 1.0,
                upper: -1.0,
            })
        );
    }

    #[test]
    fn test_validate_for_overflowing_width() {
        let config = Nsga2Config::default();
        let huge = Boxed {
            dim: 2,
            objectives: 2,
            bounds: (-f64::MAX, f64::MAX),
        };
        assert!(matches!(
            config.validate_for(&huge),
            Err(Error::InvalidConstraint { index: 0, .. })
        ));
    }
}
