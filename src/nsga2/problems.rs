//! Reference problems with known Pareto fronts.
//!
//! Small, cheap problems used to exercise and benchmark the engine.

use super::types::{Constraint, MoProblem};

/// Independent squares: objective `i` is `x_i²`, each `x_i ∈ [-5, 5]`.
///
/// The objectives do not conflict, so the Pareto set collapses to the
/// origin and the whole population should converge towards it.
#[derive(Debug, Clone, Copy)]
pub struct IndependentSquares {
    dimension: usize,
}

impl IndependentSquares {
    /// Creates the problem with `dimension` variables and as many objectives.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for IndependentSquares {
    fn default() -> Self {
        Self::new(4)
    }
}

impl MoProblem for IndependentSquares {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn num_objectives(&self) -> usize {
        self.dimension
    }

    fn constraint(&self, _index: usize) -> Constraint {
        Constraint::new(-5.0, 5.0)
    }

    fn evaluate(&self, solution: &[f64]) -> Vec<f64> {
        solution.iter().map(|x| x * x).collect()
    }
}

/// Two-objective trade-off: `f1 = x1`, `f2 = (1 + x2) / x1`,
/// with `x1 ∈ [0.1, 1]` and `x2 ∈ [0, 5]`.
///
/// The Pareto set is `x2 = 0`, giving the front `f2 = 1 / f1` for
/// `f1 ∈ [0.1, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReciprocalTradeoff;

impl ReciprocalTradeoff {
    const CONSTRAINTS: [Constraint; 2] = [
        Constraint {
            lower: 0.1,
            upper: 1.0,
        },
        Constraint {
            lower: 0.0,
            upper: 5.0,
        },
    ];
}

impl MoProblem for ReciprocalTradeoff {
    fn dimension(&self) -> usize {
        2
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn constraint(&self, index: usize) -> Constraint {
        Self::CONSTRAINTS[index]
    }

    fn evaluate(&self, solution: &[f64]) -> Vec<f64> {
        vec![solution[0], (1.0 + solution[1]) / solution[0]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_squares() {
        let p = IndependentSquares::default();
        assert_eq!(p.dimension(), 4);
        assert_eq!(p.num_objectives(), 4);
        assert_eq!(p.constraint(3), Constraint::new(-5.0, 5.0));
        assert_eq!(p.evaluate(&[1.0, -2.0, 0.0, 3.0]), vec![1.0, 4.0, 0.0, 9.0]);
    }

    #[test]
    fn test_reciprocal_tradeoff() {
        let p = ReciprocalTradeoff;
        assert_eq!(p.constraint(0), Constraint::new(0.1, 1.0));
        assert_eq!(p.constraint(1), Constraint::new(0.0, 5.0));
        let v = p.evaluate(&[0.5, 1.0]);
        assert!((v[0] - 0.5).abs() < 1e-12);
        assert!((v[1] - 4.0).abs() < 1e-12);
    }
}
