//! Real-valued variation operators.
//!
//! Crossover and mutation act on raw decision vectors (`&[f64]`) and always
//! write into a fresh child; parents are never modified. [`repair`] brings
//! a child back inside its box constraints.
//!
//! # Operators
//!
//! - [`blx_alpha_crossover`]: Blend crossover — O(n)
//! - [`uniform_mutation`]: Additive uniform perturbation — O(n)
//! - [`repair`]: Clamp to constraints — O(n)
//!
//! # References
//!
//! - Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and
//!   Interval-Schemata"

use super::types::Constraint;
use rand::Rng;

/// BLX-alpha (blend) crossover.
///
/// For each gene, with `lo = min(p1, p2)`, `hi = max(p1, p2)` and
/// `range = hi - lo`, the child gene is drawn uniformly from
/// `[lo - alpha * range, hi + alpha * range]`. Identical genes are copied.
///
/// Produces exactly one child. The child may leave the feasible box; call
/// [`repair`] afterwards.
///
/// # Panics
/// Panics if parents have different lengths.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use u_moea::nsga2::operators::blx_alpha_crossover;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let child = blx_alpha_crossover(&[0.0, 1.0], &[1.0, 1.0], 0.1, &mut rng);
/// assert!(child[0] >= -0.1 && child[0] <= 1.1);
/// assert_eq!(child[1], 1.0);
/// ```
pub fn blx_alpha_crossover<R: Rng>(
    parent1: &[f64],
    parent2: &[f64],
    alpha: f64,
    rng: &mut R,
) -> Vec<f64> {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );

    parent1
        .iter()
        .zip(parent2.iter())
        .map(|(&a, &b)| {
            let lo = a.min(b);
            let hi = a.max(b);
            let range = hi - lo;
            if range <= 0.0 {
                lo
            } else {
                let low = lo - alpha * range;
                let high = hi + alpha * range;
                if (high - low).is_finite() {
                    rng.random_range(low..=high)
                } else {
                    // Extended interval overflows; blend inside the parents
                    rng.random_range(lo..=hi)
                }
            }
        })
        .collect()
}

/// Uniform additive mutation.
///
/// Each gene is, with probability `probability`, shifted by an independent
/// draw from `[lower, upper)`. With `probability == 1.0` every gene is
/// perturbed. A degenerate range (`lower == upper`) shifts by `lower`.
pub fn uniform_mutation<R: Rng>(
    genes: &mut [f64],
    lower: f64,
    upper: f64,
    probability: f64,
    rng: &mut R,
) {
    for gene in genes.iter_mut() {
        if probability < 1.0 && !rng.random_bool(probability.clamp(0.0, 1.0)) {
            continue;
        }
        *gene += if upper > lower {
            rng.random_range(lower..upper)
        } else {
            lower
        };
    }
}

/// Clamps every gene into its constraint interval.
///
/// This is the only constraint handling: infeasible children are repaired,
/// never rejected.
///
/// # Panics
/// Panics if `genes` and `constraints` have different lengths.
pub fn repair(genes: &mut [f64], constraints: &[Constraint]) {
    assert_eq!(
        genes.len(),
        constraints.len(),
        "one constraint per gene required"
    );
    for (gene, c) in genes.iter_mut().zip(constraints) {
        *gene = c.clamp(*gene);
    }
}

/// Draws a solution uniformly inside the constraints.
pub fn sample_uniform<R: Rng>(constraints: &[Constraint], rng: &mut R) -> Vec<f64> {
    constraints
        .iter()
        .map(|c| c.lower + rng.random::<f64>() * c.width())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_blx_within_extended_span() {
        let mut rng = StdRng::seed_from_u64(42);
        let p1 = [0.0, -2.0, 5.0];
        let p2 = [1.0, 2.0, 5.0];
        let alpha = 0.25;

        for _ in 0..500 {
            let child = blx_alpha_crossover(&p1, &p2, alpha, &mut rng);
            assert_eq!(child.len(), 3);
            assert!(child[0] >= -0.25 && child[0] <= 1.25, "gene 0: {}", child[0]);
            assert!(child[1] >= -3.0 && child[1] <= 3.0, "gene 1: {}", child[1]);
            assert_eq!(child[2], 5.0);
        }
    }

    #[test]
    fn test_blx_explores_beyond_parents() {
        let mut rng = StdRng::seed_from_u64(7);
        let outside = (0..1000)
            .map(|_| blx_alpha_crossover(&[0.0], &[1.0], 0.5, &mut rng)[0])
            .filter(|&g| !(0.0..=1.0).contains(&g))
            .count();
        // Half of [-0.5, 1.5] lies outside [0, 1]
        assert!(outside > 350 && outside < 650, "got {outside}");
    }

    #[test]
    fn test_blx_zero_alpha_stays_between_parents() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let child = blx_alpha_crossover(&[3.0, 1.0], &[1.0, 3.0], 0.0, &mut rng);
            assert!(child.iter().all(|&g| (1.0..=3.0).contains(&g)));
        }
    }

    #[test]
    fn test_blx_parents_untouched() {
        let mut rng = StdRng::seed_from_u64(0);
        let p1 = vec![0.5, 0.5];
        let p2 = vec![1.5, -0.5];
        let _ = blx_alpha_crossover(&p1, &p2, 0.1, &mut rng);
        assert_eq!(p1, vec![0.5, 0.5]);
        assert_eq!(p2, vec![1.5, -0.5]);
    }

    #[test]
    fn test_blx_overflowing_span_stays_finite() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let child = blx_alpha_crossover(&[0.0], &[f64::MAX], 1.0, &mut rng);
            assert!(child[0].is_finite());
            assert!(child[0] >= 0.0);
        }
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_blx_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        blx_alpha_crossover(&[0.0], &[0.0, 1.0], 0.1, &mut rng);
    }

    #[test]
    fn test_mutation_shifts_every_gene() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut genes = vec![0.0; 50];
        uniform_mutation(&mut genes, 0.1, 0.2, 1.0, &mut rng);
        assert!(genes.iter().all(|&g| (0.1..0.2).contains(&g)));
    }

    #[test]
    fn test_mutation_zero_probability_is_noop() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut genes = vec![1.0, 2.0, 3.0];
        uniform_mutation(&mut genes, -1.0, 1.0, 0.0, &mut rng);
        assert_eq!(genes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_mutation_partial_probability() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut genes = vec![0.0; 2000];
        uniform_mutation(&mut genes, 1.0, 2.0, 0.25, &mut rng);
        let changed = genes.iter().filter(|&&g| g != 0.0).count();
        assert!(changed > 400 && changed < 600, "got {changed}");
    }

    #[test]
    fn test_mutation_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut genes = vec![1.0, 1.0];
        uniform_mutation(&mut genes, 0.5, 0.5, 1.0, &mut rng);
        assert_eq!(genes, vec![1.5, 1.5]);
    }

    #[test]
    fn test_repair_clamps() {
        let constraints = [Constraint::new(0.1, 1.0), Constraint::new(0.0, 5.0)];
        let mut genes = vec![-3.0, 7.5];
        repair(&mut genes, &constraints);
        assert_eq!(genes, vec![0.1, 5.0]);

        let mut inside = vec![0.5, 2.5];
        repair(&mut inside, &constraints);
        assert_eq!(inside, vec![0.5, 2.5]);
    }

    #[test]
    fn test_sample_uniform_in_bounds() {
        let mut rng = StdRng::seed_from_u64(8);
        let constraints = [
            Constraint::new(-5.0, 5.0),
            Constraint::new(2.0, 2.0),
            Constraint::new(0.1, 1.0),
        ];
        for _ in 0..500 {
            let s = sample_uniform(&constraints, &mut rng);
            assert!(s.iter().zip(&constraints).all(|(&g, c)| c.contains(g)));
            assert_eq!(s[1], 2.0);
        }
    }
}
