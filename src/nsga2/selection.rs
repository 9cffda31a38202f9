//! Crowded tournament selection.
//!
//! Parents are compared by the crowded-comparison order: Pareto rank first
//! (lower is better), then crowding distance (larger is better). Raw
//! objective values are never consulted, so no objective gets a scalar bias.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::Individual;
use rand::Rng;
use std::cmp::Ordering;

/// Number of extra tournaments tried when looking for a second parent that
/// differs from the first.
const MAX_PARENT_RESAMPLES: usize = 16;

/// Crowded-comparison order.
///
/// Returns `Ordering::Less` when `a` is preferred over `b`: lower rank wins,
/// and among equal ranks the larger crowding distance wins.
///
/// ```
/// use std::cmp::Ordering;
/// use u_moea::nsga2::selection::crowded_compare;
/// use u_moea::nsga2::Individual;
///
/// let mut a = Individual::new(vec![0.0], vec![1.0]);
/// let mut b = Individual::new(vec![1.0], vec![2.0]);
/// a.rank = 0;
/// b.rank = 1;
/// assert_eq!(crowded_compare(&a, &b), Ordering::Less);
/// ```
pub fn crowded_compare(a: &Individual, b: &Individual) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| b.crowding.total_cmp(&a.crowding))
}

/// Binary crowded tournament.
///
/// Draws two distinct individuals uniformly at random and returns the index
/// of the one preferred by [`crowded_compare`]. On an exact tie the first
/// contestant wins.
///
/// # Panics
/// Panics if `population` has fewer than two individuals.
pub fn crowded_tournament<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    let n = population.len();
    assert!(n >= 2, "tournament needs at least two individuals");

    let first = rng.random_range(0..n);
    // Shift past `first` so the second draw is uniform over the others
    let mut second = rng.random_range(0..n - 1);
    if second >= first {
        second += 1;
    }

    match crowded_compare(&population[first], &population[second]) {
        Ordering::Greater => second,
        _ => first,
    }
}

/// Selects two distinct parents by crowded tournament.
///
/// The second tournament is repeated until it yields a different winner.
/// When one individual keeps winning (e.g. a single dominant solution in a
/// tiny population), the second parent is drawn uniformly from the rest
/// after a bounded number of attempts.
///
/// # Panics
/// Panics if `population` has fewer than two individuals.
pub fn select_parents<R: Rng>(population: &[Individual], rng: &mut R) -> (usize, usize) {
    let first = crowded_tournament(population, rng);

    for _ in 0..=MAX_PARENT_RESAMPLES {
        let second = crowded_tournament(population, rng);
        if second != first {
            return (first, second);
        }
    }

    let mut second = rng.random_range(0..population.len() - 1);
    if second >= first {
        second += 1;
    }
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ranked(rank: usize, crowding: f64) -> Individual {
        Individual {
            solution: vec![0.0],
            objectives: vec![0.0, 0.0],
            rank,
            crowding,
        }
    }

    #[test]
    fn test_compare_rank_first() {
        let a = ranked(0, 0.1);
        let b = ranked(1, f64::INFINITY);
        assert_eq!(crowded_compare(&a, &b), Ordering::Less);
        assert_eq!(crowded_compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_compare_crowding_breaks_tie() {
        let a = ranked(2, 0.5);
        let b = ranked(2, 1.5);
        assert_eq!(crowded_compare(&a, &b), Ordering::Greater);
        assert_eq!(crowded_compare(&b, &a), Ordering::Less);

        let boundary = ranked(2, f64::INFINITY);
        assert_eq!(crowded_compare(&boundary, &b), Ordering::Less);
    }

    #[test]
    fn test_compare_ignores_objectives() {
        let mut a = ranked(0, 1.0);
        let mut b = ranked(0, 1.0);
        a.objectives = vec![100.0, 100.0];
        b.objectives = vec![0.0, 0.0];
        assert_eq!(crowded_compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_tournament_two_individuals() {
        // With two individuals both are always drawn; the better one wins.
        let population = vec![ranked(1, 0.0), ranked(0, 0.0)];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(crowded_tournament(&population, &mut rng), 1);
        }
    }

    #[test]
    fn test_tournament_pressure() {
        // Index 0 is strictly best: it wins every tournament it enters,
        // which happens with probability 2/n.
        let mut population: Vec<Individual> = (0..10).map(|_| ranked(3, 1.0)).collect();
        population[0] = ranked(0, 1.0);
        let mut rng = StdRng::seed_from_u64(42);

        let wins = (0..2000)
            .filter(|_| crowded_tournament(&population, &mut rng) == 0)
            .count();
        assert!(wins > 300 && wins < 500, "expected ~400 wins, got {wins}");
    }

    #[test]
    fn test_tournament_never_worst_of_pair() {
        // The worst individual can only lose.
        let mut population: Vec<Individual> = (0..6).map(|i| ranked(0, i as f64)).collect();
        population[0] = ranked(5, 0.0);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            assert_ne!(crowded_tournament(&population, &mut rng), 0);
        }
    }

    #[test]
    fn test_select_parents_distinct() {
        let population: Vec<Individual> = (0..5).map(|i| ranked(i, 1.0)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let (a, b) = select_parents(&population, &mut rng);
            assert_ne!(a, b);
            assert!(a < 5 && b < 5);
        }
    }

    #[test]
    fn test_select_parents_dominant_pair() {
        // A two-member population where index 0 always wins
        let population = vec![ranked(0, 1.0), ranked(1, 1.0)];
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(select_parents(&population, &mut rng), (0, 1));
    }
}
