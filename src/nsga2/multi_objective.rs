//! Pareto dominance, non-dominated sorting, and crowding distance.
//!
//! Domain-agnostic building blocks of NSGA-II. Every function here works on
//! plain objective vectors, so they can be reused by other Pareto-based
//! methods.
//!
//! # Algorithms
//!
//! - [`dominance`]: Three-way Pareto comparison of two vectors
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: Crowding distance assignment for diversity preservation
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

/// Outcome of a Pareto comparison between two vectors.
///
/// `Neither` is a normal result: the vectors are mutually non-dominated,
/// either because each is better on some objective or because they are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two objective vectors for Pareto dominance (minimization).
///
/// # Example
///
/// ```
/// use u_moea::nsga2::multi_objective::{dominance, Dominance};
///
/// assert_eq!(dominance(&[1.0, 1.0], &[2.0, 2.0]), Dominance::Left);
/// assert_eq!(dominance(&[1.0, 5.0], &[2.0, 4.0]), Dominance::Neither);
/// ```
pub fn dominance(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective vectors must have equal length");

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
        if a_better_in_some && b_better_in_some {
            return Dominance::Neither;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Returns `true` if `a` Pareto-dominates `b`: no worse on every objective
/// and strictly better on at least one.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance(a, b) == Dominance::Left
}

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on dominance relationships.
/// All objectives are **minimized**: lower values are better.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. Compare every pair once; count how many solutions dominate each one and
///    record, for each solution, the ones it dominates
/// 2. Solutions with a zero count form front 0
/// 3. For each member of the current front, decrement the counts of the
///    solutions it dominates; those reaching zero form the next front
///
/// Fronts partition the input: every index appears in exactly one front.
/// Identical vectors never dominate each other and share a front.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_moea::nsga2::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // A
///     vec![3.0, 3.0],  // B
///     vec![5.0, 1.0],  // C
///     vec![4.0, 4.0],  // D — dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
///
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort<T: AsRef<[f64]>>(objectives: &[T]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult::default();
    }

    if n == 1 {
        return NondominatedSortResult {
            ranks: vec![0],
            fronts: vec![vec![0]],
        };
    }

    debug_assert!(
        objectives
            .iter()
            .all(|o| o.as_ref().len() == objectives[0].as_ref().len()),
        "all objective vectors must have the same length"
    );

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance(objectives[i].as_ref(), objectives[j].as_ref()) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    // Counts are final only after all pairs are compared.
    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    let mut fronts = vec![front_0];
    loop {
        let current = &fronts[fronts.len() - 1];
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes, for each member of `front`, how isolated it is from its
/// neighbours in `points`. Higher distance means the member sits in a
/// sparser region and is preferred when ranks tie.
///
/// `front` holds indices into `points`; the returned vector is aligned with
/// `front` (entry `i` belongs to `front[i]`). `points` are objective vectors
/// for canonical NSGA-II, or decision vectors when crowding in decision space.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each axis:
/// 1. Stable-sort the members by their coordinate on that axis
/// 2. Assign infinity to the first and last member
/// 3. For interior members, add `(next - prev) / (max - min)`
///
/// Infinity is sticky across axes. An axis with zero spread contributes
/// nothing to interior members. Fronts of one or two members are all
/// boundary.
///
/// # Complexity
///
/// O(m * n * log n) where m = number of axes, n = front size
///
/// # Example
///
/// ```
/// use u_moea::nsga2::multi_objective::crowding_distance;
///
/// let points = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&[0, 1, 2], &points);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!((distances[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distance<T: AsRef<[f64]>>(front: &[usize], points: &[T]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = points[front[0]].as_ref().len();
    let mut distances = vec![0.0f64; n];

    for axis in 0..m {
        let value = |pos: usize| points[front[pos]].as_ref()[axis];

        // Positions within `front`, sorted by this axis
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            value(a)
                .partial_cmp(&value(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let range = value(order[n - 1]) - value(order[0]);
        if range > 0.0 {
            for k in 1..(n - 1) {
                let prev = value(order[k - 1]);
                let next = value(order[k + 1]);
                distances[order[k]] += (next - prev) / range;
            }
        }
    }

    distances
}

// ============================================================================
// Tests
// ============================================================================
