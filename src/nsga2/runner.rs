//! NSGA-II generational loop.
//!
//! [`Nsga2Engine`] owns the population and moves it through the states
//! `Uninitialized → Initialized → Generation(k) → Terminated`:
//! initialization → evaluation → ranking → crowding → (selection → variation
//! → evaluation → merge → truncation)*.
//!
//! [`Nsga2Runner`] is the one-call driver: it seeds a generator from the
//! config and runs an engine to completion.

use super::config::{DiversitySpace, Nsga2Config};
use super::multi_objective::{crowding_distance, non_dominated_sort};
use super::operators::{blx_alpha_crossover, repair, sample_uniform, uniform_mutation};
use super::selection::select_parents;
use super::types::{Constraint, Individual, MoProblem, Population};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Consecutive malformed evaluations tolerated for one population slot.
const MAX_EVALUATION_RETRIES: usize = 32;

/// Lifecycle of an [`Nsga2Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Built and validated; no population yet.
    Uninitialized,
    /// Initial population sampled, evaluated, ranked and crowded.
    Initialized,
    /// `k` generations completed.
    Generation(usize),
    /// No further generations will run.
    Terminated,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Uninitialized => write!(f, "Uninitialized"),
            EngineState::Initialized => write!(f, "Initialized"),
            EngineState::Generation(k) => write!(f, "Generation({k})"),
            EngineState::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Front statistics recorded after initialization and after each generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generations completed (0 = initial population).
    pub generation: usize,

    /// Number of non-dominated fronts in the population.
    pub front_count: usize,

    /// Size of front 0.
    pub best_front_size: usize,
}

impl GenerationStats {
    fn of(generation: usize, population: &Population) -> Self {
        Self {
            generation,
            front_count: population.fronts.len(),
            best_front_size: population.fronts.first().map_or(0, Vec::len),
        }
    }
}

/// Result of an NSGA-II run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nsga2Result {
    /// Final population with ranks, crowding distances and fronts.
    pub population: Population,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Front statistics: the initial population, then one entry per generation.
    pub history: Vec<GenerationStats>,
}

impl Nsga2Result {
    /// Decision vectors of the final population.
    pub fn solutions(&self) -> Vec<Vec<f64>> {
        self.population.solutions()
    }

    /// Objective vectors of the final population.
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.population.values()
    }

    /// Decision vectors of the final front 0.
    pub fn best_solutions(&self) -> Vec<Vec<f64>> {
        self.population.best_solutions()
    }

    /// Members of the final front 0.
    pub fn pareto_front(&self) -> Vec<&Individual> {
        self.population.pareto_front()
    }
}

/// Step-wise NSGA-II engine.
///
/// The random generator is injected so that runs are reproducible and tests
/// can drive the engine deterministically.
///
/// # Usage
///
/// ```
/// use rand::SeedableRng;
/// use u_moea::nsga2::problems::ReciprocalTradeoff;
/// use u_moea::nsga2::{EngineState, Nsga2Config, Nsga2Engine};
///
/// let config = Nsga2Config::default()
///     .with_population_size(20)
///     .with_max_generations(5);
/// let rng = rand::rngs::StdRng::seed_from_u64(42);
///
/// let mut engine = Nsga2Engine::new(&ReciprocalTradeoff, config, rng).unwrap();
/// engine.initialize().unwrap();
/// engine.step().unwrap();
/// assert_eq!(engine.state(), EngineState::Generation(1));
///
/// engine.run().unwrap();
/// assert_eq!(engine.state(), EngineState::Terminated);
/// assert_eq!(engine.solutions().len(), 20);
/// ```
pub struct Nsga2Engine<'a, P: MoProblem, R: Rng> {
    problem: &'a P,
    config: Nsga2Config,
    constraints: Vec<Constraint>,
    rng: R,
    state: EngineState,
    population: Option<Population>,
    generations: usize,
    cancelled: bool,
    history: Vec<GenerationStats>,
}

impl<'a, P: MoProblem, R: Rng> Nsga2Engine<'a, P, R> {
    /// Validates `config` against `problem` and builds an uninitialized engine.
    pub fn new(problem: &'a P, config: Nsga2Config, rng: R) -> Result<Self> {
        config.validate_for(problem)?;
        let constraints = (0..problem.dimension())
            .map(|i| problem.constraint(i))
            .collect();

        Ok(Self {
            problem,
            config,
            constraints,
            rng,
            state: EngineState::Uninitialized,
            population: None,
            generations: 0,
            cancelled: false,
            history: Vec::new(),
        })
    }

    /// Samples, evaluates, ranks and crowds the initial population.
    ///
    /// Solutions are drawn uniformly inside the constraints. A solution
    /// whose evaluation is malformed is replaced by a fresh sample.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != EngineState::Uninitialized {
            return Err(self.state_error("Uninitialized"));
        }

        let n = self.config.population_size;
        let solutions: Vec<Vec<f64>> = (0..n)
            .map(|_| sample_uniform(&self.constraints, &mut self.rng))
            .collect();

        let constraints = &self.constraints;
        let individuals = evaluate_with_retries(
            self.problem,
            self.config.parallel,
            &mut self.rng,
            solutions,
            |rng| sample_uniform(constraints, rng),
        )?;

        let population = rank_and_crowd(individuals, self.config.diversity);
        let stats = GenerationStats::of(0, &population);
        info!(
            population_size = n,
            front_count = stats.front_count,
            best_front_size = stats.best_front_size,
            "population initialized"
        );

        self.history.push(stats);
        self.population = Some(population);
        self.state = EngineState::Initialized;
        Ok(())
    }

    /// Runs one generational transition.
    ///
    /// 1. Breed `N` offspring: two distinct parents by crowded tournament,
    ///    BLX-alpha crossover, mutation, repair, evaluation
    /// 2. Merge parents and offspring into a union of `2N`
    /// 3. Rank and crowd the union
    /// 4. Accept whole fronts in rank order; the front that overflows keeps
    ///    only its most isolated members, so exactly `N` survive
    ///
    /// The new population replaces the old one only if every step succeeds.
    pub fn step(&mut self) -> Result<()> {
        let completed = match self.state {
            EngineState::Initialized => 0,
            EngineState::Generation(k) => k,
            _ => return Err(self.state_error("Initialized or Generation")),
        };
        let Some(current) = self.population.as_ref() else {
            return Err(self.state_error("Initialized or Generation"));
        };

        let n = self.config.population_size;
        let config = &self.config;
        let constraints = &self.constraints;
        let parents = &current.individuals;

        let offspring_solutions: Vec<Vec<f64>> = (0..n)
            .map(|_| breed(parents, config, constraints, &mut self.rng))
            .collect();
        let offspring = evaluate_with_retries(
            self.problem,
            config.parallel,
            &mut self.rng,
            offspring_solutions,
            |rng| breed(parents, config, constraints, rng),
        )?;

        let mut union = Vec::with_capacity(2 * n);
        union.extend(parents.iter().cloned());
        union.extend(offspring);

        let union = rank_and_crowd(union, config.diversity);
        let next = select_survivors(union, n, config.diversity);

        let generation = completed + 1;
        let stats = GenerationStats::of(generation, &next);
        debug!(
            generation,
            front_count = stats.front_count,
            best_front_size = stats.best_front_size,
            "generation completed"
        );

        self.history.push(stats);
        self.population = Some(next);
        self.generations = generation;
        self.state = if generation >= self.config.max_generations {
            EngineState::Terminated
        } else {
            EngineState::Generation(generation)
        };
        Ok(())
    }

    /// Runs until the generation limit is reached.
    ///
    /// Initializes first if needed.
    pub fn run(&mut self) -> Result<()> {
        self.run_with_cancel(None)
    }

    /// Runs until the generation limit is reached or `cancel` is set.
    ///
    /// The flag is checked before each generation starts; a generation in
    /// progress always completes.
    pub fn run_with_cancel(&mut self, cancel: Option<&AtomicBool>) -> Result<()> {
        if self.state == EngineState::Uninitialized {
            self.initialize()?;
        }

        while self.state != EngineState::Terminated {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                self.cancelled = true;
                self.terminate();
                break;
            }
            self.step()?;
        }

        info!(
            generations = self.generations,
            cancelled = self.cancelled,
            best_front_size = self.fronts().first().map_or(0, Vec::len),
            "optimization finished"
        );
        Ok(())
    }

    /// Stops the engine. No further generations can run.
    pub fn terminate(&mut self) {
        self.state = EngineState::Terminated;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Number of generations completed.
    pub fn generation(&self) -> usize {
        self.generations
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &Nsga2Config {
        &self.config
    }

    /// Current population, if initialized.
    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// Decision vectors of the current population (empty before initialization).
    pub fn solutions(&self) -> Vec<Vec<f64>> {
        self.population
            .as_ref()
            .map(Population::solutions)
            .unwrap_or_default()
    }

    /// Objective vectors of the current population (empty before initialization).
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.population
            .as_ref()
            .map(Population::values)
            .unwrap_or_default()
    }

    /// Decision vectors of the current front 0.
    pub fn best_solutions(&self) -> Vec<Vec<f64>> {
        self.population
            .as_ref()
            .map(Population::best_solutions)
            .unwrap_or_default()
    }

    /// Fronts of the current population.
    pub fn fronts(&self) -> &[Vec<usize>] {
        match &self.population {
            Some(population) => &population.fronts,
            None => &[],
        }
    }

    /// Front statistics recorded so far.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Consumes the engine and returns its final population and statistics.
    pub fn into_result(self) -> Result<Nsga2Result> {
        let state = self.state;
        let Some(population) = self.population else {
            return Err(Error::InvalidState {
                expected: "initialized",
                actual: state.to_string(),
            });
        };

        Ok(Nsga2Result {
            population,
            generations: self.generations,
            cancelled: self.cancelled,
            history: self.history,
        })
    }

    fn state_error(&self, expected: &'static str) -> Error {
        Error::InvalidState {
            expected,
            actual: self.state.to_string(),
        }
    }
}

/// Runs NSGA-II to completion.
///
/// # Usage
///
/// ```
/// use u_moea::nsga2::problems::ReciprocalTradeoff;
/// use u_moea::nsga2::{Nsga2Config, Nsga2Runner};
///
/// let config = Nsga2Config::default()
///     .with_population_size(30)
///     .with_max_generations(20)
///     .with_seed(42);
///
/// let result = Nsga2Runner::run(&ReciprocalTradeoff, &config).unwrap();
/// assert_eq!(result.generations, 20);
/// assert_eq!(result.values().len(), 30);
/// assert!(!result.best_solutions().is_empty());
/// ```
pub struct Nsga2Runner;

impl Nsga2Runner {
    /// Runs the optimization with a generator seeded from `config.seed`.
    pub fn run<P: MoProblem>(problem: &P, config: &Nsga2Config) -> Result<Nsga2Result> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the optimization with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation and returns the current population.
    pub fn run_with_cancel<P: MoProblem>(
        problem: &P,
        config: &Nsga2Config,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Nsga2Result> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut engine = Nsga2Engine::new(problem, config.clone(), rng)?;
        engine.run_with_cancel(cancel.as_deref())?;
        engine.into_result()
    }
}

/// Produces one repaired child from two distinct crowded-tournament parents.
fn breed<R: Rng>(
    parents: &[Individual],
    config: &Nsga2Config,
    constraints: &[Constraint],
    rng: &mut R,
) -> Vec<f64> {
    let (p1, p2) = select_parents(parents, rng);
    let mut child = blx_alpha_crossover(
        &parents[p1].solution,
        &parents[p2].solution,
        config.blx_alpha,
        rng,
    );
    uniform_mutation(
        &mut child,
        config.mutation_lower,
        config.mutation_upper,
        config.mutation_probability,
        rng,
    );
    repair(&mut child, constraints);
    child
}

/// Evaluates a solution, rejecting objective vectors of the wrong length or
/// with non-finite entries.
fn checked_evaluate<P: MoProblem>(problem: &P, solution: &[f64]) -> Option<Vec<f64>> {
    let objectives = problem.evaluate(solution);
    if objectives.len() == problem.num_objectives() && objectives.iter().all(|v| v.is_finite()) {
        Some(objectives)
    } else {
        None
    }
}

#[cfg(feature = "parallel")]
fn evaluate_batch<P: MoProblem>(
    problem: &P,
    solutions: &[Vec<f64>],
    parallel: bool,
) -> Vec<Option<Vec<f64>>> {
    if parallel {
        solutions
            .par_iter()
            .map(|s| checked_evaluate(problem, s))
            .collect()
    } else {
        solutions
            .iter()
            .map(|s| checked_evaluate(problem, s))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_batch<P: MoProblem>(
    problem: &P,
    solutions: &[Vec<f64>],
    _parallel: bool,
) -> Vec<Option<Vec<f64>>> {
    solutions
        .iter()
        .map(|s| checked_evaluate(problem, s))
        .collect()
}

/// Evaluates a batch, replacing each malformed slot with `regenerate` until
/// it evaluates cleanly.
///
/// All random draws happen here on the calling thread, so the outcome does
/// not depend on whether the batch was evaluated in parallel.
fn evaluate_with_retries<P, R, G>(
    problem: &P,
    parallel: bool,
    rng: &mut R,
    solutions: Vec<Vec<f64>>,
    mut regenerate: G,
) -> Result<Vec<Individual>>
where
    P: MoProblem,
    R: Rng,
    G: FnMut(&mut R) -> Vec<f64>,
{
    let evaluated = evaluate_batch(problem, &solutions, parallel);
    let mut individuals = Vec::with_capacity(solutions.len());

    for (solution, objectives) in solutions.into_iter().zip(evaluated) {
        let individual = match objectives {
            Some(objectives) => Individual::new(solution, objectives),
            None => {
                let mut attempts = 1;
                loop {
                    if attempts >= MAX_EVALUATION_RETRIES {
                        return Err(Error::EvaluationFailed { attempts });
                    }
                    warn!(attempts, "discarding solution with malformed objective vector");
                    let candidate = regenerate(&mut *rng);
                    attempts += 1;
                    if let Some(objectives) = checked_evaluate(problem, &candidate) {
                        break Individual::new(candidate, objectives);
                    }
                }
            }
        };
        individuals.push(individual);
    }

    Ok(individuals)
}

fn crowding_point(space: DiversitySpace, individual: &Individual) -> &[f64] {
    match space {
        DiversitySpace::Objective => &individual.objectives,
        DiversitySpace::Decision => &individual.solution,
    }
}

/// Classifies `individuals` into fronts, then crowds each front and orders
/// it by descending crowding distance.
fn rank_and_crowd(mut individuals: Vec<Individual>, diversity: DiversitySpace) -> Population {
    let sort = {
        let objectives: Vec<&[f64]> = individuals
            .iter()
            .map(|ind| ind.objectives.as_slice())
            .collect();
        non_dominated_sort(&objectives)
    };

    for (ind, rank) in individuals.iter_mut().zip(sort.ranks) {
        ind.rank = rank;
    }

    let mut fronts = sort.fronts;
    crowd_fronts(&mut individuals, &mut fronts, diversity);
    Population {
        individuals,
        fronts,
    }
}

/// Recomputes the crowding distance of every front member and orders each
/// front by descending distance.
///
/// Fronts are first put in index order, so the result depends only on which
/// individuals a front holds.
fn crowd_fronts(
    individuals: &mut [Individual],
    fronts: &mut [Vec<usize>],
    diversity: DiversitySpace,
) {
    for front in fronts.iter_mut() {
        front.sort_unstable();
    }

    let crowding = {
        let points: Vec<&[f64]> = individuals
            .iter()
            .map(|ind| crowding_point(diversity, ind))
            .collect();
        let mut crowding = vec![0.0; individuals.len()];
        for front in fronts.iter() {
            for (&i, d) in front.iter().zip(crowding_distance(front, &points)) {
                crowding[i] = d;
            }
        }
        crowding
    };

    for (ind, d) in individuals.iter_mut().zip(crowding) {
        ind.crowding = d;
    }

    for front in fronts.iter_mut() {
        // Stable: equal distances keep index order
        front.sort_by(|&a, &b| individuals[b].crowding.total_cmp(&individuals[a].crowding));
    }
}

/// Elitist truncation of a ranked and crowded union down to `n` individuals.
///
/// Whole fronts are accepted in rank order; the first front that does not
/// fit contributes its leading (most isolated) members. Survivors keep the
/// rank computed on the union. Front indices are remapped to the new
/// population and each surviving front is crowded again, so no distance
/// refers to a discarded neighbour.
fn select_survivors(union: Population, n: usize, diversity: DiversitySpace) -> Population {
    let Population {
        individuals,
        fronts,
    } = union;
    let mut slots: Vec<Option<Individual>> = individuals.into_iter().map(Some).collect();

    let mut survivors = Vec::with_capacity(n);
    let mut survivor_fronts = Vec::new();

    for front in fronts {
        let room = n - survivors.len();
        if room == 0 {
            break;
        }

        let mut accepted = Vec::with_capacity(room.min(front.len()));
        for &i in front.iter().take(room) {
            if let Some(individual) = slots[i].take() {
                accepted.push(survivors.len());
                survivors.push(individual);
            }
        }
        survivor_fronts.push(accepted);
    }

    crowd_fronts(&mut survivors, &mut survivor_fronts, diversity);
    Population {
        individuals: survivors,
        fronts: survivor_fronts,
    }
}

// ============================================================================
// Tests
// ============================================================================
