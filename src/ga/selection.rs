//! Truncation selection.
//!
//! The timetable GA uses deterministic truncation: rank every individual
//! by fitness and keep the top `k`. It is applied twice per generation,
//! once to pick the breeding pool and once to cut the merged
//! parent + offspring pool back to the population size. The second use is
//! elitist: the best individual of any pool is always within its top `k`.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::GaProblem;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An individual paired with the fitness it was ranked by.
#[derive(Debug, Clone)]
pub struct Ranked<I, F> {
    /// The individual.
    pub individual: I,
    /// Its fitness at ranking time.
    pub fitness: F,
}

/// Evaluates every individual, preserving input order.
///
/// With `parallel` set (and the `parallel` feature enabled) evaluation is
/// spread across the rayon pool. Each fitness is a pure function of one
/// individual, so the output is identical to the sequential path.
pub fn evaluate_all<P: GaProblem>(
    problem: &P,
    population: &[P::Individual],
    parallel: bool,
) -> Vec<P::Fitness> {
    if parallel {
        #[cfg(feature = "parallel")]
        {
            return population.par_iter().map(|ind| problem.evaluate(ind)).collect();
        }
    }

    population.iter().map(|ind| problem.evaluate(ind)).collect()
}

/// Evaluates every individual and pairs it with its fitness, in input order.
pub fn rank<P: GaProblem>(
    problem: &P,
    population: Vec<P::Individual>,
    parallel: bool,
) -> Vec<Ranked<P::Individual, P::Fitness>> {
    let fitness = evaluate_all(problem, &population, parallel);
    population
        .into_iter()
        .zip(fitness)
        .map(|(individual, fitness)| Ranked {
            individual,
            fitness,
        })
        .collect()
}

/// Keeps the `k` fittest entries of an already-ranked pool, best first.
///
/// The sort is stable: entries with equal fitness keep their relative
/// input order. If `k` exceeds the pool, everything is kept.
pub fn truncate_fittest<I, F: PartialOrd>(
    mut ranked: Vec<Ranked<I, F>>,
    k: usize,
) -> Vec<Ranked<I, F>> {
    ranked.sort_by(|a, b| {
        b.fitness
            .partial_cmp(&a.fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}

/// Returns the `k` fittest individuals, best first.
///
/// # Complexity
/// O(n log n) plus `n` evaluations.
pub fn select_fittest<P: GaProblem>(
    problem: &P,
    population: Vec<P::Individual>,
    k: usize,
    parallel: bool,
) -> Vec<Ranked<P::Individual, P::Fitness>> {
    truncate_fittest(rank(problem, population, parallel), k)
}
