//! GA evolutionary loop execution.
//!
//! [`GaRunner`] drives one run through three states:
//! `Init → Evolving(0..G) → Done`.
//!
//! Each generation:
//! 1. select the breeding pool (top `breeding_fraction` of the population)
//! 2. pair consecutive parents `(0,1), (2,3), …` and cross each pair into one child
//! 3. mutate every child
//! 4. append the children to the population
//! 5. keep the top `population_size` as the next generation
//!
//! There is no early stopping: a run always completes exactly
//! `max_generations` generations.

use super::config::{ConfigError, GaConfig};
use super::selection::{rank, select_fittest, truncate_fittest, Ranked};
use super::types::{Fitness, GaProblem};
use crate::random::rng_from_seed;
use tracing::{debug, trace};

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult<I, F> {
    /// The best individual in the final population.
    pub best: I,

    /// Fitness of `best`.
    pub best_fitness: F,

    /// Total number of generations executed.
    pub generations: usize,

    /// Best fitness of the initial population followed by the best
    /// fitness at the end of each generation (`generations + 1` entries).
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config);
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Panics
    /// Panics if the configuration is invalid. Use [`try_run`](Self::try_run)
    /// to get the error instead.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> GaResult<P::Individual, P::Fitness> {
        match Self::try_run(problem, config) {
            Ok(result) => result,
            Err(e) => panic!("invalid GaConfig: {e}"),
        }
    }

    /// Runs the GA optimization, rejecting an invalid configuration.
    pub fn try_run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual, P::Fitness>, ConfigError> {
        config.validate()?;

        let mut rng = rng_from_seed(config.seed);
        let pool_size = config.breeding_pool_size();

        // Init
        let initial: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        let mut population =
            select_fittest(problem, initial, config.population_size, config.parallel);

        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best_of(&population).to_f64());

        debug!(
            population = config.population_size,
            generations = config.max_generations,
            pool = pool_size,
            initial_best = fitness_history[0],
            "ga run started"
        );

        // Evolving
        for gen in 0..config.max_generations {
            // The population is kept sorted best-first, so the breeding pool
            // is simply its head.
            let pool = &population[..pool_size.min(population.len())];

            let mut offspring: Vec<P::Individual> = pool
                .chunks_exact(2)
                .map(|pair| problem.crossover(&pair[0].individual, &pair[1].individual, &mut rng))
                .collect();

            for child in offspring.iter_mut() {
                problem.mutate(child, &mut rng);
            }

            let mut merged: Vec<Ranked<P::Individual, P::Fitness>> = population;
            merged.extend(rank(problem, offspring, config.parallel));
            population = truncate_fittest(merged, config.population_size);

            let best = best_of(&population);
            fitness_history.push(best.to_f64());
            trace!(generation = gen + 1, best = best.to_f64(), "generation complete");

            problem.on_generation(gen + 1, best);
        }

        // Done
        let Ranked {
            individual: best,
            fitness: best_fitness,
        } = population
            .into_iter()
            .next()
            .expect("validated population_size >= 1 keeps the population non-empty");

        debug!(best = best_fitness.to_f64(), "ga run finished");

        Ok(GaResult {
            best,
            best_fitness,
            generations: config.max_generations,
            fitness_history,
        })
    }
}

/// Best fitness of a population sorted best-first.
fn best_of<I, F: Fitness>(population: &[Ranked<I, F>]) -> F {
    population.first().map(|r| r.fitness).unwrap_or_else(F::worst)
}

// ============================================================================
// Tests
// ============================================================================
