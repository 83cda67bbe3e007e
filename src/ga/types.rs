//! Core trait definitions for the GA engine.
//!
//! [`GaProblem`] is the contract between the generic evolutionary loop and
//! a domain-specific problem (see [`crate::timetable::TimetableProblem`]).

use rand::Rng;

/// A comparable, copyable score. **Higher is better.**
///
/// Implemented for `f64` and `f32`.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// A score no real individual can fall below.
    fn worst() -> Self;

    /// Widens the score for history and log fields.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::NEG_INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for f32 {
    fn worst() -> Self {
        f32::NEG_INFINITY
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// What the engine needs from a problem domain.
///
/// Individuals do not carry a cached fitness: the engine calls
/// [`evaluate`](GaProblem::evaluate) whenever it needs to rank them, so
/// `evaluate` must be a pure function of the individual.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel using rayon (`parallel` feature).
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Clone + Send + Sync;

    /// The fitness type. Higher is better.
    type Fitness: Fitness;

    /// Creates a random individual.
    ///
    /// Called once per population slot during initialization.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual. Must be deterministic and side-effect free.
    fn evaluate(&self, individual: &Self::Individual) -> Self::Fitness;

    /// Produces one child from two parents.
    ///
    /// The default implementation clones `parent1` (no crossover).
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Self::Individual {
        parent1.clone()
    }

    /// Mutates an individual in place.
    ///
    /// The engine calls this on every offspring; the problem decides the
    /// actual mutation probability. The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Called at the end of each generation with the current best fitness.
    ///
    /// The default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _best_fitness: Self::Fitness) {}
}
