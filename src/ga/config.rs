//! GA configuration.
//!
//! [`GaConfig`] sizes a run: population, generation count, breeding pool,
//! seed, and whether evaluation fans out over rayon.

use thiserror::Error;

/// Reasons a [`GaConfig`] is rejected by [`GaConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// There is no individual to return.
    #[error("population_size must be at least 1, got {0}")]
    PopulationTooSmall(usize),

    /// The loop would never run.
    #[error("max_generations must be at least 1")]
    ZeroGenerations,
}

/// Sizing and seeding for one GA run.
///
/// # Defaults
///
/// The defaults are the reference sizing: 100 individuals, 1000
/// generations, and a breeding pool of the top fifth of the population.
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 1000);
/// assert_eq!(config.breeding_pool_size(), 20);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_max_generations(200)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals kept after every generation.
    pub population_size: usize,

    /// Exact number of generations to run. There is no early stopping.
    pub max_generations: usize,

    /// Fraction of the population selected as the breeding pool (0.0–1.0).
    ///
    /// The pool is the top `floor(population_size * breeding_fraction)`
    /// individuals; consecutive pairs each produce one child.
    pub breeding_fraction: f64,

    /// Whether to evaluate fitness in parallel using rayon.
    ///
    /// Only takes effect when the crate is built with the `parallel`
    /// feature. Results are identical either way.
    pub parallel: bool,

    /// Seed for the run's single RNG. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl GaConfig {
    /// The reference sizing: population 100, 1000 generations, top 20% breed.
    pub fn reference() -> Self {
        Self {
            population_size: 100,
            max_generations: 1000,
            breeding_fraction: 0.2,
            parallel: false,
            seed: None,
        }
    }

    /// Preset for quick previews and tests: population 40, 100 generations.
    pub fn fast() -> Self {
        Self {
            population_size: 40,
            max_generations: 100,
            ..Self::reference()
        }
    }

    /// Preset between `fast` and `reference`: population 100, 300 generations.
    pub fn balanced() -> Self {
        Self {
            max_generations: 300,
            ..Self::reference()
        }
    }

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

    /// Sets the breeding fraction.
    pub fn with_breeding_fraction(mut self, fraction: f64) -> Self {
        self.breeding_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fixes the seed, making the run reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Size of the breeding pool selected each generation.
    pub fn breeding_pool_size(&self) -> usize {
        (self.population_size as f64 * self.breeding_fraction) as usize
    }

    /// Rejects an empty population or a run without generations.
    ///
    /// A breeding pool under two parents is accepted: it yields no
    /// offspring and the population carries over unchanged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        Ok(())
    }
}
