//! Genetic Algorithm engine.
//!
//! A generic, domain-agnostic GA loop built on a trait-based problem
//! definition. Problems implement [`GaProblem`], which specifies how to
//! create, evaluate, crossover, and mutate individuals; the engine owns
//! selection, merging, and the generation loop.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Population size, generation count, breeding fraction, seed
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best individual plus per-generation fitness history
//!
//! # Selection model
//!
//! Truncation selection with (μ + λ) survivor replacement: the top fraction
//! of the population breeds, children are appended, and the best
//! `population_size` survive. The best individual is therefore never lost.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
mod runner;
pub mod selection;
mod types;

pub use config::{ConfigError, GaConfig};
pub use runner::{GaResult, GaRunner};
pub use selection::Ranked;
pub use types::{Fitness, GaProblem};
