//! Heuristic prediction models.
//!
//! Every model ranks candidate heads for a day using only the draws that came
//! before it. They are heuristics, not forecasts.

mod frequency;
mod markov;
mod monte_carlo;
mod registry;
mod trend;
pub mod window;

pub use frequency::FrequencyModel;
pub use markov::MarkovModel;
pub use monte_carlo::{MonteCarloModel, DEFAULT_ITERATIONS};
pub use registry::ModelRegistry;
pub use trend::{TrendModel, DEFAULT_TREND_WINDOW};
