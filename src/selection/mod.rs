pub mod selection_strategy;
pub mod stochastic;

pub use selection_strategy::SelectionStrategy;
pub use stochastic::{ExhaustionPolicy, StochasticAcceptance, DEFAULT_MAX_ATTEMPTS};
