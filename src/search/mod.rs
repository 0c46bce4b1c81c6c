//! Epsilon-greedy local search over pairwise member swaps.
//!
//! Exploits with an exhaustive best-exchange search between two groups,
//! explores with unconditional random swaps, and stops early once the
//! total score stops moving across two checkpoints.

mod config;
mod runner;

pub use config::SearchConfig;
pub use runner::{LocalSearch, SearchResult, StepOutcome};
