//! Group scoring.
//!
//! A group's score is the sum of one contribution per question, chosen by
//! the question's kind; an assignment's score is the mean over its groups.
//! See [`ScoringEngine`] for the per-kind formulas.

mod config;
mod engine;

pub use config::{ScoringConfig, DEFAULT_BLOCKS};
pub use engine::ScoringEngine;
