//! Anytime search: repeated random restarts within a wall-clock budget.
//!
//! Each restart builds a random assignment and refines it with
//! [`LocalSearch`](crate::search::LocalSearch); the best refined
//! assignment across restarts is returned. With the `parallel` feature and
//! `workers > 1`, independent restart loops run on the rayon pool with
//! seeds derived from the master seed.

mod config;
mod runner;

pub use config::AnytimeConfig;
pub use runner::{AnytimeResult, AnytimeRunner};
