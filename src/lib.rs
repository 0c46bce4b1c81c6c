//! Survey-driven group assignment.
//!
//! Partitions a roster of survey respondents into fixed-size groups so as
//! to maximize a multi-criterion compatibility score:
//!
//! - **Model**: questions (with kind, weight and preference), respondents
//!   and their answers, groups and the full assignment.
//! - **Scoring**: per-kind group scoring (multiple choice, checkbox,
//!   scheduling, restrictive, isolation); assignment score is the mean
//!   group score.
//! - **Initializers**: uniform random partition, and greedy combinatorial
//!   construction that samples candidate groups up to a cap.
//! - **Local search**: epsilon-greedy pairwise swaps between a weak group
//!   and a random partner, with checkpointed convergence detection.
//! - **Anytime search**: random restarts under a wall-clock budget,
//!   keeping the best refined assignment.
//! - **Assigner**: the two end-to-end flows (strong or random).
//!
//! # Architecture
//!
//! The crate performs no file I/O and installs no logging subscriber.
//! Record sources hand in header-to-answer maps through
//! [`model::Survey::respondents`]; results are exposed as an
//! [`model::Assignment`] plus a [`report::Summary`] and a
//! [`report::Report`] for print or tabular output.
//!
//! All randomness comes from an injected `rand::Rng` or from a generator
//! seeded through configuration, so every run can be reproduced.

pub mod anytime;
pub mod assigner;
pub mod error;
pub mod init;
pub mod model;
pub mod random;
pub mod report;
pub mod scoring;
pub mod search;
pub mod synthetic;

pub use error::{GroupingError, Result};
