//! Assignment construction.
//!
//! - [`RandomInitializer`]: uniform shuffle sliced into groups; the
//!   restart seed for anytime search.
//! - [`StrongInitializer`]: greedy slot-by-slot selection of the best
//!   sampled combination, using the scoring engine as an oracle.

mod cache;
mod combinations;
mod random;
mod strong;

pub use cache::{CandidateKey, ScoreCache};
pub use combinations::{n_choose_k, Combinations};
pub use random::RandomInitializer;
pub use strong::StrongInitializer;

use crate::error::{GroupingError, Result};

/// Rejects a zero group size and rosters too small for one full group.
pub(crate) fn check_group_size(respondents: usize, group_size: usize) -> Result<()> {
    if group_size < 1 {
        return Err(GroupingError::config("group_size", "must be at least 1"));
    }
    if respondents < group_size {
        return Err(GroupingError::InsufficientRespondents {
            respondents,
            group_size,
        });
    }
    Ok(())
}
