//! Scoring configuration.

use crate::error::{GroupingError, Result};

/// Time-block labels of the default weekly timetable.
pub const DEFAULT_BLOCKS: [&str; 12] = [
    "9L", "9S", "10", "11", "12", "2", "10A", "2A", "3A", "3B", "6A", "6B",
];

/// Configuration shared by every scoring call.
///
/// # Examples
///
/// ```
/// use u_grouping::scoring::ScoringConfig;
///
/// // Reserve four blocks that are known to overlap.
/// let config = ScoringConfig::default().with_usable_blocks(8);
/// assert_eq!(config.usable_block_count(), 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringConfig {
    /// Separator between selections in single-string answers.
    pub list_delimiter: String,

    /// Universe of time-block labels for Scheduling questions.
    pub schedule_blocks: Vec<String>,

    /// Denominator for the Scheduling free-time ratio. `None` uses the
    /// full block count.
    pub usable_blocks: Option<usize>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            list_delimiter: ";".to_string(),
            schedule_blocks: DEFAULT_BLOCKS.iter().map(|b| b.to_string()).collect(),
            usable_blocks: None,
        }
    }
}

impl ScoringConfig {
    pub fn with_list_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.list_delimiter = delimiter.into();
        self
    }

    pub fn with_schedule_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schedule_blocks = blocks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_usable_blocks(mut self, n: usize) -> Self {
        self.usable_blocks = Some(n);
        self
    }

    /// Effective Scheduling denominator.
    pub fn usable_block_count(&self) -> usize {
        self.usable_blocks.unwrap_or(self.schedule_blocks.len())
    }

    pub fn validate(&self) -> Result<()> {
        if self.list_delimiter.is_empty() {
            return Err(GroupingError::config("list_delimiter", "must not be empty"));
        }
        if self.usable_blocks == Some(0) {
            return Err(GroupingError::config("usable_blocks", "must be positive"));
        }
        Ok(())
    }
}
