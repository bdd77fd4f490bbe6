//! Offset pagination for list endpoints

use serde::{Deserialize, Serialize};

/// Smallest page a caller may ask for
pub const MIN_LIMIT: u32 = 10;

/// Largest page a caller may ask for
pub const MAX_LIMIT: u32 = 100;

/// Skip/limit window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of rows to skip
    #[serde(default)]
    pub skip: u32,

    /// Maximum number of rows to return
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl Pagination {
    /// Create a window, clamping the limit into the accepted range
    pub fn new(skip: u32, limit: u32) -> Self {
        Self {
            skip,
            limit: limit.clamp(MIN_LIMIT, MAX_LIMIT),
        }
    }

    /// Whether the limit lies inside `[min, max]`
    pub fn limit_within(&self, min: u32, max: u32) -> bool {
        (min..=max).contains(&self.limit)
    }

    /// Offset as i64 for SQL queries
    pub fn offset_i64(&self) -> i64 {
        self.skip as i64
    }

    /// Limit as i64 for SQL queries
    pub fn limit_i64(&self) -> i64 {
        self.limit as i64
    }

    /// Apply the window to an in-memory iterator
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip as usize)
            .take(self.limit as usize)
            .collect()
    }
}

fn default_limit() -> u32 {
    MIN_LIMIT
}
