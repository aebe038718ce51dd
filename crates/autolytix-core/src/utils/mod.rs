//! Formatting and input validation helpers.

pub mod format;
pub mod validation;

// Re-export commonly used functions at module level
pub use format::{format_date, format_kilometers, format_price, time_ago, truncate_string};
pub use validation::ValidationError;
