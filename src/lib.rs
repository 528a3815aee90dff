// Expense Tracker - Core Library
// Validation, storage and summaries for the expense service; the HTTP layer
// lives behind the `server` feature.

pub mod categories;
pub mod config;
pub mod dates;
pub mod error;
pub mod scheduler;
pub mod store;
pub mod summary;
pub mod validation;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use categories::Category;
pub use crate::config::{AppConfig, ConfigError};
pub use dates::{month_key, parse_date};
pub use error::{DateParseError, ValidationError};
pub use scheduler::{
    CollectingSink, LogSink, ReportKind, Schedule, Scheduler, SummaryReport, SummarySink,
};
pub use store::{Expense, ExpenseStore, SharedStore};
pub use summary::{analyze, summarize, Analysis, CategoryTotal, Summary, SummaryFilter};
pub use validation::{parse_amount, validate, ExpenseCandidate, NewExpense};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
