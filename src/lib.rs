//! Projection of when the "average days to enter time" metric drops below
//! its threshold, plus the spreadsheet and knowledge-base plumbing around it.

pub mod aggregates;
pub mod calendar;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod models;
pub mod projection;
pub mod report;

pub use calendar::{next_reset_date, project_date};
pub use error::ProjectionError;
pub use models::{
    AggregateSource, AggregateTotals, CalendarPolicy, ProjectionInput, ProjectionResult,
    ResetPolicy,
};
pub use projection::{compute, THRESHOLD};
