use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ProjectionError;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    pub current_weighted_delay_sum: f64,
    pub current_hours_worked_sum: f64,
    pub hours_per_session: f64,
    pub entry_delay_per_session: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    pub current_average: f64,
    pub required_sessions: u64,
    pub projected_average: f64,
    /// Above the threshold with a per-session delay above it too: no number
    /// of sessions brings the average down, so `required_sessions` is 0.
    pub unreachable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarPolicy {
    #[default]
    AllDays,
    #[serde(rename = "business-days", alias = "business-days-only")]
    BusinessDaysOnly,
}

impl CalendarPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllDays => "all-days",
            Self::BusinessDaysOnly => "business-days",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AllDays => "Weekdays + weekends",
            Self::BusinessDaysOnly => "Weekdays only",
        }
    }
}

impl fmt::Display for CalendarPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarPolicy {
    type Err = ProjectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all-days" | "all" | "weekdays + weekends" => Ok(Self::AllDays),
            "business-days" | "business" | "weekdays only" => Ok(Self::BusinessDaysOnly),
            other => Err(ProjectionError::invalid(format!(
                "unknown calendar policy `{other}` (expected all-days or business-days)"
            ))),
        }
    }
}

/// Title category that decides the annual reset date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPolicy {
    AssociateStaff,
    Other,
}

impl ResetPolicy {
    /// (month, day) of the annual reset.
    pub const fn month_day(self) -> (u32, u32) {
        match self {
            Self::AssociateStaff => (11, 1),
            Self::Other => (10, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateTotals {
    pub weighted_delay_sum: f64,
    pub hours_worked_sum: f64,
}

impl AggregateTotals {
    /// Weighted delay per hour worked; zero when no hours are recorded.
    pub fn average(&self) -> f64 {
        if self.hours_worked_sum == 0.0 {
            0.0
        } else {
            self.weighted_delay_sum / self.hours_worked_sum
        }
    }
}

/// Where the historical aggregates came from. Manual estimates are an explicit
/// caller choice, never a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateSource {
    FromSpreadsheet(AggregateTotals),
    Manual { current_average: f64 },
}

/// Hours assumed behind a manual average estimate.
pub const MANUAL_HOURS_BASIS: f64 = 100.0;

impl AggregateSource {
    pub fn totals(&self) -> AggregateTotals {
        match *self {
            Self::FromSpreadsheet(totals) => totals,
            Self::Manual { current_average } => AggregateTotals {
                weighted_delay_sum: current_average * MANUAL_HOURS_BASIS,
                hours_worked_sum: MANUAL_HOURS_BASIS,
            },
        }
    }

    pub const fn describe(&self) -> &'static str {
        match self {
            Self::FromSpreadsheet(_) => "spreadsheet",
            Self::Manual { .. } => "manual estimate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_cli_and_ui_labels() {
        assert_eq!("business-days".parse::<CalendarPolicy>(), Ok(CalendarPolicy::BusinessDaysOnly));
        assert_eq!("Weekdays only".parse::<CalendarPolicy>(), Ok(CalendarPolicy::BusinessDaysOnly));
        assert_eq!("ALL-DAYS".parse::<CalendarPolicy>(), Ok(CalendarPolicy::AllDays));
        assert!(matches!(
            "fortnightly".parse::<CalendarPolicy>(),
            Err(ProjectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn manual_source_scales_average_to_hundred_hours() {
        let totals = AggregateSource::Manual { current_average: 16.0 }.totals();
        assert_eq!(totals.weighted_delay_sum, 1600.0);
        assert_eq!(totals.hours_worked_sum, 100.0);
        assert_eq!(totals.average(), 16.0);
    }

    #[test]
    fn spreadsheet_source_passes_totals_through() {
        let totals = AggregateTotals {
            weighted_delay_sum: 42.5,
            hours_worked_sum: 8.0,
        };
        assert_eq!(AggregateSource::FromSpreadsheet(totals).totals(), totals);
    }
}
