use chrono::{Datelike, Days, NaiveDate, Weekday};
use tracing::debug;

use crate::error::ProjectionError;
use crate::models::{CalendarPolicy, ResetPolicy};

impl ResetPolicy {
    /// Titles mentioning "associate" or "staff" (any case) reset in November.
    pub fn classify(title: &str) -> Self {
        let title = title.to_lowercase();
        if title.contains("associate") || title.contains("staff") {
            Self::AssociateStaff
        } else {
            Self::Other
        }
    }
}

/// Date reached after `required_sessions` sessions, one per counted day.
pub fn project_date(
    start_date: NaiveDate,
    required_sessions: u64,
    policy: CalendarPolicy,
) -> Result<NaiveDate, ProjectionError> {
    let target = match policy {
        CalendarPolicy::AllDays => start_date.checked_add_days(Days::new(required_sessions)),
        CalendarPolicy::BusinessDaysOnly => add_business_days(start_date, required_sessions),
    };

    target.ok_or_else(|| {
        ProjectionError::DateOutOfRange(format!(
            "{required_sessions} sessions from {start_date} ({policy})"
        ))
    })
}

/// Walks forward a day at a time, counting only Monday through Friday.
fn add_business_days(start_date: NaiveDate, sessions: u64) -> Option<NaiveDate> {
    let mut date = start_date;
    let mut counted = 0u64;
    while counted < sessions {
        date = date.succ_opt()?;
        if is_business_day(date) {
            counted += 1;
        }
    }
    Some(date)
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Next reset date on or after `reference_date` for the given title.
pub fn next_reset_date(title: &str, reference_date: NaiveDate) -> Result<NaiveDate, ProjectionError> {
    let policy = ResetPolicy::classify(title);
    let (month, day) = policy.month_day();
    let year = reference_date.year();

    let candidate = reset_in_year(year, month, day)?;
    let reset = if reference_date <= candidate {
        candidate
    } else {
        reset_in_year(year + 1, month, day)?
    };

    debug!(?policy, %reference_date, %reset, "resolved reset date");
    Ok(reset)
}

fn reset_in_year(year: i32, month: u32, day: u32) -> Result<NaiveDate, ProjectionError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ProjectionError::DateOutOfRange(format!("{year}-{month:02}-{day:02}")))
}

/// MM/DD/YYYY, as shown to users.
pub fn format_display_date(date: &NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}
