use std::fmt::Write;

use chrono::NaiveDate;

use crate::calendar::format_display_date;
use crate::models::{CalendarPolicy, ProjectionResult};

pub struct ProjectionReport<'a> {
    pub disclaimer: &'a str,
    pub result: &'a ProjectionResult,
    pub threshold: f64,
    pub policy: CalendarPolicy,
    pub target_date: NaiveDate,
    pub reset_date: NaiveDate,
}

pub fn build_projection_report(report: &ProjectionReport<'_>) -> String {
    let mut output = String::new();
    let target = format_display_date(&report.target_date);
    let reset = format_display_date(&report.reset_date);

    if !report.disclaimer.trim().is_empty() {
        let _ = writeln!(output, "{}", report.disclaimer.trim());
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "Projection Results:");
    let _ = writeln!(
        output,
        "- **Current Average:** {:.2} days",
        report.result.current_average
    );
    let _ = writeln!(
        output,
        "- **Projected Average:** {:.2} days",
        report.result.projected_average
    );
    let _ = writeln!(
        output,
        "- **Required Additional Sessions:** {} ({})",
        report.result.required_sessions,
        report.policy.label()
    );
    let _ = writeln!(
        output,
        "- **Projected Date to Reach Average Below {:.2}:** {}",
        report.threshold, target
    );

    if report.result.unreachable {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "**Note:** At this entry delay the average never drops below {:.2}. \
             Entering time sooner is the only way to bring it down.",
            report.threshold
        );
    } else if report.result.projected_average > report.threshold {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "**Note:** Sessions are rounded to the nearest whole number, so the average on \
             {target} is {:.2}. One more session brings it below {:.2}.",
            report.result.projected_average, report.threshold
        );
    }

    if report.target_date > report.reset_date {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "**Note:** With your current working schedule, the projected date ({target}) \
             falls after your title's reset date ({reset}). This means the projection may \
             not be achievable as calculated. Consider increasing your entry frequency or hours."
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn result() -> ProjectionResult {
        ProjectionResult {
            current_average: 16.0,
            required_sessions: 37,
            projected_average: 1877.5 / 377.5,
            unreachable: false,
        }
    }

    #[test]
    fn report_lists_results_with_display_dates() {
        let result = result();
        let report = build_projection_report(&ProjectionReport {
            disclaimer: "Estimates only.",
            result: &result,
            threshold: 4.99,
            policy: CalendarPolicy::AllDays,
            target_date: date(2024, 7, 8),
            reset_date: date(2024, 10, 1),
        });

        assert!(report.starts_with("Estimates only.\n\nProjection Results:"));
        assert!(report.contains("- **Current Average:** 16.00 days"));
        assert!(report.contains("- **Projected Average:** 4.97 days"));
        assert!(report.contains("- **Required Additional Sessions:** 37 (Weekdays + weekends)"));
        assert!(report.contains("Below 4.99:** 07/08/2024"));
        assert!(!report.contains("**Note:**"));
    }

    #[test]
    fn warns_when_target_falls_after_reset() {
        let result = result();
        let report = build_projection_report(&ProjectionReport {
            disclaimer: "",
            result: &result,
            threshold: 4.99,
            policy: CalendarPolicy::BusinessDaysOnly,
            target_date: date(2024, 12, 2),
            reset_date: date(2024, 11, 1),
        });

        assert!(report.starts_with("Projection Results:"));
        assert!(report.contains("projected date (12/02/2024) falls after your title's reset date (11/01/2024)"));
    }

    #[test]
    fn warns_when_threshold_is_never_reached() {
        let result = ProjectionResult {
            current_average: 16.0,
            required_sessions: 0,
            projected_average: 16.0,
            unreachable: true,
        };
        let report = build_projection_report(&ProjectionReport {
            disclaimer: "",
            result: &result,
            threshold: 4.99,
            policy: CalendarPolicy::AllDays,
            target_date: date(2024, 7, 8),
            reset_date: date(2024, 10, 1),
        });

        assert!(report.contains("never drops below 4.99"));
    }

    #[test]
    fn round_down_explains_remaining_gap() {
        let result = ProjectionResult {
            current_average: 16.0,
            required_sessions: 29,
            projected_average: 1600.0 / 317.5,
            unreachable: false,
        };
        let report = build_projection_report(&ProjectionReport {
            disclaimer: "",
            result: &result,
            threshold: 4.99,
            policy: CalendarPolicy::AllDays,
            target_date: date(2024, 7, 30),
            reset_date: date(2024, 10, 1),
        });

        assert!(!report.contains("never drops below"));
        assert!(report.contains("the average on 07/30/2024 is 5.04. One more session brings it below 4.99."));
    }
}
