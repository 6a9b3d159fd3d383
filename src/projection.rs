use tracing::debug;

use crate::error::ProjectionError;
use crate::models::{AggregateTotals, ProjectionInput, ProjectionResult};

/// Average days to enter time that the projection aims to get under.
pub const THRESHOLD: f64 = 4.99;

impl ProjectionInput {
    pub fn new(
        current_weighted_delay_sum: f64,
        current_hours_worked_sum: f64,
        hours_per_session: f64,
        entry_delay_per_session: f64,
    ) -> Self {
        Self {
            current_weighted_delay_sum,
            current_hours_worked_sum,
            hours_per_session,
            entry_delay_per_session,
            threshold: THRESHOLD,
        }
    }

    pub fn from_totals(
        totals: AggregateTotals,
        hours_per_session: f64,
        entry_delay_per_session: f64,
    ) -> Self {
        Self::new(
            totals.weighted_delay_sum,
            totals.hours_worked_sum,
            hours_per_session,
            entry_delay_per_session,
        )
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        let fields = [
            ("current weighted delay sum", self.current_weighted_delay_sum),
            ("current hours worked sum", self.current_hours_worked_sum),
            ("hours per session", self.hours_per_session),
            ("entry delay per session", self.entry_delay_per_session),
            ("threshold", self.threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ProjectionError::invalid(format!("{name} must be a finite number")));
            }
        }

        if self.current_weighted_delay_sum < 0.0 {
            return Err(ProjectionError::invalid("current weighted delay sum must not be negative"));
        }
        if self.current_hours_worked_sum < 0.0 {
            return Err(ProjectionError::invalid("current hours worked sum must not be negative"));
        }
        if self.hours_per_session <= 0.0 {
            return Err(ProjectionError::invalid("hours per session must be greater than zero"));
        }
        if self.entry_delay_per_session < 0.0 {
            return Err(ProjectionError::invalid("entry delay per session must not be negative"));
        }
        if self.threshold <= 0.0 {
            return Err(ProjectionError::invalid("threshold must be greater than zero"));
        }
        Ok(())
    }

    pub fn current_average(&self) -> f64 {
        average(self.current_weighted_delay_sum, self.current_hours_worked_sum)
    }

    /// Average after `sessions` more sessions at the assumed hours and delay.
    pub fn projected_average_after(&self, sessions: u64) -> f64 {
        let sessions = sessions as f64;
        let hours = self.current_hours_worked_sum + self.hours_per_session * sessions;
        let weighted = self.current_weighted_delay_sum
            + self.hours_per_session * self.entry_delay_per_session * sessions;
        average(weighted, hours)
    }
}

/// Solves for the number of additional sessions that brings the weighted
/// average to the threshold.
///
/// The closed form
/// `(threshold * hours - weighted) / (hours_per_session * delay - threshold * hours_per_session)`
/// is rounded half-up to the nearest whole session, so 2.5 becomes 3 and 2.49
/// becomes 2. A round-down can leave the projected average just above the
/// threshold; one more session always clears it. Negative solutions clamp to
/// zero. A current average already at or below the threshold always needs zero
/// sessions.
pub fn compute(input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
    input.validate()?;

    let current_average = input.current_average();
    let threshold = input.threshold;

    let required_sessions = if current_average <= threshold {
        0
    } else {
        let numerator = threshold * input.current_hours_worked_sum - input.current_weighted_delay_sum;
        let denominator = input.hours_per_session * input.entry_delay_per_session
            - threshold * input.hours_per_session;

        if denominator == 0.0 {
            return Err(ProjectionError::UnsolvableProjection {
                current_average,
                threshold,
            });
        }

        let n_real = numerator / denominator;
        debug!(numerator, denominator, n_real, "solved closed form");
        round_sessions(n_real)
    };

    let unreachable =
        current_average > threshold && input.entry_delay_per_session > threshold;
    let projected_average = input.projected_average_after(required_sessions);
    debug!(
        current_average,
        required_sessions, projected_average, "computed projection"
    );

    Ok(ProjectionResult {
        current_average,
        required_sessions,
        projected_average,
        unreachable,
    })
}

/// Round-half-up to a whole session count, clamped at zero.
pub fn round_sessions(n_real: f64) -> u64 {
    if n_real.is_nan() || n_real <= 0.0 {
        return 0;
    }
    // Half away from zero, which is half-up for positive values. `as`
    // saturates beyond u64::MAX.
    n_real.round() as u64
}

fn average(weighted: f64, hours: f64) -> f64 {
    if hours == 0.0 {
        0.0
    } else {
        weighted / hours
    }
}
