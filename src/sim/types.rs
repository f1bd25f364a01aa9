//! Core simulation types: the time grid and the fatal error taxonomy.

use std::fmt;

/// Centralized simulation time grid.
///
/// Every asset and the balance engine reference this struct for timing,
/// eliminating duplicated `dt_hours` computations and horizon arithmetic.
///
/// # Examples
///
/// ```
/// use town_energy_sim::sim::types::SimGrid;
///
/// let grid = SimGrid::half_hourly_year();
/// assert_eq!(grid.dt_hours, 0.5);
/// assert_eq!(grid.intervals(), 17_520);
/// ```
#[derive(Debug, Clone)]
pub struct SimGrid {
    /// Number of simulation intervals per day.
    pub steps_per_day: usize,
    /// Number of days simulated.
    pub days: usize,
    /// Duration of one interval in hours, derived as `24.0 / steps_per_day`.
    pub dt_hours: f64,
}

impl SimGrid {
    /// Creates a new time grid.
    ///
    /// # Panics
    ///
    /// Panics if `steps_per_day` or `days` is zero. Configuration
    /// validation rejects these before construction; the assert is the
    /// backstop for programmatic use.
    pub fn new(steps_per_day: usize, days: usize) -> Self {
        assert!(steps_per_day > 0, "steps_per_day must be > 0");
        assert!(days > 0, "days must be > 0");
        Self {
            steps_per_day,
            days,
            dt_hours: 24.0 / steps_per_day as f64,
        }
    }

    /// The nominal grid: 48 half-hour intervals per day over 365 days.
    pub fn half_hourly_year() -> Self {
        Self::new(48, 365)
    }

    /// Total number of intervals in the simulation horizon.
    pub fn intervals(&self) -> usize {
        self.steps_per_day * self.days
    }
}

/// Fatal errors raised while computing the energy balance.
///
/// Any of these aborts the entire run; a partially-computed net load would
/// silently corrupt downstream cost and emissions figures.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceError {
    /// An asset or price/intensity series does not match the horizon.
    SeriesLength {
        /// Name of the offending asset or series.
        name: String,
        /// Expected length (the horizon `T`).
        expected: usize,
        /// Actual length supplied.
        actual: usize,
    },
    /// An asset produced a NaN or infinite sample.
    NonFiniteSample {
        /// Name of the offending asset or series.
        name: String,
        /// Interval index of the first bad sample.
        index: usize,
    },
    /// A series is too short for the requested reduction.
    SeriesTooShort {
        /// Name of the offending series.
        name: String,
        /// Minimum length required.
        minimum: usize,
        /// Actual length supplied.
        actual: usize,
    },
}

impl fmt::Display for BalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeriesLength {
                name,
                expected,
                actual,
            } => write!(
                f,
                "series length mismatch for \"{name}\": expected {expected} intervals, got {actual}"
            ),
            Self::NonFiniteSample { name, index } => {
                write!(f, "non-finite sample in \"{name}\" at interval {index}")
            }
            Self::SeriesTooShort {
                name,
                minimum,
                actual,
            } => write!(
                f,
                "series \"{name}\" too short: need at least {minimum} intervals, got {actual}"
            ),
        }
    }
}

impl std::error::Error for BalanceError {}

/// Validates that a series matches the horizon and contains only finite
/// samples. Used by every consumer that is handed an external series.
pub fn check_series(name: &str, series: &[f64], expected: usize) -> Result<(), BalanceError> {
    if series.len() != expected {
        return Err(BalanceError::SeriesLength {
            name: name.to_string(),
            expected,
            actual: series.len(),
        });
    }
    if let Some(index) = series.iter().position(|v| !v.is_finite()) {
        return Err(BalanceError::NonFiniteSample {
            name: name.to_string(),
            index,
        });
    }
    Ok(())
}
