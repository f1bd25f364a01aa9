//! Profile value types and the policies governing imperfect source data.

use std::fmt;

use serde::Deserialize;

/// Unit interpretation of a profile's samples.
///
/// Most source data is a power trace (kW, or kW/kWp for solar capacity
/// factors) and must be multiplied by the interval length to become energy.
/// Some sources are already metered energy per interval and must not be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileUnits {
    /// Samples are power in kW; energy per interval is `value * dt`.
    PowerKw,
    /// Samples are already kWh per interval; `dt` is not applied.
    EnergyKwhPerInterval,
}

/// Policy for missing or unparsable samples inside a source series.
///
/// Dropping a sample would shift every later interval in time, so the only
/// permitted treatments are explicit: fail, interpolate, or zero-fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Abort with the provider identity and row number.
    #[default]
    Fail,
    /// Linear interpolation between the nearest valid neighbours; leading
    /// or trailing gaps take the nearest valid value.
    Interpolate,
    /// Replace with zero.
    ZeroFill,
}

/// Policy for the final half-interval an hourly source cannot define when
/// resampled to half-hourly resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Repeat the last source value.
    #[default]
    HoldLast,
    /// Fill with zero.
    ZeroFill,
}

/// A fixed-length ordered sequence of samples with a unit interpretation.
///
/// The raw material an [`crate::assets::Asset`] turns into an energy series
/// by applying its scale (and `dt` for power profiles).
#[derive(Debug, Clone)]
pub struct Profile {
    /// Ordered samples, one per interval.
    pub samples: Vec<f64>,
    /// How the samples convert to energy.
    pub units: ProfileUnits,
}

impl Profile {
    /// Wraps a power trace (kW).
    pub fn power_kw(samples: Vec<f64>) -> Self {
        Self {
            samples,
            units: ProfileUnits::PowerKw,
        }
    }

    /// Wraps a series already in kWh per interval.
    pub fn energy_kwh(samples: Vec<f64>) -> Self {
        Self {
            samples,
            units: ProfileUnits::EnergyKwhPerInterval,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the profile holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Errors raised while loading or repairing a profile, carrying the
/// provider identity so a failing data file can be named in the abort.
#[derive(Debug)]
pub enum ProfileError {
    /// The source file could not be read.
    Io {
        /// Path of the source file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A cell could not be parsed as a number under `GapPolicy::Fail`.
    BadCell {
        /// Path of the source file.
        path: String,
        /// 1-based data row of the offending cell.
        row: usize,
        /// Cell contents as read.
        value: String,
    },
    /// A row is missing the requested column.
    MissingColumn {
        /// Path of the source file.
        path: String,
        /// 1-based data row of the offending record.
        row: usize,
        /// Requested 0-based column index.
        column: usize,
    },
    /// The source contains no usable samples.
    Empty {
        /// Path of the source file.
        path: String,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read profile \"{path}\": {source}"),
            Self::BadCell { path, row, value } => write!(
                f,
                "profile \"{path}\" row {row}: cannot parse \"{value}\" as a number"
            ),
            Self::MissingColumn { path, row, column } => {
                write!(f, "profile \"{path}\" row {row}: no column {column}")
            }
            Self::Empty { path } => write!(f, "profile \"{path}\" contains no samples"),
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Repairs gaps (`None` samples) in a parsed series according to policy.
///
/// Returns the index of the first gap when the policy is [`GapPolicy::Fail`]
/// and a gap exists; the caller maps that to a [`ProfileError::BadCell`]
/// with its own provider identity.
pub fn repair_gaps(samples: &[Option<f64>], policy: GapPolicy) -> Result<Vec<f64>, usize> {
    match policy {
        GapPolicy::Fail => {
            if let Some(idx) = samples.iter().position(Option::is_none) {
                return Err(idx);
            }
            Ok(samples.iter().map(|s| s.unwrap_or(0.0)).collect())
        }
        GapPolicy::ZeroFill => Ok(samples.iter().map(|s| s.unwrap_or(0.0)).collect()),
        GapPolicy::Interpolate => Ok(interpolate_gaps(samples)),
    }
}

/// Linear interpolation across `None` runs. Leading and trailing runs take
/// the nearest valid value; an all-`None` series becomes all zero.
fn interpolate_gaps(samples: &[Option<f64>]) -> Vec<f64> {
    let n = samples.len();
    let mut out = vec![0.0; n];
    let valid: Vec<usize> = (0..n).filter(|&i| samples[i].is_some()).collect();
    if valid.is_empty() {
        return out;
    }

    for (i, slot) in out.iter_mut().enumerate() {
        if let Some(v) = samples[i] {
            *slot = v;
            continue;
        }
        let next = valid.partition_point(|&j| j < i);
        let after = valid.get(next).copied();
        let before = if next > 0 {
            Some(valid[next - 1])
        } else {
            None
        };
        *slot = match (before, after) {
            (Some(b), Some(a)) => {
                let vb = samples[b].unwrap_or(0.0);
                let va = samples[a].unwrap_or(0.0);
                let frac = (i - b) as f64 / (a - b) as f64;
                vb + (va - vb) * frac
            }
            (Some(b), None) => samples[b].unwrap_or(0.0),
            (None, Some(a)) => samples[a].unwrap_or(0.0),
            (None, None) => 0.0,
        };
    }
    out
}
