//! CSV profile loading and hourly-to-half-hourly resampling.

use std::path::{Path, PathBuf};

use super::types::{
    BoundaryPolicy, GapPolicy, Profile, ProfileError, ProfileUnits, repair_gaps,
};

/// A profile sourced from one value column of a CSV file.
///
/// The reader takes a 0-based column index (source files carry a timestamp
/// in column 0 and the value in column 1 or 2), skips the header row, and
/// parses every remaining row. Blank or unparsable cells become gaps and
/// are handled per [`GapPolicy`] — never dropped.
#[derive(Debug, Clone)]
pub struct CsvProfile {
    path: PathBuf,
    column: usize,
    units: ProfileUnits,
    gap_policy: GapPolicy,
    /// Whether the source is hourly and must be upsampled to half-hourly.
    resample_hourly: bool,
    boundary: BoundaryPolicy,
}

impl CsvProfile {
    /// Creates a loader for the given file and value column.
    pub fn new(path: impl AsRef<Path>, column: usize, units: ProfileUnits) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            column,
            units,
            gap_policy: GapPolicy::default(),
            resample_hourly: false,
            boundary: BoundaryPolicy::default(),
        }
    }

    /// Sets the missing-sample policy.
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    /// Marks the source as hourly data to be upsampled to half-hourly,
    /// with the stated policy for the final half-interval.
    pub fn with_hourly_resampling(mut self, boundary: BoundaryPolicy) -> Self {
        self.resample_hourly = true;
        self.boundary = boundary;
        self
    }

    /// Loads, repairs, and (if configured) resamples the profile.
    pub fn load(&self) -> Result<Profile, ProfileError> {
        let path_str = self.path.display().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(source) => ProfileError::Io {
                    path: path_str.clone(),
                    source,
                },
                other => ProfileError::Io {
                    path: path_str.clone(),
                    source: std::io::Error::other(format!("{other:?}")),
                },
            })?;

        let mut raw: Vec<Option<f64>> = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let row = i + 1;
            let record = record.map_err(|e| ProfileError::Io {
                path: path_str.clone(),
                source: std::io::Error::other(e.to_string()),
            })?;
            let cell = record
                .get(self.column)
                .ok_or_else(|| ProfileError::MissingColumn {
                    path: path_str.clone(),
                    row,
                    column: self.column,
                })?;
            let trimmed = cell.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                raw.push(None);
            } else {
                match trimmed.parse::<f64>() {
                    Ok(v) if v.is_finite() => raw.push(Some(v)),
                    _ => raw.push(None),
                }
            }
        }

        if raw.is_empty() {
            return Err(ProfileError::Empty { path: path_str });
        }

        let samples = repair_gaps(&raw, self.gap_policy).map_err(|idx| {
            let value = format!("{:?}", raw.get(idx));
            ProfileError::BadCell {
                path: path_str.clone(),
                row: idx + 1,
                value,
            }
        })?;

        let samples = if self.resample_hourly {
            upsample_hourly_to_half_hourly(&samples, self.boundary)
        } else {
            samples
        };

        Ok(Profile {
            samples,
            units: self.units,
        })
    }
}

/// Upsamples an hourly series to half-hourly resolution.
///
/// Even output slots carry the hourly values; odd slots are the linear
/// midpoint of their neighbours. The last odd slot has no right neighbour
/// in the source, so it is filled per [`BoundaryPolicy`].
pub fn upsample_hourly_to_half_hourly(hourly: &[f64], boundary: BoundaryPolicy) -> Vec<f64> {
    let n = hourly.len();
    let mut out = Vec::with_capacity(n * 2);
    for (i, &v) in hourly.iter().enumerate() {
        out.push(v);
        if i + 1 < n {
            out.push(0.5 * (v + hourly[i + 1]));
        } else {
            out.push(match boundary {
                BoundaryPolicy::HoldLast => v,
                BoundaryPolicy::ZeroFill => 0.0,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("town_energy_sim_test_{name}_{}.csv", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_value_column_by_index() {
        let path = write_temp_csv(
            "basic",
            "timestamp,kw\n2020-01-01 00:00,1.5\n2020-01-01 00:30,2.5\n",
        );
        let profile = CsvProfile::new(&path, 1, ProfileUnits::PowerKw).load().unwrap();
        assert_eq!(profile.samples, vec![1.5, 2.5]);
        assert_eq!(profile.units, ProfileUnits::PowerKw);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn default_gap_policy_fails_with_row_number() {
        let path = write_temp_csv("gap_fail", "t,kw\na,1.0\nb,\nc,3.0\n");
        let err = CsvProfile::new(&path, 1, ProfileUnits::PowerKw)
            .load()
            .unwrap_err();
        match err {
            ProfileError::BadCell { row, .. } => assert_eq!(row, 2),
            other => panic!("expected BadCell, got {other}"),
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn interpolate_policy_bridges_gap() {
        let path = write_temp_csv("gap_interp", "t,kw\na,1.0\nb,\nc,3.0\n");
        let profile = CsvProfile::new(&path, 1, ProfileUnits::PowerKw)
            .with_gap_policy(GapPolicy::Interpolate)
            .load()
            .unwrap();
        assert_eq!(profile.samples, vec![1.0, 2.0, 3.0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn nan_cell_is_a_gap_not_a_sample() {
        let path = write_temp_csv("gap_nan", "t,kw\na,1.0\nb,NaN\nc,3.0\n");
        let profile = CsvProfile::new(&path, 1, ProfileUnits::PowerKw)
            .with_gap_policy(GapPolicy::ZeroFill)
            .load()
            .unwrap();
        assert_eq!(profile.samples, vec![1.0, 0.0, 3.0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_io_error_with_path() {
        let err = CsvProfile::new("/nonexistent/profile.csv", 1, ProfileUnits::PowerKw)
            .load()
            .unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("/nonexistent/profile.csv"));
    }

    #[test]
    fn missing_column_names_row_and_column() {
        let path = write_temp_csv("no_col", "t,kw\na,1.0\nb\n");
        let err = CsvProfile::new(&path, 1, ProfileUnits::PowerKw)
            .load()
            .unwrap_err();
        match err {
            ProfileError::MissingColumn { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, 1);
            }
            other => panic!("expected MissingColumn, got {other}"),
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn upsample_doubles_length_and_interpolates_midpoints() {
        let out = upsample_hourly_to_half_hourly(&[1.0, 3.0, 5.0], BoundaryPolicy::HoldLast);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0, 5.0, 5.0]);
    }

    #[test]
    fn upsample_zero_fill_boundary() {
        let out = upsample_hourly_to_half_hourly(&[1.0, 3.0], BoundaryPolicy::ZeroFill);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn hourly_resampling_via_loader() {
        let path = write_temp_csv("hourly", "t,kw\na,2.0\nb,4.0\n");
        let profile = CsvProfile::new(&path, 1, ProfileUnits::PowerKw)
            .with_hourly_resampling(BoundaryPolicy::HoldLast)
            .load()
            .unwrap();
        assert_eq!(profile.samples, vec![2.0, 3.0, 4.0, 4.0]);
        std::fs::remove_file(path).ok();
    }
}
