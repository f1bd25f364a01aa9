//! Quintile daily-mean reduction for reporting.
//!
//! A year-long series is split into five consecutive equal blocks and each
//! block is reduced to one mean daily profile, giving a seasonal picture
//! compact enough to tabulate or plot.

use crate::sim::types::BalanceError;

/// Number of consecutive blocks the year is split into.
pub const QUINTILES: usize = 5;

/// Reduces a series to five mean daily profiles of `steps_per_day` values.
///
/// Each block is `series.len() / 5` intervals; within a block, only full
/// days are stacked and averaged — a partial trailing day is dropped
/// explicitly rather than skewing the mean.
///
/// Fails when `steps_per_day` is zero or the series cannot supply at least
/// one full day per block.
pub fn quintile_daily_means(
    series: &[f64],
    steps_per_day: usize,
) -> Result<[Vec<f64>; QUINTILES], BalanceError> {
    let minimum = QUINTILES * steps_per_day;
    if steps_per_day == 0 || series.len() < minimum {
        return Err(BalanceError::SeriesTooShort {
            name: "quintile input".to_string(),
            minimum: minimum.max(QUINTILES),
            actual: series.len(),
        });
    }

    let block_len = series.len() / QUINTILES;
    let mut means: [Vec<f64>; QUINTILES] = Default::default();

    for (q, mean) in means.iter_mut().enumerate() {
        let block = &series[q * block_len..(q + 1) * block_len];
        let days = block.len() / steps_per_day;
        let mut acc = vec![0.0; steps_per_day];
        for day in 0..days {
            let day_slice = &block[day * steps_per_day..(day + 1) * steps_per_day];
            for (a, &v) in acc.iter_mut().zip(day_slice) {
                *a += v;
            }
        }
        for a in &mut acc {
            *a /= days as f64;
        }
        *mean = acc;
    }

    Ok(means)
}
