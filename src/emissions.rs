//! Carbon emissions evaluation over the final net load.

use crate::sim::types::{BalanceError, check_series};

/// Grams per tonne.
const GRAMS_PER_TONNE: f64 = 1.0e6;

/// Evaluates per-interval carbon emissions from net load and a grid
/// carbon-intensity series.
///
/// The published intensity describes generation; energy lost in
/// transmission still had to be generated, so consumption intensity is
/// grossed up by `1 / (1 - loss_fraction)`.
///
/// Non-finite intensity samples (gaps in the published data) contribute
/// zero emissions; they are counted so a run can report how much of the
/// year was affected instead of hiding it.
#[derive(Debug, Clone)]
pub struct EmissionsEvaluator {
    intensity_t_per_kwh: Vec<f64>,
    skipped_intervals: usize,
}

impl EmissionsEvaluator {
    /// Creates an evaluator from a generation intensity series in
    /// gCO2/kWh and a transmission loss fraction in [0, 1).
    ///
    /// # Panics
    ///
    /// Panics if `loss_fraction` is outside [0, 1).
    pub fn new(intensity_g_per_kwh: Vec<f64>, loss_fraction: f64) -> Self {
        assert!(
            (0.0..1.0).contains(&loss_fraction),
            "loss_fraction must be in [0, 1)"
        );
        let gross_up = 1.0 / (1.0 - loss_fraction);
        let mut skipped = 0;
        let intensity_t_per_kwh = intensity_g_per_kwh
            .iter()
            .map(|&g| {
                if g.is_finite() {
                    g * gross_up / GRAMS_PER_TONNE
                } else {
                    skipped += 1;
                    0.0
                }
            })
            .collect();
        Self {
            intensity_t_per_kwh,
            skipped_intervals: skipped,
        }
    }

    /// Number of intensity samples that were non-finite and zeroed.
    pub fn skipped_intervals(&self) -> usize {
        self.skipped_intervals
    }

    /// Per-interval emissions in tonnes CO2. Imports emit, exports offset.
    pub fn profile(&self, net_load: &[f64]) -> Result<Vec<f64>, BalanceError> {
        check_series("carbon intensity", &self.intensity_t_per_kwh, net_load.len())?;
        Ok(net_load
            .iter()
            .zip(&self.intensity_t_per_kwh)
            .map(|(&e, &i)| e * i)
            .collect())
    }

    /// Total annual emissions in tonnes CO2.
    pub fn annual_total(&self, net_load: &[f64]) -> Result<f64, BalanceError> {
        Ok(self.profile(net_load)?.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossless_grid_uses_published_intensity() {
        let ev = EmissionsEvaluator::new(vec![200.0, 200.0], 0.0);
        let profile = ev.profile(&[1000.0, -500.0]).unwrap();
        // 200 g/kWh = 2e-4 t/kWh
        assert!((profile[0] - 0.2).abs() < 1e-12);
        assert!((profile[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn loss_fraction_grosses_up_intensity() {
        let ev = EmissionsEvaluator::new(vec![184.0], 0.08);
        let total = ev.annual_total(&[1000.0]).unwrap();
        let expected = 1000.0 * 184.0 / 0.92 / 1.0e6;
        assert!((total - expected).abs() < 1e-12);
    }

    #[test]
    fn non_finite_intensity_is_zeroed_and_counted() {
        let ev = EmissionsEvaluator::new(vec![200.0, f64::NAN, 100.0], 0.0);
        assert_eq!(ev.skipped_intervals(), 1);
        let profile = ev.profile(&[1000.0, 1000.0, 1000.0]).unwrap();
        assert_eq!(profile[1], 0.0);
        assert!(profile[0] > 0.0 && profile[2] > 0.0);
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let ev = EmissionsEvaluator::new(vec![200.0; 3], 0.0);
        assert!(matches!(
            ev.profile(&[1.0; 4]).unwrap_err(),
            BalanceError::SeriesLength { .. }
        ));
    }

    #[test]
    fn exports_offset_annual_total() {
        let ev = EmissionsEvaluator::new(vec![100.0; 2], 0.0);
        let total = ev.annual_total(&[500.0, -500.0]).unwrap();
        assert!(total.abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn full_loss_panics() {
        EmissionsEvaluator::new(vec![100.0], 1.0);
    }
}
