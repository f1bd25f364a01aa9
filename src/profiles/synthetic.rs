//! Seeded synthetic profile generators.
//!
//! Stand-ins for measured data so presets and tests run with no data files.
//! Per-unit power traces: the owning asset applies its scale and `dt`.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::sim::types::SimGrid;

use super::types::Profile;

/// A synthetic per-unit power profile over the full horizon.
#[derive(Debug, Clone)]
pub enum SyntheticProfile {
    /// Sinusoidal daily demand pattern with Gaussian noise, clamped
    /// non-negative. Typical for household or business load.
    Sinusoid {
        /// Baseline power (kW per unit).
        base_kw: f64,
        /// Amplitude of the daily variation (kW per unit).
        amp_kw: f64,
        /// Phase offset (radians).
        phase_rad: f64,
        /// Noise standard deviation (kW per unit).
        noise_std: f64,
        /// RNG seed.
        seed: u64,
    },
    /// Half-cosine daylight window, zero outside it, with multiplicative
    /// noise. Typical for PV capacity factors (kW per kWp at peak 1.0).
    Solar {
        /// Peak output (kW per unit) at solar noon.
        kw_peak: f64,
        /// First interval of daylight within the day (inclusive).
        sunrise_idx: usize,
        /// First interval of darkness within the day (exclusive).
        sunset_idx: usize,
        /// Noise standard deviation as a fraction of output.
        noise_std: f64,
        /// RNG seed.
        seed: u64,
    },
    /// Flat output, e.g. a run-of-river hydro scheme near rated flow.
    Constant {
        /// Power (kW per unit).
        kw: f64,
    },
}

impl SyntheticProfile {
    /// Generates the full-horizon per-unit power trace.
    pub fn generate(&self, grid: &SimGrid) -> Profile {
        let total = grid.intervals();
        let spd = grid.steps_per_day;
        let samples = match *self {
            Self::Sinusoid {
                base_kw,
                amp_kw,
                phase_rad,
                noise_std,
                seed,
            } => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..total)
                    .map(|t| {
                        let day_pos = (t % spd) as f64 / spd as f64;
                        let angle = 2.0 * std::f64::consts::PI * day_pos + phase_rad;
                        let kw = base_kw + amp_kw * angle.sin() + gaussian_noise(&mut rng, noise_std);
                        kw.max(0.0)
                    })
                    .collect()
            }
            Self::Solar {
                kw_peak,
                sunrise_idx,
                sunset_idx,
                noise_std,
                seed,
            } => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..total)
                    .map(|t| {
                        let frac = daylight_frac(t % spd, sunrise_idx, sunset_idx);
                        if frac <= 0.0 {
                            return 0.0;
                        }
                        let mult = 1.0 + gaussian_noise(&mut rng, noise_std);
                        (kw_peak * frac * mult).max(0.0)
                    })
                    .collect()
            }
            Self::Constant { kw } => vec![kw.max(0.0); total],
        };
        Profile::power_kw(samples)
    }
}

/// Half-cosine daylight fraction for one interval within the day.
///
/// Zero outside `[sunrise_idx, sunset_idx)`, rising to 1.0 at the window
/// midpoint.
pub fn daylight_frac(day_idx: usize, sunrise_idx: usize, sunset_idx: usize) -> f64 {
    if sunrise_idx >= sunset_idx || day_idx < sunrise_idx || day_idx >= sunset_idx {
        return 0.0;
    }
    let span = (sunset_idx - sunrise_idx) as f64;
    let x = (day_idx - sunrise_idx) as f64 / span;
    (std::f64::consts::PI * x).sin().max(0.0)
}

/// Gaussian noise via the Box-Muller transform, mean 0.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
