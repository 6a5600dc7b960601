//! Predictor construction and normalization
//!
//! The surface is fitted over two predictors:
//!
//! ```text
//! x₁ = v              wind speed
//! x₂ = ρ · v^k        energy-flux interaction, k = 3 by default
//! ```
//!
//! They live on very different scales (x₂ reaches ~20 000 at 25 m/s), so
//! distances for the neighbourhood search are taken after dividing each by a
//! 10% trimmed standard deviation. Trimming keeps the rated-power plateau,
//! where x₂ explodes, from dominating the scale.

use serde::{Deserialize, Serialize};
use windguard_core::{AnalysisError, AnalysisResult};

use crate::config::{SurfaceConfig, NORMALIZE_TRIM};

/// Standard deviation after dropping `trim` of the values from each end
pub fn trimmed_std_dev(values: &[f64], trim: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let cut = (sorted.len() as f64 * trim).floor() as usize;
    let kept = &sorted[cut.min(sorted.len())..sorted.len().saturating_sub(cut)];
    if kept.len() < 2 {
        return 0.0;
    }
    let mean = kept.iter().sum::<f64>() / kept.len() as f64;
    let ss: f64 = kept.iter().map(|x| (x - mean) * (x - mean)).sum();
    (ss / (kept.len() - 1) as f64).sqrt()
}

/// Maps (wind speed, air density) into the fitted predictor space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorScaling {
    /// Exponent on wind speed in the interaction predictor
    pub wind_exponent: f64,
    /// Divisor for wind speed
    pub wind_speed_scale: f64,
    /// Divisor for the interaction predictor
    pub interaction_scale: f64,
}

impl PredictorScaling {
    /// Derive scales from the training grid.
    ///
    /// Fails with `FitFailure` when either predictor has no spread.
    pub fn from_training(
        wind_speeds: &[f64],
        air_densities: &[f64],
        config: &SurfaceConfig,
    ) -> AnalysisResult<Self> {
        let unscaled = Self {
            wind_exponent: config.wind_exponent,
            wind_speed_scale: 1.0,
            interaction_scale: 1.0,
        };
        let interaction: Vec<f64> = wind_speeds
            .iter()
            .zip(air_densities)
            .map(|(&ws, &rho)| unscaled.interaction(ws, rho))
            .collect();

        let (wind_speed_scale, interaction_scale) = if config.normalize {
            (
                trimmed_std_dev(wind_speeds, NORMALIZE_TRIM),
                trimmed_std_dev(&interaction, NORMALIZE_TRIM),
            )
        } else {
            (spread(wind_speeds), spread(&interaction))
        };

        for scale in [wind_speed_scale, interaction_scale] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(AnalysisError::FitFailure {
                    reason: "predictor has zero spread",
                });
            }
        }

        if config.normalize {
            Ok(Self {
                wind_speed_scale,
                interaction_scale,
                ..unscaled
            })
        } else {
            Ok(unscaled)
        }
    }

    /// Raw interaction predictor `ρ·v^k`
    pub fn interaction(&self, wind_speed: f64, air_density: f64) -> f64 {
        air_density * wind_speed.powf(self.wind_exponent)
    }

    /// Scaled predictor coordinates
    pub fn transform(&self, wind_speed: f64, air_density: f64) -> [f64; 2] {
        [
            wind_speed / self.wind_speed_scale,
            self.interaction(wind_speed, air_density) / self.interaction_scale,
        ]
    }
}

fn spread(values: &[f64]) -> f64 {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    hi - lo
}
