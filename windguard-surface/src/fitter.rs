//! Local Regression Surface Fitting
//!
//! ## Method
//!
//! A loess-style fit: every evaluation solves its own small weighted least
//! squares problem over the nearest `q = max(⌊n·span⌋, p)` grid points,
//! where `p` is the number of polynomial terms. Nothing is fitted globally,
//! so "fitting" means validating the grid, fixing the predictor scaling and
//! neighbourhood size, and (optionally) computing exact statistics.
//!
//! ## Exact Statistics
//!
//! Stacking the operator rows of all training points gives the n×n hat
//! matrix `L` with `ŷ = L·y`:
//!
//! ```text
//! enp       = tr(L)                   equivalent number of parameters
//! one_delta = ‖I - L‖²_F              residual degrees of freedom
//! s         = √(Σ(y - ŷ)² / one_delta)
//! SE(x₀)    = s · ‖l(x₀)‖₂
//! ```
//!
//! Cost is O(n²) memory and O(n²·log n) time for the neighbour searches; a
//! 300-point manufacturer grid takes a few milliseconds.
//!
//! ## Failure Conditions
//!
//! | Condition | Error |
//! |---|---|
//! | span ≤ 0 or wind exponent ≤ 0 | `InvalidInput` |
//! | fewer points than polynomial terms | `FitFailure` |
//! | non-finite value, negative speed, non-positive density | `FitFailure` |
//! | duplicate (speed, density) point | `FitFailure` |
//! | fewer than two density levels, too few speeds for the degree | `FitFailure` |
//! | a predictor with zero spread, rank-deficient global design | `FitFailure` |

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use windguard_core::{AnalysisError, AnalysisResult};

use crate::config::{Statistics, SurfaceConfig};
use crate::local;
use crate::model::{ExactStatistics, FitSummary, PowerSurfaceModel, TrainingBounds};
use crate::scaling::PredictorScaling;
use crate::table::PowerCurveTable;
use crate::PowerCurveEntry;

/// Below this, `one_delta` is treated as zero and the residual scale is zero
const ONE_DELTA_FLOOR: f64 = 1e-12;

fn failure(reason: &'static str) -> AnalysisError {
    AnalysisError::FitFailure { reason }
}

/// Fits a [`PowerSurfaceModel`] from a power-curve grid
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceFitter {
    config: SurfaceConfig,
}

impl SurfaceFitter {
    /// Create a fitter, rejecting unusable settings
    pub fn new(config: SurfaceConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings in use
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Fit a parsed manufacturer table
    pub fn fit(&self, table: &PowerCurveTable) -> AnalysisResult<PowerSurfaceModel> {
        self.fit_entries(table.entries())
    }

    /// Fit raw entries (any order)
    pub fn fit_entries(&self, entries: &[PowerCurveEntry]) -> AnalysisResult<PowerSurfaceModel> {
        let config = self.config;
        let terms = config.degree.terms();

        if entries.len() < terms {
            return Err(failure("fewer grid points than local polynomial terms"));
        }
        check_values(entries)?;

        let wind_speeds: Vec<f64> = entries.iter().map(|e| e.wind_speed).collect();
        let air_densities: Vec<f64> = entries.iter().map(|e| e.air_density).collect();

        if has_duplicate_points(entries) {
            return Err(failure("duplicate grid point"));
        }
        let density_levels = distinct(&air_densities);
        if density_levels < 2 {
            return Err(failure("power curve needs at least two air density levels"));
        }
        if distinct(&wind_speeds) <= config.degree.order() {
            return Err(failure("too few distinct wind speeds for the polynomial degree"));
        }

        let scaling = PredictorScaling::from_training(&wind_speeds, &air_densities, &config)?;
        let points: Vec<[f64; 2]> = entries
            .iter()
            .map(|e| scaling.transform(e.wind_speed, e.air_density))
            .collect();
        if local::global_rank(&points, config.degree) < terms {
            return Err(failure("grid is colinear in predictor space"));
        }

        let powers: Vec<f64> = entries.iter().map(|e| e.power).collect();
        let neighbourhood = config.neighbourhood_size(entries.len());

        let mut model = PowerSurfaceModel {
            config,
            scaling,
            points,
            powers,
            bounds: TrainingBounds::from_points(&wind_speeds, &air_densities),
            summary: FitSummary {
                points: entries.len(),
                density_levels,
                neighbourhood,
                statistics: None,
            },
        };

        if config.statistics == Statistics::Exact {
            model.summary.statistics = Some(exact_statistics(&model)?);
        }

        match &model.summary.statistics {
            Some(stats) => log::debug!(
                "surface fit: n={} q={} enp={:.2} s={:.4} max|r|={:.4}",
                model.summary.points,
                neighbourhood,
                stats.equivalent_parameters,
                stats.residual_scale,
                stats.max_abs_residual
            ),
            None => log::debug!("surface fit: n={} q={}", model.summary.points, neighbourhood),
        }

        Ok(model)
    }
}

fn check_values(entries: &[PowerCurveEntry]) -> AnalysisResult<()> {
    for e in entries {
        if !(e.wind_speed.is_finite() && e.air_density.is_finite() && e.power.is_finite()) {
            return Err(failure("non-finite value in power curve"));
        }
        if e.wind_speed < 0.0 {
            return Err(failure("negative wind speed in power curve"));
        }
        if e.air_density <= 0.0 {
            return Err(failure("non-positive air density in power curve"));
        }
    }
    Ok(())
}

fn distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

fn has_duplicate_points(entries: &[PowerCurveEntry]) -> bool {
    let mut keys: Vec<(f64, f64)> = entries
        .iter()
        .map(|e| (e.air_density, e.wind_speed))
        .collect();
    keys.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    keys.windows(2).any(|w| w[0] == w[1])
}

fn exact_statistics(model: &PowerSurfaceModel) -> AnalysisResult<ExactStatistics> {
    let n = model.points.len();
    let config = &model.config;
    let row_at = |i: usize| {
        local::operator_row(
            model.points[i],
            &model.points,
            model.summary.neighbourhood,
            config.span,
            config.degree,
        )
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(row_at)
        .collect::<AnalysisResult<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = (0..n).map(row_at).collect::<AnalysisResult<_>>()?;

    let mut enp = 0.0;
    let mut one_delta = 0.0;
    let mut rss = 0.0;
    let mut max_abs_residual: f64 = 0.0;
    for (i, row) in rows.iter().enumerate() {
        let fitted: f64 = row.iter().zip(&model.powers).map(|(l, y)| l * y).sum();
        let residual = model.powers[i] - fitted;
        rss += residual * residual;
        max_abs_residual = max_abs_residual.max(residual.abs());
        enp += row[i];
        for (j, &l) in row.iter().enumerate() {
            let delta = if i == j { 1.0 - l } else { -l };
            one_delta += delta * delta;
        }
    }

    let residual_scale = if one_delta > ONE_DELTA_FLOOR {
        (rss / one_delta).sqrt()
    } else {
        0.0
    };

    Ok(ExactStatistics {
        equivalent_parameters: enp,
        one_delta,
        residual_sum_of_squares: rss,
        residual_scale,
        max_abs_residual,
    })
}
