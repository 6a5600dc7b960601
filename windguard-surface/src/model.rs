//! Fitted power surface

use serde::{Deserialize, Serialize};
use windguard_core::AnalysisResult;

use crate::config::SurfaceConfig;
use crate::local;
use crate::predictor::SurfacePredictor;
use crate::scaling::PredictorScaling;

/// Bounding box of the training grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingBounds {
    /// Lowest published wind speed (m/s)
    pub min_wind_speed: f64,
    /// Highest published wind speed (m/s)
    pub max_wind_speed: f64,
    /// Lowest published air density (kg/m³)
    pub min_air_density: f64,
    /// Highest published air density (kg/m³)
    pub max_air_density: f64,
}

impl TrainingBounds {
    pub(crate) fn from_points(wind_speeds: &[f64], air_densities: &[f64]) -> Self {
        let (min_ws, max_ws) = min_max(wind_speeds);
        let (min_rho, max_rho) = min_max(air_densities);
        Self {
            min_wind_speed: min_ws,
            max_wind_speed: max_ws,
            min_air_density: min_rho,
            max_air_density: max_rho,
        }
    }

    /// Whether a query lies inside the box
    pub fn contains(&self, wind_speed: f64, air_density: f64) -> bool {
        (self.min_wind_speed..=self.max_wind_speed).contains(&wind_speed)
            && (self.min_air_density..=self.max_air_density).contains(&air_density)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Statistics from the full operator matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExactStatistics {
    /// Equivalent number of parameters, `tr(L)`
    pub equivalent_parameters: f64,
    /// `‖I - L‖²_F`, the residual degrees of freedom
    pub one_delta: f64,
    /// Residual sum of squares at the training points
    pub residual_sum_of_squares: f64,
    /// Residual scale `s = √(RSS / one_delta)`
    pub residual_scale: f64,
    /// Largest absolute residual (kW)
    pub max_abs_residual: f64,
}

/// What the fit did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    /// Training points
    pub points: usize,
    /// Distinct air density levels
    pub density_levels: usize,
    /// Points per local neighbourhood
    pub neighbourhood: usize,
    /// Present when the config asks for exact statistics
    pub statistics: Option<ExactStatistics>,
}

/// Immutable fitted surface `P = f(v, ρ)`
#[derive(Debug, Clone)]
pub struct PowerSurfaceModel {
    pub(crate) config: SurfaceConfig,
    pub(crate) scaling: PredictorScaling,
    pub(crate) points: Vec<[f64; 2]>,
    pub(crate) powers: Vec<f64>,
    pub(crate) bounds: TrainingBounds,
    pub(crate) summary: FitSummary,
}

impl PowerSurfaceModel {
    /// Settings the model was fitted with
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Predictor scaling derived from the training grid
    pub fn scaling(&self) -> &PredictorScaling {
        &self.scaling
    }

    /// Training grid bounding box
    pub fn bounds(&self) -> &TrainingBounds {
        &self.bounds
    }

    /// Fit summary
    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }

    /// Residual scale, when exact statistics were computed
    pub fn residual_scale(&self) -> Option<f64> {
        self.summary.statistics.map(|s| s.residual_scale)
    }

    /// Number of training points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a fitted model
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Read-only evaluator
    pub fn predictor(&self) -> SurfacePredictor<'_> {
        SurfacePredictor::new(self)
    }

    /// Operator row at unscaled coordinates
    pub(crate) fn operator_row(&self, wind_speed: f64, air_density: f64) -> AnalysisResult<Vec<f64>> {
        local::operator_row(
            self.scaling.transform(wind_speed, air_density),
            &self.points,
            self.summary.neighbourhood,
            self.config.span,
            self.config.degree,
        )
    }
}
