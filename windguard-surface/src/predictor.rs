//! Surface evaluation
//!
//! Queries are not restricted to the training grid. Points outside its
//! bounding box are evaluated all the same and marked `extrapolated`: a
//! local quadratic extended past the rated plateau or below cut-in can
//! swing quickly, so treat those values with care.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use windguard_core::{AnalysisError, AnalysisResult};

use crate::grid::PredictionGrid;
use crate::model::PowerSurfaceModel;

/// Predicted power at one query point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Query wind speed (m/s)
    pub wind_speed: f64,
    /// Query air density (kg/m³)
    pub air_density: f64,
    /// Predicted power (kW)
    pub power: f64,
    /// `s·‖l(x₀)‖`, when the model has exact statistics
    pub standard_error: Option<f64>,
    /// Query lies outside the training bounding box
    pub extrapolated: bool,
}

/// Read-only evaluator over a fitted model
#[derive(Debug, Clone, Copy)]
pub struct SurfacePredictor<'a> {
    model: &'a PowerSurfaceModel,
}

impl<'a> SurfacePredictor<'a> {
    /// Wrap a model
    pub fn new(model: &'a PowerSurfaceModel) -> Self {
        Self { model }
    }

    /// Predicted power only
    pub fn predict(&self, wind_speed: f64, air_density: f64) -> AnalysisResult<f64> {
        let (power, _) = self.evaluate(wind_speed, air_density)?;
        Ok(power)
    }

    /// Predicted power with standard error and extrapolation flag
    pub fn predict_with_se(&self, wind_speed: f64, air_density: f64) -> AnalysisResult<Prediction> {
        let (power, l) = self.evaluate(wind_speed, air_density)?;
        let standard_error = self
            .model
            .residual_scale()
            .map(|s| s * l.iter().map(|v| v * v).sum::<f64>().sqrt());
        let extrapolated = !self.model.bounds().contains(wind_speed, air_density);
        if extrapolated {
            log::debug!(
                "extrapolating surface to v={} rho={}",
                wind_speed,
                air_density
            );
        }
        Ok(Prediction {
            wind_speed,
            air_density,
            power,
            standard_error,
            extrapolated,
        })
    }

    /// Evaluate many `(wind speed, air density)` pairs; output order matches
    /// input order. The first invalid query fails the batch.
    pub fn predict_many(&self, queries: &[(f64, f64)]) -> AnalysisResult<Vec<Prediction>> {
        #[cfg(feature = "parallel")]
        let iter = queries.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = queries.iter();

        iter.map(|&(ws, rho)| self.predict_with_se(ws, rho)).collect()
    }

    /// Evaluate every point of a grid, wind speed varying fastest
    pub fn predict_grid(&self, grid: &PredictionGrid) -> AnalysisResult<Vec<Prediction>> {
        let queries: Vec<(f64, f64)> = grid.points().collect();
        self.predict_many(&queries)
    }

    fn evaluate(&self, wind_speed: f64, air_density: f64) -> AnalysisResult<(f64, Vec<f64>)> {
        if !(wind_speed.is_finite() && wind_speed >= 0.0) {
            return Err(AnalysisError::InvalidInput {
                field: "wind_speed",
            });
        }
        if !(air_density.is_finite() && air_density > 0.0) {
            return Err(AnalysisError::InvalidInput {
                field: "air_density",
            });
        }
        let l = self.model.operator_row(wind_speed, air_density)?;
        let power = l.iter().zip(&self.model.powers).map(|(a, y)| a * y).sum();
        Ok((power, l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PowerCurveEntry, SurfaceConfig, SurfaceFitter};

    fn model() -> PowerSurfaceModel {
        let entries: Vec<PowerCurveEntry> = [1.0, 1.1, 1.2, 1.3]
            .iter()
            .flat_map(|&rho| {
                (3..=12).map(move |ws| {
                    let ws = f64::from(ws);
                    PowerCurveEntry::new(ws, rho, 0.6 * rho * ws.powi(3))
                })
            })
            .collect();
        SurfaceFitter::new(SurfaceConfig::default().with_span(0.3))
            .unwrap()
            .fit_entries(&entries)
            .unwrap()
    }

    #[test]
    fn cubic_law_reproduced_off_grid() {
        let model = model();
        let predictor = model.predictor();
        for (ws, rho) in [(4.5, 1.05), (7.25, 1.225), (11.5, 1.28)] {
            let expected = 0.6 * rho * f64::powi(ws, 3);
            let power = predictor.predict(ws, rho).unwrap();
            assert!((power - expected).abs() < 1e-6 * expected, "{ws} {rho}");
        }
    }

    #[test]
    fn standard_error_present_and_small() {
        let model = model();
        let prediction = model.predictor().predict_with_se(8.0, 1.2).unwrap();
        let se = prediction.standard_error.unwrap();
        assert!(se >= 0.0);
        assert!(se < 1e-3);
        assert!(!prediction.extrapolated);
    }

    #[test]
    fn out_of_range_is_flagged_not_blocked() {
        let model = model();
        let prediction = model.predictor().predict_with_se(14.0, 1.2).unwrap();
        assert!(prediction.extrapolated);
        assert!(prediction.power.is_finite());
    }

    #[test]
    fn invalid_queries() {
        let model = model();
        let predictor = model.predictor();
        assert_eq!(
            predictor.predict(f64::NAN, 1.2),
            Err(AnalysisError::InvalidInput { field: "wind_speed" })
        );
        assert_eq!(
            predictor.predict(-1.0, 1.2),
            Err(AnalysisError::InvalidInput { field: "wind_speed" })
        );
        assert_eq!(
            predictor.predict(8.0, 0.0),
            Err(AnalysisError::InvalidInput { field: "air_density" })
        );
    }

    #[test]
    fn batch_keeps_order() {
        let model = model();
        let queries = [(5.0, 1.1), (9.0, 1.0), (6.0, 1.3)];
        let predictions = model.predictor().predict_many(&queries).unwrap();
        let echoed: Vec<(f64, f64)> = predictions
            .iter()
            .map(|p| (p.wind_speed, p.air_density))
            .collect();
        assert_eq!(echoed, queries.to_vec());

        let bad = [(5.0, 1.1), (5.0, f64::NAN)];
        assert!(model.predictor().predict_many(&bad).is_err());
    }
}
