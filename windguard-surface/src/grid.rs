//! Regular evaluation grids
//!
//! Wind speed in 1 m/s steps and air density in 0.03 kg/m³ steps across the
//! training range. The reference density 1.225 kg/m³ is always part of the
//! grid so the reference power curve can be read straight off the result.

use serde::{Deserialize, Serialize};
use windguard_core::constants::reference::{
    GRID_AIR_DENSITY_STEP, GRID_WIND_SPEED_STEP, REFERENCE_AIR_DENSITY,
};
use windguard_core::{AnalysisError, AnalysisResult};

use crate::model::TrainingBounds;

/// Values are snapped to this resolution to keep `0.95 + 3·0.03` printable
const SNAP: f64 = 1e-9;
const SNAP_SCALE: f64 = 1e9;

/// Most points allowed along one grid axis
pub const MAX_AXIS_POINTS: usize = 100_000;

/// Cartesian product of wind speeds and air densities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionGrid {
    wind_speeds: Vec<f64>,
    air_densities: Vec<f64>,
}

impl PredictionGrid {
    /// Default-step grid over the training box, 1.225 kg/m³ included
    pub fn spanning(bounds: &TrainingBounds) -> AnalysisResult<Self> {
        Self::with_steps(bounds, GRID_WIND_SPEED_STEP, GRID_AIR_DENSITY_STEP)
    }

    /// Grid over the training box with custom steps, 1.225 kg/m³ included.
    ///
    /// Each axis is capped at [`MAX_AXIS_POINTS`]; a step too fine for the
    /// range is rejected as invalid input on that step.
    pub fn with_steps(
        bounds: &TrainingBounds,
        wind_speed_step: f64,
        air_density_step: f64,
    ) -> AnalysisResult<Self> {
        Ok(Self {
            wind_speeds: stepped(
                bounds.min_wind_speed,
                bounds.max_wind_speed,
                wind_speed_step,
                "wind_speed_step",
            )?,
            air_densities: with_reference(stepped(
                bounds.min_air_density,
                bounds.max_air_density,
                air_density_step,
                "air_density_step",
            )?),
        })
    }

    /// Explicit axes (sorted and de-duplicated; no reference insertion)
    pub fn from_axes(mut wind_speeds: Vec<f64>, mut air_densities: Vec<f64>) -> Self {
        for axis in [&mut wind_speeds, &mut air_densities] {
            axis.sort_by(f64::total_cmp);
            axis.dedup();
        }
        Self {
            wind_speeds,
            air_densities,
        }
    }

    /// Wind speed axis (m/s)
    pub fn wind_speeds(&self) -> &[f64] {
        &self.wind_speeds
    }

    /// Air density axis (kg/m³)
    pub fn air_densities(&self) -> &[f64] {
        &self.air_densities
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.wind_speeds.len() * self.air_densities.len()
    }

    /// True when either axis is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(wind speed, air density)` pairs, wind speed varying fastest
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.air_densities
            .iter()
            .flat_map(move |&rho| self.wind_speeds.iter().map(move |&ws| (ws, rho)))
    }
}

fn snap(value: f64) -> f64 {
    (value * SNAP_SCALE).round() / SNAP_SCALE
}

fn stepped(min: f64, max: f64, step: f64, field: &'static str) -> AnalysisResult<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(AnalysisError::InvalidInput { field });
    }
    if !(min.is_finite() && max.is_finite()) || max < min {
        return Ok(Vec::new());
    }
    let intervals = ((max - min) / step + SNAP).floor();
    if !(intervals.is_finite() && intervals < MAX_AXIS_POINTS as f64) {
        return Err(AnalysisError::InvalidInput { field });
    }
    let count = (intervals as usize)
        .checked_add(1)
        .ok_or(AnalysisError::InvalidInput { field })?;
    Ok((0..count).map(|i| snap(min + i as f64 * step)).collect())
}

fn with_reference(mut densities: Vec<f64>) -> Vec<f64> {
    if !densities
        .iter()
        .any(|d| (d - REFERENCE_AIR_DENSITY).abs() < SNAP)
    {
        densities.push(REFERENCE_AIR_DENSITY);
        densities.sort_by(f64::total_cmp);
    }
    densities
}
