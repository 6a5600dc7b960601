//! Power Surfaces over Wind Speed and Air Density
//!
//! ## Overview
//!
//! Manufacturers publish power curves as a sheet: one row per wind speed,
//! one column per air density. Performance analysis needs the expected power
//! at *any* (wind speed, air density) pair, so the sheet is turned into a
//! continuous surface:
//!
//! ```text
//! wide sheet ──> PowerCurveTable ──> SurfaceFitter ──> PowerSurfaceModel
//!                (long, sorted)       (loess fit)          │
//!                                                          ▼
//!                         PredictionGrid ──> SurfacePredictor ──> Prediction
//! ```
//!
//! ## Why Local Regression?
//!
//! 1. **Near-interpolating**: with a tight span the surface passes through the
//!    published values, which are trusted
//! 2. **Physically shaped**: the second predictor is `ρ·v³`, the kinetic
//!    energy flux, so the surface bends the way turbines do
//! 3. **No global form**: the cut-in, knee and rated plateau are captured
//!    without choosing a parametric curve
//!
//! ## Example
//!
//! ```
//! use windguard_surface::{PowerCurveTable, DensityCodec, SurfaceConfig, SurfaceFitter};
//!
//! let sheet = "\
//! ws,P_100,P_110,P_1225,P_130
//! 4,39.7,43.6,48.6,51.6
//! 5,77.5,85.2,94.9,100.8
//! 6,133.9,147.3,164.1,174.1
//! 7,212.7,233.9,260.5,276.5
//! 8,317.4,349.2,388.9,412.7";
//!
//! let table = PowerCurveTable::from_csv(sheet, &DensityCodec::Heuristic).unwrap();
//! let config = SurfaceConfig::near_interpolating().with_span(0.5);
//! let model = SurfaceFitter::new(config).unwrap().fit(&table).unwrap();
//!
//! let power = model.predictor().predict(6.0, 1.225).unwrap();
//! assert!((power - 164.1).abs() / 164.1 < 0.01);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod fitter;
pub mod grid;
mod local;
pub mod model;
pub mod predictor;
pub mod scaling;
pub mod table;

use serde::{Deserialize, Serialize};

pub use config::{Degree, Statistics, SurfaceConfig, SurfaceMode};
pub use fitter::SurfaceFitter;
pub use grid::PredictionGrid;
pub use model::{ExactStatistics, FitSummary, PowerSurfaceModel, TrainingBounds};
pub use predictor::{Prediction, SurfacePredictor};
pub use scaling::PredictorScaling;
pub use table::{decode_density_code, DensityCodec, DensityColumn, PowerCurveTable, WideSheet};

pub use windguard_core::{AnalysisError, AnalysisResult};

/// One published power value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCurveEntry {
    /// Hub-height wind speed (m/s)
    pub wind_speed: f64,
    /// Air density the column was published for (kg/m³)
    pub air_density: f64,
    /// Electrical power (kW)
    pub power: f64,
}

impl PowerCurveEntry {
    /// Create an entry
    pub const fn new(wind_speed: f64, air_density: f64, power: f64) -> Self {
        Self {
            wind_speed,
            air_density,
            power,
        }
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
