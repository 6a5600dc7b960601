//! SCADA record types for batch correction

use serde::{Deserialize, Serialize};

use crate::atmosphere::{AtmosphericSample, DensityEstimate};
use crate::errors::AnalysisError;
use crate::iec::WindSpeedRecord;

/// One averaged SCADA row from a turbine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScadaRecord {
    /// Turbine identifier
    pub device_id: String,
    /// Period timestamp (ms since epoch); carried through, never interpreted
    pub timestamp: u64,
    /// Mean wind speed (m/s)
    pub wind_speed: f64,
    /// Wind speed standard deviation (m/s)
    pub wind_speed_std: f64,
    /// Mean active power (kW)
    pub power: f64,
    /// Ambient temperature (°C)
    pub temperature: f64,
    /// Ambient pressure (hPa)
    pub pressure: f64,
    /// Relative humidity (%)
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Dew point (°C)
    #[serde(default)]
    pub dew_point: Option<f64>,
}

impl ScadaRecord {
    /// Atmospheric part of the record
    pub fn atmospheric_sample(&self) -> AtmosphericSample {
        AtmosphericSample {
            temperature: self.temperature,
            pressure: self.pressure,
            humidity: self.humidity,
            dew_point: self.dew_point,
        }
    }

    /// Wind part of the record paired with an air density
    pub fn wind_speed_record(&self, air_density: f64) -> WindSpeedRecord {
        WindSpeedRecord {
            wind_speed: self.wind_speed,
            wind_speed_std: self.wind_speed_std,
            air_density,
        }
    }
}

/// A record augmented with its derived columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectedRecord {
    /// Source row
    pub record: ScadaRecord,
    /// Air density and how it was derived
    pub density: DensityEstimate,
    /// Density- and turbulence-normalized wind speed (m/s)
    pub corrected_wind_speed: f64,
}

impl CorrectedRecord {
    /// Air density (kg/m³)
    pub fn air_density(&self) -> f64 {
        self.density.density
    }
}

/// A record that could not be corrected
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RejectedRecord {
    /// Position in the input batch
    pub index: usize,
    /// Why it failed
    pub error: AnalysisError,
}
