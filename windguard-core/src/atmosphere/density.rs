//! Air Density Estimation
//!
//! ## Dry Air
//!
//! Ideal gas law with the specific gas constant of dry air:
//!
//! ```text
//! ρ = P / (Rd · T)         P in Pa, T in K, Rd = 287.058 J/(kg·K)
//! ```
//!
//! At 15°C and 1013.25 hPa this gives 1.2250 kg/m³, the IEC reference.
//!
//! ## Moist Air
//!
//! Air is treated as a mixture of two ideal gases with Dalton partial
//! pressures:
//!
//! ```text
//! es = 6.1078 × 10^(7.5·T / (T + 237.3))     saturation pressure, hPa
//! pv = es × RH                               vapour pressure, Pa (RH in %)
//! pd = P - pv                                dry-air pressure, Pa
//! ρ  = pd / (Rd·T) + pv / (Rv·T)             Rv = 461.495 J/(kg·K)
//! ```
//!
//! Keeping RH in percent is what makes the units line up: `es[hPa] × RH[%]`
//! equals `es × (RH/100) × 100`, i.e. the vapour pressure already in pascal.
//! Checked against the dry-air limit (RH = 0 reproduces the dry formula
//! exactly) and against psychrometric tables (30°C, 80% RH, 1000 hPa gives
//! 1.134 kg/m³ versus 1.149 kg/m³ dry).
//!
//! ## Diagnostics
//!
//! The estimate always carries the branch it took and a short list of
//! non-fatal findings, so callers can assert on the path without capturing
//! log output:
//!
//! | Diagnostic | Meaning |
//! |---|---|
//! | `DryAirFallback` | no usable humidity; dry-air formula used |
//! | `HumidityFromDewPoint` | humidity derived from the dew point |
//! | `DewPointAboveTemperature` | the derived humidity exceeds 100% |
//! | `PartialPressureClamped` | a negative partial pressure was clamped to zero |

use heapless::Vec;
use libm::pow;

use super::humidity::DewPointHumidityEstimator;
use super::sample::AtmosphericSample;
use crate::constants::physics::{
    CELSIUS_TO_KELVIN, HPA_TO_PA, R_DRY_AIR, R_WATER_VAPOR, TETENS_A, TETENS_BASE_HPA, TETENS_B_C,
};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::traits::Validatable;

/// Upper bound on diagnostics attached to one estimate
pub const MAX_DIAGNOSTICS: usize = 4;

/// Which density formula produced the estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DensityFormula {
    /// Ideal gas, dry air only
    DryAir,
    /// Dry air plus water vapour partial pressures
    MoistAir,
}

/// Non-fatal findings raised while estimating density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DensityDiagnostic {
    /// Humidity missing or unusable; dry-air formula used instead
    DryAirFallback,
    /// Humidity was derived from temperature and dew point
    HumidityFromDewPoint,
    /// Dew point exceeds air temperature (derived RH above 100%)
    DewPointAboveTemperature,
    /// A partial pressure came out negative and was clamped to zero
    PartialPressureClamped,
}

/// Air density together with how it was obtained
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct DensityEstimate {
    /// Air density (kg/m³), never negative
    pub density: f64,
    /// Formula branch taken
    pub formula: DensityFormula,
    /// Non-fatal findings, in the order they were raised
    pub diagnostics: Vec<DensityDiagnostic, MAX_DIAGNOSTICS>,
}

impl DensityEstimate {
    fn new(density: f64, formula: DensityFormula) -> Self {
        Self {
            density,
            formula,
            diagnostics: Vec::new(),
        }
    }

    fn flag(&mut self, diagnostic: DensityDiagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            // Capacity covers every variant; a full list cannot happen
            let _ = self.diagnostics.push(diagnostic);
        }
    }

    /// Whether a given diagnostic was raised
    pub fn has(&self, diagnostic: DensityDiagnostic) -> bool {
        self.diagnostics.contains(&diagnostic)
    }
}

/// Saturation vapour pressure over water (hPa), Tetens form
pub fn saturation_vapor_pressure_hpa(temperature: f64) -> f64 {
    TETENS_BASE_HPA * pow(10.0, TETENS_A * temperature / (temperature + TETENS_B_C))
}

/// Computes air density from temperature, pressure and optional humidity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirDensityEstimator {
    r_dry: f64,
    r_vapor: f64,
    dew_point: DewPointHumidityEstimator,
}

impl Default for AirDensityEstimator {
    fn default() -> Self {
        Self {
            r_dry: R_DRY_AIR,
            r_vapor: R_WATER_VAPOR,
            dew_point: DewPointHumidityEstimator::default(),
        }
    }
}

impl AirDensityEstimator {
    /// Create with custom gas constants (J/(kg·K))
    pub fn new_with_constants(r_dry: f64, r_vapor: f64) -> Self {
        Self {
            r_dry,
            r_vapor,
            ..Self::default()
        }
    }

    /// Density from temperature (°C), pressure (hPa) and optional RH (%).
    ///
    /// A humidity that is `None` or non-finite selects the dry-air formula
    /// and raises `DryAirFallback`.
    pub fn estimate(
        &self,
        temperature: f64,
        pressure: f64,
        humidity: Option<f64>,
    ) -> AnalysisResult<DensityEstimate> {
        let kelvin = Self::checked_kelvin(temperature)?;
        let pressure = pressure.require_non_negative("pressure")?;

        match humidity.filter(|rh| rh.is_finite()) {
            Some(rh) => self.moist_air(temperature, kelvin, pressure, rh),
            None => {
                let mut estimate =
                    DensityEstimate::new(self.dry_air(kelvin, pressure), DensityFormula::DryAir);
                estimate.flag(DensityDiagnostic::DryAirFallback);
                log_debug!("no humidity at T={}°C, using dry-air density", temperature);
                Self::finite(estimate)
            }
        }
    }

    /// Density for a full sample, deriving humidity from the dew point when
    /// no direct reading exists
    pub fn estimate_sample(&self, sample: &AtmosphericSample) -> AnalysisResult<DensityEstimate> {
        if let Some(rh) = sample.usable_humidity() {
            return self.estimate(sample.temperature, sample.pressure, Some(rh));
        }

        let Some(dew_point) = sample.usable_dew_point() else {
            return self.estimate(sample.temperature, sample.pressure, None);
        };

        let rh = self
            .dew_point
            .relative_humidity(sample.temperature, dew_point)?;
        let mut estimate = self.estimate(sample.temperature, sample.pressure, Some(rh))?;
        estimate.flag(DensityDiagnostic::HumidityFromDewPoint);
        if DewPointHumidityEstimator::is_supersaturated(sample.temperature, dew_point) {
            log_warn!(
                "dew point {}°C above air temperature {}°C",
                dew_point,
                sample.temperature
            );
            estimate.flag(DensityDiagnostic::DewPointAboveTemperature);
        }
        Ok(estimate)
    }

    /// Dry-air density only, skipping diagnostics
    pub fn dry_air_density(&self, temperature: f64, pressure: f64) -> AnalysisResult<f64> {
        let kelvin = Self::checked_kelvin(temperature)?;
        let pressure = pressure.require_non_negative("pressure")?;
        Ok(self.dry_air(kelvin, pressure))
    }

    fn dry_air(&self, kelvin: f64, pressure_hpa: f64) -> f64 {
        pressure_hpa * HPA_TO_PA / (self.r_dry * kelvin)
    }

    fn moist_air(
        &self,
        temperature: f64,
        kelvin: f64,
        pressure_hpa: f64,
        humidity_pct: f64,
    ) -> AnalysisResult<DensityEstimate> {
        let mut estimate = DensityEstimate::new(0.0, DensityFormula::MoistAir);

        // hPa × percent = Pa
        let mut vapor = saturation_vapor_pressure_hpa(temperature) * humidity_pct;
        if vapor < 0.0 {
            log_warn!("negative vapour pressure {} Pa clamped", vapor);
            vapor = 0.0;
            estimate.flag(DensityDiagnostic::PartialPressureClamped);
        }

        let mut dry = pressure_hpa * HPA_TO_PA - vapor;
        if dry < 0.0 {
            log_warn!("negative dry-air pressure {} Pa clamped", dry);
            dry = 0.0;
            estimate.flag(DensityDiagnostic::PartialPressureClamped);
        }

        estimate.density = dry / (self.r_dry * kelvin) + vapor / (self.r_vapor * kelvin);
        Self::finite(estimate)
    }

    fn checked_kelvin(temperature: f64) -> AnalysisResult<f64> {
        let t = temperature.require_valid("temperature")?;
        let kelvin = t + CELSIUS_TO_KELVIN;
        if kelvin <= 0.0 {
            return Err(AnalysisError::InvalidInput {
                field: "temperature",
            });
        }
        Ok(kelvin)
    }

    fn finite(estimate: DensityEstimate) -> AnalysisResult<DensityEstimate> {
        if estimate.density.is_finite() {
            Ok(estimate)
        } else {
            Err(AnalysisError::NumericDegeneracy {
                reason: "air density is not finite",
            })
        }
    }
}
