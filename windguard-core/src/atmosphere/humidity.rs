//! Relative Humidity from Dew Point
//!
//! ## Physics Background
//!
//! The dew point is the temperature to which air must cool, at constant
//! pressure, to saturate. Its saturation vapour pressure therefore *is* the
//! actual vapour pressure of the air, and relative humidity is the ratio of
//! two saturation pressures:
//!
//! ```text
//! RH = 100 × es(Td) / es(T)
//!
//! es(T) ∝ exp(a·T / (b + T))      a = 17.625, b = 243.04 °C
//! ```
//!
//! The constant prefactor of the Magnus fit cancels in the ratio.
//!
//! ## Validity
//!
//! Physically `Td ≤ T`; a dew point above the air temperature gives
//! `RH > 100%`. The estimator returns whatever the formula yields. Deciding
//! whether supersaturation is a sensor fault is left to the caller (the
//! density estimator flags it as a diagnostic).

use libm::exp;

use crate::constants::physics::{MAGNUS_A, MAGNUS_B_C, SATURATION_HUMIDITY_PCT};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::traits::Validatable;

/// Derives relative humidity (%) from temperature and dew point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DewPointHumidityEstimator {
    magnus_a: f64,
    magnus_b: f64,
}

impl Default for DewPointHumidityEstimator {
    fn default() -> Self {
        Self {
            magnus_a: MAGNUS_A,
            magnus_b: MAGNUS_B_C,
        }
    }
}

impl DewPointHumidityEstimator {
    /// Use non-default Magnus coefficients (e.g. the over-ice fit)
    pub const fn with_coefficients(magnus_a: f64, magnus_b: f64) -> Self {
        Self { magnus_a, magnus_b }
    }

    /// Relative humidity (%) for air at `temperature` °C with dew point `dew_point` °C
    pub fn relative_humidity(&self, temperature: f64, dew_point: f64) -> AnalysisResult<f64> {
        let t = temperature.require_valid("temperature")?;
        let td = dew_point.require_valid("dew_point")?;

        let actual = exp(self.magnus_a * td / (self.magnus_b + td));
        let saturated = exp(self.magnus_a * t / (self.magnus_b + t));
        let rh = SATURATION_HUMIDITY_PCT * actual / saturated;

        if rh.is_finite() {
            Ok(rh)
        } else {
            Err(AnalysisError::NumericDegeneracy {
                reason: "temperature at the Magnus pole",
            })
        }
    }

    /// True when the dew point exceeds the air temperature (supersaturated reading)
    pub fn is_supersaturated(temperature: f64, dew_point: f64) -> bool {
        dew_point > temperature
    }
}
