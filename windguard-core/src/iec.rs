//! IEC-Style Wind Speed Normalization
//!
//! ## Why Normalize?
//!
//! A turbine converts kinetic energy flux, `½·ρ·A·v³`. The same anemometer
//! reading delivers less energy on a hot summer afternoon than on a cold
//! winter morning, and a gusty 8 m/s carries more energy than a steady one.
//! Before comparing measured output against a certified power curve, the
//! measured speed is mapped to the speed that would deliver the same energy
//! at reference conditions.
//!
//! ### Density Adjustment
//!
//! Equal energy flux at reference density means `ρ·v³ = ρ_ref·v_norm³`:
//!
//! ```text
//! v_norm = v · (ρ / ρ_ref)^(1/3)          ρ_ref = 1.225 kg/m³
//! ```
//!
//! ### Turbulence Adjustment
//!
//! With `v = V + v'`, the mean cube expands to `V³·(1 + 3·(σ/V)² + …)`. The
//! cube root of that bias is applied to the density-normalized speed:
//!
//! ```text
//! v_corr = v_norm · (1 + 3·(σ/V)²)^(1/3)
//! ```
//!
//! `V` here is always the *raw* measured mean speed. Dividing by the
//! density-normalized speed gives a different (and non-standard) result.
//!
//! ## Failure Modes
//!
//! | Input | Result |
//! |---|---|
//! | `V = 0` in a turbulence step | `NumericDegeneracy` (σ/V undefined) |
//! | negative or non-finite speed, σ or ρ | `InvalidInput` |

use libm::cbrt;

use crate::constants::reference::{REFERENCE_AIR_DENSITY, TURBULENCE_BIAS_FACTOR};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::traits::Validatable;

/// Reference conditions for the corrector
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IecConfig {
    /// Density the speed is normalized to (kg/m³)
    pub reference_density: f64,
    /// Multiplier on the squared turbulence intensity
    pub turbulence_factor: f64,
}

impl Default for IecConfig {
    fn default() -> Self {
        Self {
            reference_density: REFERENCE_AIR_DENSITY,
            turbulence_factor: TURBULENCE_BIAS_FACTOR,
        }
    }
}

/// One wind measurement paired with its air density
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindSpeedRecord {
    /// Mean wind speed (m/s)
    pub wind_speed: f64,
    /// Standard deviation of wind speed over the averaging period (m/s)
    pub wind_speed_std: f64,
    /// Air density (kg/m³)
    pub air_density: f64,
}

/// Normalizes wind speed for air density and turbulence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IecCorrector {
    config: IecConfig,
}

impl IecCorrector {
    /// Create a corrector with explicit reference conditions.
    ///
    /// A non-positive or non-finite reference density is rejected, as is a
    /// negative turbulence factor.
    pub fn new(config: IecConfig) -> AnalysisResult<Self> {
        if !(config.reference_density.is_finite() && config.reference_density > 0.0) {
            return Err(AnalysisError::InvalidInput {
                field: "reference_density",
            });
        }
        config
            .turbulence_factor
            .require_non_negative("turbulence_factor")?;
        Ok(Self { config })
    }

    /// Reference conditions in use
    pub fn config(&self) -> &IecConfig {
        &self.config
    }

    /// Density-normalized wind speed
    pub fn density_adjusted(&self, wind_speed: f64, air_density: f64) -> AnalysisResult<f64> {
        let ws = wind_speed.require_non_negative("wind_speed")?;
        let rho = air_density.require_non_negative("air_density")?;
        Ok(ws * cbrt(rho / self.config.reference_density))
    }

    /// Turbulence-adjusted wind speed (no density step)
    pub fn turbulence_adjusted(&self, wind_speed: f64, wind_speed_std: f64) -> AnalysisResult<f64> {
        let ws = wind_speed.require_non_negative("wind_speed")?;
        Ok(ws * self.turbulence_multiplier(ws, wind_speed_std)?)
    }

    /// Density then turbulence adjustment, turbulence ratio taken on the raw speed
    pub fn correct(
        &self,
        wind_speed: f64,
        wind_speed_std: f64,
        air_density: f64,
    ) -> AnalysisResult<f64> {
        let normalized = self.density_adjusted(wind_speed, air_density)?;
        Ok(normalized * self.turbulence_multiplier(wind_speed, wind_speed_std)?)
    }

    /// [`correct`](Self::correct) for a paired record
    pub fn correct_record(&self, record: &WindSpeedRecord) -> AnalysisResult<f64> {
        self.correct(record.wind_speed, record.wind_speed_std, record.air_density)
    }

    fn turbulence_multiplier(&self, raw_speed: f64, wind_speed_std: f64) -> AnalysisResult<f64> {
        let sigma = wind_speed_std.require_non_negative("wind_speed_std")?;
        if raw_speed == 0.0 {
            log_debug!("turbulence ratio undefined at zero wind speed");
            return Err(AnalysisError::NumericDegeneracy {
                reason: "zero wind speed in turbulence ratio",
            });
        }
        let intensity = sigma / raw_speed;
        Ok(cbrt(1.0 + self.config.turbulence_factor * intensity * intensity))
    }
}

/// Density adjustment at the default reference density
pub fn iec_ad(wind_speed: f64, air_density: f64) -> AnalysisResult<f64> {
    IecCorrector::default().density_adjusted(wind_speed, air_density)
}

/// Turbulence adjustment with the default factor
pub fn iec_turb(wind_speed: f64, wind_speed_std: f64) -> AnalysisResult<f64> {
    IecCorrector::default().turbulence_adjusted(wind_speed, wind_speed_std)
}

/// Full correction at default reference conditions
pub fn iec_corr(wind_speed: f64, wind_speed_std: f64, air_density: f64) -> AnalysisResult<f64> {
    IecCorrector::default().correct(wind_speed, wind_speed_std, air_density)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_at_reference_conditions() {
        assert_eq!(iec_ad(10.0, 1.225), Ok(10.0));
        assert_eq!(iec_turb(10.0, 0.0), Ok(10.0));
        for ws in [0.5, 3.0, 7.25, 12.0, 24.9] {
            assert_eq!(iec_corr(ws, 0.0, 1.225), Ok(ws));
        }
    }

    #[test]
    fn thin_air_lowers_equivalent_speed() {
        let ws = iec_ad(10.0, 1.1).unwrap();
        assert!(ws < 10.0);
        // Equal energy flux
        assert!((1.1 * 10.0_f64.powi(3) - 1.225 * ws.powi(3)).abs() < 1e-9);
    }

    #[test]
    fn turbulence_increases_speed() {
        let ws = iec_turb(8.0, 1.6).unwrap();
        let expected = 8.0 * (1.0_f64 + 3.0 * 0.04).cbrt();
        assert!((ws - expected).abs() < 1e-12);
    }

    #[test]
    fn turbulence_ratio_uses_raw_speed() {
        let raw = 8.0;
        let sigma = 1.2;
        let rho = 1.05;
        let normalized = iec_ad(raw, rho).unwrap();
        let expected = normalized * (1.0_f64 + 3.0 * (sigma / raw) * (sigma / raw)).cbrt();
        let corrected = iec_corr(raw, sigma, rho).unwrap();
        assert!((corrected - expected).abs() < 1e-12);

        let wrong = normalized * (1.0_f64 + 3.0 * (sigma / normalized).powi(2)).cbrt();
        assert!((corrected - wrong).abs() > 1e-6);
    }

    #[test]
    fn zero_wind_speed_is_degenerate() {
        assert!(matches!(
            iec_turb(0.0, 0.3),
            Err(AnalysisError::NumericDegeneracy { .. })
        ));
        assert!(matches!(
            iec_corr(0.0, 0.0, 1.2),
            Err(AnalysisError::NumericDegeneracy { .. })
        ));
        // Density step alone is defined at calm
        assert_eq!(iec_ad(0.0, 1.2), Ok(0.0));
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(
            iec_ad(-1.0, 1.2),
            Err(AnalysisError::InvalidInput { field: "wind_speed" })
        );
        assert_eq!(
            iec_ad(5.0, f64::NAN),
            Err(AnalysisError::InvalidInput { field: "air_density" })
        );
        assert_eq!(
            iec_turb(5.0, -0.1),
            Err(AnalysisError::InvalidInput { field: "wind_speed_std" })
        );
    }

    #[test]
    fn custom_reference_density() {
        let corrector = IecCorrector::new(IecConfig {
            reference_density: 1.0,
            turbulence_factor: 0.0,
        })
        .unwrap();
        let ws = corrector.correct(10.0, 2.0, 1.0).unwrap();
        assert_eq!(ws, 10.0);
    }

    #[test]
    fn rejects_bad_config() {
        assert!(IecCorrector::new(IecConfig {
            reference_density: 0.0,
            ..IecConfig::default()
        })
        .is_err());
        assert!(IecCorrector::new(IecConfig {
            turbulence_factor: -1.0,
            ..IecConfig::default()
        })
        .is_err());
    }

    #[test]
    fn record_correction_matches_free_function() {
        let record = WindSpeedRecord {
            wind_speed: 9.3,
            wind_speed_std: 0.9,
            air_density: 1.19,
        };
        assert_eq!(
            IecCorrector::default().correct_record(&record),
            iec_corr(9.3, 0.9, 1.19)
        );
    }
}
