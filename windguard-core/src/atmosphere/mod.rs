//! Atmospheric state and air density
//!
//! A turbine's power output scales with the kinetic energy flux through the
//! rotor, `½·ρ·A·v³`. The wind speed comes from the nacelle anemometer; the
//! density `ρ` has to be reconstructed from the met mast or nacelle sensors:
//!
//! ```text
//! temperature ─┐
//! pressure ────┼──> AirDensityEstimator ──> DensityEstimate { ρ, formula, diagnostics }
//! humidity ────┘         ▲
//! dew point ──> DewPointHumidityEstimator (when humidity is missing)
//! ```
//!
//! Moist air is *lighter* than dry air at the same temperature and pressure
//! because water vapour (18 g/mol) displaces nitrogen and oxygen (~29 g/mol).
//! The correction is small (well under 1% in temperate climates) but it is
//! systematic, so it matters for power-curve verification.

mod density;
mod humidity;
mod sample;

pub use density::{
    saturation_vapor_pressure_hpa, AirDensityEstimator, DensityDiagnostic, DensityEstimate,
    DensityFormula, MAX_DIAGNOSTICS,
};
pub use humidity::DewPointHumidityEstimator;
pub use sample::AtmosphericSample;
