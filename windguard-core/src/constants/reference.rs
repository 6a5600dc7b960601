//! Reference Conditions for Power Performance Normalization
//!
//! Power-curve comparisons only make sense at a common air density and
//! with turbulence bias removed. These are the baselines the corrector and
//! the prediction grid normalize against.

/// Reference air density (kg/m³).
///
/// Density of the ISA atmosphere at sea level and 15°C. Manufacturer power
/// curves are usually published at this density.
///
/// Source: IEC 61400-12-1, ISO 2533
pub const REFERENCE_AIR_DENSITY: f64 = 1.225;

/// Turbulence bias factor in the cube-root turbulence correction.
///
/// ```text
/// ws_corr = ws · (1 + 3·(σ/ws)²)^(1/3)
/// ```
///
/// The factor 3 comes from expanding E[(v + v')³] to second order.
pub const TURBULENCE_BIAS_FACTOR: f64 = 3.0;

/// Exponent relating wind power to wind speed (P ∝ ρ·v³).
pub const POWER_LAW_EXPONENT: f64 = 3.0;

/// Wind speed step of generated prediction grids (m/s).
pub const GRID_WIND_SPEED_STEP: f64 = 1.0;

/// Air density step of generated prediction grids (kg/m³).
pub const GRID_AIR_DENSITY_STEP: f64 = 0.03;
