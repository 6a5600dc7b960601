//! Physical Constants for Atmospheric Calculations
//!
//! Gas constants, unit conversions and empirical vapour-pressure coefficients
//! used by the air density and humidity estimators. Values match the ones
//! used in wind-resource assessment practice, not the latest CODATA figures,
//! so results line up with published power-curve corrections.

// ===== FUNDAMENTAL PHYSICS CONSTANTS =====

/// Offset between Celsius and Kelvin (K).
///
/// Also the absolute-zero bound: temperatures at or below
/// `-CELSIUS_TO_KELVIN` are rejected.
///
/// Source: NIST Special Publication 330 (2019)
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Conversion from hectopascal to pascal.
pub const HPA_TO_PA: f64 = 100.0;

/// Specific gas constant of dry air (J/(kg·K)).
///
/// Source: ISO 2533:1975 Standard Atmosphere
pub const R_DRY_AIR: f64 = 287.058;

/// Specific gas constant of water vapour (J/(kg·K)).
///
/// Source: Wagner & Pruß (2002), IAPWS-95
pub const R_WATER_VAPOR: f64 = 461.495;

/// Standard atmospheric pressure at sea level (hPa).
///
/// Source: International Standard Atmosphere (ISA)
pub const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;

/// Standard sea-level temperature (°C).
///
/// Source: International Standard Atmosphere (ISA)
pub const SEA_LEVEL_TEMPERATURE_C: f64 = 15.0;

// ===== SATURATION VAPOUR PRESSURE (TETENS) =====

/// Saturation vapour pressure at 0°C (hPa).
///
/// ```text
/// es(T) = 6.1078 × 10^(7.5·T / (T + 237.3))
/// ```
///
/// Source: Tetens (1930), Murray (1967)
pub const TETENS_BASE_HPA: f64 = 6.1078;

/// Tetens exponent numerator coefficient (dimensionless).
pub const TETENS_A: f64 = 7.5;

/// Tetens exponent denominator offset (°C).
pub const TETENS_B_C: f64 = 237.3;

// ===== DEW POINT (MAGNUS, ALDUCHOV-ESKRIDGE) =====

/// Magnus coefficient for relative humidity from dew point (dimensionless).
///
/// ```text
/// RH = 100 × exp(a·Td/(b+Td)) / exp(a·T/(b+T))
/// ```
///
/// Source: Alduchov & Eskridge (1996), valid -40°C to 50°C
pub const MAGNUS_A: f64 = 17.625;

/// Magnus offset for relative humidity from dew point (°C).
pub const MAGNUS_B_C: f64 = 243.04;

/// Relative humidity at saturation (%).
pub const SATURATION_HUMIDITY_PCT: f64 = 100.0;
