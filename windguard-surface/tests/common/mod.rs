//! Common test utilities and power-curve generators for integration tests
//!
//! This module provides:
//! - A logistic 2 MW reference turbine evaluated on a manufacturer-style grid
//! - A cubic-law turbine capped at rated power, with a sharp knee
//! - Wide-sheet CSV rendering of any generated grid
//! - Tolerance helpers

#![allow(dead_code)]

use windguard_surface::PowerCurveEntry;

/// Rated power of the synthetic turbine (kW)
pub const RATED_KW: f64 = 2000.0;

/// Published density columns, 0.95 to 1.28 kg/m³ in 0.03 steps plus 1.225
pub const DENSITIES: [f64; 13] = [
    0.95, 0.98, 1.01, 1.04, 1.07, 1.10, 1.13, 1.16, 1.19, 1.22, 1.225, 1.25, 1.28,
];

/// Column labels matching [`DENSITIES`]
pub const LABELS: [&str; 13] = [
    "P_095", "P_098", "P_101", "P_104", "P_107", "P_110", "P_113", "P_116", "P_119", "P_122",
    "P_1225", "P_125", "P_128",
];

/// Logistic power curve, density-normalised through the equivalent wind
/// speed `v·(ρ/1.225)^(1/3)`
pub fn logistic_power(wind_speed: f64, air_density: f64) -> f64 {
    let equivalent = wind_speed * (air_density / 1.225).cbrt();
    RATED_KW / (1.0 + (-(equivalent - 9.0) / 1.3).exp())
}

/// Swept area of an 80 m rotor (m²)
pub const ROTOR_AREA_M2: f64 = 5027.0;

/// Power coefficient below rated
pub const POWER_COEFFICIENT: f64 = 0.45;

/// `½·ρ·A·Cp·v³` in kW, cut off at rated power
pub fn capped_cubic_power(wind_speed: f64, air_density: f64) -> f64 {
    let kw = 0.5 * air_density * ROTOR_AREA_M2 * POWER_COEFFICIENT * wind_speed.powi(3) / 1000.0;
    kw.min(RATED_KW)
}

/// Published values are rounded to 0.1 kW like a real sheet
pub fn published(wind_speed: f64, air_density: f64) -> f64 {
    round_to_sheet(logistic_power(wind_speed, air_density))
}

/// Round to the 0.1 kW resolution of a sheet
pub fn round_to_sheet(kw: f64) -> f64 {
    (kw * 10.0).round() / 10.0
}

/// Wind speeds 3..=25 m/s
pub fn wind_speeds() -> Vec<f64> {
    (3..=25).map(f64::from).collect()
}

/// The full 23 × 13 grid in long form
pub fn reference_entries() -> Vec<PowerCurveEntry> {
    grid_entries(logistic_power)
}

/// The full grid as a wide CSV sheet with a `ws` column
pub fn reference_sheet() -> String {
    grid_sheet(logistic_power)
}

/// Any power law on the 23 × 13 grid, rounded like a sheet, in long form
pub fn grid_entries(power: fn(f64, f64) -> f64) -> Vec<PowerCurveEntry> {
    DENSITIES
        .iter()
        .flat_map(|&rho| {
            wind_speeds()
                .into_iter()
                .map(move |ws| PowerCurveEntry::new(ws, rho, round_to_sheet(power(ws, rho))))
        })
        .collect()
}

/// Any power law on the 23 × 13 grid as a wide sheet
pub fn grid_sheet(power: fn(f64, f64) -> f64) -> String {
    let mut csv = format!("ws,{}\n", LABELS.join(","));
    for ws in wind_speeds() {
        let cells: Vec<String> = DENSITIES
            .iter()
            .map(|&rho| format!("{:.1}", round_to_sheet(power(ws, rho))))
            .collect();
        csv.push_str(&format!("{},{}\n", ws, cells.join(",")));
    }
    csv
}

/// `P = k·ρ·v³` on a small grid
pub fn cubic_entries(k: f64) -> Vec<PowerCurveEntry> {
    [1.0, 1.1, 1.2, 1.3]
        .iter()
        .flat_map(|&rho| {
            (3..=12).map(move |ws| {
                let ws = f64::from(ws);
                PowerCurveEntry::new(ws, rho, k * rho * ws.powi(3))
            })
        })
        .collect()
}

/// Relative error, guarded against zero expectations
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs().max(1e-12)
}
