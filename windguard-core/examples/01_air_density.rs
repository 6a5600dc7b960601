//! Air Density Example
//!
//! Estimates air density for a handful of met-mast readings and shows
//! which formula each one used.
//!
//! ## What You'll Learn
//!
//! - Dry-air versus moist-air estimation
//! - Deriving humidity from a dew point
//! - Reading the diagnostics attached to every estimate
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_air_density
//! ```

use windguard_core::{AirDensityEstimator, AtmosphericSample, DensityDiagnostic};

fn main() {
    println!("WindGuard Air Density Example");
    println!("=============================\n");

    let estimator = AirDensityEstimator::default();

    let samples = [
        ("ISA sea level", AtmosphericSample::new(15.0, 1013.25)),
        ("humid summer", AtmosphericSample::new(30.0, 1000.0).with_humidity(80.0)),
        ("winter, dew point only", AtmosphericSample::new(-5.0, 1025.0).with_dew_point(-8.0)),
        ("fogged sensor", AtmosphericSample::new(4.0, 1010.0).with_dew_point(5.5)),
        ("humidity dropout", AtmosphericSample::new(12.0, 995.0).with_humidity(f64::NAN)),
        ("broken thermometer", AtmosphericSample::new(f64::NAN, 1000.0)),
    ];

    for (label, sample) in &samples {
        match estimator.estimate_sample(sample) {
            Ok(estimate) => {
                println!("{label:<24} ρ = {:.4} kg/m³ ({:?})", estimate.density, estimate.formula);
                for diagnostic in &estimate.diagnostics {
                    let note = match diagnostic {
                        DensityDiagnostic::DryAirFallback => "no humidity, dry air assumed",
                        DensityDiagnostic::HumidityFromDewPoint => "humidity from dew point",
                        DensityDiagnostic::DewPointAboveTemperature => "dew point above temperature",
                        DensityDiagnostic::PartialPressureClamped => "partial pressure clamped",
                    };
                    println!("{:<24}   - {note}", "");
                }
            }
            Err(e) => println!("{label:<24} rejected: {e}"),
        }
    }
}
