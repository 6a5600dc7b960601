//! IEC Correction Example
//!
//! Runs a small batch of SCADA rows through density estimation and IEC
//! wind speed normalization.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_iec_correction
//! ```

use windguard_core::{iec_ad, iec_corr, iec_turb, CorrectionPipeline, ScadaRecord};

fn row(minute: u64, ws: f64, std: f64, t: f64, rh: Option<f64>) -> ScadaRecord {
    ScadaRecord {
        device_id: "WTG01".into(),
        timestamp: minute * 60_000,
        wind_speed: ws,
        wind_speed_std: std,
        power: 0.0,
        temperature: t,
        pressure: 1008.0,
        humidity: rh,
        dew_point: None,
    }
}

fn main() {
    println!("WindGuard IEC Correction Example");
    println!("================================\n");

    println!("Single-step adjustments at 8 m/s:");
    if let (Ok(ad), Ok(turb), Ok(corr)) = (iec_ad(8.0, 1.10), iec_turb(8.0, 1.2), iec_corr(8.0, 1.2, 1.10)) {
        println!("  density only (ρ=1.10):      {ad:.3} m/s");
        println!("  turbulence only (σ=1.2):    {turb:.3} m/s");
        println!("  both:                       {corr:.3} m/s\n");
    }

    let rows = vec![
        row(0, 7.8, 0.9, 18.0, Some(55.0)),
        row(10, 8.4, 1.1, 17.5, Some(58.0)),
        row(20, 0.0, 0.0, 17.0, Some(60.0)),
        row(30, 9.1, 1.0, 16.0, None),
    ];

    let report = CorrectionPipeline::default().run(&rows);

    println!("{:>6} {:>8} {:>10} {:>10}", "min", "raw", "ρ", "corrected");
    for corrected in &report.corrected {
        println!(
            "{:>6} {:>8.2} {:>10.4} {:>10.3}",
            corrected.record.timestamp / 60_000,
            corrected.record.wind_speed,
            corrected.air_density(),
            corrected.corrected_wind_speed
        );
    }
    for rejected in &report.rejected {
        println!("row {} rejected: {}", rejected.index, rejected.error);
    }

    println!(
        "\n{}/{} corrected, {} dry-air fallbacks",
        report.stats.corrected, report.stats.total, report.stats.dry_air_fallbacks
    );
}
