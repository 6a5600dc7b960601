//! Common test utilities and SCADA data generators for integration tests
//!
//! This module provides:
//! - A deterministic generator for 10-minute SCADA rows with realistic
//!   diurnal temperature, pressure and humidity swings
//! - Fault injection (sensor dropouts, calm periods)
//! - Tolerance helpers

#![allow(dead_code)]

use windguard_core::ScadaRecord;

/// Ten minutes in milliseconds
pub const PERIOD_MS: u64 = 600_000;

/// Deterministic SCADA row generator
pub struct ScadaGenerator {
    seed: u32,
    start_ms: u64,
}

impl ScadaGenerator {
    /// Create a generator starting at `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self {
            seed: 0x1234_5678,
            start_ms,
        }
    }

    /// Generate `count` rows for one turbine.
    ///
    /// Simulates:
    /// - Diurnal temperature cycle around `base_temp`
    /// - Humidity inversely correlated with temperature
    /// - Slow pressure drift
    /// - Turbulence intensity around 10%
    pub fn generate(&mut self, device_id: &str, base_temp: f64, count: usize) -> Vec<ScadaRecord> {
        (0..count)
            .map(|i| {
                let hours = i as f64 / 6.0;
                let diurnal = 4.0 * (2.0 * std::f64::consts::PI * hours / 24.0).sin();
                let temperature = base_temp + diurnal + self.noise(0.3);
                let humidity = (70.0 - 2.0 * diurnal + self.noise(3.0)).clamp(5.0, 100.0);
                let pressure = 1008.0 + 6.0 * (2.0 * std::f64::consts::PI * hours / 72.0).sin();
                let wind_speed = (8.0 + 3.0 * self.noise(1.0)).max(0.5);
                let wind_speed_std = wind_speed * (0.1 + 0.02 * self.noise(1.0)).abs();

                ScadaRecord {
                    device_id: device_id.to_string(),
                    timestamp: self.start_ms + i as u64 * PERIOD_MS,
                    wind_speed,
                    wind_speed_std,
                    power: 0.0,
                    temperature,
                    pressure,
                    humidity: Some(humidity),
                    dew_point: None,
                }
            })
            .collect()
    }

    /// Knock out readings: every `every`-th row loses its humidity, and the
    /// listed rows become calm (zero wind) or lose their temperature
    pub fn inject_faults(
        records: &mut [ScadaRecord],
        humidity_dropout_every: usize,
        calm_rows: &[usize],
        temperature_dropouts: &[usize],
    ) {
        for (i, record) in records.iter_mut().enumerate() {
            if humidity_dropout_every > 0 && i % humidity_dropout_every == 0 {
                record.humidity = None;
            }
        }
        for &i in calm_rows {
            records[i].wind_speed = 0.0;
            records[i].wind_speed_std = 0.0;
        }
        for &i in temperature_dropouts {
            records[i].temperature = f64::NAN;
        }
    }

    // Uniform noise in [-amplitude, amplitude]
    fn noise(&mut self, amplitude: f64) -> f64 {
        self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let uniform = (self.seed >> 8) as f64 / 16_777_216.0;
        (uniform - 0.5) * 2.0 * amplitude
    }
}

/// Relative difference helper
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs().max(f64::MIN_POSITIVE)
}
