//! Batch correction of SCADA records
//!
//! Each record goes through the same two pure steps:
//!
//! ```text
//! ScadaRecord ──> AirDensityEstimator ──> IecCorrector ──> CorrectedRecord
//!                        │                     │
//!                        └──── error ──────────┴──> RejectedRecord { index, error }
//! ```
//!
//! A bad row never stops the batch. With the `parallel` feature the rows are
//! processed on the rayon pool; output order always matches input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::atmosphere::{AirDensityEstimator, DensityDiagnostic, DensityFormula};
use crate::errors::{AnalysisError, AnalysisResult};
use crate::iec::{IecConfig, IecCorrector};
use crate::records::{CorrectedRecord, RejectedRecord, ScadaRecord};

/// Counters for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CorrectionStats {
    /// Records in the batch
    pub total: usize,
    /// Records corrected
    pub corrected: usize,
    /// Records rejected
    pub rejected: usize,
    /// Corrected records that used the moist-air formula
    pub moist_air: usize,
    /// Corrected records that fell back to dry air
    pub dry_air_fallbacks: usize,
    /// Corrected records whose humidity came from the dew point
    pub dew_point_derivations: usize,
    /// Corrected records with a clamped partial pressure
    pub clamped_pressures: usize,
    /// Rejections caused by `NumericDegeneracy` (calm periods)
    pub degenerate: usize,
}

impl CorrectionStats {
    /// Fraction of the batch that was corrected
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.corrected as f64 / self.total as f64
        }
    }
}

/// Output of [`CorrectionPipeline::run`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorrectionReport {
    /// Successfully corrected rows, in input order
    pub corrected: Vec<CorrectedRecord>,
    /// Rows that failed, in input order
    pub rejected: Vec<RejectedRecord>,
    /// Batch counters
    pub stats: CorrectionStats,
}

impl CorrectionReport {
    /// Corrected wind speed column
    pub fn corrected_wind_speeds(&self) -> Vec<f64> {
        self.corrected
            .iter()
            .map(|r| r.corrected_wind_speed)
            .collect()
    }

    /// Air density column
    pub fn air_densities(&self) -> Vec<f64> {
        self.corrected.iter().map(CorrectedRecord::air_density).collect()
    }
}

/// Density estimation followed by IEC correction, applied per record
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectionPipeline {
    estimator: AirDensityEstimator,
    corrector: IecCorrector,
}

impl CorrectionPipeline {
    /// Pipeline with explicit reference conditions
    pub fn new(config: IecConfig) -> AnalysisResult<Self> {
        Ok(Self {
            estimator: AirDensityEstimator::default(),
            corrector: IecCorrector::new(config)?,
        })
    }

    /// Replace the density estimator
    pub fn with_estimator(mut self, estimator: AirDensityEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Correct a single record
    pub fn correct_one(&self, record: &ScadaRecord) -> AnalysisResult<CorrectedRecord> {
        let density = self.estimator.estimate_sample(&record.atmospheric_sample())?;
        let corrected_wind_speed = self
            .corrector
            .correct_record(&record.wind_speed_record(density.density))?;
        Ok(CorrectedRecord {
            record: record.clone(),
            density,
            corrected_wind_speed,
        })
    }

    /// Correct a batch, collecting failures instead of stopping
    pub fn run(&self, records: &[ScadaRecord]) -> CorrectionReport {
        #[cfg(feature = "parallel")]
        let outcomes: Vec<AnalysisResult<CorrectedRecord>> =
            records.par_iter().map(|r| self.correct_one(r)).collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<AnalysisResult<CorrectedRecord>> =
            records.iter().map(|r| self.correct_one(r)).collect();

        let mut report = CorrectionReport {
            stats: CorrectionStats {
                total: records.len(),
                ..CorrectionStats::default()
            },
            ..CorrectionReport::default()
        };

        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(corrected) => {
                    Self::tally(&mut report.stats, &corrected);
                    report.corrected.push(corrected);
                }
                Err(error) => {
                    log::warn!(
                        "record {} ({}) rejected: {}",
                        index,
                        records[index].device_id,
                        error
                    );
                    if matches!(error, AnalysisError::NumericDegeneracy { .. }) {
                        report.stats.degenerate += 1;
                    }
                    report.rejected.push(RejectedRecord { index, error });
                }
            }
        }

        report.stats.corrected = report.corrected.len();
        report.stats.rejected = report.rejected.len();
        log::debug!(
            "corrected {}/{} records ({} dry-air fallbacks)",
            report.stats.corrected,
            report.stats.total,
            report.stats.dry_air_fallbacks
        );
        report
    }

    fn tally(stats: &mut CorrectionStats, corrected: &CorrectedRecord) {
        let density = &corrected.density;
        if density.formula == DensityFormula::MoistAir {
            stats.moist_air += 1;
        }
        if density.has(DensityDiagnostic::DryAirFallback) {
            stats.dry_air_fallbacks += 1;
        }
        if density.has(DensityDiagnostic::HumidityFromDewPoint) {
            stats.dew_point_derivations += 1;
        }
        if density.has(DensityDiagnostic::PartialPressureClamped) {
            stats.clamped_pressures += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ws: f64, std: f64, t: f64, rh: Option<f64>) -> ScadaRecord {
        ScadaRecord {
            device_id: "WTG01".to_string(),
            timestamp: 1_600_000_000_000,
            wind_speed: ws,
            wind_speed_std: std,
            power: 850.0,
            temperature: t,
            pressure: 1013.25,
            humidity: rh,
            dew_point: None,
        }
    }

    #[test]
    fn corrects_good_rows_and_keeps_order() {
        let rows = vec![
            record(6.0, 0.5, 10.0, Some(60.0)),
            record(0.0, 0.0, 10.0, Some(60.0)),
            record(9.0, 1.0, f64::NAN, None),
            record(11.0, 1.1, 15.0, None),
        ];
        let report = CorrectionPipeline::default().run(&rows);

        assert_eq!(report.stats.total, 4);
        assert_eq!(report.stats.corrected, 2);
        assert_eq!(report.corrected[0].record.wind_speed, 6.0);
        assert_eq!(report.corrected[1].record.wind_speed, 11.0);

        let indices: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(matches!(
            report.rejected[0].error,
            AnalysisError::NumericDegeneracy { .. }
        ));
        assert_eq!(
            report.rejected[1].error,
            AnalysisError::InvalidInput { field: "temperature" }
        );
        assert_eq!(report.stats.degenerate, 1);
    }

    #[test]
    fn stats_count_formula_paths() {
        let mut dew = record(7.0, 0.7, 12.0, None);
        dew.dew_point = Some(8.0);
        let rows = vec![
            record(7.0, 0.7, 12.0, Some(70.0)),
            record(7.0, 0.7, 12.0, None),
            dew,
        ];
        let stats = CorrectionPipeline::default().run(&rows).stats;
        assert_eq!(stats.moist_air, 2);
        assert_eq!(stats.dry_air_fallbacks, 1);
        assert_eq!(stats.dew_point_derivations, 1);
        assert_eq!(stats.clamped_pressures, 0);
        assert_eq!(stats.success_rate(), 1.0);
    }

    #[test]
    fn reference_conditions_leave_speed_unchanged() {
        // Dry air at 15°C / 1013.25 hPa is within 0.002% of 1.225
        let rows = vec![record(10.0, 0.0, 15.0, None)];
        let report = CorrectionPipeline::default().run(&rows);
        assert!((report.corrected_wind_speeds()[0] - 10.0).abs() < 1e-3);
        assert!((report.air_densities()[0] - 1.225).abs() < 1e-4);
    }

    #[test]
    fn empty_batch() {
        let report = CorrectionPipeline::default().run(&[]);
        assert!(report.corrected.is_empty());
        assert_eq!(report.stats.success_rate(), 0.0);
    }
}
