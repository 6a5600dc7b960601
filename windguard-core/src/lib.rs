//! Core physics for WindGuard
//!
//! Turns per-record SCADA atmospheric readings into air density and
//! normalizes measured wind speed to reference conditions.
//!
//! Key constraints:
//! - Every per-record transform is a pure function
//! - Recoverable conditions come back as diagnostics, never as log output
//! - Arithmetic degeneracies are errors, never NaN
//!
//! ```
//! use windguard_core::{AirDensityEstimator, DensityFormula, IecCorrector};
//!
//! let estimator = AirDensityEstimator::default();
//! let estimate = estimator.estimate(10.0, 1005.0, Some(65.0)).unwrap();
//! assert_eq!(estimate.formula, DensityFormula::MoistAir);
//!
//! let corrector = IecCorrector::default();
//! let corrected = corrector.correct(8.4, 1.1, estimate.density).unwrap();
//! assert!(corrected > 8.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod atmosphere;
pub mod constants;
pub mod errors;
pub mod iec;
pub mod traits;

#[cfg(feature = "std")]
pub mod pipeline;
#[cfg(feature = "std")]
pub mod records;

// Public API
pub use atmosphere::{
    AirDensityEstimator, AtmosphericSample, DensityDiagnostic, DensityEstimate, DensityFormula,
    DewPointHumidityEstimator,
};
pub use errors::{AnalysisError, AnalysisResult};
pub use iec::{iec_ad, iec_corr, iec_turb, IecConfig, IecCorrector, WindSpeedRecord};
pub use traits::Validatable;

#[cfg(feature = "std")]
pub use pipeline::{CorrectionPipeline, CorrectionReport, CorrectionStats};
#[cfg(feature = "std")]
pub use records::{CorrectedRecord, RejectedRecord, ScadaRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
