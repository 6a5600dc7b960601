//! Error Types for Wind Performance Analysis
//!
//! ## Design Philosophy
//!
//! WindGuard runs the same error type through every stage, from a single
//! atmospheric sample up to a fitted power surface:
//!
//! 1. **Small Size**: Variants carry only `&'static str` context so the enum
//!    stays `Copy` and can be collected per record without allocation.
//!
//! 2. **No Heap Allocation**: The core crate compiles without `std`; errors
//!    must not require an allocator.
//!
//! 3. **Actionable Information**: The variant tells the caller what to do.
//!    Bad input is dropped, a degenerate record is flagged, a malformed sheet
//!    is sent back to its author, a failed fit needs a different grid or
//!    configuration.
//!
//! ## Error Categories
//!
//! ### Input Problems
//! - `InvalidInput`: a required field is missing, non-finite or physically
//!   impossible (temperature below absolute zero, negative wind speed)
//!
//! ### Arithmetic Problems
//! - `NumericDegeneracy`: the formula is undefined for this input, e.g. a
//!   turbulence ratio with zero mean wind speed
//!
//! ### Data Structure Problems
//! - `FormatMismatch`: the manufacturer sheet lacks the expected columns or
//!   density codes
//! - `FitFailure`: the power-curve grid cannot support a local regression
//!   surface
//!
//! Recoverable conditions (missing humidity, clamped partial pressures) are
//! *not* errors. They come back as diagnostics on the result.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use windguard_core::{iec_corr, AnalysisError};
//!
//! fn corrected_or_skip(ws: f64, ws_std: f64, rho: f64) -> Option<f64> {
//!     match iec_corr(ws, ws_std, rho) {
//!         Ok(corrected) => Some(corrected),
//!         Err(AnalysisError::NumericDegeneracy { .. }) => {
//!             // Calm period - no turbulence ratio exists
//!             None
//!         }
//!         Err(AnalysisError::InvalidInput { .. }) => {
//!             // Sensor dropout
//!             None
//!         }
//!         Err(_) => None,
//!     }
//! }
//!
//! assert_eq!(corrected_or_skip(0.0, 0.5, 1.225), None);
//! ```

use thiserror_no_std::Error;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Analysis errors - kept `Copy` so per-record failures can be collected cheaply
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AnalysisError {
    /// A required input is missing, non-finite or outside its physical domain
    #[error("Invalid input: {field}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
    },

    /// The formula is undefined for the given input
    #[error("Numeric degeneracy: {reason}")]
    NumericDegeneracy {
        /// What made the computation undefined
        reason: &'static str,
    },

    /// The manufacturer sheet does not have the expected structure
    #[error("Format mismatch: {reason}")]
    FormatMismatch {
        /// Which structural expectation failed
        reason: &'static str,
    },

    /// The power-curve grid cannot support a surface fit
    #[error("Surface fit failed: {reason}")]
    FitFailure {
        /// Why the grid was rejected
        reason: &'static str,
    },
}

impl AnalysisError {
    /// Short machine-friendly category name, useful for grouping rejections
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::NumericDegeneracy { .. } => "numeric_degeneracy",
            Self::FormatMismatch { .. } => "format_mismatch",
            Self::FitFailure { .. } => "fit_failure",
        }
    }
}
