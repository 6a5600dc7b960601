//! Input checking shared by the estimators
//!
//! Keep it simple: every physical input is an `f64`, and each one either
//! passes through unchanged or turns into an `InvalidInput` naming the field.

use crate::errors::{AnalysisError, AnalysisResult};

/// Trait for values that can be validated
pub trait Validatable: Sized + Copy {
    /// Check if the value is physically usable (not NaN or infinite)
    fn is_valid(&self) -> bool;

    /// Pass the value through, or fail with `InvalidInput { field }`
    fn require_valid(self, field: &'static str) -> AnalysisResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(AnalysisError::InvalidInput { field })
        }
    }

    /// Like [`require_valid`](Self::require_valid), additionally rejecting negatives
    fn require_non_negative(self, field: &'static str) -> AnalysisResult<Self>;
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }

    fn require_non_negative(self, field: &'static str) -> AnalysisResult<Self> {
        if self.is_finite() && self >= 0.0 {
            Ok(self)
        } else {
            Err(AnalysisError::InvalidInput { field })
        }
    }
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }

    fn require_non_negative(self, field: &'static str) -> AnalysisResult<Self> {
        if self.is_finite() && self >= 0.0 {
            Ok(self)
        } else {
            Err(AnalysisError::InvalidInput { field })
        }
    }
}
