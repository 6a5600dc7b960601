//! Surface fit configuration
//!
//! The defaults describe a deliberately near-interpolating fit: quadratic
//! local polynomials over a 2% neighbourhood, evaluated directly at every
//! query, with exact statistics. Manufacturer grids are small and trusted,
//! so the surface is meant to reproduce them rather than smooth them.

use serde::{Deserialize, Serialize};
use windguard_core::constants::reference::POWER_LAW_EXPONENT;
use windguard_core::{AnalysisError, AnalysisResult};

/// Default neighbourhood fraction
pub const DEFAULT_SPAN: f64 = 0.02;

/// Fraction trimmed from each end when estimating predictor scale
pub const NORMALIZE_TRIM: f64 = 0.1;

/// Degree of the local polynomial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degree {
    /// `1, a, b`
    Linear,
    /// `1, a, b, a², ab, b²`
    #[default]
    Quadratic,
}

impl Degree {
    /// Number of local polynomial terms
    pub const fn terms(self) -> usize {
        match self {
            Degree::Linear => 3,
            Degree::Quadratic => 6,
        }
    }

    /// Polynomial order
    pub const fn order(self) -> usize {
        match self {
            Degree::Linear => 1,
            Degree::Quadratic => 2,
        }
    }
}

/// How the surface is evaluated at a query point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMode {
    /// Solve the local regression at every query (no interpolation table)
    #[default]
    Direct,
}

/// Which fit statistics to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistics {
    /// Full operator matrix: equivalent parameters, residual scale, standard errors
    #[default]
    Exact,
    /// Skip the operator matrix; predictions carry no standard error
    Skip,
}

/// Local regression settings, one per turbine model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Local polynomial degree
    pub degree: Degree,
    /// Fraction of the grid in each local neighbourhood
    pub span: f64,
    /// Evaluation mode
    pub surface: SurfaceMode,
    /// Statistics to compute at fit time
    pub statistics: Statistics,
    /// Exponent `k` in the interaction predictor `ρ·v^k`
    pub wind_exponent: f64,
    /// Divide each predictor by its trimmed standard deviation
    pub normalize: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            degree: Degree::Quadratic,
            span: DEFAULT_SPAN,
            surface: SurfaceMode::Direct,
            statistics: Statistics::Exact,
            wind_exponent: POWER_LAW_EXPONENT,
            normalize: true,
        }
    }
}

impl SurfaceConfig {
    /// Tight-span quadratic fit that nearly reproduces the published grid
    pub fn near_interpolating() -> Self {
        Self::default()
    }

    /// Override the span
    pub fn with_span(mut self, span: f64) -> Self {
        self.span = span;
        self
    }

    /// Override the polynomial degree
    pub fn with_degree(mut self, degree: Degree) -> Self {
        self.degree = degree;
        self
    }

    /// Skip the exact statistics (faster fits, no standard errors)
    pub fn without_statistics(mut self) -> Self {
        self.statistics = Statistics::Skip;
        self
    }

    /// Reject settings no fit can use
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.span.is_finite() && self.span > 0.0) {
            return Err(AnalysisError::InvalidInput { field: "span" });
        }
        if !(self.wind_exponent.is_finite() && self.wind_exponent > 0.0) {
            return Err(AnalysisError::InvalidInput {
                field: "wind_exponent",
            });
        }
        Ok(())
    }

    /// Points in each local neighbourhood for a grid of `n` points
    pub fn neighbourhood_size(&self, n: usize) -> usize {
        let by_span = (n as f64 * self.span).floor() as usize;
        by_span.max(self.degree.terms()).min(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_near_interpolating() {
        let config = SurfaceConfig::near_interpolating();
        assert_eq!(config.degree, Degree::Quadratic);
        assert_eq!(config.span, 0.02);
        assert_eq!(config.surface, SurfaceMode::Direct);
        assert_eq!(config.statistics, Statistics::Exact);
        assert_eq!(config.wind_exponent, 3.0);
        assert!(config.normalize);
    }

    #[test]
    fn neighbourhood_never_below_polynomial_terms() {
        let config = SurfaceConfig::default();
        assert_eq!(config.neighbourhood_size(299), 6);
        assert_eq!(config.with_span(0.1).neighbourhood_size(299), 29);
        assert_eq!(config.neighbourhood_size(20), 6);
        assert_eq!(config.with_degree(Degree::Linear).neighbourhood_size(20), 3);
        assert_eq!(config.with_span(2.0).neighbourhood_size(20), 20);
    }

    #[test]
    fn invalid_settings_rejected() {
        assert_eq!(
            SurfaceConfig::default().with_span(0.0).validate(),
            Err(AnalysisError::InvalidInput { field: "span" })
        );
        assert!(SurfaceConfig::default().with_span(f64::NAN).validate().is_err());
        let config = SurfaceConfig {
            wind_exponent: -3.0,
            ..SurfaceConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(AnalysisError::InvalidInput {
                field: "wind_exponent"
            })
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SurfaceConfig =
            serde_json::from_str(r#"{"span": 0.2, "degree": "linear"}"#).unwrap();
        assert_eq!(config.span, 0.2);
        assert_eq!(config.degree, Degree::Linear);
        assert_eq!(config.statistics, Statistics::Exact);
        assert!(config.normalize);
    }
}
