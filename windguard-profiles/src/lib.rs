//! Turbine Profiles
//!
//! ## Overview
//!
//! A profile bundles everything needed to analyse one turbine model:
//!
//! - nameplate data (manufacturer, rated power, hub height)
//! - the manufacturer's reference power-curve sheet
//! - how that sheet's column headers map to air density
//! - the local regression settings used to fit its power surface
//! - the IEC reference conditions used to normalize its wind speeds
//!
//! Profiles are JSON documents with an optional sibling CSV sheet. A set of
//! generic profiles is embedded in the binary; more can be loaded from a
//! directory at runtime.
//!
//! ```json
//! {
//!   "name": "coastal_3mw",
//!   "manufacturer": "Generic",
//!   "rated_power_kw": 3000.0,
//!   "hub_height_m": 105.0,
//!   "surface": { "span": 0.2 },
//!   "density_codes": { "low": 1.0, "mid": 1.1, "reference": 1.225, "high": 1.3 },
//!   "power_curve_sheet": "coastal_3mw.csv"
//! }
//! ```
//!
//! Missing `surface` and `iec` sections fall back to their defaults
//! (quadratic, span 0.02, exact statistics; 1.225 kg/m³, turbulence factor 3).
//!
//! ## Usage Example
//!
//! ```
//! use windguard_profiles::ProfileRegistry;
//!
//! let registry = ProfileRegistry::new();
//! registry.load_defaults()?;
//!
//! let profile = registry.get("generic_2mw")?;
//! let model = profile.fit_surface()?;
//! let power = model.predictor().predict(9.0, 1.225)?;
//! assert!((power - 1000.0).abs() < 10.0);
//! # Ok::<(), windguard_profiles::ProfileError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

use windguard_core::AnalysisError;

pub mod profile;
pub mod registry;

pub use profile::TurbineProfile;
pub use registry::{ProfileRegistry, GLOBAL_REGISTRY};

/// Profile-related errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum ProfileError {
    /// Profile JSON could not be read
    #[error("Failed to parse profile: {0}")]
    Parse(String),

    /// No profile (or no sheet) under that name
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// Profile parsed but its contents are unusable
    #[error("Invalid profile: {0}")]
    Invalid(String),

    /// Reading a profile directory failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Table parsing, fitting or correction failed
    #[error("Analysis failed: {0}")]
    Analysis(AnalysisError),
}

impl From<AnalysisError> for ProfileError {
    fn from(err: AnalysisError) -> Self {
        ProfileError::Analysis(err)
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ProfileError {
    fn from(err: std::io::Error) -> Self {
        ProfileError::Io(err.to_string())
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
