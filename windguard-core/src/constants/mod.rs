//! Constants for WindGuard Core
//!
//! Centralized numeric values used by the estimators and correctors. Each
//! constant names its unit and, where one exists, the standard it comes from.
//!
//! ## Organization
//!
//! - **Physics**: gas constants, unit conversions, vapour-pressure fits
//! - **Reference**: IEC normalization baselines and prediction-grid steps
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include the unit in the name
//! 3. Reference the standard or paper the value comes from

/// Physical constants for air density and humidity calculations.
pub mod physics;

/// Reference conditions for IEC-style normalization and surface evaluation.
pub mod reference;
