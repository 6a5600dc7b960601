//! Turbine profile documents

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use windguard_core::{CorrectionPipeline, IecConfig, IecCorrector};
use windguard_surface::{
    DensityCodec, PowerCurveTable, PowerSurfaceModel, SurfaceConfig, SurfaceFitter,
};

use crate::ProfileError;

/// One turbine model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineProfile {
    /// Registry key, e.g. `"generic_2mw"`
    pub name: String,
    /// Manufacturer name
    pub manufacturer: String,
    /// Nameplate power (kW)
    pub rated_power_kw: f64,
    /// Hub height (m)
    pub hub_height_m: f64,
    /// Surface fit settings
    #[serde(default)]
    pub surface: SurfaceConfig,
    /// IEC reference conditions
    #[serde(default)]
    pub iec: IecConfig,
    /// Header label → air density, for sheets without numeric density codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_codes: Option<BTreeMap<String, f64>>,
    /// File name of the reference power-curve sheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_curve_sheet: Option<String>,

    #[serde(skip)]
    sheet: Option<String>,
}

impl TurbineProfile {
    /// Profile with default fit and correction settings and no sheet
    pub fn new(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        rated_power_kw: f64,
        hub_height_m: f64,
    ) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            rated_power_kw,
            hub_height_m,
            surface: SurfaceConfig::default(),
            iec: IecConfig::default(),
            density_codes: None,
            power_curve_sheet: None,
            sheet: None,
        }
    }

    /// Parse and validate a JSON profile
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize to pretty JSON (the sheet text itself is not included)
    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Attach the reference sheet text
    pub fn with_sheet(mut self, csv: impl Into<String>) -> Self {
        self.sheet = Some(csv.into());
        self
    }

    /// Reference sheet text, if one was attached
    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    /// Check nameplate data and both configs
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::Invalid("profile name is empty".to_string()));
        }
        if !(self.rated_power_kw.is_finite() && self.rated_power_kw > 0.0) {
            return Err(ProfileError::Invalid(format!(
                "{}: rated power must be positive",
                self.name
            )));
        }
        if !(self.hub_height_m.is_finite() && self.hub_height_m > 0.0) {
            return Err(ProfileError::Invalid(format!(
                "{}: hub height must be positive",
                self.name
            )));
        }
        self.surface.validate()?;
        IecCorrector::new(self.iec)?;
        Ok(())
    }

    /// Header decoding for this profile's sheet
    pub fn density_codec(&self) -> DensityCodec {
        match &self.density_codes {
            Some(map) => DensityCodec::Explicit(map.clone()),
            None => DensityCodec::Heuristic,
        }
    }

    /// Parse the attached sheet
    pub fn power_curve(&self) -> Result<PowerCurveTable, ProfileError> {
        let sheet = self.sheet.as_deref().ok_or_else(|| {
            ProfileError::NotFound(format!("{}: no reference power curve attached", self.name))
        })?;
        Ok(PowerCurveTable::from_csv(sheet, &self.density_codec())?)
    }

    /// Fit the power surface with this profile's settings
    pub fn fit_surface(&self) -> Result<PowerSurfaceModel, ProfileError> {
        let table = self.power_curve()?;
        let model = SurfaceFitter::new(self.surface)?.fit(&table)?;
        log::debug!("{}: fitted surface over {} points", self.name, model.len());
        Ok(model)
    }

    /// Wind speed corrector for this profile's reference conditions
    pub fn corrector(&self) -> Result<IecCorrector, ProfileError> {
        Ok(IecCorrector::new(self.iec)?)
    }

    /// Batch SCADA correction pipeline for this profile
    pub fn pipeline(&self) -> Result<CorrectionPipeline, ProfileError> {
        Ok(CorrectionPipeline::new(self.iec)?)
    }
}
