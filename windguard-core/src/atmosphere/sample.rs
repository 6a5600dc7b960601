/// One set of atmospheric readings taken alongside a SCADA record.
///
/// Humidity may be supplied directly, derived from the dew point, or be
/// missing entirely; the estimator picks whichever is available.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtmosphericSample {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Station pressure (hPa)
    pub pressure: f64,
    /// Relative humidity (%)
    pub humidity: Option<f64>,
    /// Dew point temperature (°C)
    pub dew_point: Option<f64>,
}

impl AtmosphericSample {
    /// Dry reading: temperature and pressure only
    pub const fn new(temperature: f64, pressure: f64) -> Self {
        Self {
            temperature,
            pressure,
            humidity: None,
            dew_point: None,
        }
    }

    /// Attach a relative humidity reading (%)
    pub const fn with_humidity(mut self, humidity: f64) -> Self {
        self.humidity = Some(humidity);
        self
    }

    /// Attach a dew point reading (°C)
    pub const fn with_dew_point(mut self, dew_point: f64) -> Self {
        self.dew_point = Some(dew_point);
        self
    }

    /// Humidity that counts as present. A NaN from a dropped sensor is the
    /// same as no reading.
    pub fn usable_humidity(&self) -> Option<f64> {
        self.humidity.filter(|rh| rh.is_finite())
    }

    /// Dew point that counts as present
    pub fn usable_dew_point(&self) -> Option<f64> {
        self.dew_point.filter(|td| td.is_finite())
    }
}
