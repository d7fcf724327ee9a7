use crate::constants::*;
use crate::error::MagellanError;
use crate::oblique::Obliquity;
use serde::{Deserialize, Serialize};

/// Numeric parameters for one track reconstruction.
///
/// Angles are in degrees, lengths in km, magnetization in A/m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub thickness_km: f64,
    pub declination_deg: f64,
    pub inclination_deg: f64,
    /// Ridge azimuth relative to north
    pub azimuth_deg: f64,
    /// Angle between the track and the ridge-perpendicular
    pub obliquity_deg: f64,
    pub susceptibility: f64,
    pub default_magnetization: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            thickness_km: DEFAULT_THICKNESS_KM,
            declination_deg: DEFAULT_DECLINATION_DEG,
            inclination_deg: DEFAULT_INCLINATION_DEG,
            azimuth_deg: DEFAULT_AZIMUTH_DEG,
            obliquity_deg: DEFAULT_OBLIQUITY_DEG,
            susceptibility: DEFAULT_SUSCEPTIBILITY,
            default_magnetization: DEFAULT_MAGNETIZATION_A_PER_M,
        }
    }
}

impl ModelParams {
    /// Parse parameters from JSON; missing fields keep their defaults.
    ///
    /// # Arguments
    /// * `json` - An object such as `{"inclination_deg": 60.0}`
    ///
    /// # Returns
    /// The parameters, or `MagellanError::Json` when the text is not valid
    pub fn from_json_str(json: &str) -> Result<Self, MagellanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse `item = value` style settings.
    ///
    /// Keys are matched case-insensitively. Only the numeric model settings
    /// are read (`thickness`, `declination`, `inclination`, `azimuth`,
    /// `obliquity`, `susceptibility`, `default magnetization`); anything
    /// else, such as input file locations, is ignored.
    ///
    /// # Arguments
    /// * `pairs` - Key/value pairs as read from a settings source
    ///
    /// # Returns
    /// The parameters, or `NonNumericParameter` for a numeric key whose value
    /// does not parse
    pub fn from_key_values<'a, I>(pairs: I) -> Result<Self, MagellanError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = ModelParams::default();

        for (key, value) in pairs {
            let key = key.trim().to_lowercase();
            let slot = match key.as_str() {
                "thickness" => &mut params.thickness_km,
                "declination" => &mut params.declination_deg,
                "inclination" => &mut params.inclination_deg,
                "azimuth" => &mut params.azimuth_deg,
                "obliquity" => &mut params.obliquity_deg,
                "susceptibility" => &mut params.susceptibility,
                "default magnetization" => &mut params.default_magnetization,
                _ => continue,
            };
            *slot = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| MagellanError::NonNumericParameter {
                    key: key.clone(),
                    value: value.to_string(),
                })?;
        }

        Ok(params)
    }

    pub fn obliquity(&self) -> Result<Obliquity, MagellanError> {
        Obliquity::from_degrees(self.obliquity_deg)
    }

    pub fn field_geometry(&self) -> FieldGeometry {
        let inclination = self.inclination_deg.to_radians();
        let azimuth_minus_declination = (self.azimuth_deg - self.declination_deg).to_radians();
        FieldGeometry {
            sin_i: inclination.sin(),
            cos_i: inclination.cos(),
            cos_az_minus_dec: azimuth_minus_declination.cos(),
        }
    }

    /// Scale from layer magnetization to the effective value used by the
    /// edge formulas.
    pub fn magnetization_scale(&self) -> f64 {
        1.0 / (self.susceptibility * CGS_SUSCEPTIBILITY_FACTOR)
    }
}

/// Trigonometric terms of the ambient field, computed once per track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub sin_i: f64,
    pub cos_i: f64,
    pub cos_az_minus_dec: f64,
}

impl FieldGeometry {
    /// Horizontal and vertical magnetization components for `magnetization`.
    pub fn components(&self, magnetization: f64) -> (f64, f64) {
        (
            magnetization * self.cos_i * self.cos_az_minus_dec,
            magnetization * self.sin_i,
        )
    }

    /// Project vertical and horizontal field onto the total-field direction.
    pub fn total_field(&self, vertical: f64, horizontal: f64) -> f64 {
        vertical * self.sin_i + horizontal * self.cos_i * self.cos_az_minus_dec
    }
}
