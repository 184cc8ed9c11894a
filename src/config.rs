//! System Configuration Module
//!
//! Collects every physical parameter of the modelled PV system in one place.
//! Values come from defaults, an optional JSON file and command-line flags,
//! in increasing order of precedence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigSource, EstimateError, Result};
use crate::irradiance::SkyDiffuseModel;
use crate::temperature::MountingType;

// ===================== DEFAULTS =====================

/// Panel tilt from horizontal (degrees)
pub const DEFAULT_TILT_DEG: f64 = 20.0;

/// Panel azimuth (degrees, 180 = south)
pub const DEFAULT_AZIMUTH_DEG: f64 = 180.0;

/// Module DC rating at 1000 W/m² and 25 °C (W)
pub const DEFAULT_RATED_POWER_W: f64 = 240.0;

/// Power temperature coefficient (1/°C)
pub const DEFAULT_GAMMA_PDC: f64 = -0.004;

/// Ground albedo, same default as pvlib's transposition
pub const DEFAULT_ALBEDO: f64 = 0.25;

/// Linke turbidity for a clear, rural atmosphere
pub const DEFAULT_LINKE_TURBIDITY: f64 = 3.0;

pub const DEFAULT_AMBIENT_TEMPERATURE_C: f64 = 20.0;
pub const DEFAULT_WIND_SPEED_MS: f64 = 1.0;
pub const DEFAULT_STEP_MINUTES: u32 = 10;

// ===================== CONFIGURATION =====================

/// Physical description of the PV system and its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Panel tilt from horizontal in degrees (0 = flat, 90 = vertical)
    pub tilt_deg: f64,
    /// Panel azimuth in degrees (0 = north, 90 = east, 180 = south)
    pub azimuth_deg: f64,
    /// Mounting type, selects the cell-temperature coefficients
    pub mounting: MountingType,
    /// DC power at reference conditions (W)
    pub rated_power_w: f64,
    /// Relative change of DC power per °C away from 25 °C
    pub gamma_pdc: f64,
    /// Site elevation used for the reference pressure (m)
    pub elevation_m: f64,
    /// Ground reflectance (0.0 - 1.0)
    pub albedo: f64,
    /// Linke turbidity factor for the clear-sky model
    pub linke_turbidity: f64,
    /// Sky diffuse transposition model
    pub sky_model: SkyDiffuseModel,
    /// Ambient air temperature (°C)
    pub ambient_temperature_c: f64,
    /// Wind speed at 10 m (m/s)
    pub wind_speed_ms: f64,
    /// Intraday sampling step (minutes)
    pub step_minutes: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            tilt_deg: DEFAULT_TILT_DEG,
            azimuth_deg: DEFAULT_AZIMUTH_DEG,
            mounting: MountingType::default(),
            rated_power_w: DEFAULT_RATED_POWER_W,
            gamma_pdc: DEFAULT_GAMMA_PDC,
            elevation_m: 0.0,
            albedo: DEFAULT_ALBEDO,
            linke_turbidity: DEFAULT_LINKE_TURBIDITY,
            sky_model: SkyDiffuseModel::default(),
            ambient_temperature_c: DEFAULT_AMBIENT_TEMPERATURE_C,
            wind_speed_ms: DEFAULT_WIND_SPEED_MS,
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }
}

impl SystemConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let wrap = |source: ConfigSource| EstimateError::Config { path: path.to_path_buf(), source };

        let content = std::fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| wrap(e.into()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_orientation(mut self, tilt_deg: f64, azimuth_deg: f64) -> Self {
        self.tilt_deg = tilt_deg;
        self.azimuth_deg = azimuth_deg;
        self
    }

    pub fn with_rated_power(mut self, rated_power_w: f64) -> Self {
        self.rated_power_w = rated_power_w;
        self
    }

    pub fn with_mounting(mut self, mounting: MountingType) -> Self {
        self.mounting = mounting;
        self
    }

    pub fn with_sky_model(mut self, sky_model: SkyDiffuseModel) -> Self {
        self.sky_model = sky_model;
        self
    }

    pub fn with_step_minutes(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }

    /// Check every field against its physical range.
    pub fn validate(&self) -> Result<()> {
        check_range("tilt", self.tilt_deg, 0.0, 90.0)?;
        check_range("azimuth", self.azimuth_deg, 0.0, 360.0)?;
        check_range("gamma_pdc", self.gamma_pdc, -0.1, 0.1)?;
        check_range("elevation", self.elevation_m, -500.0, 11000.0)?;
        check_range("albedo", self.albedo, 0.0, 1.0)?;
        check_range("linke_turbidity", self.linke_turbidity, 1.0, 10.0)?;
        check_range("ambient_temperature", self.ambient_temperature_c, -90.0, 60.0)?;
        check_range("wind_speed", self.wind_speed_ms, 0.0, 60.0)?;

        if !(self.rated_power_w.is_finite() && self.rated_power_w > 0.0) {
            return Err(EstimateError::invalid_input(format!(
                "rated power must be positive, got {}",
                self.rated_power_w
            )));
        }
        if !(1..=180).contains(&self.step_minutes) {
            return Err(EstimateError::invalid_input(format!(
                "step must be between 1 and 180 minutes, got {}",
                self.step_minutes
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    // NaN fails the contains check as well
    if !(min..=max).contains(&value) {
        return Err(EstimateError::invalid_input(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

// ===================== TESTS =====================
