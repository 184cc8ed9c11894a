//! DC Power Module
//!
//! Linear irradiance/temperature power model: output scales with
//! plane-of-array irradiance and derates linearly with cell temperature.

use serde::Serialize;

use crate::config::SystemConfig;

/// Irradiance at which the module delivers its rated power (W/m²)
const REFERENCE_IRRADIANCE: f64 = 1000.0;

/// Cell temperature at which the module delivers its rated power (°C)
const REFERENCE_CELL_TEMP_C: f64 = 25.0;

/// Nameplate ratings of the module
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModuleRating {
    /// DC power at 1000 W/m² and 25 °C (W)
    pub rated_power_w: f64,
    /// Temperature coefficient of power (1/°C)
    pub gamma_pdc: f64,
}

impl From<&SystemConfig> for ModuleRating {
    fn from(config: &SystemConfig) -> Self {
        Self { rated_power_w: config.rated_power_w, gamma_pdc: config.gamma_pdc }
    }
}

/// DC output for one timestamp
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PowerSample {
    pub dc_power_w: f64,
}

/// DC power from effective irradiance and cell temperature.
///
/// # Arguments
/// * `poa_global` - Plane-of-array irradiance (W/m²)
/// * `cell_temp_c` - Cell temperature (°C)
/// * `rating` - Module nameplate ratings
pub fn dc_power(poa_global: f64, cell_temp_c: f64, rating: &ModuleRating) -> PowerSample {
    let temperature_factor = 1.0 + rating.gamma_pdc * (cell_temp_c - REFERENCE_CELL_TEMP_C);
    let dc_power_w = poa_global / REFERENCE_IRRADIANCE * rating.rated_power_w * temperature_factor;
    PowerSample { dc_power_w: dc_power_w.max(0.0) }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    const RATING: ModuleRating = ModuleRating { rated_power_w: 240.0, gamma_pdc: -0.004 };

    #[test]
    fn test_reference_conditions_give_rated_power() {
        let p = dc_power(1000.0, 25.0, &RATING);
        assert!((p.dc_power_w - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_hot_cells_lose_power() {
        // 50 °C: 1 - 0.004 * 25 = 0.9
        let p = dc_power(1000.0, 50.0, &RATING);
        assert!((p.dc_power_w - 216.0).abs() < 1e-9);

        let cold = dc_power(1000.0, 0.0, &RATING);
        assert!(cold.dc_power_w > 240.0);
    }

    #[test]
    fn test_power_is_linear_in_rating() {
        let double = ModuleRating { rated_power_w: 480.0, ..RATING };
        let a = dc_power(640.0, 38.0, &RATING);
        let b = dc_power(640.0, 38.0, &double);
        assert!((b.dc_power_w - 2.0 * a.dc_power_w).abs() < 1e-9);
    }

    #[test]
    fn test_dark_panel_produces_nothing() {
        assert_eq!(dc_power(0.0, 10.0, &RATING).dc_power_w, 0.0);
    }

    #[test]
    fn test_rating_from_config() {
        let config = SystemConfig::default().with_rated_power(300.0);
        let rating = ModuleRating::from(&config);
        assert_eq!(rating.rated_power_w, 300.0);
        assert_eq!(rating.gamma_pdc, -0.004);
    }
}
