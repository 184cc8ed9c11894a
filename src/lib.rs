//! Clear-sky energy yield estimation for a fixed-tilt photovoltaic panel.
//!
//! The pipeline runs solar position, irradiance, cell temperature and DC
//! power for every intraday slot and integrates the result per calendar day.

pub mod config;
pub mod error;
pub mod estimator;
pub mod irradiance;
pub mod power;
pub mod solar;
pub mod temperature;
pub mod time;

pub use config::SystemConfig;
pub use error::{EstimateError, Result};
pub use estimator::{
    DEFAULT_PANEL_EFFICIENCY, DailyEnergy, DailyEnergyEstimator, EnergyResult, estimate,
};
pub use solar::Location;
