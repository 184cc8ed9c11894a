//! Daily Energy Estimation Module
//!
//! Composes the pipeline stages into an energy estimate over a date range:
//! solar position, extraterrestrial irradiance, pressure, clear-sky
//! transposition, cell temperature and DC power, integrated per day.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::SystemConfig;
use crate::error::{EstimateError, Result};
use crate::irradiance::{self, Surface};
use crate::power::{self, ModuleRating};
use crate::solar::{Location, SolarCalc};
use crate::temperature;
use crate::time::{self, DateRange};

/// Efficiency factor applied when the caller does not give one
pub const DEFAULT_PANEL_EFFICIENCY: f64 = 0.15;

// ===================== RESULTS =====================

/// Energy produced on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyEnergy {
    pub date: NaiveDate,
    /// Integrated DC energy before the efficiency factor (Wh)
    pub dc_energy_wh: f64,
    /// Efficiency-scaled energy (kWh)
    pub energy_kwh: f64,
    /// Highest DC power of the day (W)
    pub peak_power_w: f64,
    /// Plane-of-array insolation (Wh/m²)
    pub insolation_wh_m2: f64,
    /// Hours between sunrise and sunset
    pub daylight_hours: f64,
}

/// Estimate over a whole date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyResult {
    pub location: Location,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub timezone: String,
    pub panel_efficiency: f64,
    pub days: Vec<DailyEnergy>,
    /// Sum of all days (kWh)
    pub total_kwh: f64,
}

impl EnergyResult {
    /// Mean energy per day, zero for an empty range
    pub fn mean_daily_kwh(&self) -> f64 {
        if self.days.is_empty() { 0.0 } else { self.total_kwh / self.days.len() as f64 }
    }
}

// ===================== ESTIMATOR =====================

/// Energy estimator for one PV system at one location
#[derive(Debug, Clone, Copy)]
pub struct DailyEnergyEstimator {
    location: Location,
    config: SystemConfig,
    tz: Tz,
}

impl DailyEnergyEstimator {
    pub fn new(location: Location, config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { location, config, tz: Tz::UTC })
    }

    /// Interpret calendar days in `tz` instead of UTC.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Estimate energy for every day from `start` to `end` inclusive.
    ///
    /// An `end` before `start` yields no days and 0 kWh.
    pub fn estimate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        panel_efficiency: f64,
    ) -> Result<EnergyResult> {
        if !(panel_efficiency > 0.0 && panel_efficiency <= 1.0) {
            return Err(EstimateError::invalid_input(format!(
                "panel efficiency must be in (0, 1], got {}",
                panel_efficiency
            )));
        }

        let range = DateRange::new(start, end, self.tz);
        let pressure_pa = irradiance::pressure_from_altitude(self.config.elevation_m);
        let calc = SolarCalc::new(
            self.location,
            self.config.elevation_m,
            pressure_pa,
            self.config.ambient_temperature_c,
        )?;

        info!(
            lat = self.location.latitude,
            lon = self.location.longitude,
            %start,
            %end,
            days = range.len(),
            tz = %self.tz,
            pressure_pa,
            "estimating energy"
        );

        let mut days = Vec::with_capacity(range.len());
        for (date, window) in range.windows() {
            match window {
                Some(window) => {
                    days.push(self.estimate_day(&calc, date, window, pressure_pa, panel_efficiency)?)
                }
                None => debug!(%date, tz = %self.tz, "date does not exist in time zone, skipped"),
            }
        }

        let total_kwh = days.iter().map(|d| d.energy_kwh).sum();
        info!(total_kwh, "estimate complete");

        Ok(EnergyResult {
            location: self.location,
            start,
            end,
            timezone: self.tz.name().to_string(),
            panel_efficiency,
            days,
            total_kwh,
        })
    }

    /// Integrate one day over its local window.
    ///
    /// Every slot is sampled; slots with the sun below the horizon add nothing.
    fn estimate_day(
        &self,
        calc: &SolarCalc,
        date: NaiveDate,
        (start, end): (DateTime<Tz>, DateTime<Tz>),
        pressure_pa: f64,
        panel_efficiency: f64,
    ) -> Result<DailyEnergy> {
        let daylight_hours = calc.daylight_hours(start)?;
        let mut day = DailyEnergy {
            date,
            dc_energy_wh: 0.0,
            energy_kwh: 0.0,
            peak_power_w: 0.0,
            insolation_wh_m2: 0.0,
            daylight_hours,
        };

        let surface = Surface {
            tilt_deg: self.config.tilt_deg,
            azimuth_deg: self.config.azimuth_deg,
            albedo: self.config.albedo,
            model: self.config.sky_model,
        };
        let thermal = self.config.mounting.sapm_parameters();
        let rating = ModuleRating::from(&self.config);

        for slot in time::time_slots(start, end, self.config.step_minutes) {
            let position = calc.position(slot.midpoint)?;
            if position.elevation_deg() <= 0.0 {
                continue;
            }

            let doy = slot.midpoint.with_timezone(&Utc).ordinal();
            let irr = irradiance::irradiance_sample(
                &position,
                doy,
                pressure_pa,
                self.config.linke_turbidity,
                &surface,
            );
            let temp = temperature::sapm_cell_temperature(
                irr.poa.global,
                self.config.ambient_temperature_c,
                self.config.wind_speed_ms,
                thermal,
            );
            let power = power::dc_power(irr.poa.global, temp.cell_temp_c, &rating);

            trace!(
                at = %position.timestamp,
                zenith = position.apparent_zenith_deg,
                azimuth = position.azimuth_deg,
                poa = irr.poa.global,
                cell_temp = temp.cell_temp_c,
                power = power.dc_power_w,
                "sample"
            );

            day.dc_energy_wh += power.dc_power_w * slot.hours;
            day.insolation_wh_m2 += irr.poa.global * slot.hours;
            day.peak_power_w = day.peak_power_w.max(power.dc_power_w);
        }

        // Wh -> kWh
        day.energy_kwh = day.dc_energy_wh * panel_efficiency / 1000.0;

        debug!(
            %date,
            dc_energy_wh = day.dc_energy_wh,
            energy_kwh = day.energy_kwh,
            peak_power_w = day.peak_power_w,
            "day integrated"
        );
        Ok(day)
    }
}

/// Total efficiency-scaled energy (kWh) for a location and a date range
/// given as strings, with the default system and UTC days.
pub fn estimate(
    latitude: f64,
    longitude: f64,
    start_date: &str,
    end_date: &str,
    panel_efficiency: f64,
) -> Result<f64> {
    let start = time::parse_date(start_date, Tz::UTC)?;
    let end = time::parse_date(end_date, Tz::UTC)?;
    let location = Location::new(latitude, longitude)?;

    let estimator = DailyEnergyEstimator::new(location, SystemConfig::default())?;
    Ok(estimator.estimate(start, end, panel_efficiency)?.total_kwh)
}

// ===================== TESTS =====================
