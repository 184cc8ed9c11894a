//! Solar Position Calculation Module
//!
//! Wraps the NREL SPA (Solar Position Algorithm) from `solar_positioning` with
//! the refraction conditions of the modelled site.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use solar_positioning::{Horizon, RefractionCorrection, SunriseResult, spa, time::DeltaT};

use crate::error::{EstimateError, Result};

// ===================== LOCATION =====================

/// Geographic point the estimate is made for
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(EstimateError::invalid_input(format!(
                "latitude must be between -90 and 90, got {}",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(EstimateError::invalid_input(format!(
                "longitude must be between -180 and 180, got {}",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }
}

// ===================== SAMPLES =====================

/// Sun position at one timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPositionSample {
    pub timestamp: DateTime<Utc>,
    /// Refraction-corrected zenith angle in degrees
    pub apparent_zenith_deg: f64,
    /// Azimuth in degrees (0 = north, clockwise)
    pub azimuth_deg: f64,
}

impl SolarPositionSample {
    pub fn elevation_deg(&self) -> f64 {
        90.0 - self.apparent_zenith_deg
    }
}

// ===================== SOLAR CALCULATION CONTEXT =====================

/// Context for solar position calculations.
///
/// Holds the observer location, elevation and the atmospheric refraction
/// conditions so every timestamp is evaluated consistently.
#[derive(Debug, Clone, Copy)]
pub struct SolarCalc {
    pub location: Location,
    /// Observer elevation in meters
    pub elevation_m: f64,
    /// Atmospheric refraction correction
    pub refr: RefractionCorrection,
}

impl SolarCalc {
    /// Build a context with refraction for the given pressure (Pa) and
    /// air temperature (°C).
    pub fn new(
        location: Location,
        elevation_m: f64,
        pressure_pa: f64,
        temperature_c: f64,
    ) -> Result<Self> {
        let refr = RefractionCorrection::new(pressure_pa / 100.0, temperature_c)?;
        Ok(Self { location, elevation_m, refr })
    }

    /// Get the apparent solar position at a given time.
    pub fn position<Tz: TimeZone>(&self, t: DateTime<Tz>) -> Result<SolarPositionSample> {
        let delta_t = DeltaT::estimate_from_date(t.year(), t.month())?;
        let timestamp = t.with_timezone(&Utc);
        let pos = spa::solar_position(
            timestamp,
            self.location.latitude,
            self.location.longitude,
            self.elevation_m,
            delta_t,
            Some(self.refr),
        )?;

        Ok(SolarPositionSample {
            timestamp,
            apparent_zenith_deg: pos.zenith_angle(),
            azimuth_deg: pos.azimuth(),
        })
    }

    /// Hours the sun spends above the standard sunrise horizon on the day
    /// containing `date`, always within `0..=24`.
    ///
    /// The sunrise and sunset reported for a calendar day may belong to
    /// different solar days (the sunset of the previous evening when the day
    /// is offset from local solar time), so a negative span wraps around.
    pub fn daylight_hours<Tz: TimeZone>(&self, date: DateTime<Tz>) -> Result<f64> {
        let delta_t = DeltaT::estimate_from_date(date.year(), date.month())?;
        let res = spa::sunrise_sunset_for_horizon(
            date,
            self.location.latitude,
            self.location.longitude,
            delta_t,
            Horizon::SunriseSunset,
        )?;

        Ok(match res {
            SunriseResult::RegularDay { sunrise, sunset, .. } => {
                let span = (sunset - sunrise).num_seconds() as f64 / 3600.0;
                if span < 0.0 { span + 24.0 } else { span }
            }
            SunriseResult::AllDay { .. } => 24.0,
            SunriseResult::AllNight { .. } => 0.0,
        })
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irradiance::STANDARD_PRESSURE_PA;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;
    use chrono_tz::Atlantic::Reykjavik;

    fn calc(lat: f64, lon: f64) -> SolarCalc {
        SolarCalc::new(Location::new(lat, lon).unwrap(), 0.0, STANDARD_PRESSURE_PA, 20.0).unwrap()
    }

    #[test]
    fn test_location_validation() {
        assert!(Location::new(37.7749, -122.4194).is_ok());
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(90.5, 0.0).unwrap_err().is_invalid_input());
        assert!(Location::new(0.0, -180.5).unwrap_err().is_invalid_input());
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_san_francisco_winter_noon() {
        // Solar noon in San Francisco on 2023-01-01 is near 12:13 PST
        let noon = Los_Angeles.with_ymd_and_hms(2023, 1, 1, 12, 13, 0).unwrap();
        let pos = calc(37.7749, -122.4194).position(noon).unwrap();

        // 90 - 37.77 - 23.0 ≈ 29.2° elevation
        assert!(
            pos.elevation_deg() > 28.5 && pos.elevation_deg() < 30.0,
            "Elevation {} out of range",
            pos.elevation_deg()
        );
        assert!((pos.azimuth_deg - 180.0).abs() < 2.0, "Azimuth {}", pos.azimuth_deg);
    }

    #[test]
    fn test_timezone_does_not_change_position() {
        let local = Los_Angeles.with_ymd_and_hms(2023, 6, 21, 9, 0, 0).unwrap();
        let utc = local.with_timezone(&Utc);
        let c = calc(37.7749, -122.4194);

        let a = c.position(local).unwrap();
        let b = c.position(utc).unwrap();
        assert_eq!(a.timestamp, b.timestamp);
        assert!((a.apparent_zenith_deg - b.apparent_zenith_deg).abs() < 1e-10);
    }

    #[test]
    fn test_sun_below_horizon_at_local_midnight() {
        let midnight = Utc.with_ymd_and_hms(2023, 1, 1, 8, 0, 0).unwrap();
        let pos = calc(37.7749, -122.4194).position(midnight).unwrap();
        assert!(pos.apparent_zenith_deg > 90.0);
    }

    #[test]
    fn test_daylight_hours_polar_and_regular() {
        let dec = Utc.with_ymd_and_hms(2023, 12, 21, 0, 0, 0).unwrap();
        assert_eq!(calc(85.0, 0.0).daylight_hours(dec).unwrap(), 0.0);
        assert_eq!(calc(-85.0, 0.0).daylight_hours(dec).unwrap(), 24.0);

        let sf = calc(37.7749, -122.4194)
            .daylight_hours(Los_Angeles.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
            .unwrap();
        assert!(sf > 9.4 && sf < 9.8, "SF daylight {} h", sf);
    }

    /// Days offset from local solar time see the previous evening's sunset
    #[test]
    fn test_daylight_hours_offset_days() {
        let sf_utc = calc(37.7749, -122.4194)
            .daylight_hours(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
            .unwrap();
        assert!(sf_utc > 9.3 && sf_utc < 9.9, "SF UTC daylight {} h", sf_utc);

        let sydney_utc = calc(-33.8688, 151.2093)
            .daylight_hours(Utc.with_ymd_and_hms(2023, 12, 21, 0, 0, 0).unwrap())
            .unwrap();
        assert!(sydney_utc > 14.0 && sydney_utc < 14.8, "Sydney daylight {} h", sydney_utc);

        let reykjavik = calc(64.1466, -21.9426)
            .daylight_hours(Reykjavik.with_ymd_and_hms(2023, 6, 21, 0, 0, 0).unwrap())
            .unwrap();
        assert!(reykjavik > 20.5 && reykjavik < 21.8, "Reykjavik daylight {} h", reykjavik);
    }

    #[test]
    fn test_invalid_refraction_conditions() {
        let loc = Location::new(0.0, 0.0).unwrap();
        let err = SolarCalc::new(loc, 0.0, -1.0, 20.0).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
