//! Command-Line Interface Module
//!
//! Handles argument parsing and validation for the pvyield application.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use pvyield::DEFAULT_PANEL_EFFICIENCY;
use pvyield::config::SystemConfig;
use pvyield::irradiance::SkyDiffuseModel;
use pvyield::temperature::MountingType;

// ===================== CLI =====================

/// Estimate clear-sky energy generation of a fixed-tilt PV panel.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Site latitude in decimal degrees (-90 to 90)
    #[arg(long, default_value_t = 37.7749, allow_hyphen_values = true, value_parser = parse_latitude, env = "PVYIELD_LATITUDE")]
    pub latitude: f64,
    /// Site longitude in decimal degrees (-180 to 180)
    #[arg(long, default_value_t = -122.4194, allow_hyphen_values = true, value_parser = parse_longitude, env = "PVYIELD_LONGITUDE")]
    pub longitude: f64,

    /// First day of the estimate (e.g., "2023-01-01" or "yesterday")
    #[arg(long, default_value = "2023-01-01", env = "PVYIELD_START")]
    pub start: String,
    /// Last day of the estimate, inclusive
    #[arg(long, default_value = "2023-01-10", env = "PVYIELD_END")]
    pub end: String,

    /// Efficiency factor applied to the integrated DC energy (0.0-1.0]
    #[arg(long, default_value_t = DEFAULT_PANEL_EFFICIENCY, value_parser = parse_efficiency, env = "PVYIELD_EFFICIENCY")]
    pub efficiency: f64,

    /// Time zone whose calendar days are summed ("UTC", "system", "location", or IANA name)
    #[arg(long, default_value = "UTC", env = "PVYIELD_TIMEZONE")]
    pub timezone: String,

    /// JSON file with system parameters; flags below override it
    #[arg(long, env = "PVYIELD_CONFIG")]
    pub config: Option<PathBuf>,

    // ===================== SYSTEM OPTIONS =====================
    /// Panel tilt angle in degrees (0 = flat/horizontal, 90 = vertical)
    #[arg(long, value_parser = parse_tilt, env = "PVYIELD_TILT")]
    pub tilt: Option<f64>,

    /// Panel azimuth in degrees (180 = facing south)
    #[arg(long, value_parser = parse_azimuth, env = "PVYIELD_AZIMUTH")]
    pub azimuth: Option<f64>,

    /// Module mounting, selects the cell temperature coefficients
    #[arg(long, value_enum, env = "PVYIELD_MOUNTING")]
    pub mounting: Option<MountingType>,

    /// DC power of the module at 1000 W/m² and 25 °C (W)
    #[arg(long, value_parser = parse_positive_f64, env = "PVYIELD_RATED_POWER")]
    pub rated_power: Option<f64>,

    /// Temperature coefficient of power (1/°C, typically -0.002 to -0.005)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_gamma, env = "PVYIELD_GAMMA_PDC")]
    pub gamma_pdc: Option<f64>,

    /// Ground albedo for reflected radiation (0.0-1.0, 0.2 = grass, 0.8 = snow)
    #[arg(long, value_parser = parse_albedo, env = "PVYIELD_ALBEDO")]
    pub albedo: Option<f64>,

    /// Linke turbidity factor for clear-sky model (2-7 typical, 3 = clear)
    #[arg(long, value_parser = parse_turbidity, env = "PVYIELD_LINKE_TURBIDITY")]
    pub linke_turbidity: Option<f64>,

    /// Sky diffuse transposition model
    #[arg(long, value_enum, env = "PVYIELD_SKY_MODEL")]
    pub sky_model: Option<SkyDiffuseModel>,

    /// Ambient air temperature in °C
    #[arg(long, allow_hyphen_values = true, value_parser = parse_ambient_temperature, env = "PVYIELD_AMBIENT_TEMPERATURE")]
    pub ambient_temperature: Option<f64>,

    /// Wind speed at 10 m in m/s
    #[arg(long, value_parser = parse_wind_speed, env = "PVYIELD_WIND_SPEED")]
    pub wind_speed: Option<f64>,

    /// Site elevation above mean sea level (meters, may be negative)
    /// Valid range: -500m (Dead Sea) to 11000m (Troposphere limit for ISA formula)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_altitude, env = "PVYIELD_ELEVATION")]
    pub elevation: Option<f64>,

    /// Intraday sampling step in minutes (1-180)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=180), env = "PVYIELD_STEP_MINUTES")]
    pub step_minutes: Option<u32>,

    // ===================== OUTPUT OPTIONS =====================
    /// Print a per-day breakdown after the summary
    #[arg(long, conflicts_with = "json")]
    pub per_day: bool,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Layer the system flags given on the command line over `config`.
    pub fn apply_overrides(&self, mut config: SystemConfig) -> SystemConfig {
        if let Some(v) = self.tilt {
            config.tilt_deg = v;
        }
        if let Some(v) = self.azimuth {
            config.azimuth_deg = v;
        }
        if let Some(v) = self.mounting {
            config.mounting = v;
        }
        if let Some(v) = self.rated_power {
            config.rated_power_w = v;
        }
        if let Some(v) = self.gamma_pdc {
            config.gamma_pdc = v;
        }
        if let Some(v) = self.albedo {
            config.albedo = v;
        }
        if let Some(v) = self.linke_turbidity {
            config.linke_turbidity = v;
        }
        if let Some(v) = self.sky_model {
            config.sky_model = v;
        }
        if let Some(v) = self.ambient_temperature {
            config.ambient_temperature_c = v;
        }
        if let Some(v) = self.wind_speed {
            config.wind_speed_ms = v;
        }
        if let Some(v) = self.elevation {
            config.elevation_m = v;
        }
        if let Some(v) = self.step_minutes {
            config.step_minutes = v;
        }
        config
    }

    /// Default filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

// ===================== CLI VALUE PARSERS =====================

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse().map_err(|_| format!("Invalid number: {}", s))
}

fn parse_in_range(s: &str, name: &str, min: f64, max: f64, unit: &str) -> Result<f64, String> {
    let v = parse_number(s)?;
    if !(min..=max).contains(&v) {
        return Err(format!("{} must be between {} and {}{}, got {}", name, min, max, unit, v));
    }
    Ok(v)
}

fn parse_latitude(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Latitude", -90.0, 90.0, "")
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Longitude", -180.0, 180.0, "")
}

fn parse_altitude(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Altitude", -500.0, 11000.0, " meters")
}

fn parse_positive_f64(s: &str) -> Result<f64, String> {
    let v = parse_number(s)?;
    if v <= 0.0 {
        return Err(format!("Value must be positive, got {}", v));
    }
    Ok(v)
}

fn parse_tilt(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Tilt", 0.0, 90.0, " degrees")
}

fn parse_azimuth(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Azimuth", 0.0, 360.0, " degrees")
}

fn parse_efficiency(s: &str) -> Result<f64, String> {
    let v = parse_number(s)?;
    if !(v > 0.0 && v <= 1.0) {
        return Err(format!("Efficiency must be greater than 0.0 and at most 1.0, got {}", v));
    }
    Ok(v)
}

fn parse_gamma(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Temperature coefficient", -0.1, 0.1, " per °C")
}

fn parse_turbidity(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Linke turbidity", 1.0, 10.0, "")
}

fn parse_albedo(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Albedo", 0.0, 1.0, "")
}

fn parse_ambient_temperature(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Ambient temperature", -90.0, 60.0, " °C")
}

fn parse_wind_speed(s: &str) -> Result<f64, String> {
    parse_in_range(s, "Wind speed", 0.0, 60.0, " m/s")
}

// ===================== TESTS =====================
