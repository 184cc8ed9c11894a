//! Irradiance Module
//!
//! Extraterrestrial irradiance, standard-atmosphere pressure, air mass, the
//! Ineichen-Perez clear-sky model and transposition onto a tilted plane.
//!
//! References:
//! - Spencer, J.W. (1971). "Fourier series representation of the position of the sun"
//! - Kasten, F. and Young, A.T. (1989). "Revised optical air mass tables and
//!   approximation formula"
//! - Ineichen, P. and Perez, R. (2002). "A new airmass independent formulation
//!   for the Linke turbidity coefficient"
//! - Hay, J.E. and Davies, J.A. (1980). "Calculations of the solar radiation
//!   incident on an inclined surface"
//! - Reindl, D.T. et al. (1990). "Evaluation of hourly tilted surface radiation models"

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::solar::SolarPositionSample;

// ===================== CONSTANTS =====================

/// Solar constant in W/m², the value used by pvlib's `get_extra_radiation`
const SOLAR_CONSTANT: f64 = 1366.1;

/// Standard sea-level pressure in Pa
pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;

/// Lower bound for cos(zenith) in the beam ratio, i.e. zenith ≈ 89°
const MIN_COS_ZENITH: f64 = 0.01745;

// ===================== SKY DIFFUSE MODELS =====================

/// Model used to transpose diffuse sky irradiance onto the panel
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SkyDiffuseModel {
    /// Uniform sky dome
    Isotropic,
    /// Isotropic background plus a circumsolar term weighted by the
    /// anisotropy index DNI / extraterrestrial irradiance
    #[default]
    HayDavies,
    /// Hay-Davies plus horizon brightening
    Reindl,
}

// ===================== ATMOSPHERE =====================

/// Calculate extraterrestrial irradiance corrected for Earth-Sun distance
///
/// Uses Spencer (1971) formula for orbital eccentricity correction
///
/// # Arguments
/// * `day_of_year` - Day of year (1-366)
///
/// # Returns
/// Extraterrestrial irradiance in W/m²
pub fn extraterrestrial_irradiance(day_of_year: u32) -> f64 {
    let b = 2.0 * PI * (day_of_year as f64 - 1.0) / 365.0;

    let eccentricity_correction = 1.000110
        + 0.034221 * b.cos()
        + 0.001280 * b.sin()
        + 0.000719 * (2.0 * b).cos()
        + 0.000077 * (2.0 * b).sin();

    SOLAR_CONSTANT * eccentricity_correction
}

/// Atmospheric pressure (Pa) at an elevation (m) in the standard atmosphere.
pub fn pressure_from_altitude(altitude_m: f64) -> f64 {
    100.0 * ((44331.514 - altitude_m) / 11880.516).powf(1.0 / 0.1902632)
}

/// Elevation (m) at which the standard atmosphere has the given pressure (Pa).
pub fn altitude_from_pressure(pressure_pa: f64) -> f64 {
    44331.5 - 4946.62 * pressure_pa.powf(0.190263)
}

/// Relative optical air mass (Kasten-Young 1989) from the apparent zenith.
///
/// Returns `None` when the sun is at or below the horizon.
pub fn relative_air_mass(apparent_zenith_deg: f64) -> Option<f64> {
    if !(0.0..90.0).contains(&apparent_zenith_deg) {
        return None;
    }
    let z = apparent_zenith_deg.to_radians();
    Some(1.0 / (z.cos() + 0.50572 * (96.07995 - apparent_zenith_deg).powf(-1.6364)))
}

/// Pressure-corrected air mass.
pub fn absolute_air_mass(relative: f64, pressure_pa: f64) -> f64 {
    relative * pressure_pa / STANDARD_PRESSURE_PA
}

// ===================== INEICHEN-PEREZ CLEAR SKY MODEL =====================

/// Clear-sky irradiance components (W/m²)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ClearSky {
    pub ghi: f64,
    pub dni: f64,
    pub dhi: f64,
}

/// Clear-sky GHI, DNI and DHI with the Ineichen-Perez model.
///
/// # Arguments
/// * `apparent_zenith_deg` - Refraction-corrected zenith angle
/// * `air_mass_absolute` - Pressure-corrected air mass
/// * `linke_turbidity` - Linke turbidity factor (typical 2-7)
/// * `altitude_m` - Site altitude
/// * `dni_extra` - Extraterrestrial irradiance
pub fn ineichen_clearsky(
    apparent_zenith_deg: f64,
    air_mass_absolute: f64,
    linke_turbidity: f64,
    altitude_m: f64,
    dni_extra: f64,
) -> ClearSky {
    let cos_zenith = apparent_zenith_deg.to_radians().cos().max(0.0);
    if cos_zenith <= 0.0 || !air_mass_absolute.is_finite() || air_mass_absolute <= 0.0 {
        return ClearSky::default();
    }

    let tl = linke_turbidity;
    let am = air_mass_absolute;

    // Altitude correction coefficients
    let fh1 = (-altitude_m / 8000.0).exp();
    let fh2 = (-altitude_m / 1250.0).exp();
    let cg1 = 5.09e-5 * altitude_m + 0.868;
    let cg2 = 3.92e-5 * altitude_m + 0.0387;

    let ghi = cg1 * dni_extra * cos_zenith * (-cg2 * am * (fh1 + fh2 * (tl - 1.0))).exp().max(0.0);

    // Beam: the smaller of the direct Linke formulation and the GHI-derived bound
    let b = 0.664 + 0.163 / fh1;
    let bnci = dni_extra * (b * (-0.09 * am * (tl - 1.0)).exp()).max(0.0);
    let bnci_2 = ghi
        * ((1.0 - (0.1 - 0.2 * (-tl).exp()) / (0.1 + 0.882 / fh1)) / cos_zenith).clamp(0.0, 1e20);
    let dni = bnci.min(bnci_2);

    let dhi = (ghi - dni * cos_zenith).max(0.0);

    ClearSky { ghi, dni, dhi }
}

// ===================== GEOMETRY =====================

/// Cosine of the angle between the sun vector and the panel normal.
pub fn aoi_projection(
    solar_zenith_deg: f64,
    solar_azimuth_deg: f64,
    panel_tilt_deg: f64,
    panel_azimuth_deg: f64,
) -> f64 {
    let zenith = solar_zenith_deg.to_radians();
    let tilt = panel_tilt_deg.to_radians();
    let delta_az = (solar_azimuth_deg - panel_azimuth_deg).to_radians();

    let projection = zenith.cos() * tilt.cos() + zenith.sin() * tilt.sin() * delta_az.cos();
    projection.clamp(-1.0, 1.0)
}

/// Angle of incidence in degrees (0 = sun perpendicular to panel).
pub fn angle_of_incidence(
    solar_zenith_deg: f64,
    solar_azimuth_deg: f64,
    panel_tilt_deg: f64,
    panel_azimuth_deg: f64,
) -> f64 {
    aoi_projection(solar_zenith_deg, solar_azimuth_deg, panel_tilt_deg, panel_azimuth_deg)
        .acos()
        .to_degrees()
}

// ===================== PLANE OF ARRAY IRRADIANCE =====================

/// Plane-of-array irradiance components (W/m²)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PoaIrradiance {
    pub global: f64,
    pub beam: f64,
    pub sky_diffuse: f64,
    pub ground_diffuse: f64,
    /// Angle of incidence (degrees)
    pub aoi_deg: f64,
}

/// Panel orientation and surroundings needed for transposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub tilt_deg: f64,
    pub azimuth_deg: f64,
    pub albedo: f64,
    pub model: SkyDiffuseModel,
}

/// Sky diffuse irradiance on the tilted plane.
fn sky_diffuse(
    surface: &Surface,
    solar_zenith_deg: f64,
    cos_aoi: f64,
    sky: &ClearSky,
    dni_extra: f64,
) -> f64 {
    let tilt = surface.tilt_deg.to_radians();
    let isotropic_view = (1.0 + tilt.cos()) / 2.0;

    if surface.model == SkyDiffuseModel::Isotropic {
        return sky.dhi * isotropic_view;
    }

    let cos_zenith = solar_zenith_deg.to_radians().cos();
    let rb = cos_aoi.max(0.0) / cos_zenith.max(MIN_COS_ZENITH);
    let anisotropy = if dni_extra > 0.0 { sky.dni / dni_extra } else { 0.0 };

    let horizon = match surface.model {
        SkyDiffuseModel::Reindl if sky.ghi > 0.0 => {
            let beam_horizontal = (sky.dni * cos_zenith).max(0.0);
            1.0 + (beam_horizontal / sky.ghi).sqrt() * (0.5 * tilt).sin().powi(3)
        }
        _ => 1.0,
    };

    let diffuse =
        sky.dhi * (anisotropy * rb + (1.0 - anisotropy) * isotropic_view * horizon);
    diffuse.max(0.0)
}

/// Transpose clear-sky components onto the panel plane.
///
/// # Arguments
/// * `surface` - Panel orientation, albedo and sky model
/// * `solar_zenith_deg` - Apparent solar zenith
/// * `solar_azimuth_deg` - Solar azimuth (0 = north, clockwise)
/// * `sky` - Horizontal clear-sky components
/// * `dni_extra` - Extraterrestrial irradiance
pub fn plane_of_array(
    surface: &Surface,
    solar_zenith_deg: f64,
    solar_azimuth_deg: f64,
    sky: &ClearSky,
    dni_extra: f64,
) -> PoaIrradiance {
    let cos_aoi =
        aoi_projection(solar_zenith_deg, solar_azimuth_deg, surface.tilt_deg, surface.azimuth_deg);
    let aoi_deg = cos_aoi.acos().to_degrees();

    let beam = (sky.dni * cos_aoi).max(0.0);
    let sky_diffuse = sky_diffuse(surface, solar_zenith_deg, cos_aoi, sky, dni_extra);
    let ground_diffuse =
        sky.ghi * surface.albedo * (1.0 - surface.tilt_deg.to_radians().cos()) / 2.0;

    PoaIrradiance {
        global: beam + sky_diffuse + ground_diffuse,
        beam,
        sky_diffuse,
        ground_diffuse,
        aoi_deg,
    }
}

// ===================== PIPELINE STAGE =====================

/// Irradiance derived for one timestamp
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct IrradianceSample {
    /// Extraterrestrial irradiance (W/m²)
    pub dni_extra: f64,
    /// Absolute air mass, `None` with the sun below the horizon
    pub air_mass: Option<f64>,
    pub clear_sky: ClearSky,
    pub poa: PoaIrradiance,
}

/// Run the irradiance stage for one solar position.
///
/// `pressure_pa` feeds both the air mass and the clear-sky altitude terms.
pub fn irradiance_sample(
    position: &SolarPositionSample,
    day_of_year: u32,
    pressure_pa: f64,
    linke_turbidity: f64,
    surface: &Surface,
) -> IrradianceSample {
    let dni_extra = extraterrestrial_irradiance(day_of_year);

    let Some(relative) = relative_air_mass(position.apparent_zenith_deg) else {
        return IrradianceSample { dni_extra, ..IrradianceSample::default() };
    };

    let air_mass = absolute_air_mass(relative, pressure_pa);
    let clear_sky = ineichen_clearsky(
        position.apparent_zenith_deg,
        air_mass,
        linke_turbidity,
        altitude_from_pressure(pressure_pa),
        dni_extra,
    );
    let poa = plane_of_array(
        surface,
        position.apparent_zenith_deg,
        position.azimuth_deg,
        &clear_sky,
        dni_extra,
    );

    IrradianceSample { dni_extra, air_mass: Some(air_mass), clear_sky, poa }
}

// ===================== TESTS =====================
