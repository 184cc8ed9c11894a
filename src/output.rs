//! Output Formatting Module
//!
//! Provides formatting functions for the terminal summary, the per-day table
//! and JSON output.

use pvyield::estimator::{DailyEnergy, EnergyResult};
use pvyield::time::format_hours;

// ===================== SUMMARY =====================

/// Print the headline total.
pub fn print_summary(result: &EnergyResult) {
    println!("{}", summary_line(result.total_kwh));
}

fn summary_line(total_kwh: f64) -> String {
    format!("Estimated daily energy generation: {:.2} kWh", total_kwh)
}

// ===================== PER-DAY TABLE =====================

/// Print one row per day followed by range statistics.
pub fn print_per_day(result: &EnergyResult) {
    println!();
    println!(
        "Location  : {:.4}°, {:.4}° ({})",
        result.location.latitude, result.location.longitude, result.timezone
    );
    println!("Efficiency: {:.1}%", result.panel_efficiency * 100.0);
    println!();

    println!("{:-<72}", "");
    println!(
        "{:<12} {:>10} {:>12} {:>12} {:>12} {:>10}",
        "Date", "Daylight", "DC energy", "Energy", "Peak", "POA"
    );
    println!("{:-<72}", "");
    for day in &result.days {
        println!("{}", day_row(day));
    }
    println!("{:-<72}", "");

    if result.days.is_empty() {
        println!("No days in range.");
        return;
    }

    let best = result.days.iter().max_by(|a, b| a.energy_kwh.total_cmp(&b.energy_kwh));
    let worst = result.days.iter().min_by(|a, b| a.energy_kwh.total_cmp(&b.energy_kwh));

    println!("Days      : {}", result.days.len());
    println!("Mean/day  : {}", format_energy(result.mean_daily_kwh() * 1000.0));
    if let (Some(best), Some(worst)) = (best, worst) {
        println!("Best day  : {} ({})", best.date, format_energy(best.energy_kwh * 1000.0));
        println!("Worst day : {} ({})", worst.date, format_energy(worst.energy_kwh * 1000.0));
    }
}

fn day_row(day: &DailyEnergy) -> String {
    format!(
        "{:<12} {:>10} {:>12} {:>12} {:>12} {:>10}",
        day.date.format("%Y-%m-%d").to_string(),
        format_hours(day.daylight_hours),
        format_energy(day.dc_energy_wh),
        format_energy(day.energy_kwh * 1000.0),
        format_power(day.peak_power_w),
        format_insolation(day.insolation_wh_m2),
    )
}

// ===================== JSON =====================

/// Print the full result as pretty JSON.
pub fn print_json(result: &EnergyResult) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

// ===================== UNITS =====================

/// Format power for display
pub fn format_power(watts: f64) -> String {
    if watts >= 1000.0 { format!("{:.2} kW", watts / 1000.0) } else { format!("{:.1} W", watts) }
}

/// Format energy for display
pub fn format_energy(watt_hours: f64) -> String {
    if watt_hours >= 1000.0 {
        format!("{:.2} kWh", watt_hours / 1000.0)
    } else {
        format!("{:.1} Wh", watt_hours)
    }
}

/// Format daily insolation for display
pub fn format_insolation(wh_per_m2: f64) -> String {
    format!("{:.2} kWh/m²", wh_per_m2 / 1000.0)
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use pvyield::Location;
    use chrono::NaiveDate;

    fn sample_result() -> EnergyResult {
        let day = DailyEnergy {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            dc_energy_wh: 955.3,
            energy_kwh: 0.1433,
            peak_power_w: 159.6,
            insolation_wh_m2: 4206.2,
            daylight_hours: 9.6,
        };
        EnergyResult {
            location: Location::new(37.7749, -122.4194).unwrap(),
            start: day.date,
            end: day.date,
            timezone: "UTC".to_string(),
            panel_efficiency: 0.15,
            days: vec![day],
            total_kwh: 0.1433,
        }
    }

    #[test]
    fn test_summary_line_format() {
        assert_eq!(summary_line(1.4558), "Estimated daily energy generation: 1.46 kWh");
        assert_eq!(summary_line(0.0), "Estimated daily energy generation: 0.00 kWh");
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_power(159.64), "159.6 W");
        assert_eq!(format_power(2400.0), "2.40 kW");
        assert_eq!(format_energy(955.3), "955.3 Wh");
        assert_eq!(format_energy(1455.8), "1.46 kWh");
        assert_eq!(format_insolation(4206.2), "4.21 kWh/m²");
    }

    #[test]
    fn test_day_row_contents() {
        let row = day_row(&sample_result().days[0]);
        assert!(row.starts_with("2023-01-01"));
        assert!(row.contains("9h 36m"));
        assert!(row.contains("955.3 Wh"));
        assert!(row.contains("143.3 Wh"));
        assert!(row.contains("159.6 W"));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(value["total_kwh"], 0.1433);
        assert_eq!(value["start"], "2023-01-01");
        assert_eq!(value["location"]["latitude"], 37.7749);
        assert_eq!(value["days"][0]["date"], "2023-01-01");
        assert_eq!(value["days"].as_array().unwrap().len(), 1);
    }
}
