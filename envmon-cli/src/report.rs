//! Plain-text output of the `show` command.

use chrono::{NaiveDateTime, Timelike};
use envmon_core::{Forecast, codes, model::HourlyPoint};
use std::fmt::Write;

/// Open-Meteo's local time format, e.g. `2025-01-12T14:30`.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn render(forecast: &Forecast, location_name: &str, hours: usize) -> String {
    let c = &forecast.current;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{location_name} ({:.4}, {:.4}) at {}",
        forecast.latitude, forecast.longitude, c.timestamp
    );
    let _ = writeln!(out, "  Temperature  {:.1}°C", c.temperature);
    let _ = writeln!(out, "  Humidity     {:.1}%", c.humidity);
    let _ = writeln!(out, "  Pressure     {:.1} hPa", c.pressure);
    let _ = writeln!(
        out,
        "  Condition    {} (code {})",
        codes::describe(c.weather_code),
        c.weather_code
    );

    let upcoming = upcoming_hours(forecast, hours);
    if !upcoming.is_empty() {
        let _ = writeln!(out, "\nNext {} hours:", upcoming.len());
        for p in upcoming {
            let _ = writeln!(
                out,
                "  {}  {:>6.1}°C  {:>5.1}%  {:>7.1} hPa",
                p.time, p.temperature, p.humidity, p.pressure
            );
        }
    }

    out
}

/// Hourly rows from the hour containing the current reading onwards.
/// If the current timestamp can't be parsed the series starts at its head.
pub fn upcoming_hours(forecast: &Forecast, hours: usize) -> Vec<HourlyPoint<'_>> {
    let start = NaiveDateTime::parse_from_str(&forecast.current.timestamp, TIME_FORMAT)
        .ok()
        .and_then(|t| t.with_minute(0));

    forecast
        .hourly
        .points()
        .filter(|p| match (start, NaiveDateTime::parse_from_str(p.time, TIME_FORMAT)) {
            (Some(start), Ok(t)) => t >= start,
            _ => true,
        })
        .take(hours)
        .collect()
}
