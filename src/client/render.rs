use serde_json::{json, Value};
use std::fmt::Write;

use super::view::{ForecastDayView, RealtimeView, ViewModel};

/// Placed between day and night conditions when they differ
pub const TRANSITION_SEPARATOR: &str = " → ";

/// Render the whole view model as plain text
pub fn render(view: &ViewModel) -> String {
    let mut out = String::new();

    match &view.realtime {
        Some(realtime) => render_realtime(&mut out, realtime, view),
        None => {
            let _ = writeln!(out, "{}: current conditions unavailable", view.city);
        }
    }

    let life_index: Vec<_> = view
        .life_index
        .entries()
        .into_iter()
        .filter_map(|(label, entry)| entry.map(|e| (label, e)))
        .collect();
    if !life_index.is_empty() {
        out.push_str("\nLife index\n");
        for (label, entry) in life_index {
            let _ = writeln!(out, "  {label:<9} {}  {}", entry.level, entry.desc);
        }
    }

    if !view.forecast.is_empty() {
        out.push_str("\nForecast\n");
        for day in &view.forecast {
            let _ = writeln!(out, "  {}", render_forecast_day(day));
        }
    }

    if let Some(at) = view.refreshed_at {
        let _ = writeln!(out, "\nRefreshed {}", at.format("%H:%M:%S"));
    }

    out
}

fn render_realtime(out: &mut String, realtime: &RealtimeView, view: &ViewModel) {
    let _ = writeln!(
        out,
        "{} {}    updated {}",
        realtime.icon.glyph(),
        realtime.location,
        realtime.updated_at
    );
    let _ = writeln!(
        out,
        "  {}  {}  (feels like {})",
        realtime.weather, realtime.temperature, realtime.feels_like
    );
    let _ = writeln!(
        out,
        "  Humidity {}   Wind {}   Visibility {}   Pressure {}",
        realtime.humidity, realtime.wind, realtime.visibility, realtime.pressure
    );
    let aqi_label = realtime
        .aqi_level
        .map(|level| format!(" ({level})"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "  AQI {}{}   PM2.5 {}   Theme {}",
        realtime.aqi, aqi_label, realtime.pm25, view.theme
    );
}

/// One forecast line. The night condition only appears when it differs from
/// the day condition, rainfall only when reported.
pub fn render_forecast_day(day: &ForecastDayView) -> String {
    let mut line = format!("{:<6} {}", day.date, day.weather_day);
    if day.weather_night != day.weather_day {
        line.push_str(TRANSITION_SEPARATOR);
        line.push_str(&day.weather_night);
    }
    let _ = write!(
        line,
        "   {} / {}   {}   humidity {}",
        day.temperature_high, day.temperature_low, day.wind, day.humidity
    );
    if let Some(rainfall) = &day.rainfall {
        let _ = write!(line, "   rain {rainfall}");
    }
    line
}

/// Machine-readable snapshot, using the class names the web front end styles
pub fn render_json(view: &ViewModel) -> Value {
    let realtime = view.realtime.as_ref().map(|r| {
        json!({
            "location": r.location,
            "updated_at": r.updated_at,
            "temperature": r.temperature,
            "feels_like": r.feels_like,
            "weather": r.weather,
            "icon_class": r.icon.css_class(),
            "humidity": r.humidity,
            "wind": r.wind,
            "visibility": r.visibility,
            "pressure": r.pressure,
            "aqi": r.aqi,
            "aqi_label": r.aqi_level.map(|level| level.label()),
            "aqi_label_zh": r.aqi_level.map(|level| level.label_zh()),
            "pm25": r.pm25,
        })
    });

    let life_index: serde_json::Map<String, Value> = view
        .life_index
        .entries()
        .into_iter()
        .filter_map(|(label, entry)| {
            entry.map(|e| (label.to_string(), json!({ "level": e.level, "desc": e.desc })))
        })
        .collect();

    let forecast: Vec<Value> = view
        .forecast
        .iter()
        .map(|day| {
            json!({
                "date": day.date,
                "weather_day": day.weather_day,
                "weather_night": day.weather_night,
                "temperature_high": day.temperature_high,
                "temperature_low": day.temperature_low,
                "wind": day.wind,
                "humidity": day.humidity,
                "rainfall": day.rainfall,
            })
        })
        .collect();

    json!({
        "city": view.city,
        "theme_class": view.theme.css_class(),
        "realtime": realtime,
        "life_index": life_index,
        "forecast": forecast,
        "refreshed_at": view.refreshed_at.map(|at| at.to_rfc3339()),
    })
}
