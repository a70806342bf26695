use chrono::{DateTime, Local};

use super::classify::{AqiLevel, Theme, WeatherIcon};
use crate::config::FeelsLikeUnit;
use crate::upstream::models::{RawForecastDay, RawLifeIndex, RawLifeIndexEntry, RealtimeData};

/// Shown for any value the upstream did not provide
pub const PLACEHOLDER: &str = "--";

/// Upstream marker for "temperature not measured"
pub const UNKNOWN_TEMPERATURE: f64 = 999.0;

/// Everything the renderer needs. One instance per client session, rebuilt
/// field by field as refreshes succeed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub city: String,
    pub realtime: Option<RealtimeView>,
    pub life_index: LifeIndex,
    pub forecast: Vec<ForecastDayView>,
    pub theme: Theme,
    pub refreshed_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeView {
    pub location: String,
    pub updated_at: String,
    pub temperature: String,
    pub feels_like: String,
    pub weather: String,
    pub icon: WeatherIcon,
    pub humidity: String,
    pub wind: String,
    pub visibility: String,
    pub pressure: String,
    pub aqi: String,
    pub aqi_level: Option<AqiLevel>,
    pub pm25: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifeIndex {
    pub clothing: Option<LifeIndexEntry>,
    pub umbrella: Option<LifeIndexEntry>,
    pub uv: Option<LifeIndexEntry>,
    pub sport: Option<LifeIndexEntry>,
    pub car_wash: Option<LifeIndexEntry>,
    pub travel: Option<LifeIndexEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifeIndexEntry {
    pub level: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDayView {
    pub date: String,
    pub weather_day: String,
    pub weather_night: String,
    pub temperature_high: String,
    pub temperature_low: String,
    pub wind: String,
    pub humidity: String,
    pub rainfall: Option<String>,
}

impl ViewModel {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            ..Self::default()
        }
    }

    /// Replace the current-conditions block and re-derive the theme.
    ///
    /// Life index entries missing from this payload keep their previous value.
    pub fn apply_realtime(&mut self, data: RealtimeData, unit: FeelsLikeUnit) {
        let location = data
            .location
            .and_then(|l| l.formatted)
            .unwrap_or_else(|| self.city.clone());
        let realtime = data.realtime.unwrap_or_default();

        if let Some(life_index) = realtime.life_index {
            self.life_index.merge(life_index);
        }

        let weather = realtime.weather.unwrap_or_default();
        self.theme = Theme::from_text(&weather);

        self.realtime = Some(RealtimeView {
            location,
            updated_at: text_or_placeholder(realtime.updated_at),
            temperature: display_temperature(realtime.temperature),
            feels_like: display_feels_like(realtime.temperature_feels_like, unit),
            icon: WeatherIcon::classify(realtime.weather_code, &weather),
            weather: if weather.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                weather
            },
            humidity: with_unit(realtime.humidity, "%"),
            wind: join_wind(realtime.wind_direction, realtime.wind_strength),
            visibility: with_unit(realtime.visibility, "km"),
            pressure: with_unit(realtime.pressure, "hPa"),
            aqi: realtime
                .aqi
                .map_or_else(|| PLACEHOLDER.to_string(), |aqi| aqi.to_string()),
            aqi_level: realtime.aqi.map(AqiLevel::from_aqi),
            pm25: with_unit(realtime.pm25, ""),
        });
    }

    pub fn apply_forecast(&mut self, days: Vec<RawForecastDay>) {
        self.forecast = days.into_iter().map(ForecastDayView::from).collect();
    }
}

impl LifeIndex {
    fn merge(&mut self, raw: RawLifeIndex) {
        fn update(slot: &mut Option<LifeIndexEntry>, raw: Option<RawLifeIndexEntry>) {
            if let Some(raw) = raw {
                *slot = Some(LifeIndexEntry {
                    level: text_or_placeholder(raw.level),
                    desc: text_or_placeholder(raw.desc),
                });
            }
        }

        update(&mut self.clothing, raw.clothing);
        update(&mut self.umbrella, raw.umbrella);
        update(&mut self.uv, raw.uv);
        update(&mut self.sport, raw.sport);
        update(&mut self.car_wash, raw.car_wash);
        update(&mut self.travel, raw.travel);
    }

    /// Entries in display order with their labels
    pub fn entries(&self) -> [(&'static str, Option<&LifeIndexEntry>); 6] {
        [
            ("Clothing", self.clothing.as_ref()),
            ("Umbrella", self.umbrella.as_ref()),
            ("UV", self.uv.as_ref()),
            ("Sport", self.sport.as_ref()),
            ("Car wash", self.car_wash.as_ref()),
            ("Travel", self.travel.as_ref()),
        ]
    }
}

impl From<RawForecastDay> for ForecastDayView {
    fn from(day: RawForecastDay) -> Self {
        Self {
            date: day
                .date_desc
                .or(day.date)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            weather_day: text_or_placeholder(day.weather_day),
            weather_night: text_or_placeholder(day.weather_night),
            temperature_high: display_temperature(day.temperature_high),
            temperature_low: display_temperature(day.temperature_low),
            wind: join_wind(day.wind_direction_day, day.wind_strength_day),
            humidity: with_unit(day.humidity, "%"),
            rainfall: day.rainfall.map(|mm| format!("{mm}mm")),
        }
    }
}

/// `(F − 32) × 5/9`, rounded to one decimal
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    ((fahrenheit - 32.0) * 5.0 / 9.0 * 10.0).round() / 10.0
}

pub fn display_temperature(temperature: Option<f64>) -> String {
    match known_temperature(temperature) {
        Some(t) => format!("{t}°"),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn display_feels_like(temperature: Option<f64>, unit: FeelsLikeUnit) -> String {
    match (known_temperature(temperature), unit) {
        (Some(f), FeelsLikeUnit::Fahrenheit) => format!("{:.1}°", fahrenheit_to_celsius(f)),
        (Some(c), FeelsLikeUnit::Celsius) => format!("{c}°"),
        (None, _) => PLACEHOLDER.to_string(),
    }
}

fn known_temperature(temperature: Option<f64>) -> Option<f64> {
    temperature.filter(|t| *t != UNKNOWN_TEMPERATURE)
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v}{unit}"))
}

fn text_or_placeholder(text: Option<String>) -> String {
    text.unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn join_wind(direction: Option<String>, strength: Option<String>) -> String {
    match (direction, strength) {
        (Some(d), Some(s)) => format!("{d} {s}"),
        (Some(d), None) => d,
        (None, Some(s)) => s,
        (None, None) => PLACEHOLDER.to_string(),
    }
}
