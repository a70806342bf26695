//! Weather text, weather code and AQI classification.
//!
//! Text matching works on the Chinese condition names the upstream returns
//! ("晴", "小雨", "雷阵雨", ...). The first indicator that matches wins, so a
//! mixed condition like "雨夹雪" resolves to rain.

use std::fmt;

const SUNNY: &[&str] = &["晴"];
const RAIN: &[&str] = &["雨"];
const SNOW: &[&str] = &["雪"];
const THUNDER: &[&str] = &["雷"];
const FOG: &[&str] = &["雾", "霾"];
const CLOUD: &[&str] = &["云", "阴"];

/// Condition icon shown next to the current temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherIcon {
    Sun,
    CloudSun,
    #[default]
    Cloud,
    CloudRain,
    Snowflake,
    Bolt,
    Smog,
}

impl WeatherIcon {
    /// Font Awesome class used by the static web front end
    pub fn css_class(self) -> &'static str {
        match self {
            WeatherIcon::Sun => "fas fa-sun",
            WeatherIcon::CloudSun => "fas fa-cloud-sun",
            WeatherIcon::Cloud => "fas fa-cloud",
            WeatherIcon::CloudRain => "fas fa-cloud-rain",
            WeatherIcon::Snowflake => "fas fa-snowflake",
            WeatherIcon::Bolt => "fas fa-bolt",
            WeatherIcon::Smog => "fas fa-smog",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀",
            WeatherIcon::CloudSun => "⛅",
            WeatherIcon::Cloud => "☁",
            WeatherIcon::CloudRain => "🌧",
            WeatherIcon::Snowflake => "❄",
            WeatherIcon::Bolt => "⚡",
            WeatherIcon::Smog => "🌫",
        }
    }

    /// Classify by condition text
    pub fn from_text(weather: &str) -> Self {
        let weather = weather.to_lowercase();
        if contains_any(&weather, SUNNY) {
            WeatherIcon::Sun
        } else if contains_any(&weather, RAIN) {
            WeatherIcon::CloudRain
        } else if contains_any(&weather, SNOW) {
            WeatherIcon::Snowflake
        } else if contains_any(&weather, THUNDER) {
            WeatherIcon::Bolt
        } else if contains_any(&weather, FOG) {
            WeatherIcon::Smog
        } else {
            WeatherIcon::Cloud
        }
    }

    /// Classify by the upstream numeric condition code
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => WeatherIcon::Sun,
            1 => WeatherIcon::CloudSun,
            2 | 3 => WeatherIcon::Cloud,
            4 | 7 => WeatherIcon::CloudRain,
            8 => WeatherIcon::Bolt,
            13..=15 => WeatherIcon::Snowflake,
            18 => WeatherIcon::Smog,
            _ => WeatherIcon::Cloud,
        }
    }

    /// Prefer the code when the upstream sent one
    pub fn classify(code: Option<u32>, weather: &str) -> Self {
        match code {
            Some(code) => Self::from_code(code),
            None => Self::from_text(weather),
        }
    }
}

/// Page background theme. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Sunny,
    #[default]
    Cloudy,
    Rainy,
    Snowy,
    Foggy,
    Thunder,
}

impl Theme {
    pub fn css_class(self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
            Theme::Snowy => "snowy",
            Theme::Foggy => "foggy",
            Theme::Thunder => "thunder",
        }
    }

    /// ANSI foreground colour for the terminal banner
    pub fn ansi_color(self) -> &'static str {
        match self {
            Theme::Sunny => "\x1b[33m",
            Theme::Cloudy => "\x1b[37m",
            Theme::Rainy => "\x1b[34m",
            Theme::Snowy => "\x1b[96m",
            Theme::Foggy => "\x1b[90m",
            Theme::Thunder => "\x1b[35m",
        }
    }

    pub fn from_text(weather: &str) -> Self {
        let weather = weather.to_lowercase();
        if contains_any(&weather, SUNNY) {
            Theme::Sunny
        } else if contains_any(&weather, RAIN) || weather.contains("shower") {
            Theme::Rainy
        } else if contains_any(&weather, SNOW) {
            Theme::Snowy
        } else if contains_any(&weather, THUNDER) {
            Theme::Thunder
        } else if contains_any(&weather, FOG) {
            Theme::Foggy
        } else if contains_any(&weather, CLOUD) {
            Theme::Cloudy
        } else {
            Theme::default()
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Air quality band, inclusive upper bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub fn from_aqi(aqi: i64) -> Self {
        match aqi {
            i64::MIN..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitive,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "good",
            AqiLevel::Moderate => "moderate",
            AqiLevel::UnhealthyForSensitive => "unhealthy for sensitive groups",
            AqiLevel::Unhealthy => "unhealthy",
            AqiLevel::VeryUnhealthy => "very unhealthy",
            AqiLevel::Hazardous => "hazardous",
        }
    }

    /// Label used by the upstream's own pages
    pub fn label_zh(self) -> &'static str {
        match self {
            AqiLevel::Good => "优",
            AqiLevel::Moderate => "良",
            AqiLevel::UnhealthyForSensitive => "轻度污染",
            AqiLevel::Unhealthy => "中度污染",
            AqiLevel::VeryUnhealthy => "重度污染",
            AqiLevel::Hazardous => "严重污染",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_from_text() {
        assert_eq!(WeatherIcon::from_text("晴"), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::from_text("小雨"), WeatherIcon::CloudRain);
        assert_eq!(WeatherIcon::from_text("大雪"), WeatherIcon::Snowflake);
        assert_eq!(WeatherIcon::from_text("雾"), WeatherIcon::Smog);
        assert_eq!(WeatherIcon::from_text("霾"), WeatherIcon::Smog);
        assert_eq!(WeatherIcon::from_text("多云"), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::from_text(""), WeatherIcon::Cloud);
    }

    #[test]
    fn test_icon_precedence() {
        // Rain is checked before snow and thunder
        assert_eq!(WeatherIcon::from_text("雨夹雪"), WeatherIcon::CloudRain);
        assert_eq!(WeatherIcon::from_text("雷阵雨"), WeatherIcon::CloudRain);
        // Sun is checked before everything
        assert_eq!(WeatherIcon::from_text("晴转雨"), WeatherIcon::Sun);
        // Thunder without rain
        assert_eq!(WeatherIcon::from_text("雷电"), WeatherIcon::Bolt);
    }

    #[test]
    fn test_icon_from_code() {
        assert_eq!(WeatherIcon::from_code(0), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::from_code(1), WeatherIcon::CloudSun);
        assert_eq!(WeatherIcon::from_code(3), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::from_code(7), WeatherIcon::CloudRain);
        assert_eq!(WeatherIcon::from_code(8), WeatherIcon::Bolt);
        assert_eq!(WeatherIcon::from_code(14), WeatherIcon::Snowflake);
        assert_eq!(WeatherIcon::from_code(18), WeatherIcon::Smog);
        assert_eq!(WeatherIcon::from_code(99), WeatherIcon::Cloud);
    }

    #[test]
    fn test_icon_prefers_code() {
        assert_eq!(WeatherIcon::classify(Some(0), "小雨"), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::classify(None, "小雨"), WeatherIcon::CloudRain);
    }

    #[test]
    fn test_theme_from_text() {
        assert_eq!(Theme::from_text("晴"), Theme::Sunny);
        assert_eq!(Theme::from_text("阵雨"), Theme::Rainy);
        assert_eq!(Theme::from_text("Light Shower"), Theme::Rainy);
        assert_eq!(Theme::from_text("雨夹雪"), Theme::Rainy);
        assert_eq!(Theme::from_text("小雪"), Theme::Snowy);
        assert_eq!(Theme::from_text("雷电"), Theme::Thunder);
        assert_eq!(Theme::from_text("霾"), Theme::Foggy);
        assert_eq!(Theme::from_text("阴"), Theme::Cloudy);
        assert_eq!(Theme::from_text("unknown"), Theme::Cloudy);
    }

    #[test]
    fn test_aqi_boundaries() {
        assert_eq!(AqiLevel::from_aqi(0), AqiLevel::Good);
        assert_eq!(AqiLevel::from_aqi(50), AqiLevel::Good);
        assert_eq!(AqiLevel::from_aqi(51), AqiLevel::Moderate);
        assert_eq!(AqiLevel::from_aqi(100), AqiLevel::Moderate);
        assert_eq!(AqiLevel::from_aqi(150), AqiLevel::UnhealthyForSensitive);
        assert_eq!(AqiLevel::from_aqi(151), AqiLevel::Unhealthy);
        assert_eq!(AqiLevel::from_aqi(300), AqiLevel::VeryUnhealthy);
        assert_eq!(AqiLevel::from_aqi(301), AqiLevel::Hazardous);
        assert_eq!(AqiLevel::from_aqi(301).label_zh(), "严重污染");
    }
}
