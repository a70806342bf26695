use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

// ============================================================================
// Upstream wire contracts
// Every field is optional: the upstream schema is undocumented and fields come
// and go between cities. Numbers may arrive as strings. Malformed fields are
// dropped instead of failing the whole payload.
// ============================================================================

/// `{code, message?, data}` wrapper shared by both upstream endpoints
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "strict_status")]
    pub code: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Payload of a response the upstream marked successful
    pub fn into_success(self) -> Option<T> {
        if self.code == Some(200) {
            self.data
        } else {
            tracing::warn!(code = ?self.code, message = ?self.message, "Upstream reported failure");
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RealtimeData {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<RawLocation>,
    #[serde(default, deserialize_with = "lenient")]
    pub realtime: Option<RawRealtime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default, deserialize_with = "lenient_text")]
    pub formatted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRealtime {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature_feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub weather: Option<String>,
    #[serde(default, deserialize_with = "lenient_code")]
    pub weather_code: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub wind_direction: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub wind_strength: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub visibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pressure: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub aqi: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pm25: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub life_index: Option<RawLifeIndex>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLifeIndex {
    #[serde(default, deserialize_with = "lenient")]
    pub clothing: Option<RawLifeIndexEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub umbrella: Option<RawLifeIndexEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub uv: Option<RawLifeIndexEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub sport: Option<RawLifeIndexEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub car_wash: Option<RawLifeIndexEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub travel: Option<RawLifeIndexEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLifeIndexEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub desc: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub forecast: Option<Vec<RawForecastDay>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawForecastDay {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub weather_day: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub weather_night: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub wind_direction_day: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub wind_strength_day: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rainfall: Option<f64>,
}

// ============================================================================
// Lenient field decoders
// ============================================================================

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed upstream field");
            Ok(None)
        }
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.map(|n| n.round() as i64))
}

/// Envelope status must be a JSON integer; `"200"` or `200.0` is not success
fn strict_status<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        _ => None,
    })
}

/// Weather codes arrive as `7`, `"7"` or `"07"`
fn lenient_code<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|c| u32::try_from(c).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_realtime_payload_decodes() {
        let payload = json!({
            "code": 200,
            "message": "ok",
            "data": {
                "location": { "formatted": "福建省 福州市 福清市" },
                "realtime": {
                    "temperature": 26,
                    "temperature_feels_like": "80.6",
                    "weather": "多云",
                    "weather_code": "01",
                    "humidity": 72,
                    "wind_direction": "东南风",
                    "visibility": 16.2,
                    "pressure": 1008,
                    "aqi": 35,
                    "pm25": 18,
                    "updated_at": "2025-06-01 10:20",
                    "life_index": {
                        "clothing": { "level": "舒适", "desc": "建议穿短袖" },
                        "uv": { "level": "弱" }
                    }
                }
            }
        });

        let envelope: Envelope<RealtimeData> = serde_json::from_value(payload).unwrap();
        let data = envelope.into_success().expect("code 200 should yield data");
        let realtime = data.realtime.unwrap();

        assert_eq!(
            data.location.unwrap().formatted.as_deref(),
            Some("福建省 福州市 福清市")
        );
        assert_eq!(realtime.temperature, Some(26.0));
        assert_eq!(realtime.temperature_feels_like, Some(80.6));
        assert_eq!(realtime.weather_code, Some(1));
        assert_eq!(realtime.aqi, Some(35));
        let life_index = realtime.life_index.unwrap();
        assert_eq!(life_index.clothing.unwrap().desc.as_deref(), Some("建议穿短袖"));
        assert!(life_index.uv.unwrap().desc.is_none());
        assert!(life_index.travel.is_none());
    }

    #[test]
    fn test_non_200_code_yields_no_data() {
        let envelope: Envelope<RealtimeData> =
            serde_json::from_value(json!({ "code": 404, "message": "city not found", "data": {} }))
                .unwrap();
        assert!(envelope.into_success().is_none());
    }

    #[test]
    fn test_code_must_be_integer_200() {
        for code in [json!("200"), json!(200.0), json!(199.6)] {
            let envelope: Envelope<ForecastData> =
                serde_json::from_value(json!({ "code": code, "data": { "forecast": [] } }))
                    .unwrap();
            assert_eq!(envelope.code, None);
            assert!(envelope.into_success().is_none());
        }
    }

    #[test]
    fn test_malformed_fields_are_dropped() {
        let envelope: Envelope<RealtimeData> = serde_json::from_value(json!({
            "code": "200",
            "data": {
                "location": "not an object",
                "realtime": {
                    "temperature": "n/a",
                    "weather": "",
                    "weather_code": "sunny",
                    "life_index": "none"
                }
            }
        }))
        .unwrap();

        let data = envelope.into_success().unwrap();
        assert!(data.location.is_none());
        let realtime = data.realtime.unwrap();
        assert!(realtime.temperature.is_none());
        assert!(realtime.weather.is_none());
        assert!(realtime.weather_code.is_none());
        assert!(realtime.life_index.is_none());
    }

    #[test]
    fn test_forecast_skips_malformed_days() {
        let envelope: Envelope<ForecastData> = serde_json::from_value(json!({
            "code": 200,
            "data": {
                "forecast": [
                    { "date_desc": "今天", "weather_day": "晴", "weather_night": "多云",
                      "temperature_high": 31, "temperature_low": "24" },
                    "garbage"
                ]
            }
        }))
        .unwrap();

        let days = envelope.into_success().unwrap().forecast.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temperature_low, Some(24.0));
        assert!(days[0].rainfall.is_none());
    }

    #[test]
    fn test_forecast_not_an_array() {
        let envelope: Envelope<ForecastData> =
            serde_json::from_value(json!({ "code": 200, "data": { "forecast": {} } })).unwrap();
        assert!(envelope.into_success().unwrap().forecast.is_none());
    }
}
