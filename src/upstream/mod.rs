pub mod models;

use std::fmt;

/// The two resources the upstream API exposes per city
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Realtime,
    Forecast,
}

impl Resource {
    /// Path on the upstream API, queried with `?query=<city>`
    pub fn upstream_path(self) -> &'static str {
        match self {
            Resource::Realtime => "/v2/weather",
            Resource::Forecast => "/v2/weather/forecast",
        }
    }

    /// Path on the proxy gateway, queried with `?city=<city>`
    pub fn proxy_path(self) -> &'static str {
        match self {
            Resource::Realtime => "/api/weather",
            Resource::Forecast => "/api/forecast",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Realtime => "realtime",
            Resource::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
