use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::source::{FetchError, WeatherSource};
use crate::upstream::models::Envelope;
use crate::upstream::Resource;

/// Tries the primary source once, then the fallback once.
///
/// Every failure mode collapses to `None` so one resource failing never
/// affects the other.
#[derive(Clone)]
pub struct FallbackFetcher {
    primary: Arc<dyn WeatherSource>,
    fallback: Arc<dyn WeatherSource>,
}

impl FallbackFetcher {
    pub fn new(primary: Arc<dyn WeatherSource>, fallback: Arc<dyn WeatherSource>) -> Self {
        Self { primary, fallback }
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        resource: Resource,
        city: &str,
    ) -> Option<Envelope<T>> {
        match fetch_envelope(self.primary.as_ref(), resource, city).await {
            Ok(envelope) => return Some(envelope),
            Err(e) => tracing::warn!(
                source = self.primary.name(),
                resource = %resource,
                city = %city,
                error = %e,
                "Direct fetch failed, falling back"
            ),
        }

        match fetch_envelope(self.fallback.as_ref(), resource, city).await {
            Ok(envelope) => {
                tracing::info!(source = self.fallback.name(), resource = %resource, "Fallback fetch succeeded");
                Some(envelope)
            }
            Err(e) => {
                tracing::error!(
                    source = self.fallback.name(),
                    resource = %resource,
                    city = %city,
                    error = %e,
                    "Fallback fetch failed, resource unavailable"
                );
                None
            }
        }
    }
}

async fn fetch_envelope<T: DeserializeOwned>(
    source: &dyn WeatherSource,
    resource: Resource,
    city: &str,
) -> Result<Envelope<T>, FetchError> {
    let value = source.fetch(resource, city).await?;
    Ok(serde_json::from_value(value)?)
}
