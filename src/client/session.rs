use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::fetcher::FallbackFetcher;
use super::view::ViewModel;
use crate::config::FeelsLikeUnit;
use crate::upstream::models::{Envelope, ForecastData, RealtimeData};
use crate::upstream::Resource;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load weather data, check your network connection";

/// Where a session shows its state. Implementations must not block.
pub trait ViewSurface: Send + Sync {
    fn set_loading(&self, loading: bool);

    fn present(&self, view: &ViewModel);

    /// Transient, user-visible error
    fn show_error(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Blank city, nothing fetched
    Skipped,
    /// At least one resource was applied to the view
    Applied { realtime: bool, forecast: bool },
    /// Neither resource was usable
    Failed,
    /// A newer refresh started while this one was in flight
    Stale,
}

/// One client session: a view model plus the refresh loop feeding it.
///
/// Every refresh takes a generation number. Results are only applied when
/// their generation is still the newest, so a slow response can never
/// overwrite a faster, newer one.
pub struct Session {
    fetcher: FallbackFetcher,
    surface: Arc<dyn ViewSurface>,
    view: Mutex<ViewModel>,
    generation: AtomicU64,
    feels_like_unit: FeelsLikeUnit,
}

impl Session {
    pub fn new(
        fetcher: FallbackFetcher,
        surface: Arc<dyn ViewSurface>,
        default_city: &str,
        feels_like_unit: FeelsLikeUnit,
    ) -> Self {
        Self {
            fetcher,
            surface,
            view: Mutex::new(ViewModel::new(default_city)),
            generation: AtomicU64::new(0),
            feels_like_unit,
        }
    }

    pub async fn refresh(&self, city: &str) -> RefreshOutcome {
        let city = city.trim();
        if city.is_empty() {
            return RefreshOutcome::Skipped;
        }

        // Taken under the view lock so it cannot interleave with an older
        // refresh clearing the indicator
        let generation = {
            let _view = self.view.lock().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.surface.set_loading(true);
            generation
        };
        tracing::debug!(city = %city, generation, "Refresh started");

        let outcome = self.load(city, generation).await;

        tracing::info!(city = %city, generation, outcome = ?outcome, "Refresh finished");
        outcome
    }

    async fn load(&self, city: &str, generation: u64) -> RefreshOutcome {
        let (realtime, forecast) = tokio::join!(
            self.fetcher.fetch::<RealtimeData>(Resource::Realtime, city),
            self.fetcher.fetch::<ForecastData>(Resource::Forecast, city),
        );

        let realtime = realtime.and_then(Envelope::into_success);
        let forecast = forecast
            .and_then(Envelope::into_success)
            .and_then(|data| data.forecast);

        let mut view = self.view.lock().await;
        // A stale refresh leaves the indicator to the newer one still in flight
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(city = %city, generation, "Discarding stale refresh");
            return RefreshOutcome::Stale;
        }

        if realtime.is_none() && forecast.is_none() {
            self.surface.show_error(LOAD_FAILED_MESSAGE);
            self.surface.set_loading(false);
            return RefreshOutcome::Failed;
        }

        view.city = city.to_string();
        let applied_realtime = realtime.is_some();
        let applied_forecast = forecast.is_some();

        if let Some(data) = realtime {
            view.apply_realtime(data, self.feels_like_unit);
        }
        if let Some(days) = forecast {
            view.apply_forecast(days);
        }
        view.refreshed_at = Some(chrono::Local::now());

        self.surface.present(&view);
        self.surface.set_loading(false);

        RefreshOutcome::Applied {
            realtime: applied_realtime,
            forecast: applied_forecast,
        }
    }
}
