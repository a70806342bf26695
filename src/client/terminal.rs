use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};

use super::fetcher::FallbackFetcher;
use super::render::{render, render_json};
use super::session::{RefreshOutcome, Session, ViewSurface};
use super::source::HttpSource;
use super::view::ViewModel;
use crate::config::AppConfig;

const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[K";

/// Prints to the terminal: the view on stdout, loading and errors on stderr
pub struct TerminalSurface {
    json: bool,
}

impl TerminalSurface {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl ViewSurface for TerminalSurface {
    fn set_loading(&self, loading: bool) {
        let mut stderr = std::io::stderr();
        let _ = if loading {
            write!(stderr, "Loading weather...")
        } else {
            write!(stderr, "{CLEAR_LINE}")
        };
        let _ = stderr.flush();
    }

    fn present(&self, view: &ViewModel) {
        if self.json {
            println!("{}", render_json(view));
        } else {
            eprint!("{CLEAR_LINE}");
            println!("{}{}{RESET}", view.theme.ansi_color(), render(view));
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("{CLEAR_LINE}error: {message}");
    }
}

/// Run the terminal client.
///
/// Refreshes `city` (or the configured default) first, then treats every
/// line on stdin as a new search until EOF.
pub async fn run(
    config: &AppConfig,
    city: Option<String>,
    once: bool,
    json: bool,
) -> anyhow::Result<()> {
    let client = crate::create_http_client(config.upstream_timeout())?;
    let fetcher = FallbackFetcher::new(
        Arc::new(HttpSource::upstream(client.clone(), &config.upstream_base_url)),
        Arc::new(HttpSource::proxy(client, &config.proxy_base_url)),
    );
    let session = Arc::new(Session::new(
        fetcher,
        Arc::new(TerminalSurface::new(json)),
        &config.default_city,
        config.feels_like_unit,
    ));

    let initial = city.unwrap_or_else(|| config.default_city.clone());
    let outcome = session.refresh(&initial).await;

    match outcome {
        RefreshOutcome::Failed if once => {
            anyhow::bail!("No weather data available for {initial}");
        }
        RefreshOutcome::Applied { realtime, forecast } if !(realtime && forecast) => {
            tracing::warn!(realtime, forecast, "Showing partial weather data");
        }
        _ => {}
    }

    if once {
        return Ok(());
    }

    eprintln!("Enter a city name to search (Ctrl+D to quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();
    while let Some(line) = lines.next_line().await? {
        let session = Arc::clone(&session);
        // Not awaited here: a new search may start while the last is still loading
        in_flight.spawn(async move { session.refresh(&line).await });
        reap_finished(&mut in_flight);
    }

    while let Some(result) = in_flight.join_next().await {
        log_task_result(result);
    }

    Ok(())
}

/// Collect refreshes that already completed, returning how many were reaped
fn reap_finished(in_flight: &mut JoinSet<RefreshOutcome>) -> usize {
    let mut reaped = 0;
    while let Some(result) = in_flight.try_join_next() {
        log_task_result(result);
        reaped += 1;
    }
    reaped
}

fn log_task_result(result: Result<RefreshOutcome, JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Refresh task panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_reap_finished_leaves_running_tasks() {
        let mut in_flight = JoinSet::new();
        in_flight.spawn(async { RefreshOutcome::Skipped });
        in_flight.spawn(async { RefreshOutcome::Failed });
        in_flight.spawn(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            RefreshOutcome::Stale
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(reap_finished(&mut in_flight), 2);
        assert_eq!(in_flight.len(), 1);
        assert_eq!(reap_finished(&mut in_flight), 0);
        in_flight.abort_all();
    }

    #[tokio::test]
    async fn test_reap_finished_on_empty_set() {
        let mut in_flight: JoinSet<RefreshOutcome> = JoinSet::new();
        assert_eq!(reap_finished(&mut in_flight), 0);
    }
}
