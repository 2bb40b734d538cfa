use chrono::{Local, NaiveTime};
use parking_lot::Mutex;
use std::fmt;

use crate::{
    Config,
    error::UpstreamError,
    history::HistoryBuffer,
    model::{HistoryEntry, LocationInfo, WeatherEnvelope},
    provider::{WeatherProvider, provider_from_config},
};

/// Message returned to callers whenever the upstream fetch fails.
pub const FETCH_FAILED: &str = "Failed to fetch weather data";

/// `hh:mm:ss AM/PM`, two digits per field.
const CAPTURE_TIME_FORMAT: &str = "%I:%M:%S %p";

/// Fetches a reading, folds it into the rolling history and assembles the
/// response envelope. One instance is shared by all request handlers.
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    history: Mutex<HistoryBuffer>,
    location_name: String,
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService")
            .field("provider", &self.provider)
            .field("history_len", &self.history.lock().len())
            .field("location_name", &self.location_name)
            .finish()
    }
}

impl WeatherService {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        capacity: usize,
        location_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            history: Mutex::new(HistoryBuffer::new(capacity)),
            location_name: location_name.into(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(
            provider,
            config.history.capacity,
            config.location.name.clone(),
        ))
    }

    /// Serve one request using the local wall clock as capture time.
    pub async fn handle(&self) -> Result<WeatherEnvelope, UpstreamError> {
        self.handle_at(|| Local::now().time()).await
    }

    /// Serve one request. `now` is read only after a successful fetch, and
    /// under the history lock so recording order follows capture time.
    pub async fn handle_at<F>(&self, now: F) -> Result<WeatherEnvelope, UpstreamError>
    where
        F: FnOnce() -> NaiveTime,
    {
        let forecast = self.provider.fetch_current_and_hourly().await?;
        let current = forecast.current;

        let history = {
            let mut buf = self.history.lock();
            let captured = now().format(CAPTURE_TIME_FORMAT).to_string();
            buf.record(HistoryEntry::from_snapshot(&current, captured));
            buf.snapshot()
        };

        tracing::info!(
            temperature = current.temperature,
            humidity = current.humidity,
            pressure = current.pressure,
            weather_code = current.weather_code,
            history_len = history.len(),
            "Recorded reading"
        );

        Ok(WeatherEnvelope {
            current,
            history,
            location: LocationInfo {
                latitude: forecast.latitude,
                longitude: forecast.longitude,
                name: self.location_name.clone(),
            },
        })
    }

    #[cfg(test)]
    fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().snapshot()
    }
}
