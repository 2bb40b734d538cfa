use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    Config,
    config::LocationConfig,
    error::{UpstreamError, truncate_body},
    model::{Forecast, HourlySeries, Snapshot},
};

use super::WeatherProvider;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,pressure_msl,weather_code";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,pressure_msl";

/// Open-Meteo forecast endpoint, fixed to one location.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    base_url: String,
    location: LocationConfig,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>, location: LocationConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            location,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.upstream.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.upstream.base_url.clone(),
            location: config.location.clone(),
        })
    }

    /// Query string sent on every request.
    fn query(&self) -> [(&'static str, String); 5] {
        [
            ("latitude", coordinate(self.location.latitude)),
            ("longitude", coordinate(self.location.longitude)),
            ("current", CURRENT_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("timezone", self.location.timezone.clone()),
        ]
    }

    async fn fetch(&self) -> Result<Forecast, UpstreamError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&self.query())
            .send()
            .await
            .map_err(UpstreamError::Request)?;

        let status = res.status();
        let body = res.text().await.map_err(UpstreamError::Request)?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OmResponse = serde_json::from_str(&body)?;
        Ok(parsed.into())
    }
}

/// Four decimals (`85.3240`) when that loses nothing, otherwise every digit.
fn coordinate(value: f64) -> String {
    let fixed = format!("{value:.4}");
    if fixed.parse::<f64>().is_ok_and(|v| v == value) {
        fixed
    } else {
        value.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    pressure_msl: f64,
    weather_code: i32,
    time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    pressure_msl: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    latitude: f64,
    longitude: f64,
    current: OmCurrent,
    #[serde(default)]
    hourly: OmHourly,
}

impl From<OmResponse> for Forecast {
    fn from(res: OmResponse) -> Self {
        // Open-Meteo sends null for hours it has no model output for.
        let fill = |v: Vec<Option<f64>>| -> Vec<f64> {
            v.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect()
        };

        Forecast {
            latitude: res.latitude,
            longitude: res.longitude,
            current: Snapshot {
                temperature: res.current.temperature_2m,
                humidity: res.current.relative_humidity_2m,
                pressure: res.current.pressure_msl,
                weather_code: res.current.weather_code,
                timestamp: res.current.time,
            },
            hourly: HourlySeries {
                time: res.hourly.time,
                temperature: fill(res.hourly.temperature_2m),
                humidity: fill(res.hourly.relative_humidity_2m),
                pressure: fill(res.hourly.pressure_msl),
            },
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_current_and_hourly(&self) -> Result<Forecast, UpstreamError> {
        let result = self.fetch().await;
        if let Err(err) = &result {
            tracing::error!(error = %err, "Error fetching Open-Meteo data");
        }
        result
    }
}
