use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, error::UpstreamError, model::Forecast, provider::openmeteo::OpenMeteoProvider};

pub mod openmeteo;

/// Source of current and hourly readings for the configured location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One upstream request, no retry, no caching.
    async fn fetch_current_and_hourly(&self) -> Result<Forecast, UpstreamError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenMeteoProvider::from_config(config)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config() {
        let provider = provider_from_config(&Config::default());
        assert!(provider.is_ok());
    }

    #[test]
    fn provider_with_timeout() {
        let mut cfg = Config::default();
        cfg.upstream.timeout_secs = Some(2);
        assert!(provider_from_config(&cfg).is_ok());
    }
}
