use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{
    error::ClientFetchError,
    model::{ErrorEnvelope, WeatherEnvelope},
    service::FETCH_FAILED,
};

/// Whatever the dashboard polls for envelopes.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self) -> Result<WeatherEnvelope, ClientFetchError>;
}

/// HTTP client for an envmon server's `GET /weather`.
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: Client,
    url: String,
}

impl ServerClient {
    /// Requests that take longer than `timeout` fail with
    /// [`ClientFetchError::Request`].
    pub fn new(server_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            url: format!("{}/weather", server_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl WeatherSource for ServerClient {
    async fn fetch(&self) -> Result<WeatherEnvelope, ClientFetchError> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(ClientFetchError::Request)?;

        let status = res.status();
        if !status.is_success() {
            let message = res
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| FETCH_FAILED.to_string());
            return Err(ClientFetchError::Status { status, message });
        }

        res.json::<WeatherEnvelope>()
            .await
            .map_err(ClientFetchError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn envelope() -> serde_json::Value {
        serde_json::json!({
            "current": {
                "temperature": 18.4,
                "humidity": 71.0,
                "pressure": 1013.2,
                "weatherCode": 61,
                "timestamp": "2025-01-12T14:30"
            },
            "history": [
                { "timestamp": "02:30:05 PM", "temperature": 18.4, "humidity": 71.0, "pressure": 1013.2 }
            ],
            "location": { "latitude": 27.75, "longitude": 85.375, "name": "Kathmandu, Nepal" }
        })
    }

    fn client(base: &str) -> ServerClient {
        ServerClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn url_strips_trailing_slash() {
        assert_eq!(client("http://host:3000/").url, "http://host:3000/weather");
    }

    #[tokio::test]
    async fn decodes_success_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope()))
            .mount(&server)
            .await;

        let env = client(&server.uri()).fetch().await.unwrap();
        assert_eq!(env.current.weather_code, 61);
        assert_eq!(env.history.len(), 1);
        assert_eq!(env.location.name, "Kathmandu, Nepal");
    }

    #[tokio::test]
    async fn server_error_carries_envelope_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "error": "Failed to fetch weather data" })),
            )
            .mount(&server)
            .await;

        let err = client(&server.uri()).fetch().await.unwrap_err();
        match err {
            ClientFetchError::Status { status, message } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(message, "Failed to fetch weather data");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_falls_back_to_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = client(&server.uri()).fetch().await.unwrap_err();
        assert_eq!(err.to_string(), FETCH_FAILED);
    }

    #[tokio::test]
    async fn garbage_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let err = client(&server.uri()).fetch().await.unwrap_err();
        assert!(matches!(err, ClientFetchError::Decode(_)));
    }

    #[tokio::test]
    async fn unanswered_request_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = ServerClient::new(&server.uri(), Duration::from_millis(100)).unwrap();
        match client.fetch().await.unwrap_err() {
            ClientFetchError::Request(err) => assert!(err.is_timeout()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
