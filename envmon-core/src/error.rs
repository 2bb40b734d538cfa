use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the upstream weather provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to send request to Open-Meteo: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Open-Meteo request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse Open-Meteo JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of the dashboard's own request to the envmon server.
#[derive(Debug, Error)]
pub enum ClientFetchError {
    #[error("failed to reach weather server: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered but not with 2xx. `message` carries the `error`
    /// field of the failure envelope when one was sent.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode weather server response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("weather server did not answer within {0:?}")]
    TimedOut(Duration),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
