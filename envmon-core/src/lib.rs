//! Core library for the `envmon` environmental monitor.
//!
//! This crate defines:
//! - Configuration handling
//! - The Open-Meteo data source adapter
//! - The rolling history window and the request handler built on it
//! - The client side: server client, poller and weather code labels
//!
//! It is used by `envmon-cli`, which provides the HTTP server and dashboard.

pub mod client;
pub mod codes;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod poller;
pub mod provider;
pub mod service;

pub use client::{ServerClient, WeatherSource};
pub use config::Config;
pub use error::{ClientFetchError, UpstreamError};
pub use history::HistoryBuffer;
pub use model::{
    ErrorEnvelope, Forecast, HistoryEntry, HourlySeries, LocationInfo, Snapshot, WeatherEnvelope,
};
pub use poller::{DashboardState, Poller};
pub use provider::WeatherProvider;
pub use service::{FETCH_FAILED, WeatherService};
