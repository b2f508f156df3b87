//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Location queries and the provider-agnostic weather model
//! - The HTTP transport seam and its `reqwest` implementation
//! - The OpenWeatherMap adapter behind the `WeatherProvider` trait
//! - Configuration & credentials handling
//!
//! It is used by `forecast-cli`, but can also be embedded by any UI that
//! wants a single forecast per call.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod transport;

pub use config::{Config, ProviderConfig};
pub use error::ForecastError;
pub use model::{LocationQuery, WeatherModel};
pub use provider::{ProviderId, WeatherProvider, openweathermap::OpenWeatherMap};
pub use transport::{Endpoint, HttpTransport, RawResponse, Transport, TransportError};
