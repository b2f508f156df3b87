//! The HTTP collaborator: one GET per forecast against one of three endpoints.

use async_trait::async_trait;
use reqwest::{Client, Request};
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_UNITS: &str = "metric";

/// Which lookup to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    ByCity { name: String },
    ByCoordinates { lat: f64, lon: f64 },
    ByZip { zip: String },
}

impl Endpoint {
    /// Location parameters for this lookup.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::ByCity { name } => vec![("q", name.clone())],
            Endpoint::ByCoordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            Endpoint::ByZip { zip } => vec![("zip", zip.clone())],
        }
    }
}

/// A received HTTP response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request failed before any HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries `appid`.
        Self::new(err.without_url().to_string())
    }
}

#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, endpoint: &Endpoint) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport for the OpenWeatherMap current weather API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    api_key: String,
    base_url: String,
    units: String,
    http: Client,
}

impl HttpTransport {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn build_request(&self, endpoint: &Endpoint) -> Result<Request, TransportError> {
        let mut params = endpoint.query_pairs();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", self.units.clone()));

        Ok(self.http.get(&self.base_url).query(&params).build()?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &Endpoint) -> Result<RawResponse, TransportError> {
        let request = self.build_request(endpoint)?;
        debug!(url = %request.url().path(), ?endpoint, "sending OpenWeatherMap request");

        let res = self.http.execute(request).await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?;

        debug!(status, bytes = body.len(), "received OpenWeatherMap response");
        Ok(RawResponse::new(status, body.to_vec()))
    }
}
