use crate::{
    Config, ForecastError, LocationQuery, WeatherModel,
    provider::openweathermap::OpenWeatherMap,
    transport::HttpTransport,
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod openweathermap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeatherMap,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeatherMap => "openweathermap",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweathermap" => Ok(ProviderId::OpenWeatherMap),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweathermap."
            )),
        }
    }
}

/// Shared interface of forecast provider adapters.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Stamped into every produced model's `source`.
    fn name(&self) -> &'static str;

    async fn forecast(&self, query: &LocationQuery) -> Result<WeatherModel, ForecastError>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider_cfg = config.provider_config(id);
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `forecast configure {id}` and enter your API key."
        )
    })?;

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenWeatherMap => {
            let mut transport = HttpTransport::new(api_key.to_owned());
            if let Some(base_url) = provider_cfg.and_then(|c| c.base_url.as_deref()) {
                transport = transport.with_base_url(base_url);
            }
            if let Some(units) = provider_cfg.and_then(|c| c.units.as_deref()) {
                transport = transport.with_units(units);
            }
            Box::new(OpenWeatherMap::new(transport))
        }
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}
