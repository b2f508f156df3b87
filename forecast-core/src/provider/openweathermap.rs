use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::{
    error::ForecastError,
    model::{LocationQuery, WeatherModel},
    transport::{Endpoint, HttpTransport, RawResponse, Transport},
};

use super::WeatherProvider;

/// Adapter for the OpenWeatherMap current weather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherMap<T = HttpTransport> {
    transport: T,
}

impl<T: Transport> OpenWeatherMap<T> {
    pub const NAME: &'static str = "OpenWeatherMap";

    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Issue the lookup matching `query` and map the response.
    #[instrument(skip(self), fields(provider = "OpenWeatherMap"))]
    pub async fn forecast(&self, query: &LocationQuery) -> Result<WeatherModel, ForecastError> {
        let endpoint = endpoint_for(query);
        debug!(?endpoint, "dispatching forecast request");

        let response = self.transport.get(&endpoint).await.map_err(|err| {
            warn!(error = %err, "transport failure");
            ForecastError::from(err)
        })?;

        self.transform(&query.label(), &response)
    }

    /// Map one HTTP response into a model, or into the error the caller sees.
    ///
    /// A 2xx status with an undecodable body reports the same
    /// `Network error: <status>` as any other failed status.
    pub fn transform(
        &self,
        location_label: &str,
        response: &RawResponse,
    ) -> Result<WeatherModel, ForecastError> {
        let parsed = response
            .is_success()
            .then(|| serde_json::from_slice::<OwmForecast>(&response.body).ok())
            .flatten();

        let Some(fcst) = parsed else {
            let err = match response.status {
                404 => ForecastError::NotFound { location: location_label.to_string() },
                status => ForecastError::Http { status },
            };
            warn!(status = response.status, %err, "forecast unavailable");
            return Err(err);
        };

        let notes = fcst
            .weather
            .filter(|entries| !entries.is_empty())
            .map(|entries| {
                entries.into_iter().map(|w| w.description).collect::<Vec<_>>().join(", ")
            });

        Ok(WeatherModel {
            source: Self::NAME.to_string(),
            location: fcst.name,
            temperature: fcst.main.temp,
            humidity: fcst.main.humidity,
            notes,
        })
    }
}

impl<T: Transport + 'static> OpenWeatherMap<T> {
    /// Fire-and-forget form of [`OpenWeatherMap::forecast`].
    ///
    /// `callback` runs exactly once on the tokio runtime, with whichever
    /// outcome the call produced. Must be called from within a runtime.
    pub fn spawn_forecast<F>(self: Arc<Self>, query: LocationQuery, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<WeatherModel, ForecastError>) + Send + 'static,
    {
        tokio::spawn(async move {
            let outcome = self.forecast(&query).await;
            callback(outcome);
        })
    }
}

#[async_trait]
impl<T: Transport> WeatherProvider for OpenWeatherMap<T> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<WeatherModel, ForecastError> {
        OpenWeatherMap::<T>::forecast(self, query).await
    }
}

fn endpoint_for(query: &LocationQuery) -> Endpoint {
    match query {
        LocationQuery::City(name) => Endpoint::ByCity { name: name.clone() },
        LocationQuery::Coordinates { latitude, longitude } => {
            Endpoint::ByCoordinates { lat: *latitude, lon: *longitude }
        }
        LocationQuery::Zip(zip) => Endpoint::ByZip { zip: zip.clone() },
    }
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmForecast {
    name: String,
    main: OwmMain,
    weather: Option<Vec<OwmWeather>>,
}
