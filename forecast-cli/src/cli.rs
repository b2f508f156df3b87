use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use forecast_core::{
    Config, LocationQuery, ProviderId, WeatherModel,
    provider::{default_provider_from_config, provider_from_config},
};
use inquire::{Password, PasswordDisplayMode};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Current weather from OpenWeatherMap")]
pub struct Cli {
    /// Log request dispatch and responses to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name, e.g. "openweathermap".
        provider: String,
    },

    /// Show the current weather for one location.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        /// Provider to ask instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        /// Print the model as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct LocationArgs {
    /// City name, optionally with country code ("London,uk").
    #[arg(long)]
    city: Option<String>,

    /// Zip or postal code, optionally with country code ("94040,us").
    #[arg(long)]
    zip: Option<String>,

    /// Latitude and longitude, e.g. "51.5,-0.12".
    #[arg(long, value_parser = parse_coords, allow_hyphen_values = true)]
    coords: Option<(f64, f64)>,
}

impl LocationArgs {
    fn into_query(self) -> anyhow::Result<LocationQuery> {
        match (self.city, self.zip, self.coords) {
            (Some(city), None, None) => Ok(LocationQuery::City(city)),
            (None, Some(zip), None) => Ok(LocationQuery::Zip(zip)),
            (None, None, Some((latitude, longitude))) => {
                Ok(LocationQuery::Coordinates { latitude, longitude })
            }
            _ => Err(anyhow!("Exactly one of --city, --zip or --coords is required")),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { location, provider, json } => {
                show(location.into_query()?, provider.as_deref(), json).await
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut cfg = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    cfg.upsert_provider_api_key(id, api_key.trim().to_string());
    let path = cfg.save()?;

    println!("Saved {id} credentials to {}", path.display());
    Ok(())
}

async fn show(query: LocationQuery, provider: Option<&str>, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = match provider {
        Some(name) => provider_from_config(ProviderId::try_from(name)?, &cfg)?,
        None => default_provider_from_config(&cfg)?,
    };

    tracing::debug!(provider = provider.name(), %query, "requesting forecast");
    let model = provider.forecast(&query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print!("{}", render(&model));
    }
    Ok(())
}

fn render(model: &WeatherModel) -> String {
    let mut out = format!(
        "{}\n  Temperature: {:.1}\n  Humidity:    {:.0}%\n",
        model.location, model.temperature, model.humidity
    );
    if let Some(notes) = &model.notes {
        out.push_str(&format!("  Conditions:  {notes}\n"));
    }
    out.push_str(&format!("  (source: {})\n", model.source));
    out
}

fn parse_coords(raw: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{raw}'"))?;

    let lat: f64 = lat.trim().parse().map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("invalid longitude '{lon}': {e}"))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} is outside -90..=90"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} is outside -180..=180"));
    }
    Ok((lat, lon))
}
