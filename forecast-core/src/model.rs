use serde::{Deserialize, Serialize};
use std::fmt;

/// What place to forecast.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
    Zip(String),
}

impl LocationQuery {
    /// Display form of the query as the caller gave it.
    ///
    /// City and zip are returned verbatim; coordinates render as `"(lat, lon)"`
    /// in plain decimal notation. No locale is applied: the separator is always `.`.
    pub fn label(&self) -> String {
        match self {
            LocationQuery::City(name) => name.clone(),
            LocationQuery::Zip(zip) => zip.clone(),
            LocationQuery::Coordinates { latitude, longitude } => {
                format!("({}, {})", format_decimal(*latitude), format_decimal(*longitude))
            }
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Canonical, provider-agnostic forecast record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherModel {
    pub source: String,
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Plain decimal rendering: at most 6 fraction digits, trailing zeros trimmed.
fn format_decimal(value: f64) -> String {
    const MAX_FRACTION_DIGITS: usize = 6;

    let rendered = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    let trimmed = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };

    // -0.0000001 rounds to "-0"
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_and_zip_labels_are_verbatim() {
        assert_eq!(LocationQuery::City("São Paulo".into()).label(), "São Paulo");
        assert_eq!(LocationQuery::Zip("94040,us".into()).label(), "94040,us");
    }

    #[test]
    fn coordinate_label_uses_plain_decimals() {
        let q = LocationQuery::Coordinates { latitude: 51.5, longitude: -0.12 };
        assert_eq!(q.label(), "(51.5, -0.12)");
        assert_eq!(q.to_string(), "(51.5, -0.12)");
    }

    #[test]
    fn coordinate_label_trims_and_rounds() {
        let q = LocationQuery::Coordinates { latitude: 10.0, longitude: 1.23456789 };
        assert_eq!(q.label(), "(10, 1.234568)");

        let q = LocationQuery::Coordinates { latitude: -0.0000001, longitude: 0.0 };
        assert_eq!(q.label(), "(0, 0)");
    }

    #[test]
    fn coordinate_label_ignores_locale_conventions() {
        // No grouping and always a `.` separator.
        let q = LocationQuery::Coordinates { latitude: 1234.5, longitude: -0.25 };
        assert_eq!(q.label(), "(1234.5, -0.25)");
    }

    #[test]
    fn notes_are_omitted_from_json_when_absent() {
        let model = WeatherModel {
            source: "OpenWeatherMap".into(),
            location: "London".into(),
            temperature: 15.2,
            humidity: 70.0,
            notes: None,
        };

        let json = serde_json::to_value(&model).unwrap();
        assert!(json.get("notes").is_none());
        assert_eq!(json["location"], "London");
    }
}
