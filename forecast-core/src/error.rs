use thiserror::Error;

use crate::transport::TransportError;

/// Why a forecast call produced no model.
///
/// The `Display` form is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// The request never got an HTTP response (DNS, connectivity, TLS, ...).
    #[error("{0}")]
    Transport(String),

    #[error("No forecast available for \"{location}\"")]
    NotFound { location: String },

    /// Any other non-success status, or a success status whose body did not decode.
    #[error("Network error: {status}")]
    Http { status: u16 },
}

impl From<TransportError> for ForecastError {
    fn from(err: TransportError) -> Self {
        ForecastError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_user_facing_wording() {
        let not_found = ForecastError::NotFound { location: "Atlantis".into() };
        assert_eq!(not_found.to_string(), "No forecast available for \"Atlantis\"");

        assert_eq!(ForecastError::Http { status: 500 }.to_string(), "Network error: 500");
    }

    #[test]
    fn transport_description_passes_through_verbatim() {
        let err: ForecastError = TransportError::new("dns error: no such host").into();
        assert_eq!(err.to_string(), "dns error: no such host");
    }
}
