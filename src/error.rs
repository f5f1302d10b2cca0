//! Error types and handling for the weather report dashboard

use thiserror::Error;

/// Main error type for the weather report dashboard
#[derive(Error, Debug)]
pub enum WeatherReportError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The geocoder found no match, timed out, or was unreachable
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// The forecast provider failed or the retry budget was exhausted
    #[error("Weather fetch failed: {message}")]
    WeatherFetchFailed { message: String },

    /// Provider data had an unexpected shape
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl WeatherReportError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn location_not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    pub fn weather_fetch<S: Into<String>>(message: S) -> Self {
        Self::WeatherFetchFailed {
            message: message.into(),
        }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherReportError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WeatherReportError::Validation { message } => message.clone(),
            WeatherReportError::LocationNotFound { .. } => "Location not found.".to_string(),
            WeatherReportError::WeatherFetchFailed { message } => {
                format!("Weather data could not be retrieved: {message}")
            }
            WeatherReportError::MalformedResponse { message } => {
                format!("The weather provider returned unexpected data: {message}")
            }
            WeatherReportError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
        }
    }
}
