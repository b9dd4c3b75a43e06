use thiserror::Error;

/// Why the device could not report a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location service unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}

/// Everything that can go wrong inside a panel.
///
/// The `Display` text of the user-facing variants is exactly what the
/// error region shows. `FetchFailed` carries a diagnostic for the logs;
/// panels replace it with their own fixed message before showing it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    #[error("Please enter a city.")]
    EmptyInput,

    #[error("Geolocation not supported.")]
    UnsupportedFeature,

    #[error("Could not determine location.")]
    LocationUnavailable(#[source] LocationError),

    #[error("weather request failed: {0}")]
    FetchFailed(String),

    #[error("Invalid data.")]
    InvalidPayloadShape,

    /// Never shown, only logged.
    #[error("suggestion lookup failed: {0}")]
    SuggestionFetchFailed(String),
}

impl WidgetError {
    /// Text for the error region, given the panel's generic fetch message.
    pub fn user_message(&self, fetch_failed: &str) -> String {
        match self {
            WidgetError::FetchFailed(_) => fetch_failed.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<LocationError> for WidgetError {
    fn from(err: LocationError) -> Self {
        WidgetError::LocationUnavailable(err)
    }
}
