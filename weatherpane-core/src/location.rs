//! Turning user input or the device position into a [`WeatherQuery`].

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::{LocationError, WidgetError},
    model::{Position, WeatherQuery},
};

/// What a panel does with a blank text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInput {
    Reject,
    Fallback(&'static str),
}

pub fn query_from_input(input: &str, policy: EmptyInput) -> Result<WeatherQuery, WidgetError> {
    let trimmed = input.trim();
    if !trimmed.is_empty() {
        return Ok(WeatherQuery::new(trimmed));
    }

    match policy {
        EmptyInput::Reject => Err(WidgetError::EmptyInput),
        EmptyInput::Fallback(query) => Ok(WeatherQuery::new(query)),
    }
}

/// One-shot access to the device position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Position, LocationError>;
}

/// Ask the device where it is. `None` means the capability is missing,
/// which fails before anything is requested.
pub async fn query_from_device(
    geolocator: Option<&dyn Geolocator>,
) -> Result<WeatherQuery, WidgetError> {
    let geolocator = geolocator.ok_or(WidgetError::UnsupportedFeature)?;

    let position = geolocator.current_position().await.map_err(|e| {
        tracing::info!(error = %e, "device position unavailable");
        WidgetError::from(e)
    })?;

    Ok(WeatherQuery::from_position(position))
}

/// A geolocator that always reports the same place, e.g. one read from config.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Denied;

    #[async_trait]
    impl Geolocator for Denied {
        async fn current_position(&self) -> Result<Position, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    #[test]
    fn input_is_trimmed() {
        let q = query_from_input("  Paris \n", EmptyInput::Reject).unwrap();
        assert_eq!(q.as_str(), "Paris");
    }

    #[test]
    fn blank_input_follows_policy() {
        assert_eq!(query_from_input("   ", EmptyInput::Reject), Err(WidgetError::EmptyInput));
        let q = query_from_input("", EmptyInput::Fallback(WeatherQuery::AUTO_IP)).unwrap();
        assert_eq!(q.as_str(), "auto:ip");
    }

    #[tokio::test]
    async fn missing_geolocator_is_unsupported() {
        assert_eq!(query_from_device(None).await, Err(WidgetError::UnsupportedFeature));
    }

    #[tokio::test]
    async fn denied_position_is_location_unavailable() {
        let err = query_from_device(Some(&Denied)).await.unwrap_err();
        assert_eq!(err, WidgetError::LocationUnavailable(LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn fixed_position_formats_lat_lon() {
        let geo = FixedPosition(Position { latitude: 51.5072, longitude: -0.1276 });
        let q = query_from_device(Some(&geo)).await.unwrap();
        assert_eq!(q.as_str(), "51.5072,-0.1276");
    }
}
