//! Core library for `weatherpane`.
//!
//! This crate defines:
//! - The current-conditions and weekly-forecast panels as one generic state machine
//! - A WeatherAPI.com client behind the [`WeatherSource`] trait
//! - City autocomplete with debounced search and click-outside dismissal
//! - Configuration & credentials handling
//!
//! It is used by `weatherpane-cli`, but any front end that can feed
//! [`UiEvent`]s and draw a [`PanelView`] can host it.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod panel;
pub mod render;
pub mod suggest;
pub mod units;

pub use app::{Dashboard, UiEvent};
pub use client::{Endpoint, WeatherApiClient, WeatherSource};
pub use config::Config;
pub use error::{LocationError, WidgetError};
pub use location::{FixedPosition, Geolocator};
pub use model::{CitySuggestion, Position, WeatherQuery};
pub use panel::{
    CurrentPanel, CurrentWidget, PanelId, PanelKind, PanelView, WeatherPanel, WeeklyPanel,
    WeeklyWidget,
};
pub use render::{CurrentView, ForecastCard};
pub use suggest::PointerTarget;
pub use units::TemperatureUnit;
