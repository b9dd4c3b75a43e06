//! One weather panel: its fetch pipeline, unit preference, last payload and
//! everything it currently shows.
//!
//! The current-conditions and weekly-forecast panels are the same state
//! machine and differ only in their [`PanelKind`]:
//!
//! ```text
//! Idle -> Loading -> { Success | Failed } -> Loading -> ...
//! ```
//!
//! `Success` and `Failed` last until the next trigger. A request that is
//! dropped before it completes leaves the panel `Idle`.

use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::{
    client::{Endpoint, FORECAST_DAYS, WeatherSource},
    error::WidgetError,
    location::{self, EmptyInput, Geolocator},
    model::{CitySuggestion, CurrentWeatherPayload, ForecastPayload, WeatherQuery},
    render::{self, CurrentView, ForecastCard},
    suggest::SuggestionList,
    units::TemperatureUnit,
};

pub const LOADING_LABEL: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PanelId {
    Current,
    Weekly,
}

impl PanelId {
    pub fn binding(self) -> PanelBinding {
        match self {
            PanelId::Current => CurrentWidget::BINDING,
            PanelId::Weekly => WeeklyWidget::BINDING,
        }
    }
}

/// Element ids a panel is wired to in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelBinding {
    pub form: &'static str,
    pub input: &'static str,
    pub submit: &'static str,
    pub locate: &'static str,
    pub unit_switch: &'static str,
    pub results: &'static str,
    pub error: &'static str,
    pub suggestions: &'static str,
}

/// What distinguishes one panel from the other.
pub trait PanelKind {
    type Payload: DeserializeOwned + Clone + Debug + Send;
    type View: Clone + Debug + PartialEq;

    const ID: PanelId;
    const ENDPOINT: Endpoint;
    const BINDING: PanelBinding;
    const SUBMIT_LABEL: &'static str;
    const EMPTY_INPUT: EmptyInput;
    /// Shown for any transport, status or decoding failure.
    const FETCH_FAILED: &'static str;

    /// Presence-check the payload and, if it passes, render it.
    fn present(payload: &Self::Payload, unit: TemperatureUnit) -> Result<Self::View, WidgetError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentWidget;

impl PanelKind for CurrentWidget {
    type Payload = CurrentWeatherPayload;
    type View = CurrentView;

    const ID: PanelId = PanelId::Current;
    const ENDPOINT: Endpoint = Endpoint::Current;
    const BINDING: PanelBinding = PanelBinding {
        form: "city-form",
        input: "city-input",
        submit: "city-submit",
        locate: "loc-btn",
        unit_switch: "unit-switch",
        results: "current",
        error: "error",
        suggestions: "suggestions",
    };
    const SUBMIT_LABEL: &'static str = "Search";
    const EMPTY_INPUT: EmptyInput = EmptyInput::Reject;
    const FETCH_FAILED: &'static str = "Could not fetch weather data.";

    fn present(payload: &Self::Payload, unit: TemperatureUnit) -> Result<Self::View, WidgetError> {
        Ok(render::render_current(payload.validate()?, unit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyWidget;

impl PanelKind for WeeklyWidget {
    type Payload = ForecastPayload;
    type View = Vec<ForecastCard>;

    const ID: PanelId = PanelId::Weekly;
    const ENDPOINT: Endpoint = Endpoint::Forecast { days: FORECAST_DAYS };
    const BINDING: PanelBinding = PanelBinding {
        form: "week-form",
        input: "week-city",
        submit: "week-search",
        locate: "week-loc",
        unit_switch: "week-unit-switch",
        results: "week-results",
        error: "week-error",
        suggestions: "week-suggestions",
    };
    const SUBMIT_LABEL: &'static str = "Get Forecast";
    // TODO: the current panel rejects blank input; settle whether this one should too.
    const EMPTY_INPUT: EmptyInput = EmptyInput::Fallback(WeatherQuery::AUTO_IP);
    const FETCH_FAILED: &'static str = "Could not fetch forecast data.";

    fn present(payload: &Self::Payload, unit: TemperatureUnit) -> Result<Self::View, WidgetError> {
        Ok(render::render_week(payload.validate()?, unit))
    }
}

pub type CurrentPanel = WeatherPanel<CurrentWidget>;
pub type WeeklyPanel = WeatherPanel<WeeklyWidget>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// State of the submit and location buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub submit_disabled: bool,
    pub locate_disabled: bool,
    pub submit_label: &'static str,
}

impl Controls {
    pub fn idle(submit_label: &'static str) -> Self {
        Self { submit_disabled: false, locate_disabled: false, submit_label }
    }

    pub fn busy() -> Self {
        Self { submit_disabled: true, locate_disabled: true, submit_label: LOADING_LABEL }
    }
}

/// Everything the panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView<V> {
    pub controls: Controls,
    /// `None` while the results region is hidden or empty.
    pub results: Option<V>,
    /// `None` while the error region is hidden.
    pub error: Option<String>,
    pub suggestions: SuggestionList,
}

#[derive(Debug)]
pub struct WeatherPanel<K: PanelKind> {
    phase: Phase,
    unit: TemperatureUnit,
    last_payload: Option<K::Payload>,
    input: String,
    view: PanelView<K::View>,
    _kind: PhantomData<K>,
}

impl<K: PanelKind> Default for WeatherPanel<K> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            unit: TemperatureUnit::default(),
            last_payload: None,
            input: String::new(),
            view: PanelView {
                controls: Controls::idle(K::SUBMIT_LABEL),
                results: None,
                error: None,
                suggestions: SuggestionList::default(),
            },
            _kind: PhantomData,
        }
    }
}

impl<K: PanelKind> WeatherPanel<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> PanelId {
        K::ID
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn view(&self) -> &PanelView<K::View> {
        &self.view
    }

    pub fn last_payload(&self) -> Option<&K::Payload> {
        self.last_payload.as_ref()
    }

    /// Text currently in the panel's input field.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Form submission with whatever is in the text field.
    pub async fn submit(&mut self, source: &dyn WeatherSource) {
        match location::query_from_input(&self.input, K::EMPTY_INPUT) {
            Ok(query) => self.fetch(source, query).await,
            Err(err) => self.fail_early(&err),
        }
    }

    /// Location button: look up the device position, then fetch for it.
    pub async fn locate(
        &mut self,
        source: &dyn WeatherSource,
        geolocator: Option<&dyn Geolocator>,
    ) {
        match location::query_from_device(geolocator).await {
            Ok(query) => self.fetch(source, query).await,
            Err(err) => self.fail_early(&err),
        }
    }

    /// Run the fetch pipeline for `query`. Controls are restored afterwards
    /// whatever the outcome, including when this future is dropped mid-request.
    pub async fn fetch(&mut self, source: &dyn WeatherSource, query: WeatherQuery) {
        tracing::debug!(panel = ?K::ID, %query, "fetching");

        let body = {
            let _busy = Busy::start(&mut self.phase, &mut self.view.controls, K::SUBMIT_LABEL);
            source.fetch(K::ENDPOINT, &query).await
        };

        match body.and_then(|body| self.present_body(body)) {
            Ok(view) => {
                tracing::info!(panel = ?K::ID, %query, "rendered");
                self.show_results(view);
                self.phase = Phase::Success;
            }
            Err(err) => {
                tracing::info!(panel = ?K::ID, %query, error = %err, "fetch failed");
                self.show_error(&err);
                self.phase = Phase::Failed;
            }
        }
    }

    fn present_body(&mut self, body: serde_json::Value) -> Result<K::View, WidgetError> {
        let payload: K::Payload = serde_json::from_value(body)
            .map_err(|e| WidgetError::FetchFailed(format!("unexpected payload: {e}")))?;

        let view = K::present(&payload, self.unit);
        self.last_payload = Some(payload);
        view
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Unit switch changed. Re-renders from the stored payload, without a
    /// request, when results are on screen. Returns whether it re-rendered.
    pub fn toggle_unit(&mut self, fahrenheit: bool) -> bool {
        self.unit = TemperatureUnit::from_switch(fahrenheit);

        if self.view.results.is_none() {
            return false;
        }
        let Some(payload) = self.last_payload.as_ref() else {
            return false;
        };

        match K::present(payload, self.unit) {
            Ok(view) => self.show_results(view),
            Err(err) => self.show_error(&err),
        }
        true
    }

    pub fn show_suggestions(&mut self, items: Vec<CitySuggestion>) {
        self.view.suggestions.show(items);
    }

    pub fn hide_suggestions(&mut self) {
        self.view.suggestions.hide();
    }

    pub fn suggestions_open(&self) -> bool {
        self.view.suggestions.is_open()
    }

    /// Click on the `index`-th suggestion: fill the field, close the list and
    /// fetch for the picked city. Returns `false` if there is no such entry.
    pub async fn pick_suggestion(&mut self, source: &dyn WeatherSource, index: usize) -> bool {
        let Some(label) = self.view.suggestions.get(index).map(CitySuggestion::label) else {
            return false;
        };

        self.input = label.clone();
        self.hide_suggestions();
        self.fetch(source, WeatherQuery::new(label)).await;
        true
    }

    fn show_results(&mut self, view: K::View) {
        self.view.results = Some(view);
        self.view.error = None;
    }

    fn show_error(&mut self, err: &WidgetError) {
        self.view.error = Some(err.user_message(K::FETCH_FAILED));
        self.view.results = None;
    }

    /// Rejected before any request was made.
    fn fail_early(&mut self, err: &WidgetError) {
        tracing::debug!(panel = ?K::ID, error = %err, "not fetching");
        self.show_error(err);
        self.phase = Phase::Failed;
    }
}

/// Holds the panel in `Loading` with both buttons disabled. Dropping it,
/// on completion or cancellation, re-enables them and leaves `Idle`.
struct Busy<'a> {
    phase: &'a mut Phase,
    controls: &'a mut Controls,
    idle_label: &'static str,
}

impl<'a> Busy<'a> {
    fn start(phase: &'a mut Phase, controls: &'a mut Controls, idle_label: &'static str) -> Self {
        *phase = Phase::Loading;
        *controls = Controls::busy();
        Self { phase, controls, idle_label }
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        *self.phase = Phase::Idle;
        *self.controls = Controls::idle(self.idle_label);
    }
}
