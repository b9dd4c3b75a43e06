//! Both panels side by side, driven by UI events.
//!
//! Events come from whatever front end hosts the panels. Debounced city
//! searches finish in the background and come back as
//! [`UiEvent::SuggestionsArrived`] or [`UiEvent::SearchFailed`] on the
//! channel returned by [`Dashboard::new`]; the host feeds them back into
//! [`Dashboard::handle`]. Every search that fires reports back exactly once.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    client::{self, WeatherSource},
    location::Geolocator,
    model::CitySuggestion,
    panel::{CurrentPanel, PanelId, PanelKind, WeatherPanel, WeeklyPanel},
    suggest::{self, DismissalCoordinator, PointerTarget, SEARCH_DEBOUNCE, SearchScheduler},
};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Form submitted with the given text field contents.
    Submit { panel: PanelId, input: String },
    LocateClicked { panel: PanelId },
    UnitSwitched { panel: PanelId, fahrenheit: bool },
    InputChanged { panel: PanelId, text: String },
    SuggestionPicked { panel: PanelId, index: usize },
    /// Result of the search for `query`, the trimmed field text.
    SuggestionsArrived { panel: PanelId, query: String, suggestions: Vec<CitySuggestion> },
    /// Already logged; the list is left as it is.
    SearchFailed { panel: PanelId, query: String },
    PointerDown(PointerTarget),
}

#[derive(Debug)]
pub struct Dashboard {
    source: Arc<dyn WeatherSource>,
    geolocator: Option<Arc<dyn Geolocator>>,
    current: CurrentPanel,
    weekly: WeeklyPanel,
    searches: SearchScheduler<PanelId, UiEvent>,
    dismissal: DismissalCoordinator,
}

impl Dashboard {
    /// Debounced searches are spawned on the ambient tokio runtime.
    pub fn new(
        source: Arc<dyn WeatherSource>,
        geolocator: Option<Arc<dyn Geolocator>>,
    ) -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dashboard = Self {
            source,
            geolocator,
            current: CurrentPanel::new(),
            weekly: WeeklyPanel::new(),
            searches: SearchScheduler::new(SEARCH_DEBOUNCE, tx),
            dismissal: DismissalCoordinator::default(),
        };
        (dashboard, rx)
    }

    pub fn current(&self) -> &CurrentPanel {
        &self.current
    }

    pub fn weekly(&self) -> &WeeklyPanel {
        &self.weekly
    }

    /// Whether a debounced search for `panel` has not fired yet.
    pub fn search_pending(&self, panel: PanelId) -> bool {
        self.searches.is_pending(&panel)
    }

    pub async fn handle(&mut self, event: UiEvent) {
        tracing::trace!(?event, "ui event");

        match event {
            UiEvent::Submit { panel, input } => match panel {
                PanelId::Current => submit(&mut self.current, self.source.as_ref(), input).await,
                PanelId::Weekly => submit(&mut self.weekly, self.source.as_ref(), input).await,
            },
            UiEvent::LocateClicked { panel } => {
                let geo = self.geolocator.as_deref();
                match panel {
                    PanelId::Current => locate(&mut self.current, self.source.as_ref(), geo).await,
                    PanelId::Weekly => locate(&mut self.weekly, self.source.as_ref(), geo).await,
                }
            }
            UiEvent::UnitSwitched { panel, fahrenheit } => {
                match panel {
                    PanelId::Current => self.current.toggle_unit(fahrenheit),
                    PanelId::Weekly => self.weekly.toggle_unit(fahrenheit),
                };
            }
            UiEvent::InputChanged { panel, text } => self.input_changed(panel, text),
            UiEvent::SuggestionPicked { panel, index } => {
                let source = self.source.as_ref();
                match panel {
                    PanelId::Current => self.current.pick_suggestion(source, index).await,
                    PanelId::Weekly => self.weekly.pick_suggestion(source, index).await,
                };
            }
            UiEvent::SuggestionsArrived { panel, suggestions, .. } => match panel {
                PanelId::Current => self.current.show_suggestions(suggestions),
                PanelId::Weekly => self.weekly.show_suggestions(suggestions),
            },
            UiEvent::SearchFailed { .. } => {}
            UiEvent::PointerDown(target) => {
                for panel in self.dismissal.pointer_down(&target) {
                    match panel {
                        PanelId::Current => self.current.hide_suggestions(),
                        PanelId::Weekly => self.weekly.hide_suggestions(),
                    }
                }
            }
        }

        self.dismissal.set_open(PanelId::Current, self.current.suggestions_open());
        self.dismissal.set_open(PanelId::Weekly, self.weekly.suggestions_open());
    }

    fn input_changed(&mut self, panel: PanelId, text: String) {
        match panel {
            PanelId::Current => self.current.set_input(text.as_str()),
            PanelId::Weekly => self.weekly.set_input(text.as_str()),
        }

        if !suggest::is_searchable(&text) {
            self.searches.cancel(&panel);
            match panel {
                PanelId::Current => self.current.hide_suggestions(),
                PanelId::Weekly => self.weekly.hide_suggestions(),
            }
            return;
        }

        let source = Arc::clone(&self.source);
        let query = text.trim().to_string();
        self.searches.schedule(panel, async move {
            match client::search_cities(source.as_ref(), &query).await {
                Ok(suggestions) => Some(UiEvent::SuggestionsArrived { panel, query, suggestions }),
                Err(err) => {
                    tracing::error!(?panel, %query, error = %err, "city suggestions unavailable");
                    Some(UiEvent::SearchFailed { panel, query })
                }
            }
        });
    }
}

async fn submit<K: PanelKind>(panel: &mut WeatherPanel<K>, source: &dyn WeatherSource, input: String) {
    if panel.view().controls.submit_disabled {
        tracing::debug!(panel = ?K::ID, "submit ignored while loading");
        return;
    }
    panel.set_input(input);
    panel.submit(source).await;
}

async fn locate<K: PanelKind>(
    panel: &mut WeatherPanel<K>,
    source: &dyn WeatherSource,
    geolocator: Option<&dyn Geolocator>,
) {
    if panel.view().controls.locate_disabled {
        tracing::debug!(panel = ?K::ID, "location request ignored while loading");
        return;
    }
    panel.locate(source, geolocator).await;
}
