use std::{fmt, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Password, PasswordDisplayMode, Select, Text};
use tokio::sync::mpsc::UnboundedReceiver;
use weatherpane_core::{
    Config, CurrentPanel, Dashboard, Geolocator, PanelId, PointerTarget, Position,
    TemperatureUnit, UiEvent, WeatherApiClient, WeeklyPanel,
};

use crate::output;

/// How long `browse` waits for the debounced city search to come back.
const SUGGESTION_WAIT: Duration = Duration::from_secs(10);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherpane", version, about = "Current conditions and 7-day forecasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and an optional fixed location.
    Configure,

    /// Show current conditions.
    Now {
        /// City name or "lat,lon".
        city: Option<String>,

        /// Use the configured location instead of a city.
        #[arg(long, conflicts_with = "city")]
        here: bool,

        /// Show temperatures in Fahrenheit.
        #[arg(short, long)]
        fahrenheit: bool,
    },

    /// Show the 7-day forecast. Without a city the API guesses from your IP.
    Week {
        city: Option<String>,

        #[arg(long, conflicts_with = "city")]
        here: bool,

        #[arg(short, long)]
        fahrenheit: bool,
    },

    /// Interactive session with city suggestions and unit toggling.
    Browse,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Now { city, here, fahrenheit } => {
                let config = Config::load()?;
                let client = config.client()?;
                let mut panel = CurrentPanel::new();
                panel.toggle_unit(fahrenheit);

                if here {
                    panel.locate(&client, config.geolocator().as_ref().map(|g| g as &dyn Geolocator)).await;
                } else {
                    panel.set_input(city.unwrap_or_default());
                    panel.submit(&client).await;
                }

                print_stamped(&output::current(panel.view()), panel.view().results.is_some());
                Ok(())
            }
            Command::Week { city, here, fahrenheit } => {
                let config = Config::load()?;
                let client = config.client()?;
                let mut panel = WeeklyPanel::new();
                panel.toggle_unit(fahrenheit);

                if here {
                    panel.locate(&client, config.geolocator().as_ref().map(|g| g as &dyn Geolocator)).await;
                } else {
                    panel.set_input(city.unwrap_or_default());
                    panel.submit(&client).await;
                }

                print_stamped(&output::week(panel.view()), panel.view().results.is_some());
                Ok(())
            }
            Command::Browse => {
                let config = Config::load()?;
                browse(config.client()?, &config).await
            }
        }
    }
}

fn print_stamped(text: &str, fresh: bool) {
    if fresh {
        println!("as of {}", Local::now().format("%H:%M"));
    }
    print!("{text}");
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(key.trim().to_string());

    let fixed = Confirm::new("Set a fixed location for --here and the location button?")
        .with_default(config.location.is_some())
        .prompt()
        .context("Failed to read answer")?;

    config.location = if fixed {
        let latitude = CustomType::<f64>::new("Latitude:").prompt().context("Failed to read latitude")?;
        let longitude =
            CustomType::<f64>::new("Longitude:").prompt().context("Failed to read longitude")?;
        Some(Position { latitude, longitude })
    } else {
        None
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Search,
    Locate,
    ToggleUnits,
    SwitchPanel,
    Quit,
}

impl Step {
    const ALL: [Step; 5] =
        [Step::Search, Step::Locate, Step::ToggleUnits, Step::SwitchPanel, Step::Quit];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Search => "Search a city",
            Step::Locate => "Use my location",
            Step::ToggleUnits => "Toggle °C/°F",
            Step::SwitchPanel => "Switch panel",
            Step::Quit => "Quit",
        })
    }
}

async fn browse(client: WeatherApiClient, config: &Config) -> anyhow::Result<()> {
    let geolocator = config.geolocator().map(|g| Arc::new(g) as Arc<dyn Geolocator>);
    let (mut dash, mut arrivals) = Dashboard::new(Arc::new(client), geolocator);
    let mut panel = PanelId::Current;

    loop {
        let title = match panel {
            PanelId::Current => "Current conditions",
            PanelId::Weekly => "Weekly forecast",
        };
        let step = match Select::new(title, Step::ALL.to_vec()).prompt() {
            Ok(step) => step,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        match step {
            Step::Search => {
                let text = Text::new("City:").prompt().context("Failed to read city")?;
                search(&mut dash, &mut arrivals, panel, text).await?;
            }
            Step::Locate => dash.handle(UiEvent::LocateClicked { panel }).await,
            Step::ToggleUnits => {
                let unit = match panel {
                    PanelId::Current => dash.current().unit(),
                    PanelId::Weekly => dash.weekly().unit(),
                };
                let fahrenheit = unit.toggle() == TemperatureUnit::Fahrenheit;
                dash.handle(UiEvent::UnitSwitched { panel, fahrenheit }).await;
            }
            Step::SwitchPanel => {
                panel = match panel {
                    PanelId::Current => PanelId::Weekly,
                    PanelId::Weekly => PanelId::Current,
                };
                continue;
            }
            Step::Quit => break,
        }

        match panel {
            PanelId::Current => print!("{}", output::current(dash.current().view())),
            PanelId::Weekly => print!("{}", output::week(dash.weekly().view())),
        }
    }

    Ok(())
}

/// Type, wait for suggestions, then either pick one or submit the text as is.
async fn search(
    dash: &mut Dashboard,
    arrivals: &mut UnboundedReceiver<UiEvent>,
    panel: PanelId,
    text: String,
) -> anyhow::Result<()> {
    // Whatever is queued answers an earlier search.
    while arrivals.try_recv().is_ok() {}

    dash.handle(UiEvent::InputChanged { panel, text: text.clone() }).await;
    if dash.search_pending(panel) {
        await_suggestions(dash, arrivals, panel, text.trim(), SUGGESTION_WAIT).await;
    }

    let view_suggestions = match panel {
        PanelId::Current => dash.current().view().suggestions.clone(),
        PanelId::Weekly => dash.weekly().view().suggestions.clone(),
    };

    if view_suggestions.is_open() {
        let mut options: Vec<String> =
            view_suggestions.items().iter().map(|c| c.label()).collect();
        options.push(format!("Search \"{}\" as typed", text.trim()));

        let choice = Select::new("Did you mean:", options).raw_prompt().context("Failed to read choice")?;
        if choice.index < view_suggestions.items().len() {
            dash.handle(UiEvent::SuggestionPicked { panel, index: choice.index }).await;
            return Ok(());
        }

        // Clicking the submit button lands outside the list and closes it.
        let binding = panel.binding();
        dash.handle(UiEvent::PointerDown(PointerTarget::new([binding.form, binding.submit]))).await;
    }

    dash.handle(UiEvent::Submit { panel, input: text }).await;
    Ok(())
}

/// Feed the outcome of the search for `query` on `panel` into the dashboard.
/// Results for any other search are dropped. Gives up after `wait`.
async fn await_suggestions(
    dash: &mut Dashboard,
    arrivals: &mut UnboundedReceiver<UiEvent>,
    panel: PanelId,
    query: &str,
    wait: Duration,
) {
    let deadline = tokio::time::Instant::now() + wait;

    loop {
        let event = match tokio::time::timeout_at(deadline, arrivals.recv()).await {
            Ok(Some(event)) => event,
            Ok(None) => return,
            Err(_) => {
                tracing::warn!(?panel, query, "no city suggestions in time");
                return;
            }
        };

        let answers = match &event {
            UiEvent::SuggestionsArrived { panel: p, query: q, .. }
            | UiEvent::SearchFailed { panel: p, query: q } => *p == panel && q == query,
            _ => false,
        };
        if answers {
            dash.handle(event).await;
            return;
        }
        tracing::debug!(?event, "dropping stale search result");
    }
}
