//! View models for the two panels.
//!
//! Rendering only ever sees validated payloads; the presence checks live in
//! [`crate::model`].

use chrono::NaiveDate;
use std::time::Duration;

use crate::{
    model::{ValidCurrent, ValidForecast},
    units::{TemperatureUnit, display_wind},
};

/// Delay added per card index for the staggered entrance.
pub const CARD_STAGGER: Duration = Duration::from_millis(100);

/// One of the humidity / wind / pressure readouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatItem {
    pub id: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
    pub suffix: &'static str,
}

impl StatItem {
    /// Icon, label and value composed the way the panel lays them out.
    pub fn markup(&self) -> String {
        format!(
            r#"<span class="stat-icon">{}</span><span>{}</span><strong id="{}">{}</strong>{}"#,
            self.icon, self.label, self.id, self.value, self.suffix
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub location_name: String,
    pub condition_text: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub temperature: String,
    pub unit_label: &'static str,
    pub humidity: StatItem,
    pub wind: StatItem,
    pub pressure: StatItem,
}

impl CurrentView {
    pub fn stats(&self) -> [&StatItem; 3] {
        [&self.humidity, &self.wind, &self.pressure]
    }
}

pub fn render_current(payload: ValidCurrent<'_>, unit: TemperatureUnit) -> CurrentView {
    let current = payload.current;

    CurrentView {
        location_name: payload.location.name.clone(),
        condition_text: current.condition.text.clone(),
        icon_url: current.condition.icon.clone(),
        icon_alt: current.condition.text.clone(),
        temperature: unit.display(current.temp_c),
        unit_label: unit.label(),
        humidity: StatItem {
            id: "hum",
            icon: "💧",
            label: "Humidity",
            value: current.humidity.to_string(),
            suffix: "%",
        },
        wind: StatItem {
            id: "wind",
            icon: "💨",
            label: "Wind",
            value: display_wind(current.wind_kph),
            suffix: " m/s",
        },
        pressure: StatItem {
            id: "press",
            icon: "📊",
            label: "Pressure",
            value: current.pressure_mb.to_string(),
            suffix: " hPa",
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastCard {
    pub weekday: String,
    pub date: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub average: String,
    pub max: String,
    pub min: String,
    pub condition_text: String,
    pub humidity: String,
    /// Cosmetic only.
    pub entrance_delay: Duration,
}

pub fn render_week(payload: ValidForecast<'_>, unit: TemperatureUnit) -> Vec<ForecastCard> {
    payload
        .days
        .iter()
        .enumerate()
        .map(|(index, day)| {
            let summary = &day.day;
            ForecastCard {
                weekday: short_weekday(&day.date),
                date: day.date.clone(),
                icon_url: summary.condition.icon.clone(),
                icon_alt: summary.condition.text.clone(),
                average: format!("{} {}", unit.display(summary.avgtemp_c), unit.label()),
                max: format!("{}{}", unit.display(summary.maxtemp_c), unit.label()),
                min: format!("{}{}", unit.display(summary.mintemp_c), unit.label()),
                condition_text: summary.condition.text.clone(),
                humidity: summary.avghumidity.to_string(),
                entrance_delay: CARD_STAGGER * index as u32,
            }
        })
        .collect()
}

/// `"2024-06-03"` -> `"Mon"`. Dates the API never sends fall back to the raw text.
fn short_weekday(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a").to_string())
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Condition, CurrentWeatherPayload, DaySummary, ForecastBlock, ForecastDay,
        ForecastPayload, PayloadCurrent, PayloadLocation,
    };

    fn paris() -> CurrentWeatherPayload {
        CurrentWeatherPayload {
            location: Some(PayloadLocation { name: "Paris".into() }),
            current: Some(PayloadCurrent {
                temp_c: 21.5,
                condition: Condition {
                    text: "Partly cloudy".into(),
                    icon: "//cdn.weatherapi.com/weather/64x64/day/116.png".into(),
                },
                humidity: 60.0,
                wind_kph: 36.0,
                pressure_mb: 1016.0,
            }),
        }
    }

    fn day(date: &str, avg: f64) -> ForecastDay {
        ForecastDay {
            date: date.into(),
            day: DaySummary {
                avgtemp_c: avg,
                maxtemp_c: avg + 4.0,
                mintemp_c: avg - 4.0,
                avghumidity: 71.0,
                condition: Condition { text: "Sunny".into(), icon: "sun.png".into() },
            },
        }
    }

    #[test]
    fn current_view_in_celsius() {
        let payload = paris();
        let view = render_current(payload.validate().unwrap(), TemperatureUnit::Celsius);

        assert_eq!(view.location_name, "Paris");
        assert_eq!(view.icon_alt, "Partly cloudy");
        assert_eq!(view.temperature, "21.5");
        assert_eq!(view.unit_label, "°C");
        assert_eq!(view.humidity.value, "60");
        assert_eq!(view.wind.value, "10.0");
        assert_eq!(view.pressure.value, "1016");
    }

    #[test]
    fn current_view_in_fahrenheit() {
        let payload = paris();
        let view = render_current(payload.validate().unwrap(), TemperatureUnit::Fahrenheit);

        assert_eq!(view.temperature, "70.7");
        assert_eq!(view.unit_label, "°F");
        // Wind and pressure do not depend on the unit.
        assert_eq!(view.wind.value, "10.0");
    }

    #[test]
    fn stat_markup() {
        let payload = paris();
        let view = render_current(payload.validate().unwrap(), TemperatureUnit::Celsius);
        assert_eq!(
            view.wind.markup(),
            r#"<span class="stat-icon">💨</span><span>Wind</span><strong id="wind">10.0</strong> m/s"#
        );
        assert_eq!(view.stats().len(), 3);
    }

    #[test]
    fn week_cards_keep_order_and_stagger() {
        let payload = ForecastPayload {
            forecast: Some(ForecastBlock {
                forecastday: Some(vec![day("2024-06-03", 20.0), day("2024-06-04", 18.5)]),
            }),
        };
        let cards = render_week(payload.validate().unwrap(), TemperatureUnit::Celsius);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].weekday, "Mon");
        assert_eq!(cards[1].weekday, "Tue");
        assert_eq!(cards[0].average, "20 °C");
        assert_eq!(cards[0].max, "24°C");
        assert_eq!(cards[1].min, "14.5°C");
        assert_eq!(cards[0].humidity, "71");
        assert_eq!(cards[0].entrance_delay, Duration::ZERO);
        assert_eq!(cards[1].entrance_delay, Duration::from_millis(100));
    }

    #[test]
    fn week_cards_in_fahrenheit() {
        let payload = ForecastPayload {
            forecast: Some(ForecastBlock { forecastday: Some(vec![day("2024-06-03", 0.0)]) }),
        };
        let cards = render_week(payload.validate().unwrap(), TemperatureUnit::Fahrenheit);

        assert_eq!(cards[0].average, "32.0 °F");
        assert_eq!(cards[0].max, "39.2°F");
        assert_eq!(cards[0].min, "24.8°F");
    }

    #[test]
    fn unparsable_date_is_shown_raw() {
        assert_eq!(short_weekday("someday"), "someday");
    }
}
