//! Plain-text rendering of panel views.

use std::fmt::Write;

use weatherpane_core::{CurrentView, ForecastCard, PanelView};

pub fn current(view: &PanelView<CurrentView>) -> String {
    let mut out = String::new();

    if let Some(error) = &view.error {
        let _ = writeln!(out, "⚠ {error}");
    }
    if let Some(now) = &view.results {
        let _ = writeln!(out, "{}", now.location_name);
        let _ = writeln!(out, "  {}{}  {}", now.temperature, now.unit_label, now.condition_text);
        for stat in now.stats() {
            let _ = writeln!(out, "  {} {:<9}{}{}", stat.icon, stat.label, stat.value, stat.suffix);
        }
    }

    out
}

pub fn week(view: &PanelView<Vec<ForecastCard>>) -> String {
    let mut out = String::new();

    if let Some(error) = &view.error {
        let _ = writeln!(out, "⚠ {error}");
    }
    if let Some(cards) = &view.results {
        for card in cards {
            let _ = writeln!(
                out,
                "{:<4} {:<10} {:>9}  max {:>7} min {:>7}  hum {:>3}%  {}",
                card.weekday,
                card.date,
                card.average,
                card.max,
                card.min,
                card.humidity,
                card.condition_text
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weatherpane_core::{CurrentPanel, Endpoint, WeatherQuery, WeatherSource, WidgetError};

    #[derive(Debug)]
    struct Canned(serde_json::Value);

    #[async_trait::async_trait]
    impl WeatherSource for Canned {
        async fn fetch(
            &self,
            _endpoint: Endpoint,
            _query: &WeatherQuery,
        ) -> Result<serde_json::Value, WidgetError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn current_output_lists_location_and_stats() {
        let source = Canned(json!({
            "location": { "name": "Oslo" },
            "current": {
                "temp_c": -3.0,
                "condition": { "text": "Snow", "icon": "//cdn/338.png" },
                "humidity": 90, "wind_kph": 18.0, "pressure_mb": 998.0
            }
        }));
        let mut panel = CurrentPanel::new();
        panel.fetch(&source, WeatherQuery::new("Oslo")).await;

        let text = current(panel.view());
        assert!(text.starts_with("Oslo\n"));
        assert!(text.contains("-3°C  Snow"));
        assert!(text.contains("5.0 m/s"));
        assert!(text.contains("998 hPa"));
    }

    #[tokio::test]
    async fn error_is_printed() {
        let mut panel = CurrentPanel::new();
        panel.fetch(&Canned(json!({})), WeatherQuery::new("x")).await;

        assert_eq!(current(panel.view()), "⚠ Invalid data.\n");
    }
}
