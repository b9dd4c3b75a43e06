use std::sync::Arc;

use serde_json::json;
use weatherpane_core::{Dashboard, PanelId, UiEvent, WeatherApiClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with_paris() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "name": "Paris", "region": "Ile-de-France", "country": "France" },
            "current": {
                "temp_c": 18.0,
                "condition": { "text": "Light rain", "icon": "//cdn.weatherapi.com/weather/64x64/day/296.png", "code": 1183 },
                "humidity": 82, "wind_kph": 14.4, "pressure_mb": 1009.0
            }
        })))
        .mount(&server)
        .await;

    let days: Vec<_> = (3..10)
        .map(|d| {
            json!({
                "date": format!("2024-06-{d:02}"),
                "day": {
                    "avgtemp_c": 17.5, "maxtemp_c": 22.1, "mintemp_c": 12.0, "avghumidity": 70,
                    "condition": { "text": "Cloudy", "icon": "//cdn/119.png" }
                }
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "Paris"))
        .and(query_param("days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "name": "Paris" },
            "forecast": { "forecastday": days }
        })))
        .mount(&server)
        .await;

    server
}

fn dashboard_for(server: &MockServer) -> Dashboard {
    let client = WeatherApiClient::new("TEST".into()).with_base_url(server.uri());
    let (dashboard, _rx) = Dashboard::new(Arc::new(client), None);
    dashboard
}

#[tokio::test]
async fn paris_renders_in_both_panels() {
    let server = server_with_paris().await;
    let mut dash = dashboard_for(&server);

    dash.handle(UiEvent::Submit { panel: PanelId::Current, input: " Paris ".into() }).await;
    dash.handle(UiEvent::Submit { panel: PanelId::Weekly, input: "Paris".into() }).await;

    let current = dash.current().view();
    let now = current.results.as_ref().expect("current results visible");
    assert_eq!(now.location_name, "Paris");
    assert_eq!(now.wind.value, "4.0");
    assert!(current.error.is_none());

    let weekly = dash.weekly().view();
    let cards = weekly.results.as_ref().expect("weekly results visible");
    assert_eq!(cards.len(), 7);
    assert_eq!(cards[0].weekday, "Mon");
    assert_eq!(cards[6].weekday, "Sun");
    assert!(weekly.error.is_none());
}

#[tokio::test]
async fn unit_switch_does_not_refetch() {
    let server = server_with_paris().await;
    let mut dash = dashboard_for(&server);

    dash.handle(UiEvent::Submit { panel: PanelId::Weekly, input: "Paris".into() }).await;
    dash.handle(UiEvent::UnitSwitched { panel: PanelId::Weekly, fahrenheit: true }).await;

    let cards = dash.weekly().view().results.as_ref().unwrap();
    assert_eq!(cards[0].average, "63.5 °F");
    assert_eq!(cards[0].max, "71.8°F");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn empty_current_submit_never_hits_the_network() {
    let server = server_with_paris().await;
    let mut dash = dashboard_for(&server);

    dash.handle(UiEvent::Submit { panel: PanelId::Current, input: "".into() }).await;

    assert_eq!(dash.current().view().error.as_deref(), Some("Please enter a city."));
    assert!(dash.current().view().results.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_city_shows_generic_message() {
    let server = server_with_paris().await;
    let mut dash = dashboard_for(&server);

    dash.handle(UiEvent::Submit { panel: PanelId::Current, input: "Atlantis".into() }).await;

    let view = dash.current().view();
    assert_eq!(view.error.as_deref(), Some("Could not fetch weather data."));
    assert!(view.results.is_none());
    assert!(!view.controls.submit_disabled);
    assert_eq!(view.controls.submit_label, "Search");
}
