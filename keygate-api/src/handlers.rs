//! API request handlers

use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use serde_json::{Value, json};

use crate::routes::ApiRouter;
use keygate_core::auth::SCHEME;

const SUMMARIES: [&str; 10] = [
    "Freezing", "Bracing", "Chilly", "Cool", "Mild", "Warm", "Balmy", "Hot", "Sweltering", "Scorching",
];

/// Number of days returned by the forecast endpoints
const FORECAST_DAYS: u64 = 5;

/// One day of the demo forecast
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: Option<&'static str>,
}

impl WeatherForecast {
    pub fn new(date: NaiveDate, temperature_c: i32, summary: Option<&'static str>) -> Self {
        Self {
            date,
            temperature_c,
            temperature_f: fahrenheit(temperature_c),
            summary,
        }
    }
}

fn fahrenheit(celsius: i32) -> i32 {
    32 + (celsius as f64 / 0.5556) as i32
}

/// Handle GET /weatherforecast
pub fn weather_forecast() -> Vec<WeatherForecast> {
    forecast_from(Local::now().date_naive())
}

fn forecast_from(today: NaiveDate) -> Vec<WeatherForecast> {
    let mut rng = rand::thread_rng();
    (1..=FORECAST_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| {
            let temperature_c = rng.gen_range(-20..55);
            let summary = SUMMARIES.choose(&mut rng).copied();
            WeatherForecast::new(date, temperature_c, summary)
        })
        .collect()
}

/// Handle GET /health
pub fn health_check() -> &'static str {
    r#"{"status":"healthy"}"#
}

/// Handle GET /openapi.json
///
/// Describes the protected routes and the `ApiKey` bearer scheme so API
/// explorers can offer an authorize button.
pub fn openapi_document(router: &ApiRouter) -> Value {
    let mut paths = serde_json::Map::new();
    for route in router.routes().iter().filter(|r| r.policy.requires_auth()) {
        paths.insert(
            route.path.to_string(),
            json!({
                (route.method.as_str().to_ascii_lowercase()): {
                    "operationId": route.name,
                    "responses": {
                        "200": {
                            "description": "Success",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/WeatherForecast" }
                                    }
                                }
                            }
                        },
                        "401": { "description": "Unauthorized" }
                    }
                }
            }),
        );
    }

    json!({
        "openapi": "3.0.1",
        "info": {
            "title": "Keygate",
            "version": keygate_core::VERSION,
        },
        "paths": paths,
        "components": {
            "schemas": {
                "WeatherForecast": {
                    "type": "object",
                    "properties": {
                        "date": { "type": "string", "format": "date" },
                        "temperatureC": { "type": "integer", "format": "int32" },
                        "temperatureF": { "type": "integer", "format": "int32" },
                        "summary": { "type": "string", "nullable": true }
                    }
                }
            },
            "securitySchemes": {
                (SCHEME): {
                    "type": "http",
                    "in": "header",
                    "scheme": "Bearer",
                    "name": "Authorization",
                    "description": "Please enter a valid ApiKey"
                }
            }
        },
        "security": [ { (SCHEME): [] } ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_core::config::Environment;

    #[test]
    fn test_fahrenheit_truncates() {
        assert_eq!(fahrenheit(0), 32);
        assert_eq!(fahrenheit(100), 211);
        assert_eq!(fahrenheit(-20), -3);
        assert_eq!(fahrenheit(37), 98);
    }

    #[test]
    fn test_forecast_shape() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let forecast = forecast_from(today);
        assert_eq!(forecast.len(), 5);
        assert_eq!(forecast[0].date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(forecast[4].date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());

        for day in &forecast {
            assert!((-20..55).contains(&day.temperature_c));
            assert_eq!(day.temperature_f, fahrenheit(day.temperature_c));
            assert!(SUMMARIES.contains(&day.summary.unwrap()));
        }
    }

    #[test]
    fn test_forecast_json_field_names() {
        let day = WeatherForecast::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 10, Some("Cool"));
        let value = serde_json::to_value(&day).unwrap();
        assert_eq!(
            value,
            json!({"date": "2024-01-02", "temperatureC": 10, "temperatureF": 49, "summary": "Cool"})
        );
    }

    #[test]
    fn test_openapi_document() {
        let router = ApiRouter::new(Environment::Development);
        let doc = openapi_document(&router);

        let scheme = &doc["components"]["securitySchemes"]["ApiKey"];
        assert_eq!(scheme["scheme"], "Bearer");
        assert_eq!(scheme["name"], "Authorization");
        assert_eq!(doc["security"][0]["ApiKey"], json!([]));

        assert_eq!(doc["paths"]["/weatherforecast"]["get"]["operationId"], "GetWeatherForecast");
        assert!(doc["paths"]["/api/weatherforecast"]["get"].is_object());
        assert!(doc["paths"].get("/health").is_none());
    }
}
