//! API route definitions

use http::Method;
use keygate_core::auth::SCHEME;
use keygate_core::config::Environment;

use crate::gate::Policy;

/// Endpoint implementation behind a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    WeatherForecast,
    OpenApi,
}

/// A single route
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
    /// Operation name published in the OpenAPI document
    pub name: &'static str,
    pub policy: Policy,
    pub endpoint: Endpoint,
}

impl Route {
    fn new(method: Method, path: &'static str, name: &'static str, policy: Policy, endpoint: Endpoint) -> Self {
        Self {
            method,
            path,
            name,
            policy,
            endpoint,
        }
    }

    /// Paths match case-insensitively and ignore a trailing slash
    fn matches_path(&self, path: &str) -> bool {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        self.path.eq_ignore_ascii_case(path)
    }
}

/// Result of looking up a request in the router
#[derive(Debug)]
pub enum Resolution<'a> {
    Found(&'a Route),
    MethodNotAllowed,
    NotFound,
}

/// API Router
#[derive(Debug, Clone)]
pub struct ApiRouter {
    routes: Vec<Route>,
}

impl ApiRouter {
    /// Build the route table for an environment.
    ///
    /// The OpenAPI document is only served in development.
    pub fn new(environment: Environment) -> Self {
        let protected = Policy::Authenticated { scheme: SCHEME };

        let mut routes = vec![
            Route::new(Method::GET, "/health", "Health", Policy::Public, Endpoint::Health),
            Route::new(
                Method::GET,
                "/weatherforecast",
                "GetWeatherForecast",
                protected,
                Endpoint::WeatherForecast,
            ),
            // Controller-style flavour of the same forecast. It lives under
            // /api so it does not shadow the minimal route, which already
            // answers /WeatherForecast case-insensitively.
            Route::new(
                Method::GET,
                "/api/weatherforecast",
                "WeatherForecast_Get",
                protected,
                Endpoint::WeatherForecast,
            ),
        ];

        if environment.is_development() {
            routes.push(Route::new(
                Method::GET,
                "/openapi.json",
                "OpenApiDocument",
                Policy::Public,
                Endpoint::OpenApi,
            ));
        }

        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the route for a method and path
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let mut path_known = false;
        for route in self.routes.iter().filter(|r| r.matches_path(path)) {
            if route.method == method {
                return Resolution::Found(route);
            }
            path_known = true;
        }

        if path_known {
            Resolution::MethodNotAllowed
        } else {
            Resolution::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(router: &ApiRouter, method: Method, path: &str) -> Option<Endpoint> {
        match router.resolve(&method, path) {
            Resolution::Found(route) => Some(route.endpoint),
            _ => None,
        }
    }

    #[test]
    fn test_weather_routes_are_protected() {
        let router = ApiRouter::new(Environment::Production);
        for path in ["/weatherforecast", "/api/weatherforecast"] {
            match router.resolve(&Method::GET, path) {
                Resolution::Found(route) => {
                    assert_eq!(route.endpoint, Endpoint::WeatherForecast);
                    assert!(route.policy.requires_auth());
                }
                other => panic!("unexpected resolution for {}: {:?}", path, other),
            }
        }
    }

    #[test]
    fn test_path_matching_is_lenient() {
        let router = ApiRouter::new(Environment::Production);
        assert_eq!(found(&router, Method::GET, "/WeatherForecast"), Some(Endpoint::WeatherForecast));
        assert_eq!(found(&router, Method::GET, "/weatherforecast/"), Some(Endpoint::WeatherForecast));
        assert_eq!(found(&router, Method::GET, "/health"), Some(Endpoint::Health));
    }

    #[test]
    fn test_method_not_allowed() {
        let router = ApiRouter::new(Environment::Production);
        assert!(matches!(
            router.resolve(&Method::POST, "/weatherforecast"),
            Resolution::MethodNotAllowed
        ));
    }

    #[test]
    fn test_not_found() {
        let router = ApiRouter::new(Environment::Production);
        assert!(matches!(router.resolve(&Method::GET, "/"), Resolution::NotFound));
        assert!(matches!(router.resolve(&Method::GET, "/weather"), Resolution::NotFound));
    }

    #[test]
    fn test_openapi_only_in_development() {
        let prod = ApiRouter::new(Environment::Production);
        assert_eq!(found(&prod, Method::GET, "/openapi.json"), None);

        let dev = ApiRouter::new(Environment::Development);
        assert_eq!(found(&dev, Method::GET, "/openapi.json"), Some(Endpoint::OpenApi));
    }
}
