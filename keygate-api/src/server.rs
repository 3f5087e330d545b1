//! API Server

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue, WWW_AUTHENTICATE};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use keygate_core::auth::SCHEME;
use keygate_core::config::{Environment, KeygateConfig};
use keygate_core::{ApiKeyAuthenticator, Error, Result};

use crate::gate::{self, Access};
use crate::handlers;
use crate::routes::{ApiRouter, Endpoint, Resolution};

/// Shared, read-only state for every request
#[derive(Debug)]
pub struct AppState {
    authenticator: ApiKeyAuthenticator,
    router: ApiRouter,
}

impl AppState {
    pub fn new(authenticator: ApiKeyAuthenticator, environment: Environment) -> Self {
        Self {
            authenticator,
            router: ApiRouter::new(environment),
        }
    }

    pub fn from_config(config: &KeygateConfig) -> Result<Self> {
        let authenticator = ApiKeyAuthenticator::from_config(&config.auth)?;
        Ok(Self::new(authenticator, config.environment))
    }
}

/// Bound HTTP server, ready to accept connections
pub struct ApiServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Bind the listener described by the configuration
    pub async fn bind(config: &KeygateConfig) -> Result<Self> {
        let addr = config.server.listen_addr()?;
        let state = AppState::from_config(config)?;
        Self::bind_addr(addr, state).await
    }

    pub async fn bind_addr(addr: SocketAddr, state: AppState) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Server(format!("Failed to bind {}: {}", addr, e)))?;

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        tracing::info!("🔐 Keygate listening on http://{}", addr);

        tokio::pin!(shutdown);

        loop {
            let stream = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down listener on {}", addr);
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _)) => stream,
                    Err(e) => {
                        tracing::warn!("Accept error: {}", e);
                        continue;
                    }
                },
            };

            let io = TokioIo::new(stream);
            let state = self.state.clone();

            tokio::task::spawn(async move {
                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, service_fn(move |req| handle_request(req, state.clone())))
                    .await
                {
                    tracing::error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Run the server until Ctrl-C
pub async fn run_server(config: &KeygateConfig) -> Result<()> {
    let server = ApiServer::bind(config).await?;
    server
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
}

/// Authenticate, authorize and dispatch one request
async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match state.router.resolve(&method, &path) {
        Resolution::NotFound => response(StatusCode::NOT_FOUND, "Not Found"),
        Resolution::MethodNotAllowed => response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
        Resolution::Found(route) => {
            let verdict = route
                .policy
                .requires_auth()
                .then(|| state.authenticator.authenticate(req.headers()));

            match gate::authorize(route.policy, verdict.as_ref()) {
                Access::Allow => dispatch(route.endpoint, &state),
                Access::Unauthenticated => challenge(),
                Access::Forbidden => response(StatusCode::FORBIDDEN, "Forbidden"),
            }
        }
    };

    tracing::info!("{} {} -> {}", method, path, response.status().as_u16());
    Ok(response)
}

fn dispatch(endpoint: Endpoint, state: &AppState) -> Response<Full<Bytes>> {
    match endpoint {
        Endpoint::Health => json_response(StatusCode::OK, handlers::health_check().to_string()),
        Endpoint::WeatherForecast => to_json(&handlers::weather_forecast()),
        Endpoint::OpenApi => to_json(&handlers::openapi_document(&state.router)),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_string(value) {
        Ok(json) => json_response(StatusCode::OK, json),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// 401 with the scheme challenge; the failure reason stays in the logs
fn challenge() -> Response<Full<Bytes>> {
    let mut res = response(StatusCode::UNAUTHORIZED, "Unauthorized");
    res.headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static(SCHEME));
    res
}

fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::from(body)));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    res
}

fn response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(Bytes::from(body.to_string())));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    res
}
