//! Keygate HTTP API
//!
//! A hyper server that authenticates requests with a static API key and
//! gates the demo weather forecast endpoints behind it.

pub mod gate;
mod handlers;
pub mod routes;
pub mod server;

pub use handlers::WeatherForecast;
pub use server::{ApiServer, AppState, run_server};
