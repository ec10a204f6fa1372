pub mod app;
pub mod config;
pub mod routes;
pub mod warehouse;

pub use app::{build_app, AppState};
pub use config::Config;
pub use warehouse::build_warehouse;
