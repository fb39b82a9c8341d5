mod app;
mod config;
mod console;
mod effects;
mod logging;
mod snapshot;

pub use app::run_app;
