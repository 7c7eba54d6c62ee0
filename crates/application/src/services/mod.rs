//! Application services - Use case implementations

mod refresh_scheduler;
mod refresh_service;
mod weather_service;

pub use refresh_scheduler::RefreshScheduler;
pub use refresh_service::{RefreshConfig, RefreshFailure, RefreshService, RefreshSummary};
pub use weather_service::{WeatherReport, WeatherService};
