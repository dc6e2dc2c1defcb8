// Library exports for the binary, integration tests and external use

pub mod api;
pub mod app_data;
pub mod audit;
pub mod cli;
pub mod config;
pub mod coordinators;
pub mod errors;
pub mod gate;
pub mod providers;
pub mod stores;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test;

pub use app_data::AppData;
