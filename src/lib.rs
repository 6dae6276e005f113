pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{FormCli, ServerCli};

pub use adapters::HttpPredictionClient;
pub use app::{FormOutcome, FormRunner, HealthOutcome, TripForm};
pub use config::{ClientConfig, ServiceConfig};
pub use crate::core::TripPricePredictor;
pub use domain::model::{PredictionResponse, TripFeatures};
pub use domain::ports::{PredictionApi, PricePredictor};
pub use utils::error::{Result, TripPriceError};
