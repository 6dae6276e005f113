pub mod artifacts;
pub mod booster;
pub mod preprocessor;

pub use crate::domain::model::{PredictionResponse, TripFeatures};
pub use crate::domain::ports::{PredictionApi, PricePredictor};
pub use crate::utils::error::Result;
pub use artifacts::TripPricePredictor;
