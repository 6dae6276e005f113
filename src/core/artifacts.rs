use crate::core::booster::TreeEnsemble;
use crate::core::preprocessor::Preprocessor;
use crate::domain::model::TripFeatures;
use crate::domain::ports::PricePredictor;
use crate::utils::error::{Result, TripPriceError};
use crate::utils::validation::Validate;
use serde::de::DeserializeOwned;
use std::path::Path;

/// 讀取並解析單一 JSON artifact
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| artifact_error(path, e))?;
    serde_json::from_str(&content).map_err(|e| artifact_error(path, e))
}

fn artifact_error(path: &Path, cause: impl std::fmt::Display) -> TripPriceError {
    TripPriceError::ArtifactError {
        path: path.display().to_string(),
        message: cause.to_string(),
    }
}

/// The loaded model and preprocessor, immutable for the life of the process.
#[derive(Debug, Clone)]
pub struct TripPricePredictor {
    preprocessor: Preprocessor,
    model: TreeEnsemble,
}

impl TripPricePredictor {
    pub fn new(preprocessor: Preprocessor, model: TreeEnsemble) -> Result<Self> {
        preprocessor
            .validate()
            .map_err(|message| TripPriceError::ArtifactError {
                path: "preprocessor".to_string(),
                message,
            })?;
        model
            .validate()
            .map_err(|message| TripPriceError::ArtifactError {
                path: "model".to_string(),
                message,
            })?;

        if model.num_features != preprocessor.output_width() {
            return Err(TripPriceError::ArtifactError {
                path: "model".to_string(),
                message: format!(
                    "model expects {} features but the preprocessor produces {}",
                    model.num_features,
                    preprocessor.output_width()
                ),
            });
        }

        Ok(Self {
            preprocessor,
            model,
        })
    }

    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, preprocessor_path: Q) -> Result<Self> {
        let model_path = model_path.as_ref();
        let preprocessor_path = preprocessor_path.as_ref();

        tracing::info!("📦 Loading preprocessor from {}", preprocessor_path.display());
        let preprocessor: Preprocessor = load_json(preprocessor_path)?;
        preprocessor
            .validate()
            .map_err(|e| artifact_error(preprocessor_path, e))?;

        tracing::info!("📦 Loading model from {}", model_path.display());
        let model: TreeEnsemble = load_json(model_path)?;
        model.validate().map_err(|e| artifact_error(model_path, e))?;

        let predictor = Self::new(preprocessor, model)?;
        tracing::info!(
            "✅ Artifacts loaded: {} trees, {} features ({} numeric, {} categorical columns)",
            predictor.model.trees.len(),
            predictor.model.num_features,
            predictor.preprocessor.numeric.len(),
            predictor.preprocessor.categorical.len()
        );

        Ok(predictor)
    }

    pub fn num_features(&self) -> usize {
        self.model.num_features
    }

    pub fn num_trees(&self) -> usize {
        self.model.trees.len()
    }
}

impl PricePredictor for TripPricePredictor {
    fn predict(&self, trip: &TripFeatures) -> Result<f64> {
        trip.validate()?;
        let row = self.preprocessor.transform(trip)?;
        let price = self.model.predict_row(&row)?;
        tracing::debug!("Predicted price {:.4} for {} -> {}", price, trip.source, trip.destination);
        Ok(price)
    }
}
