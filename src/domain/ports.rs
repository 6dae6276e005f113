use crate::domain::model::TripFeatures;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 伺服器端的推論介面，實作需可在多個 worker 之間共享
pub trait PricePredictor: Send + Sync {
    fn predict(&self, trip: &TripFeatures) -> Result<f64>;
}

/// 表單客戶端呼叫的遠端 API
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn health(&self) -> Result<serde_json::Value>;
    async fn predict(&self, trip: &TripFeatures) -> Result<f64>;
}
