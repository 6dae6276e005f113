use crate::config::client::ClientConfig;
use crate::domain::model::{PredictionResponse, TripFeatures};
use crate::domain::ports::PredictionApi;
use crate::utils::error::{Result, TripPriceError};
use async_trait::async_trait;
use reqwest::Client;

pub struct HttpPredictionClient {
    config: ClientConfig,
    client: Client,
}

impl HttpPredictionClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionClient {
    async fn health(&self) -> Result<serde_json::Value> {
        let endpoint = self.config.endpoint("/");
        tracing::debug!("Health check against {}", endpoint);

        let response = self
            .client
            .get(&endpoint)
            .timeout(self.config.health_timeout())
            .send()
            .await?;

        tracing::debug!("Health response status: {}", response.status());
        let body: serde_json::Value = response.json().await?;
        Ok(body)
    }

    async fn predict(&self, trip: &TripFeatures) -> Result<f64> {
        let endpoint = self.config.endpoint("/predict");
        tracing::debug!("📡 POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(trip)
            .timeout(self.config.predict_timeout())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 API response status: {}", status);

        // 只接受 200，其餘狀態連同原始內容回報給呼叫端
        if status != reqwest::StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("⚠️ Failed to read error body (status {}): {}", status, e);
                    format!("failed to read response body: {}", e)
                }
            };
            return Err(TripPriceError::ApiStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let prediction: PredictionResponse = serde_json::from_str(&text)?;
        Ok(prediction.predicted_price)
    }
}
