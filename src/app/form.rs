use crate::domain::model::TripFeatures;
use crate::domain::ports::PredictionApi;
use crate::utils::error::{Result, TripPriceError};
use crate::utils::validation::{validate_at_least, Validate};
use std::fmt;

/// 表單上距離欄位允許的最小值
pub const MIN_DISTANCE: f64 = 0.01;

/// The trip form: default values and the bounds its inputs enforce.
pub struct TripForm;

impl TripForm {
    pub fn defaults() -> TripFeatures {
        TripFeatures {
            distance: 5.0,
            cab_type: "UberX".to_string(),
            source: "Back Bay".to_string(),
            destination: "South Station".to_string(),
            surge_multiplier: 1.0,
            name: "Uber".to_string(),
            hour: 14,
            temp: 20.0,
            clouds: 20.0,
            pressure: 1013.0,
            humidity: 50.0,
            wind: 3.0,
            month: 2,
            day: 5,
        }
    }

    /// Widget bounds plus the service's own field constraints.
    pub fn check(trip: &TripFeatures) -> Result<()> {
        validate_at_least("distance", trip.distance, MIN_DISTANCE)?;
        trip.validate()
    }

    /// 互動模式：逐欄詢問，以 `seed` 作為預設值
    #[cfg(feature = "cli")]
    pub fn prompt(seed: &TripFeatures) -> Result<TripFeatures> {
        println!("Trip Features");
        let distance = prompt::float("distance (km)", seed.distance, Some(MIN_DISTANCE), None)?;
        let surge_multiplier =
            prompt::float("surge_multiplier", seed.surge_multiplier, Some(1.0), None)?;
        let hour = prompt::int("hour", seed.hour, 0, 23)?;
        let month = prompt::int("month", seed.month, 1, 12)?;
        let day = prompt::int("day", seed.day, 1, 31)?;
        let temp = prompt::float("temp", seed.temp, None, None)?;
        let clouds = prompt::float("clouds", seed.clouds, None, None)?;
        let pressure = prompt::float("pressure", seed.pressure, None, None)?;
        let humidity = prompt::float("humidity", seed.humidity, None, None)?;
        let wind = prompt::float("wind", seed.wind, None, None)?;

        println!("Categorical Fields");
        let cab_type = prompt::text("cab_type", &seed.cab_type)?;
        let source = prompt::text("source", &seed.source)?;
        let destination = prompt::text("destination", &seed.destination)?;
        let name = prompt::text("name", &seed.name)?;

        Ok(TripFeatures {
            distance,
            cab_type,
            source,
            destination,
            surge_multiplier,
            name,
            hour,
            temp,
            clouds,
            pressure,
            humidity,
            wind,
            month,
            day,
        })
    }
}

#[cfg(feature = "cli")]
mod prompt {
    use crate::utils::error::Result;
    use dialoguer::Input;

    fn prompt_error(e: dialoguer::Error) -> crate::utils::error::TripPriceError {
        std::io::Error::other(e.to_string()).into()
    }

    pub fn float(label: &str, default: f64, min: Option<f64>, max: Option<f64>) -> Result<f64> {
        Input::<f64>::new()
            .with_prompt(label)
            .default(default)
            .validate_with(move |value: &f64| -> std::result::Result<(), String> {
                if !value.is_finite() {
                    return Err("Enter a finite number".to_string());
                }
                if let Some(min) = min {
                    if *value < min {
                        return Err(format!("Minimum is {}", min));
                    }
                }
                if let Some(max) = max {
                    if *value > max {
                        return Err(format!("Maximum is {}", max));
                    }
                }
                Ok(())
            })
            .interact_text()
            .map_err(prompt_error)
    }

    pub fn int(label: &str, default: i64, min: i64, max: i64) -> Result<i64> {
        Input::<i64>::new()
            .with_prompt(format!("{} [{}-{}]", label, min, max))
            .default(default)
            .validate_with(move |value: &i64| -> std::result::Result<(), String> {
                match (min..=max).contains(value) {
                    true => Ok(()),
                    false => Err(format!("Enter a value between {} and {}", min, max)),
                }
            })
            .interact_text()
            .map_err(prompt_error)
    }

    pub fn text(label: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(label)
            .default(default.to_string())
            .interact_text()
            .map_err(prompt_error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Price(f64),
    /// 表單端檢查失敗，沒有送出請求
    Invalid(String),
    ApiError { status: u16, body: String },
    Failed(String),
}

impl FormOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Price(_))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Price(_) => 0,
            Self::Invalid(_) => 1,
            Self::ApiError { .. } | Self::Failed(_) => 2,
        }
    }
}

impl fmt::Display for FormOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price(price) => write!(f, "✅ Predicted Price: {}", price),
            Self::Invalid(message) => write!(f, "❌ {}", message),
            Self::ApiError { status, body } => write!(f, "❌ API Error {}\n{}", status, body),
            Self::Failed(message) => write!(f, "❌ {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HealthOutcome {
    Up(serde_json::Value),
    Unreachable(String),
}

impl fmt::Display for HealthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up(body) => {
                let pretty = serde_json::to_string_pretty(body).map_err(|_| fmt::Error)?;
                write!(f, "API health check:\n{}", pretty)
            }
            Self::Unreachable(message) => write!(f, "⚠️ Could not reach API: {}", message),
        }
    }
}

/// Submits the form through a [`PredictionApi`]. Each call is attempted once.
pub struct FormRunner<A: PredictionApi> {
    api: A,
}

impl<A: PredictionApi> FormRunner<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn submit(&self, trip: &TripFeatures) -> FormOutcome {
        if let Err(e) = TripForm::check(trip) {
            tracing::debug!("Form input rejected before sending: {}", e);
            return FormOutcome::Invalid(e.to_string());
        }

        tracing::info!("Calling API...");
        match self.api.predict(trip).await {
            Ok(price) => FormOutcome::Price(price),
            Err(TripPriceError::ApiStatusError { status, body }) => {
                tracing::warn!("API responded with status {}", status);
                FormOutcome::ApiError { status, body }
            }
            Err(e) => {
                tracing::warn!("❌ Prediction request failed: {}", e);
                FormOutcome::Failed(e.to_string())
            }
        }
    }

    pub async fn health_check(&self) -> HealthOutcome {
        match self.api.health().await {
            Ok(body) => HealthOutcome::Up(body),
            Err(e) => HealthOutcome::Unreachable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Price(f64),
        Status(u16, &'static str),
        Down,
    }

    struct MockApi {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl MockApi {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    fn connection_refused() -> TripPriceError {
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into()
    }

    #[async_trait]
    impl PredictionApi for MockApi {
        async fn health(&self) -> Result<serde_json::Value> {
            match self.reply {
                Reply::Down => Err(connection_refused()),
                _ => Ok(serde_json::json!({"status": "API is running"})),
            }
        }

        async fn predict(&self, _trip: &TripFeatures) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Price(price) => Ok(*price),
                Reply::Status(status, body) => Err(TripPriceError::ApiStatusError {
                    status: *status,
                    body: body.to_string(),
                }),
                Reply::Down => Err(connection_refused()),
            }
        }
    }

    #[test]
    fn test_defaults_pass_checks() {
        assert!(TripForm::check(&TripForm::defaults()).is_ok());
    }

    #[test]
    fn test_distance_widget_minimum() {
        let mut trip = TripForm::defaults();
        trip.distance = 0.005;
        assert!(TripForm::check(&trip).is_err());

        trip.distance = MIN_DISTANCE;
        assert!(TripForm::check(&trip).is_ok());
    }

    #[tokio::test]
    async fn test_submit_success() {
        let runner = FormRunner::new(MockApi::new(Reply::Price(9.5)));
        let outcome = runner.submit(&TripForm::defaults()).await;

        assert_eq!(outcome, FormOutcome::Price(9.5));
        assert!(outcome.is_success());
        assert_eq!(outcome.to_string(), "✅ Predicted Price: 9.5");
    }

    #[tokio::test]
    async fn test_submit_api_error_shows_status_and_body() {
        let runner = FormRunner::new(MockApi::new(Reply::Status(
            400,
            r#"{"detail":"bad input"}"#,
        )));
        let outcome = runner.submit(&TripForm::defaults()).await;

        assert_eq!(outcome.exit_code(), 2);
        assert_eq!(
            outcome.to_string(),
            "❌ API Error 400\n{\"detail\":\"bad input\"}"
        );
    }

    #[tokio::test]
    async fn test_submit_network_failure_is_not_retried() {
        let api = MockApi::new(Reply::Down);
        let runner = FormRunner::new(api);
        let outcome = runner.submit(&TripForm::defaults()).await;

        assert!(matches!(outcome, FormOutcome::Failed(ref m) if m.contains("connection refused")));
        assert_eq!(runner.api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_sent() {
        let runner = FormRunner::new(MockApi::new(Reply::Price(1.0)));
        let mut trip = TripForm::defaults();
        trip.month = 13;

        let outcome = runner.submit(&trip).await;
        assert!(matches!(outcome, FormOutcome::Invalid(_)));
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(runner.api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health_check_rendering() {
        let up = FormRunner::new(MockApi::new(Reply::Price(1.0)))
            .health_check()
            .await;
        assert!(up.to_string().contains("\"status\": \"API is running\""));

        let down = FormRunner::new(MockApi::new(Reply::Down))
            .health_check()
            .await;
        assert!(down
            .to_string()
            .starts_with("⚠️ Could not reach API: IO error: connection refused"));
    }
}
