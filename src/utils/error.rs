use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripPriceError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{field}: {reason} (got {value})")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load artifact {path}: {message}")]
    ArtifactError { path: String, message: String },

    #[error("Found unknown category '{value}' in column '{column}'")]
    UnknownCategoryError { column: String, value: String },

    #[error("Inference error: {message}")]
    InferenceError { message: String },
}

pub type Result<T> = std::result::Result<T, TripPriceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Artifact,
    Inference,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TripPriceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::ApiStatusError { .. } => ErrorCategory::Network,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::ArtifactError { .. } => ErrorCategory::Artifact,
            Self::UnknownCategoryError { .. } | Self::InferenceError { .. } => {
                ErrorCategory::Inference
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 遠端服務的錯誤通常可以稍後再試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Inference => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Artifact | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 對應到 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) => {
                "Check that the prediction API is running and reachable from this machine".to_string()
            }
            Self::ApiStatusError { status, .. } if *status >= 500 => {
                "The prediction API failed internally; check the service logs".to_string()
            }
            Self::ApiStatusError { .. } => {
                "Review the submitted trip fields against the API error detail".to_string()
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and try again".to_string()
            }
            Self::ValidationError { field, .. } => {
                format!("Provide a value for '{}' within its allowed range", field)
            }
            Self::ArtifactError { path, .. } => format!(
                "Make sure '{}' exists and is a valid JSON artifact exported for this service",
                path
            ),
            Self::UnknownCategoryError { column, .. } => format!(
                "Use one of the categories the preprocessor was fitted on for '{}'",
                column
            ),
            Self::InferenceError { .. } => {
                "Check that the model and preprocessor artifacts belong together".to_string()
            }
            Self::IoError(_) => "Check file paths and permissions".to_string(),
            Self::SerializationError(_) => "Check that the JSON document is well formed".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not talk to the prediction API: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Validation => format!("Invalid trip features: {}", self),
            ErrorCategory::Artifact => format!("Model artifacts could not be loaded: {}", self),
            ErrorCategory::Inference => format!("Prediction failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}
