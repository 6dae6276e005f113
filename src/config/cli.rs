use crate::config::client::{ClientConfig, DEFAULT_API_BASE};
use crate::config::toml_config::ServiceConfig;
use crate::domain::model::TripFeatures;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "trip-price-server")]
#[command(about = "Serve trip price predictions over HTTP")]
pub struct ServerCli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub workers: Option<usize>,

    /// Model artifact (gradient boosted trees, JSON)
    #[arg(long)]
    pub model: Option<String>,

    /// Preprocessor artifact (JSON)
    #[arg(long)]
    pub preprocessor: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Load and check the artifacts, then exit without serving
    #[arg(long)]
    pub check: bool,
}

impl ServerCli {
    /// 讀取設定檔（若有），再以命令列參數覆蓋
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(workers) = self.workers {
            config.server.workers = Some(workers);
        }
        if let Some(model) = &self.model {
            config.artifacts.model = model.clone();
        }
        if let Some(preprocessor) = &self.preprocessor {
            config.artifacts.preprocessor = preprocessor.clone();
        }
        if self.json_logs {
            config.logging.format = "json".to_string();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
    }
}

/// 表單客戶端：每個欄位一個參數，預設值與表單相同
#[derive(Debug, Clone, Parser)]
#[command(name = "trip-price-form")]
#[command(about = "Trip Price Prediction form client")]
pub struct FormCli {
    #[arg(long, env = "TRIP_PRICE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Timeout for the prediction call, in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Timeout for the health check, in seconds
    #[arg(long, default_value = "10")]
    pub health_timeout: u64,

    /// Prompt for every field instead of using the flags below
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(long)]
    pub skip_health: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Trip distance (km)
    #[arg(long, default_value = "5.0")]
    pub distance: f64,

    #[arg(long, default_value = "1.0")]
    pub surge_multiplier: f64,

    #[arg(long, default_value = "14", allow_negative_numbers = true)]
    pub hour: i64,

    #[arg(long, default_value = "2", allow_negative_numbers = true)]
    pub month: i64,

    #[arg(long, default_value = "5", allow_negative_numbers = true)]
    pub day: i64,

    #[arg(long, default_value = "20.0", allow_negative_numbers = true)]
    pub temp: f64,

    #[arg(long, default_value = "20.0")]
    pub clouds: f64,

    #[arg(long, default_value = "1013.0")]
    pub pressure: f64,

    #[arg(long, default_value = "50.0")]
    pub humidity: f64,

    #[arg(long, default_value = "3.0")]
    pub wind: f64,

    #[arg(long, default_value = "UberX")]
    pub cab_type: String,

    #[arg(long, default_value = "Back Bay")]
    pub source: String,

    #[arg(long, default_value = "South Station")]
    pub destination: String,

    #[arg(long, default_value = "Uber")]
    pub name: String,
}

impl FormCli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            predict_timeout_seconds: self.timeout,
            health_timeout_seconds: self.health_timeout,
        }
    }

    pub fn trip(&self) -> TripFeatures {
        TripFeatures {
            distance: self.distance,
            cab_type: self.cab_type.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
            surge_multiplier: self.surge_multiplier,
            name: self.name.clone(),
            hour: self.hour,
            temp: self.temp,
            clouds: self.clouds,
            pressure: self.pressure,
            humidity: self.humidity,
            wind: self.wind,
            month: self.month,
            day: self.day,
        }
    }
}
