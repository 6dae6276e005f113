use clap::Parser;
use std::sync::Arc;
use trip_price::adapters::serve;
use trip_price::utils::{logger, validation::Validate};
use trip_price::{PricePredictor, ServerCli, TripPricePredictor};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = ServerCli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }

    tracing::info!("Starting Trip Price Prediction API");
    tracing::debug!("Service config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    // 啟動時載入一次模型，之後唯讀共享
    let predictor =
        match TripPricePredictor::load(&config.artifacts.model, &config.artifacts.preprocessor) {
            Ok(predictor) => predictor,
            Err(e) => {
                tracing::error!(
                    "❌ Could not load artifacts: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(e.exit_code());
            }
        };

    if cli.check {
        println!(
            "✅ Artifacts OK: {} trees over {} features",
            predictor.num_trees(),
            predictor.num_features()
        );
        return Ok(());
    }

    let predictor: Arc<dyn PricePredictor> = Arc::new(predictor);
    serve(&config, predictor).await?;

    tracing::info!("Server stopped");
    Ok(())
}
