use anyhow::Context;
use clap::Parser;
use trip_price::utils::{logger, validation::Validate};
use trip_price::{FormCli, FormRunner, HttpPredictionClient, TripForm};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = FormCli::parse();

    logger::init_cli_logger(cli.verbose);

    let client_config = cli.client_config();
    if let Err(e) = client_config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    println!("🚕 Trip Price Prediction");
    tracing::debug!("API base: {}", client_config.api_base);

    let trip = if cli.interactive {
        TripForm::prompt(&cli.trip()).context("failed to read the trip form")?
    } else {
        cli.trip()
    };

    let runner = FormRunner::new(HttpPredictionClient::new(client_config));

    let outcome = runner.submit(&trip).await;
    if outcome.is_success() {
        println!("{}", outcome);
    } else {
        eprintln!("{}", outcome);
    }

    if !cli.skip_health {
        println!();
        println!("{}", runner.health_check().await);
    }

    if !outcome.is_success() {
        std::process::exit(outcome.exit_code());
    }

    Ok(())
}
