use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use ledger_indexer::application::ProcessingSession;
use ledger_indexer::config::AppConfig;
use ledger_indexer::domain::models::ProcessingResult;
use ledger_indexer::infrastructure::feed::PollingBlockFeed;
use ledger_indexer::infrastructure::ledger::GatewayConnector;
use ledger_indexer::infrastructure::persistence::{CheckpointRepository, DbPool};
use ledger_indexer::utils::logging;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logger();
    logging::log_info(&format!("ledger-indexer {}", env!("CARGO_PKG_VERSION")));

    let config = AppConfig::from_env();

    match run(&config).await {
        Ok(result) => match serde_json::to_string(&result) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                logging::log_error(&format!("Failed to serialize result: {}", e));
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            logging::log_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig) -> anyhow::Result<ProcessingResult> {
    let request = config.processing_request();

    // Validate up front so a missing store URL is reported before connecting
    let store_endpoint = request
        .clone()
        .validate()
        .context("Invalid processing request")?
        .store_endpoint;

    let db_pool = DbPool::connect(&store_endpoint)
        .await
        .context("Checkpoint store unavailable")?;
    let checkpoint_store = Arc::new(CheckpointRepository::new(db_pool.get_connection().clone()));

    let connector = Arc::new(GatewayConnector::with_timeout(config.request_timeout()));
    let feed = Arc::new(PollingBlockFeed::with_poll_interval(
        connector.clone(),
        config.poll_interval(),
    ));

    let session = ProcessingSession::new(checkpoint_store, connector, feed);
    let cancel = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logging::log_warning("Interrupted, cancelling session");
            cancel.cancel();
        }
    });

    Ok(session.run(request).await?)
}
