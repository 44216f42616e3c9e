//! Index Lifecycle Main Entry Point
//!
//! Loads an index definition, connects to OpenSearch and runs the action
//! selected with `INDEX_ACTION`.

use dotenv::dotenv;
use index_lifecycle::{run_action, ActionOutcome, Dependencies, LifecycleConfig, LifecycleError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("index_lifecycle=info,index_lifecycle_repository=info")
    });

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        // Logs go to stderr so stdout only carries action output
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    info!(
        service_name = "index-lifecycle",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json_logs,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), LifecycleError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let config = LifecycleConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match run_action(&deps.manager, &deps.index, config.action, config.force).await {
        Ok(outcome) => {
            match outcome {
                ActionOutcome::Done => {}
                ActionOutcome::Ensured { created } => println!("created: {}", created),
                ActionOutcome::Exists(exists) => println!("{}", exists),
                ActionOutcome::Payload(value) => println!(
                    "{}",
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
                ),
            }
            info!(index = %deps.index.name(), action = %config.action, "Index action completed");
            Ok(())
        }
        Err(e) => {
            error!(index = %deps.index.name(), action = %config.action, error = %e, "Index action failed");
            Err(e.into())
        }
    }
}
