// # zonesyncd - cluster-to-zone DNS sync daemon
//
// Thin integration layer: reads configuration from the environment,
// initializes logging and the runtime, binds the Linode provider, and
// starts the sync engine. All sync logic lives in zonesync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `ZONESYNC_CLUSTER_ID`: LKE cluster identifier (required)
// - `ZONESYNC_POOL_ID`: node pool identifier (required)
// - `ZONESYNC_ZONE_ID`: managed DNS zone identifier (required)
// - `ZONESYNC_INTERVAL_SECS`: seconds between cycles (default 300)
// - `ZONESYNC_LOG_LEVEL`: trace | debug | info | warn | error (default info)
// - `LINODE_TOKEN`: API credential (required)
//
// ## Example
//
// ```bash
// export ZONESYNC_CLUSTER_ID=12345
// export ZONESYNC_POOL_ID=67890
// export ZONESYNC_ZONE_ID=424242
// export LINODE_TOKEN=your_token
//
// zonesyncd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use zonesync_core::{SyncConfig, SyncEngine};
use zonesync_provider_linode::LinodeClient;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    sync: SyncConfig,
    token: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing or malformed required identifiers are fatal here, before
    /// the loop ever starts; no runtime retry applies to configuration.
    fn from_env() -> Result<Self> {
        let cluster_id = required_u64("ZONESYNC_CLUSTER_ID")?;
        let pool_id = required_u64("ZONESYNC_POOL_ID")?;
        let zone_id = required_u64("ZONESYNC_ZONE_ID")?;

        let mut sync = SyncConfig::new(cluster_id, pool_id, zone_id);
        if let Ok(raw) = env::var("ZONESYNC_INTERVAL_SECS") {
            let interval = raw.parse().map_err(|_| {
                anyhow::anyhow!("ZONESYNC_INTERVAL_SECS must be a number of seconds, got '{raw}'")
            })?;
            sync = sync.with_interval_secs(interval);
        }

        let token = env::var("LINODE_TOKEN").map_err(|_| {
            anyhow::anyhow!("Could not find LINODE_TOKEN, please ensure it is set")
        })?;

        Ok(Self {
            sync,
            token,
            log_level: env::var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.sync.validate()?;

        if self.token.is_empty() {
            anyhow::bail!("LINODE_TOKEN cannot be empty");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Read a required numeric environment variable
fn required_u64(name: &str) -> Result<u64> {
    let raw = env::var(name)
        .map_err(|_| anyhow::anyhow!("{name} is required. Set it via: export {name}=<id>"))?;
    raw.parse()
        .map_err(|_| anyhow::anyhow!("{name} must be a numeric identifier, got '{raw}'"))
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    info!("Starting zonesyncd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            SyncExitCode::RuntimeError
        } else {
            SyncExitCode::CleanShutdown
        }
    })
    .into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    // One client serves both capability traits
    let client = Arc::new(LinodeClient::new(config.token)?);

    info!(
        cluster_id = config.sync.cluster_id,
        pool_id = config.sync.pool_id,
        zone_id = config.sync.zone_id,
        interval_secs = config.sync.interval_secs,
        "configuration loaded"
    );

    let (mut engine, mut events) =
        SyncEngine::new(Box::new(client.clone()), Box::new(client), config.sync)?;

    // Drain engine events at debug level so the channel never fills
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!(?event, "engine event");
        }
    });

    // Shutdown on SIGTERM/SIGINT, interrupting the inter-tick sleep
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(sig) => info!("Received shutdown signal: {}", sig),
            Err(e) => error!("Shutdown listener error: {}", e),
        }
        let _ = shutdown_tx.send(());
    });

    engine.run_with_shutdown(shutdown_rx).await?;
    info!("Shutting down daemon");

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
