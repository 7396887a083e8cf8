// # statuscake-provider - Provider Driver
//
// CRITICAL RULES:
// - This is a THIN integration layer ONLY
// - DO NOT add reconciliation, diff or API logic here
// - All provider logic MUST be in statuscake-core / statuscake-client
// - Configuration is via environment variables ONLY
//
// The driver is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering resources and the API client
// 4. Serving line-delimited JSON requests from stdin to stdout
//
// ## Configuration
//
// - `STATUSCAKE_API_KEY`: API key (required)
// - `STATUSCAKE_API_URL`: API base URL (default: https://api.statuscake.com/v1)
// - `STATUSCAKE_TIMEOUT_SECS`: Per-request timeout, 1-300 (default: 30)
// - `STATUSCAKE_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// Logs go to stderr; stdout carries responses only.
//
// ## Example
//
// ```bash
// export STATUSCAKE_API_KEY=your_key
//
// echo '{"resource_type":"statuscake_uptime_test","operation":"import","id":"123"}' \
//     | statuscake-provider
// ```

mod protocol;

use anyhow::Result;
use statuscake_core::{ProviderConfig, ResourceRegistry, StatusCakeApi};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Environment variable selecting the log level
const LOG_LEVEL_ENV: &str = "STATUSCAKE_LOG_LEVEL";

/// Exit codes for different termination scenarios
///
/// - 0: Input closed or shutdown signal
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ProviderExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ProviderExitCode> for ExitCode {
    fn from(code: ProviderExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Driver configuration
struct Config {
    provider: ProviderConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            provider: ProviderConfig::from_env()?,
            log_level: env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        if self.provider.api_url.starts_with("http://") {
            eprintln!(
                "WARNING: STATUSCAKE_API_URL uses HTTP (not HTTPS). \
                The API key will be sent in clear text."
            );
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "{} '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                LOG_LEVEL_ENV,
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            report_startup_failure(&e);
            return ProviderExitCode::ConfigError.into();
        }
    };

    // Validate configuration (fails on "Missing api_key")
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        report_startup_failure(&e);
        return ProviderExitCode::ConfigError.into();
    }

    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ProviderExitCode::ConfigError.into();
    }

    info!("Starting statuscake-provider");
    info!("Configuration loaded: {:?}", config.provider);

    let registry = ResourceRegistry::with_builtin_resources();
    statuscake_client::register(&registry);

    let api = match registry.create_client(statuscake_client::CLIENT_NAME, &config.provider) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            return ProviderExitCode::ConfigError.into();
        }
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ProviderExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = serve(&registry, api.as_ref()).await {
            error!("Provider error: {}", e);
            ProviderExitCode::RuntimeError
        } else {
            ProviderExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Tell the host on stdout why the provider is exiting before serving
fn report_startup_failure(err: &anyhow::Error) {
    let response = protocol::startup_failure(err);
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = serde_json::to_writer(&mut stdout, &response).and_then(|()| {
        writeln!(stdout).map_err(serde_json::Error::io)
    }) {
        eprintln!("Failed to report startup failure: {}", e);
    }
}

/// Serve requests until stdin closes or a shutdown signal arrives
async fn serve(registry: &ResourceRegistry, api: &dyn StatusCakeApi) -> Result<()> {
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let mut stdout = tokio::io::stdout();
    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    info!("Ready; serving {} resource type(s)", registry.list_resources().len());

    loop {
        let line = tokio::select! {
            received = &mut shutdown => {
                info!("Received shutdown signal: {}", received?);
                return Ok(());
            }
            line = lines.next() => line,
        };

        let Some(line) = line else {
            info!("Input closed; shutting down");
            return Ok(());
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = protocol::handle_line(registry, api, &line).await;
        let mut encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to encode response: {}", e);
                continue;
            }
        };
        encoded.push('\n');

        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
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

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> Config {
        Config {
            provider: ProviderConfig::new("test_key"),
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(config("DEBUG").level().unwrap(), Level::DEBUG);
        assert_eq!(config("warn").level().unwrap(), Level::WARN);
        assert!(config("verbose").level().is_err());
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let config = Config {
            provider: ProviderConfig::default(),
            log_level: "info".to_string(),
        };

        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Missing api_key");
    }

    #[test]
    fn test_valid_config() {
        assert!(config("info").validate().is_ok());
    }
}
