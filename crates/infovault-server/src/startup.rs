//! Server startup output.

use infovault_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____       ____                  ____
   /  _/___   / __/___  _   ______ _/ / /_
   / // __ \ / /_/ __ \| | / / __ `/ / __/
 _/ // / / // __/ /_/ /| |/ / /_/ / / /_
/___/_/ /_//_/  \____/ |___/\__,_/_/\__/
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let port = config.server.port;
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Version:   {}", config.app.version);
    info!("REST API:  http://0.0.0.0:{}/api/v1", port);
    info!("Health:    http://0.0.0.0:{}/health", port);
    info!("Cache:     {}", if config.redis.enabled { "redis" } else { "memory" });
    info!(
        "Executor:  {} in flight, {}s deadline",
        config.executor.max_in_flight, config.executor.query_timeout_secs
    );
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        print_startup_info(&config);
    }
}
