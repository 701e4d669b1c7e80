use std::time::Duration;

use crate::retry::RetryPolicy;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;

const CONNECT_BASE_DELAY: Duration = Duration::from_secs(1);
const CONNECT_MAX_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_retry: RetryPolicy,
}

impl DatabaseConfig {
    pub fn new(url: String, max_connections: u32, connect_attempts: u32) -> Self {
        Self {
            url,
            max_connections: max_connections.max(1),
            connect_retry: RetryPolicy::new(connect_attempts, CONNECT_BASE_DELAY, CONNECT_MAX_DELAY),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub verbose: bool,
}

impl AppConfig {
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "classroom_personalization=debug"
        } else {
            "classroom_personalization=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_config_clamps_pool_size() {
        let config = DatabaseConfig::new("postgres://localhost/class".to_string(), 0, 4);
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.connect_retry.max_attempts(), 4);
    }

    #[test]
    fn verbose_switches_log_filter() {
        let mut config = AppConfig {
            database: DatabaseConfig::new(
                "postgres://localhost/class".to_string(),
                DEFAULT_MAX_CONNECTIONS,
                DEFAULT_CONNECT_ATTEMPTS,
            ),
            verbose: false,
        };
        assert_eq!(config.log_filter(), "classroom_personalization=info");

        config.verbose = true;
        assert_eq!(config.log_filter(), "classroom_personalization=debug");
    }
}
