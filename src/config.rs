//! Server configuration, parsed from the command line.

use crate::{DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;

/// Command-line arguments for the LineKV server
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "linekv")]
#[command(version)]
#[command(
    about = "An in-memory key-value store served over a line-oriented TCP protocol",
    after_help = "CONNECTING:\n    $ nc 127.0.0.1 8080\n    SET name Ariz\n    OK\n    GET name\n    Ariz"
)]
pub struct Config {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["linekv"]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_overrides() {
        let config =
            Config::try_parse_from(["linekv", "-H", "0.0.0.0", "--port", "9000", "--log-level", "debug"])
                .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_port() {
        assert!(Config::try_parse_from(["linekv", "--port", "notaport"]).is_err());
        assert!(Config::try_parse_from(["linekv", "--port", "70000"]).is_err());
    }
}
