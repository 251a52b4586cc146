#![deny(missing_docs)]

//! # Configuration
//!
//! Command line flags, each overridable through an environment variable.
//! A `.env` file in the working directory is loaded before parsing.

use clap::Parser;
use log::{debug, error, LevelFilter};
use std::path::PathBuf;

/// Certificate file expected under `--cert-path`.
pub const CERT_FILE: &str = "cert.pem";

/// Private key file expected under `--cert-path`.
pub const KEY_FILE: &str = "key.pem";

/// Mock server settings.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about = "Mock HTTP server for OpenAPI v2 documents")]
pub struct Config {
    /// OpenAPI spec file in JSON or YAML format.
    #[clap(short = 'f', long = "file", env = "SPEC_FILE")]
    pub spec_file: PathBuf,

    /// Port to run the mock server on.
    #[clap(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Address to bind to.
    #[clap(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Log level: debug, info, warn, error.
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable API key authentication via the `x-api-key` header.
    #[clap(long, env = "API_KEY")]
    pub api_key: Option<String>,

    /// Media type used to pick response examples and sent as `Content-Type`.
    #[clap(long, env = "CONTENT_TYPE", default_value = "application/json")]
    pub content_type: String,

    /// Directory holding `cert.pem` and `key.pem`; enables TLS when both exist.
    #[clap(long, env = "CERT_PATH")]
    pub cert_path: Option<PathBuf>,
}

impl Config {
    /// Log filter for `log_level`; unknown values fall back to info.
    pub fn level_filter(&self) -> LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "debug" => LevelFilter::Debug,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Info,
        }
    }

    /// API key to enforce, ignoring an empty value.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Certificate and key paths when TLS can be enabled.
    ///
    /// A missing `cert.pem` or `key.pem` is logged as an error and TLS stays off.
    pub fn tls_files(&self) -> Option<(PathBuf, PathBuf)> {
        let dir = self.cert_path.as_ref().filter(|p| !p.as_os_str().is_empty())?;
        debug!("Enabling TLS, checking cert & key files in {:?}", dir);

        let cert = dir.join(CERT_FILE);
        let key = dir.join(KEY_FILE);
        let mut usable = true;
        for file in [&cert, &key] {
            if !file.is_file() {
                error!("{:?} not found, TLS will be disabled", file);
                usable = false;
            }
        }

        usable.then_some((cert, key))
    }
}

/// Installs the global logger at the configured level. `RUST_LOG` can refine it.
pub fn init_logging(config: &Config) {
    env_logger::Builder::new()
        .filter_level(config.level_filter())
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let config = Config::try_parse_from([
            "mockery",
            "-f",
            "petstore.yaml",
            "--port",
            "9000",
            "--log-level",
            "DEBUG",
            "--api-key",
            "secret",
        ])
        .unwrap();

        assert_eq!(config.spec_file, PathBuf::from("petstore.yaml"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        assert_eq!(config.api_key(), Some("secret"));
        assert_eq!(config.content_type, "application/json");
    }

    #[test]
    fn test_unknown_level_is_info() {
        let config =
            Config::try_parse_from(["mockery", "--file", "spec.json", "--log-level", "loud"])
                .unwrap();
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_cert_path_flag() {
        let config =
            Config::try_parse_from(["mockery", "-f", "spec.json", "--cert-path", "/etc/mockery"])
                .unwrap();
        assert_eq!(config.cert_path, Some(PathBuf::from("/etc/mockery")));

        let config = Config::try_parse_from(["mockery", "-f", "spec.json"]).unwrap();
        assert_eq!(config.tls_files(), None);
    }

    #[test]
    fn test_tls_disabled_when_pem_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CERT_FILE), "cert").unwrap();

        let mut config = Config::try_parse_from(["mockery", "-f", "spec.json"]).unwrap();
        config.cert_path = Some(dir.path().to_path_buf());
        assert_eq!(config.tls_files(), None);

        std::fs::write(dir.path().join(KEY_FILE), "key").unwrap();
        assert_eq!(
            config.tls_files(),
            Some((dir.path().join(CERT_FILE), dir.path().join(KEY_FILE)))
        );
    }

    #[test]
    fn test_empty_api_key_disabled() {
        let config =
            Config::try_parse_from(["mockery", "--file", "spec.json", "--api-key", ""]).unwrap();
        assert_eq!(config.api_key(), None);
    }
}
