//! Layered server configuration.
//!
//! Precedence, lowest first: built-in defaults, optional YAML file,
//! `BUMPER__*` environment variables (nested keys split on `__`), CLI flags.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use bumper::config::BumperConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "BUMPER__";
const MOCK_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub bumper: BumperConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8087)),
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_conns: u32,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://bumper.db?mode=rwc".to_owned(),
            max_conns: 10,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl DatabaseConfig {
    /// Scheme part of the DSN, safe to log.
    #[must_use]
    pub fn backend(&self) -> &str {
        self.dsn.split(':').next().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Command line values that override the loaded configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
    pub mock: bool,
}

impl AppConfig {
    /// Defaults, then `path` if given, then `BUMPER__*` env vars.
    ///
    /// # Errors
    /// Unreadable YAML, unknown keys or values of the wrong type.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(port) = cli.port {
            self.server.bind_addr.set_port(port);
        }
        match cli.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
        if cli.mock {
            MOCK_DSN.clone_into(&mut self.database.dsn);
            // every in-memory connection is a separate database
            self.database.max_conns = 1;
        }
    }

    /// YAML rendering with the session secret redacted.
    ///
    /// # Errors
    /// Serialization failure.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        let mut printable = self.clone();
        "<redacted>".clone_into(&mut printable.bumper.session.secret);
        serde_saphyr::to_string(&printable).context("failed to render configuration")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let cfg = AppConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.bind_addr.to_string(), "127.0.0.1:8087");
            assert_eq!(cfg.server.request_timeout, Duration::from_secs(30));
            assert_eq!(cfg.database.max_conns, 10);
            assert_eq!(cfg.logging.format, LogFormat::Text);
            assert_eq!(cfg.bumper.max_photos_per_incident, 5);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bumper.yaml",
                r"
server:
  bind_addr: 0.0.0.0:9000
  request_timeout: 10s
database:
  dsn: postgres://bumper@localhost/bumper
  max_conns: 4
logging:
  format: json
bumper:
  max_photos_per_incident: 3
  session:
    ttl: 15m
",
            )?;
            jail.set_env("BUMPER__DATABASE__MAX_CONNS", "8");
            jail.set_env("BUMPER__BUMPER__SESSION__SECRET", "from-env");

            let cfg = AppConfig::load(Some(Path::new("bumper.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.bind_addr.port(), 9000);
            assert_eq!(cfg.server.request_timeout, Duration::from_secs(10));
            assert_eq!(cfg.database.backend(), "postgres");
            assert_eq!(cfg.database.max_conns, 8);
            assert_eq!(cfg.logging.format, LogFormat::Json);
            assert_eq!(cfg.bumper.max_photos_per_incident, 3);
            assert_eq!(cfg.bumper.session.ttl, Duration::from_secs(900));
            assert_eq!(cfg.bumper.session.secret, "from-env");
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bumper.yaml", "server:\n  bind_adress: 0.0.0.0:1\n")?;
            assert!(AppConfig::load(Some(Path::new("bumper.yaml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn cli_overrides_win() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(&CliOverrides {
            port: Some(9100),
            verbose: 2,
            mock: true,
        });
        assert_eq!(cfg.server.bind_addr.port(), 9100);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.database.dsn, "sqlite::memory:");
        assert_eq!(cfg.database.max_conns, 1);
    }

    #[test]
    fn printed_config_hides_the_secret() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("<redacted>"));
        assert!(!yaml.contains(bumper::config::DEV_SESSION_SECRET));
    }
}
