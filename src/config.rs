use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::cli::CommandLine;
use crate::target::DEFAULT_PORT;

/// Environment variable naming a defaults file when `--config` is absent.
pub const CONFIG_ENV: &str = "CHECK_TCP_CONFIG";

/// Defaults read from an optional JSON file. Every field may be omitted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    #[serde(default)]
    pub show_all: bool,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default = "default_port")]
    pub default_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

fn default_timeout_secs() -> f64 {
    1.0
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    // stdout is reserved for the report
    "warn".to_string()
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            show_all: false,
            quiet: false,
            default_port: default_port(),
            log_level: default_log_level(),
            targets: Vec::new(),
        }
    }
}

impl CheckConfig {
    /// Get the log level as a tracing::Level
    pub fn get_tracing_level(&self) -> Result<tracing::Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(tracing::Level::TRACE),
            "debug" => Ok(tracing::Level::DEBUG),
            "info" => Ok(tracing::Level::INFO),
            "warn" | "warning" => Ok(tracing::Level::WARN),
            "error" => Ok(tracing::Level::ERROR),
            _ => Err(anyhow::anyhow!(
                "Invalid log level: {}. Valid levels are: trace, debug, info, warn, error",
                self.log_level
            )),
        }
    }

    /// Read the file named by `--config`, else by `CHECK_TCP_CONFIG`, else
    /// fall back to built-in defaults.
    pub async fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        };
        match path {
            Some(p) => Self::load_file_config(&p).await,
            None => Ok(Self::default()),
        }
    }

    async fn load_file_config(file_path: &Path) -> Result<Self> {
        if !file_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file not found: {}",
                file_path.display()
            ));
        }

        let content = fs::read_to_string(file_path)
            .await
            .with_context(|| format!("reading {}", file_path.display()))?;
        let config: CheckConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", file_path.display()))?;
        Ok(config)
    }
}

/// Everything one run needs, after command-line flags are applied on top of
/// the file defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub targets: Vec<String>,
    pub timeout: Duration,
    pub show_all: bool,
    pub quiet: bool,
    pub default_port: u16,
    pub log_level: tracing::Level,
}

impl Settings {
    pub fn merge(file: CheckConfig, cli: CommandLine) -> Result<Self> {
        let log_level = file.get_tracing_level()?;
        let secs = cli.timeout.unwrap_or(file.timeout_secs);
        let timeout = Duration::try_from_secs_f64(secs).map_err(|_| {
            anyhow::anyhow!(
                "Invalid timeout: {}. Must be a non-negative number of seconds",
                secs
            )
        })?;

        let mut targets = file.targets;
        targets.extend(cli.targets);

        Ok(Self {
            targets,
            timeout,
            show_all: cli.all || file.show_all,
            quiet: cli.quiet || file.quiet,
            default_port: file.default_port,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> CommandLine {
        let mut argv = vec!["check-tcp"];
        argv.extend_from_slice(args);
        CommandLine::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_command_line_defaults() {
        let settings = Settings::merge(CheckConfig::default(), cli(&["127.0.0.1"])).unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(1));
        assert_eq!(settings.default_port, 9);
        assert!(!settings.show_all);
        assert!(!settings.quiet);
        assert_eq!(settings.log_level, tracing::Level::WARN);
        assert_eq!(settings.targets, vec!["127.0.0.1".to_string()]);
    }

    #[test]
    fn flags_override_file() {
        let file = CheckConfig {
            timeout_secs: 3.0,
            targets: vec!["10.0.0.1".to_string()],
            ..CheckConfig::default()
        };
        let settings =
            Settings::merge(file, cli(&["-t", "0.5", "-a", "-q", "10.0.0.2:22"])).unwrap();
        assert_eq!(settings.timeout, Duration::from_millis(500));
        assert!(settings.show_all);
        assert!(settings.quiet);
        assert_eq!(
            settings.targets,
            vec!["10.0.0.1".to_string(), "10.0.0.2:22".to_string()]
        );
    }

    #[test]
    fn negative_timeout_is_rejected() {
        let file = CheckConfig {
            timeout_secs: -1.0,
            ..CheckConfig::default()
        };
        assert!(Settings::merge(file, cli(&[])).is_err());
    }

    #[test]
    fn log_levels() {
        let mut config = CheckConfig::default();
        for (name, level) in [
            ("TRACE", tracing::Level::TRACE),
            ("debug", tracing::Level::DEBUG),
            ("info", tracing::Level::INFO),
            ("warning", tracing::Level::WARN),
            ("error", tracing::Level::ERROR),
        ] {
            config.log_level = name.to_string();
            assert_eq!(config.get_tracing_level().unwrap(), level);
        }
        config.log_level = "loud".to_string();
        assert!(config.get_tracing_level().is_err());
    }

    #[tokio::test]
    async fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"show_all": true, "default_port": 22, "targets": ["10.1.1.1"]}}"#
        )
        .unwrap();

        let config = CheckConfig::discover(Some(file.path())).await.unwrap();
        assert!(config.show_all);
        assert_eq!(config.default_port, 22);
        assert_eq!(config.timeout_secs, 1.0);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.targets, vec!["10.1.1.1".to_string()]);
    }

    #[tokio::test]
    async fn missing_or_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            CheckConfig::discover(Some(&dir.path().join("absent.json")))
                .await
                .is_err()
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout": 2}}"#).unwrap();
        assert!(CheckConfig::discover(Some(file.path())).await.is_err());
    }
}
