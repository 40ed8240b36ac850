use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(Clone, Deserialize, Debug)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Where the content API lives. The media base falls back to the API base
/// when unset, so a single-host deployment only configures one URL.
#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct UpstreamConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub media_base: Option<String>,
    pub fallback_api_base: Option<String>,
    pub contact_submit_url: Option<String>,
}

fn default_api_base() -> String {
    "http://localhost:8000".into()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            api_base: default_api_base(),
            media_base: None,
            fallback_api_base: None,
            contact_submit_url: None,
        }
    }
}

impl UpstreamConfig {
    pub fn media_base(&self) -> &str {
        self.media_base.as_deref().unwrap_or(&self.api_base)
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Clone, Deserialize, Debug)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Overlays the process environment on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    // Split out from with_env_overrides so tests can inject a lookup
    // instead of mutating the process environment.
    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base) = lookup("CONTENT_API_BASE") {
            self.upstream.api_base = base;
        }
        if let Some(base) = lookup("CONTENT_MEDIA_BASE") {
            self.upstream.media_base = Some(base);
        }
        if let Some(base) = lookup("CONTENT_FALLBACK_API_BASE") {
            self.upstream.fallback_api_base = Some(base);
        }
        if let Some(url) = lookup("CONTACT_SUBMIT_URL") {
            self.upstream.contact_submit_url = Some(url);
        }
        self
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            listener:
                host: 0.0.0.0
                port: 8080
            upstream:
                api_base: https://content.internal
                fallback_api_base: https://content-standby.internal
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.upstream.api_base, "https://content.internal");
        assert_eq!(
            config.upstream.fallback_api_base.as_deref(),
            Some("https://content-standby.internal")
        );
        assert_eq!(config.metrics.unwrap().statsd_port, 8125);
        assert!(config.logging.is_none());
    }

    #[test]
    fn defaults_when_sections_missing() {
        let tmp = write_tmp_file("{}");
        let config = Config::from_file(tmp.path()).expect("load config");
        assert_eq!(config.listener.host, "127.0.0.1");
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.upstream.api_base, "http://localhost:8000");
    }

    #[test]
    fn media_base_defaults_to_api_base() {
        let upstream = UpstreamConfig {
            api_base: "https://content.internal".into(),
            ..UpstreamConfig::default()
        };
        assert_eq!(upstream.media_base(), "https://content.internal");

        let upstream = UpstreamConfig {
            media_base: Some("https://media.internal".into()),
            ..upstream
        };
        assert_eq!(upstream.media_base(), "https://media.internal");
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CONTENT_API_BASE", "https://override.internal"),
            ("CONTACT_SUBMIT_URL", "https://forms.internal/submit/"),
        ]);
        let config = Config::default()
            .with_overrides_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.upstream.api_base, "https://override.internal");
        assert_eq!(
            config.upstream.contact_submit_url.as_deref(),
            Some("https://forms.internal/submit/")
        );
        // untouched by the override set
        assert!(config.upstream.fallback_api_base.is_none());
    }
}
