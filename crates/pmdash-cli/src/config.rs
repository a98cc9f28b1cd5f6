// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use pmdash_app::{MIN_SEARCH_LENGTH, SEARCH_DEBOUNCE};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const APP_NAME: &str = "pmdash";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "warn";
const CONFIG_PATH_ENV: &str = "PMDASH_CONFIG_PATH";
const ACCESS_TOKEN_ENV: &str = "PMDASH_ACCESS_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub service: Service,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            service: Service::default(),
            search: Search::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            base_url: None,
            access_token: None,
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
    pub debounce: Option<String>,
    pub min_length: Option<i64>,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            debounce: Some(format!("{}ms", SEARCH_DEBOUNCE.as_millis())),
            min_length: Some(MIN_SEARCH_LENGTH as i64),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and place values under [service], [search], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.service.base_url {
            let parsed = Url::parse(base_url).with_context(|| {
                format!(
                    "service.base_url in {} is not a valid URL: {base_url:?}",
                    path.display()
                )
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "service.base_url in {} must use http or https, got {base_url:?}",
                    path.display()
                );
            }
        }

        if let Some(timeout) = &self.service.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "service.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(debounce) = &self.search.debounce {
            parse_duration(debounce)
                .with_context(|| format!("search.debounce in {}", path.display()))?;
        }

        if let Some(min_length) = self.search.min_length
            && min_length < 1
        {
            bail!(
                "search.min_length in {} must be at least 1, got {}",
                path.display(),
                min_length
            );
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!("log.level in {} must not be empty", path.display());
        }

        Ok(())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.service
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    /// The environment token wins over the file so secrets can stay out of it.
    pub fn access_token(&self) -> Option<String> {
        env::var(ACCESS_TOKEN_ENV)
            .ok()
            .or_else(|| self.service.access_token.clone())
            .filter(|token| !token.trim().is_empty())
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.service.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn search_debounce(&self) -> Result<Duration> {
        match &self.search.debounce {
            Some(raw) => parse_duration(raw),
            None => Ok(SEARCH_DEBOUNCE),
        }
    }

    pub fn search_min_length(&self) -> usize {
        self.search
            .min_length
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(MIN_SEARCH_LENGTH)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# pmdash config\n# Place this file at: {}\n\nversion = 1\n\n[service]\n# Query service endpoint; each operation is POSTed to <base_url>/<operation>.\n# base_url = \"https://example.my.salesforce.com/services/apexrest/pmdash\"\n# Prefer {} over storing the token here.\n# access_token = \"\"\ntimeout = \"{}\"\n\n[search]\ndebounce = \"{}ms\"\nmin_length = {}\n\n[log]\n# Overridden by RUST_LOG when set.\nlevel = \"{}\"\n",
            path.display(),
            ACCESS_TOKEN_ENV,
            DEFAULT_TIMEOUT,
            SEARCH_DEBOUNCE.as_millis(),
            MIN_SEARCH_LENGTH,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms or 10s)")
}

#[cfg(test)]
mod tests {
    use super::{ACCESS_TOKEN_ENV, CONFIG_PATH_ENV, Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.base_url(), None);
        assert_eq!(config.timeout()?, Duration::from_secs(10));
        assert_eq!(config.search_debounce()?, Duration::from_millis(300));
        assert_eq!(config.search_min_length(), 2);
        assert_eq!(config.log_level(), "warn");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[service]\nbase_url = \"https://example.com\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[service], [search], and [log]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[service]\nbase_url = \"https://example.my.salesforce.com/services/apexrest/pmdash//\"\ntimeout = \"3s\"\n[search]\ndebounce = \"150ms\"\nmin_length = 3\n[log]\nlevel = \"debug\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(
            config.base_url(),
            Some("https://example.my.salesforce.com/services/apexrest/pmdash")
        );
        assert_eq!(config.timeout()?, Duration::from_secs(3));
        assert_eq!(config.search_debounce()?, Duration::from_millis(150));
        assert_eq!(config.search_min_length(), 3);
        assert_eq!(config.log_level(), "debug");
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn non_http_base_url_is_rejected() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[service]\nbase_url = \"ftp://example.com\"\n")?;
        let error = Config::load(&path).expect_err("ftp base_url should fail");
        assert!(error.to_string().contains("http or https"));
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[service]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn zero_min_length_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[search]\nmin_length = 0\n")?;
        let error = Config::load(&path).expect_err("zero min_length should fail");
        assert!(error.to_string().contains("at least 1"));
        Ok(())
    }

    #[test]
    fn bad_debounce_names_the_key() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[search]\ndebounce = \"soon\"\n")?;
        let error = Config::load(&path).expect_err("bad debounce should fail");
        assert!(format!("{error:#}").contains("search.debounce"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("pmdash/config.toml"));
        Ok(())
    }

    #[test]
    fn access_token_env_overrides_file() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[service]\naccess_token = \"from-file\"\n")?;
        let config = Config::load(&path)?;

        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(ACCESS_TOKEN_ENV);
        }
        assert_eq!(config.access_token().as_deref(), Some("from-file"));

        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(ACCESS_TOKEN_ENV, "from-env");
        }
        let token = config.access_token();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(ACCESS_TOKEN_ENV);
        }
        assert_eq!(token.as_deref(), Some("from-env"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("300ms")?, Duration::from_millis(300));
        assert_eq!(parse_duration("10s")?, Duration::from_secs(10));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert!(parse_duration("oops").is_err());
        Ok(())
    }

    #[test]
    fn oversized_minute_duration_is_rejected() {
        let raw = format!("{}m", u64::MAX);
        let error = parse_duration(&raw).expect_err("overflowing minutes should fail");
        assert!(error.to_string().contains("too large"));
        assert_eq!(
            parse_duration(&format!("{}m", u64::MAX / 60)).ok(),
            Some(Duration::from_secs(u64::MAX / 60 * 60))
        );
    }

    #[test]
    fn durations_reject_empty_numbers() -> Result<()> {
        assert!(parse_duration("ms").is_err());
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_loader() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[service]"));
        assert!(example.contains("[search]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.search_min_length(), 2);
        Ok(())
    }
}
