use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Upper bound for every interval and timeout, in seconds (one day)
pub const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Upper bound for the cache time-to-live (one year)
pub const MAX_TTL_HOURS: u64 = 365 * 24;

/// Published sheet used when no source is configured
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSFbE7BWzH5hTWoCtlK_a0mw8RKsBOAJs_-2rbudUkyv-uXUSwkJh03EdqnW-5N-hqtMrHCjm4BYmRe/pub?output=csv";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub source: SourceConfig,
  /// Custom title for header (defaults to the sheet host if not set)
  pub title: Option<String>,
  /// Seconds between sheet fetches
  #[serde(default = "default_refresh_secs")]
  pub refresh_secs: u64,
  /// Seconds between "Updated Ns ago" refreshes of the status line
  #[serde(default = "default_status_tick_secs")]
  pub status_tick_secs: u64,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
  #[serde(default = "default_url")]
  pub url: Url,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Cached snapshots older than this are ignored
  #[serde(default = "default_ttl_hours")]
  pub ttl_hours: u64,
}

fn default_url() -> Url {
  Url::parse(DEFAULT_SHEET_URL).expect("default sheet URL is valid")
}

fn default_timeout_secs() -> u64 {
  30
}

fn default_refresh_secs() -> u64 {
  60
}

fn default_status_tick_secs() -> u64 {
  15
}

fn default_ttl_hours() -> u64 {
  6
}

fn default_true() -> bool {
  true
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      url: default_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      ttl_hours: default_ttl_hours(),
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      source: SourceConfig::default(),
      title: None,
      refresh_secs: default_refresh_secs(),
      status_tick_secs: default_status_tick_secs(),
      cache: CacheConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./sheetboard.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/sheetboard/config.yaml
  ///
  /// Without any file the built-in defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("sheetboard.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("sheetboard").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    config.validate()?;
    Ok(config)
  }

  /// Check ranges; call again after applying command line overrides.
  pub fn validate(&self) -> Result<()> {
    for (name, secs) in [
      ("refresh_secs", self.refresh_secs),
      ("status_tick_secs", self.status_tick_secs),
      ("source.timeout_secs", self.source.timeout_secs),
    ] {
      if secs == 0 || secs > MAX_INTERVAL_SECS {
        return Err(eyre!(
          "{} must be between 1 and {}, got {}",
          name,
          MAX_INTERVAL_SECS,
          secs
        ));
      }
    }

    if self.cache.ttl_hours > MAX_TTL_HOURS {
      return Err(eyre!(
        "cache.ttl_hours must be at most {}, got {}",
        MAX_TTL_HOURS,
        self.cache.ttl_hours
      ));
    }

    Ok(())
  }

  pub fn refresh_interval(&self) -> Duration {
    Duration::from_secs(self.refresh_secs)
  }

  pub fn status_tick_interval(&self) -> Duration {
    Duration::from_secs(self.status_tick_secs)
  }

  pub fn cache_ttl(&self) -> Result<chrono::Duration> {
    let hours = i64::try_from(self.cache.ttl_hours)?;
    chrono::Duration::try_hours(hours)
      .ok_or_else(|| eyre!("cache.ttl_hours out of range: {}", self.cache.ttl_hours))
  }

  /// Header title: configured title, else the sheet's host
  pub fn display_title(&self) -> String {
    self
      .title
      .clone()
      .or_else(|| self.source.url.host_str().map(str::to_string))
      .unwrap_or_else(|| "sheetboard".to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_yaml_uses_defaults() {
    let config = Config::from_yaml("{}").unwrap();
    assert_eq!(config.refresh_secs, 60);
    assert_eq!(config.status_tick_secs, 15);
    assert!(config.cache.enabled);
    assert_eq!(config.cache_ttl().unwrap(), chrono::Duration::hours(6));
    assert_eq!(config.source.url.as_str(), DEFAULT_SHEET_URL);
  }

  #[test]
  fn test_full_yaml() {
    let yaml = r#"
source:
  url: http://localhost:8080/menu.csv
  timeout_secs: 5
title: Cafe
refresh_secs: 30
cache:
  enabled: false
  ttl_hours: 1
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.source.url.as_str(), "http://localhost:8080/menu.csv");
    assert_eq!(config.source.timeout_secs, 5);
    assert_eq!(config.display_title(), "Cafe");
    assert_eq!(config.refresh_interval(), Duration::from_secs(30));
    assert_eq!(config.status_tick_interval(), Duration::from_secs(15));
    assert!(!config.cache.enabled);
  }

  #[test]
  fn test_rejects_zero_interval() {
    assert!(Config::from_yaml("refresh_secs: 0").is_err());
  }

  #[test]
  fn test_rejects_huge_ttl() {
    assert!(Config::from_yaml("cache:\n  ttl_hours: 10000000000000").is_err());
    assert!(Config::from_yaml("cache:\n  ttl_hours: 18446744073709551615").is_err());

    let config = Config::from_yaml("cache:\n  ttl_hours: 8760").unwrap();
    assert_eq!(config.cache_ttl().unwrap(), chrono::Duration::hours(8760));
  }

  #[test]
  fn test_cache_ttl_never_wraps() {
    let mut config = Config::default();
    config.cache.ttl_hours = u64::MAX;
    assert!(config.cache_ttl().is_err());
  }

  #[test]
  fn test_rejects_huge_intervals() {
    assert!(Config::from_yaml("refresh_secs: 18446744073709551615").is_err());
    assert!(Config::from_yaml("status_tick_secs: 86401").is_err());
    assert!(Config::from_yaml("source:\n  timeout_secs: 0").is_err());
    assert!(Config::from_yaml("refresh_secs: 86400").is_ok());
  }

  #[test]
  fn test_validate_after_override() {
    let mut config = Config::default();
    config.refresh_secs = MAX_INTERVAL_SECS + 1;
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_rejects_invalid_url() {
    assert!(Config::from_yaml("source:\n  url: not a url").is_err());
  }

  #[test]
  fn test_display_title_defaults_to_host() {
    assert_eq!(Config::default().display_title(), "docs.google.com");
  }

  #[test]
  fn test_missing_explicit_path_is_error() {
    assert!(Config::load(Some(Path::new("/nonexistent/sheetboard.yaml"))).is_err());
  }
}
