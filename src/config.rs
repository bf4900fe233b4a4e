use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for the Maduve client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MaduveConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Query cache settings
    pub cache: CacheConfig,
    /// Profile image handling
    pub images: ImageConfig,
    /// Where the login session is persisted
    pub session: SessionConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Path segment for connect-request routes. Backend revisions disagree
    /// (`ConnectRequest` vs `connect-requests`), so it is configurable.
    pub connect_requests_path: String,
    /// Path segment for numbered profile-image routes
    pub profile_images_path: String,
    /// Request timeout; unset keeps the transport default
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// How long a cached query stays fresh without an invalidation
    pub ttl_seconds: u64,
    /// Maximum number of cached queries
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    /// Wait after an upload before the image listing is refetched
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Session file path
    pub file_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for MaduveConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000/api".to_string(),
                connect_requests_path: "ConnectRequest".to_string(),
                profile_images_path: "profile-image".to_string(),
                timeout_seconds: None,
            },
            cache: CacheConfig {
                ttl_seconds: 300, // 5 minutes
                max_capacity: 1000,
            },
            images: ImageConfig {
                settle_delay_ms: 1500,
            },
            session: SessionConfig {
                file_path: ".maduve/session.json".to_string(),
            },
            observability: ObservabilityConfig {
                log_level: "warn".to_string(),
                json_logs: false,
            },
        }
    }
}

impl ImageConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl SessionConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.file_path)
    }
}

impl MaduveConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (maduve.toml, .maduve-rc)
    /// 3. Environment variables (MADUVE_ prefix, `__` between sections)
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&MaduveConfig::default())?);

        let toml_file = dir.join("maduve.toml");
        if toml_file.exists() {
            builder = builder.add_source(File::from(toml_file));
        }

        let rc_file = dir.join(".maduve-rc");
        if rc_file.exists() {
            builder = builder.add_source(File::from(rc_file).format(config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("MADUVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let maduve_config: MaduveConfig = config.try_deserialize()?;
        Ok(maduve_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load `.env` from the working directory if it exists. Returns whether
    /// a file was loaded; runs before logging is set up, so callers log it.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(".")
    }

    pub fn load_env_file_from<P: AsRef<Path>>(dir: P) -> Result<bool> {
        let path = dir.as_ref().join(".env");
        if !path.exists() {
            return Ok(false);
        }
        dotenvy::from_path(&path)?;
        Ok(true)
    }
}
