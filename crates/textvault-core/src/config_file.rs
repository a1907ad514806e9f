use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 16;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub storage: Option<StorageConfig>,
    pub fetch: Option<FetchConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub max_upload_mb: Option<u64>,
}

/// Platform config directory path: `<config_dir>/textvault/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("textvault").join("config.toml"))
}

/// Load config by cascading CWD `.textvault.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".textvault.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let storage = |c: &ConfigFile| c.storage.clone().unwrap_or_default();
    let fetch = |c: &ConfigFile| c.fetch.clone().unwrap_or_default();
    let server = |c: &ConfigFile| c.server.clone().unwrap_or_default();

    let (bs, os) = (storage(&base), storage(&overlay));
    let (bf, of) = (fetch(&base), fetch(&overlay));
    let (bv, ov) = (server(&base), server(&overlay));

    ConfigFile {
        storage: Some(StorageConfig {
            database_path: os.database_path.or(bs.database_path),
        }),
        fetch: Some(FetchConfig {
            timeout_secs: of.timeout_secs.or(bf.timeout_secs),
            user_agent: of.user_agent.or(bf.user_agent),
        }),
        server: Some(ServerConfig {
            bind: ov.bind.or(bv.bind),
            max_upload_mb: ov.max_upload_mb.or(bv.max_upload_mb),
        }),
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub bind: String,
    pub fetch_timeout: Duration,
    pub max_upload_bytes: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            bind: DEFAULT_BIND.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_upload_bytes: (DEFAULT_MAX_UPLOAD_MB * 1024 * 1024) as usize,
            user_agent: concat!("textvault/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `<data_dir>/textvault/textvault.db`, or `textvault.db` in the CWD when the
/// platform has no data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("textvault").join("textvault.db"))
        .unwrap_or_else(|| PathBuf::from("textvault.db"))
}

impl Config {
    /// Defaults overlaid with the file config.
    pub fn from_file(file: &ConfigFile) -> Self {
        let mut config = Config::default();
        if let Some(path) = file.storage.as_ref().and_then(|s| s.database_path.as_ref()) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(fetch) = &file.fetch {
            if let Some(secs) = fetch.timeout_secs {
                config.fetch_timeout = Duration::from_secs(secs);
            }
            if let Some(ua) = &fetch.user_agent {
                config.user_agent = ua.clone();
            }
        }
        if let Some(server) = &file.server {
            if let Some(bind) = &server.bind {
                config.bind = bind.clone();
            }
            if let Some(bytes) = server
                .max_upload_mb
                .and_then(|mb| megabytes_to_bytes(mb, "server.max_upload_mb"))
            {
                config.max_upload_bytes = bytes;
            }
        }
        config
    }

    /// Apply `TEXTVAULT_*` overrides read through `lookup`.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("TEXTVAULT_DB") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(bind) = lookup("TEXTVAULT_BIND") {
            self.bind = bind;
        }
        if let Some(ua) = lookup("TEXTVAULT_USER_AGENT") {
            self.user_agent = ua;
        }
        if let Some(secs) = parse_env(&lookup, "TEXTVAULT_FETCH_TIMEOUT") {
            self.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = parse_env(&lookup, "TEXTVAULT_MAX_UPLOAD_MB")
            .and_then(|mb| megabytes_to_bytes(mb, "TEXTVAULT_MAX_UPLOAD_MB"))
        {
            self.max_upload_bytes = bytes;
        }
        self
    }

    /// Config files, then the process environment.
    pub fn load() -> Self {
        Config::from_file(&load_config()).apply_env(|key| std::env::var(key).ok())
    }
}

/// `None` (with a warning) when the byte count does not fit in `usize`.
fn megabytes_to_bytes(mb: u64, key: &str) -> Option<usize> {
    let bytes = mb
        .checked_mul(1024 * 1024)
        .and_then(|b| usize::try_from(b).ok());
    if bytes.is_none() {
        tracing::warn!(key, value = mb, "ignoring out-of-range upload limit");
    }
    bytes
}

fn parse_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric environment value");
            None
        }
    }
}
