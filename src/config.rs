//! Configuration loader and validator for the portfolio content server.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub server: Server,
    pub cache: Cache,
    pub notion: Notion,
    #[serde(default)]
    pub revalidate: Revalidate,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub bind_addr: String,
    /// Shared secret for the admin routes (`/api/cron`, `/api/notion/sync`).
    #[serde(default)]
    pub admin_secret: Option<String>,
    /// Admin routes reject every caller when no secret is configured,
    /// unless this explicit opt-in is set.
    #[serde(default)]
    pub allow_open_admin: bool,
}

/// Cache store settings. The blob block switches the backend from the
/// local filesystem to remote object storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cache {
    #[serde(default)]
    pub dir: String,
    #[serde(default)]
    pub blob: Option<Blob>,
}

/// Remote object-storage backend for the cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Blob {
    pub base_url: String,
    pub token: String,
    #[serde(default = "default_blob_prefix")]
    pub prefix: String,
}

fn default_blob_prefix() -> String {
    "cache".to_string()
}

/// Notion API settings and database mappings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notion {
    pub token: String,
    pub version: String,
    pub databases: Databases,
}

/// Per-entity database ids. Each one is optional: a missing id degrades
/// that entity to an empty result instead of failing startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Databases {
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub movies: Option<String>,
    #[serde(default)]
    pub books: Option<String>,
    #[serde(default)]
    pub settings: Option<String>,
}

/// Static-page regeneration hook.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Revalidate {
    #[serde(default)]
    pub hook_url: Option<String>,
}

impl Config {
    /// Ensure required directories exist (creates `cache.dir` if missing
    /// and the filesystem backend is in use).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.cache.blob.is_some() || self.cache.dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.cache.dir)
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.server.bind_addr.trim().is_empty() {
        return Err(ConfigError::Invalid("server.bind_addr must be non-empty"));
    }

    if cfg.notion.token.trim().is_empty() {
        return Err(ConfigError::Invalid("notion.token must be non-empty"));
    }
    if cfg.notion.version.trim().is_empty() {
        return Err(ConfigError::Invalid("notion.version must be non-empty"));
    }

    match &cfg.cache.blob {
        Some(blob) => {
            if blob.base_url.trim().is_empty() {
                return Err(ConfigError::Invalid("cache.blob.base_url must be non-empty"));
            }
            if blob.token.trim().is_empty() {
                return Err(ConfigError::Invalid("cache.blob.token must be non-empty"));
            }
        }
        None => {
            if cfg.cache.dir.trim().is_empty() {
                return Err(ConfigError::Invalid("cache.dir must be non-empty"));
            }
        }
    }

    if let Some(secret) = &cfg.server.admin_secret {
        if secret.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "server.admin_secret must be non-empty when set",
            ));
        }
    }

    Ok(())
}

/// Returns a canonical example YAML configuration.
pub fn example() -> &'static str {
    r#"server:
  bind_addr: "0.0.0.0:3000"
  admin_secret: "CHANGE_ME"
  allow_open_admin: false

cache:
  dir: "./.cache"

notion:
  token: "YOUR_NOTION_INTEGRATION_TOKEN"
  version: "2022-06-28"

  databases:
    profile: "NOTION_PROFILE_DATABASE_ID"
    blog: "NOTION_BLOG_DATABASE_ID"
    movies: "NOTION_MOVIES_DATABASE_ID"
    books: "NOTION_BOOKS_DATABASE_ID"
    settings: "NOTION_SETTINGS_DATABASE_ID"

revalidate:
  hook_url: ""
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.notion.version, "2022-06-28");
        assert!(cfg.cache.blob.is_none());
    }

    #[test]
    fn invalid_notion_token() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.notion.token = "".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("notion.token")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn missing_database_ids_are_allowed() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.notion.databases = Databases::default();
        validate(&cfg).unwrap();
    }

    #[test]
    fn blob_backend_requires_credentials() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.cache.blob = Some(Blob {
            base_url: "".into(),
            token: "tok".into(),
            prefix: "cache".into(),
        });
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("base_url")),
            _ => panic!("wrong error"),
        }

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.cache.blob = Some(Blob {
            base_url: "https://blob.example".into(),
            token: "".into(),
            prefix: "cache".into(),
        });
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn blob_backend_ignores_empty_dir() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.cache.dir = "".into();
        cfg.cache.blob = Some(Blob {
            base_url: "https://blob.example".into(),
            token: "tok".into(),
            prefix: "cache".into(),
        });
        validate(&cfg).unwrap();
    }

    #[test]
    fn empty_admin_secret_rejected() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.server.admin_secret = Some("  ".into());
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn ensure_dirs_creates_cache_dir() {
        let td = tempdir().unwrap();
        let cache_path = td.path().join("cache");
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.cache.dir = cache_path.to_string_lossy().to_string();
        cfg.ensure_dirs().unwrap();
        assert!(cache_path.exists());
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        let mut f = fs::File::create(&p).unwrap();
        f.write_all(example().as_bytes()).unwrap();
        let cfg = load(Some(p.as_path())).unwrap();
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:3000");
        assert_eq!(
            cfg.notion.databases.blog.as_deref(),
            Some("NOTION_BLOG_DATABASE_ID")
        );
    }
}
