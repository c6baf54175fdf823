use anyhow::{Context as AnyhowContext, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_ENV: &str = "CRAG_CONFIG";
pub(crate) const DATA_ENV: &str = "CRAG_DATA";
pub(crate) const COMMENTS_ENV: &str = "CRAG_COMMENTS";

const DEFAULT_CONFIG_FILE: &str = "crag.toml";
const DEFAULT_DATA: &str = "data/catalog.json";
const DEFAULT_COMMENTS: &str = "data/comments.json";
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:7700";

/// `crag.toml` as written on disk. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    data: Option<PathBuf>,
    #[serde(default)]
    comments: Option<PathBuf>,
    #[serde(default)]
    server: Option<RawServer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawServer {
    #[serde(default)]
    bind: Option<String>,
}

/// Values passed on the command line; they win over env and file.
#[derive(Debug, Default, Clone)]
pub(crate) struct FlagOverrides {
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub comments: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub data: PathBuf,
    pub comments: PathBuf,
    pub bind: String,
    /// Config file that was read, if any.
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub(crate) fn load(flags: &FlagOverrides) -> Result<Self> {
        Self::resolve(flags, |key| std::env::var(key).ok())
    }

    /// Precedence: flags, then env, then the config file, then defaults.
    ///
    /// An explicitly named config file must exist; the default `crag.toml` is
    /// optional.
    pub(crate) fn resolve(
        flags: &FlagOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let explicit = flags
            .config
            .clone()
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        let (raw, config_path) = match explicit {
            Some(path) => (read_config(&path)?, Some(path)),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    (read_config(&path)?, Some(path))
                } else {
                    (RawConfig::default(), None)
                }
            }
        };
        let base = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let data = flags
            .data
            .clone()
            .or_else(|| env(DATA_ENV).map(PathBuf::from))
            .or_else(|| raw.data.map(|p| base.join(p)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA));
        let comments = flags
            .comments
            .clone()
            .or_else(|| env(COMMENTS_ENV).map(PathBuf::from))
            .or_else(|| raw.comments.map(|p| base.join(p)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMMENTS));
        let bind = raw
            .server
            .and_then(|server| server.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        Ok(Self {
            data,
            comments,
            bind,
            config_path,
        })
    }
}

fn read_config(path: &Path) -> Result<RawConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
}
