use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::catalog::{Catalog, CatalogLoadError};
use crate::demo::demo_catalog;
use crate::verifier::Variant;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "CAMPUSGATE_CONFIG";

pub const DEFAULT_LOG_FILTER: &str = "campusgate=info";

#[derive(Debug, Default, Deserialize)]
pub struct GateConfig {
    pub assets: Option<AssetsConfig>,
    pub session: Option<SessionConfig>,
    pub log: Option<LogConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetsConfig {
    pub target_dir: Option<String>,
    pub decoy_dir: Option<String>,
    pub manifest: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionConfig {
    pub timed: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    pub filter: Option<String>,
}

/// Replaces `${VAR}` with the variable's value, or nothing when it is unset.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };

        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + len];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 3 + len..];
    }

    out.push_str(rest);
    out
}

impl GateConfig {
    /// Loads from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing file yields `None`; unreadable or malformed files are logged and also
    /// yield `None`.
    pub fn load(path: Option<&Path>) -> Option<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => config_path()?,
        };

        if !path.exists() {
            tracing::debug!("no config at {:?}", path);
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return None;
            }
        };

        Self::parse(&content).or_else(|| {
            tracing::warn!("Failed to parse config at {:?}", path);
            None
        })
    }

    pub fn parse(content: &str) -> Option<Self> {
        match toml::from_str(content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::debug!("config parse error: {}", err);
                None
            }
        }
    }

    pub fn variant(&self) -> Variant {
        match self.session.as_ref().and_then(|session| session.timed) {
            Some(false) => Variant::Untimed,
            _ => Variant::Timed,
        }
    }

    pub fn log_filter(&self) -> String {
        self.log
            .as_ref()
            .and_then(|log| log.filter.clone())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }

    /// Catalog named by `[assets]`: the manifest wins over directories, and the demo
    /// catalog is used when neither is configured.
    pub fn catalog(&self) -> Result<Catalog, CatalogLoadError> {
        let assets = self.assets.as_ref();

        if let Some(manifest) = assets.and_then(|assets| assets.manifest.as_deref()) {
            return Catalog::from_manifest_file(expand_env_vars(manifest));
        }

        match assets.map(|assets| (assets.target_dir.as_deref(), assets.decoy_dir.as_deref())) {
            Some((Some(target_dir), Some(decoy_dir))) => Catalog::from_directories(
                expand_env_vars(target_dir),
                expand_env_vars(decoy_dir),
            ),
            Some((Some(_), None)) | Some((None, Some(_))) => {
                tracing::warn!("both target_dir and decoy_dir are needed; using demo catalog");
                Ok(demo_catalog())
            }
            _ => Ok(demo_catalog()),
        }
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::home_dir().map(|home| home.join(".campusgate").join("config.toml"))
}
