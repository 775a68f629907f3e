//! TOML configuration for the demo window.
//!
//! Loaded from the platform config directory; every field has a default so a
//! missing or partial file works. CLI flags override file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use winmesh_common::Rect;

use crate::cli::Args;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory backing the shared store. `None` means the platform data
    /// directory.
    pub store_dir: Option<PathBuf>,
    pub label: String,
    pub tick_ms: u64,
    pub drift: bool,
    /// Initial shape. `None` means a random spot is picked at startup.
    pub rect: Option<RectConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            label: "window".into(),
            tick_ms: 250,
            drift: false,
            rect: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RectConfig {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for RectConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl From<RectConfig> for Rect {
    fn from(config: RectConfig) -> Self {
        Rect::new(config.x, config.y, config.width, config.height)
    }
}

/// Effective settings after merging CLI flags over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_dir: PathBuf,
    pub label: String,
    pub tick_ms: u64,
    pub drift: bool,
    pub rect: Option<Rect>,
}

impl Settings {
    pub fn merge(args: &Args, config: AppConfig) -> Self {
        let rect = args
            .rect
            .as_deref()
            .and_then(|raw| {
                let parsed = parse_rect(raw);
                if parsed.is_none() {
                    warn!("ignoring malformed --rect {raw:?}, expected x,y,w,h");
                }
                parsed
            })
            .or_else(|| config.rect.map(Rect::from));

        Self {
            store_dir: args
                .store_dir
                .clone()
                .or(config.store_dir)
                .unwrap_or_else(default_store_dir),
            label: args.label.clone().unwrap_or(config.label),
            // A zero tick period panics the interval timer.
            tick_ms: args.tick_ms.unwrap_or(config.tick_ms).max(1),
            drift: args.drift || config.drift,
            rect,
        }
    }
}

/// `<config dir>/winmesh/winmesh.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("winmesh").join("winmesh.toml"))
}

/// `<data dir>/winmesh/store`, the directory every local window agrees on.
pub fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("winmesh")
        .join("store")
}

/// Load the config file. A missing file is not an error; a malformed one
/// logs a warning. Both fall back to defaults.
pub fn load(override_path: Option<&Path>) -> AppConfig {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return AppConfig::default(),
        },
    };
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return AppConfig::default(),
    };
    match toml::from_str(&content) {
        Ok(config) => {
            info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("failed to parse {}, using defaults: {e}", path.display());
            AppConfig::default()
        }
    }
}

/// Parse `x,y,w,h` into a rect.
pub fn parse_rect(raw: &str) -> Option<Rect> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse().ok())
        .collect::<Option<Vec<f64>>>()?;
    if parts.len() != 4 {
        return None;
    }
    Some(Rect::new(parts[0], parts[1], parts[2], parts[3]))
}
