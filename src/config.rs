//! Engine configuration persistence
//!
//! Stores tunables in `~/.config/overlay-engine/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::{DEFAULT_GAP, DEFAULT_VIEWPORT_PADDING};

/// Default delay before a hovered tooltip opens
pub const DEFAULT_HOVER_DELAY_MS: u64 = 200;

/// Default drawer extent along the axis perpendicular to its edge
pub const DEFAULT_DRAWER_SIZE: f32 = 320.0;

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Delay before a hover-triggered overlay opens
    #[serde(default = "default_hover_delay_ms")]
    pub hover_delay_ms: u64,
    /// Gap between an anchored overlay and its anchor
    #[serde(default = "default_gap")]
    pub gap: f32,
    /// Minimum distance from the viewport edge
    #[serde(default = "default_viewport_padding")]
    pub viewport_padding: f32,
    /// Drawer size used when a drawer doesn't specify one
    #[serde(default = "default_drawer_size")]
    pub drawer_size: f32,
    /// Added to each overlay's z-rank to form its z-index style value
    #[serde(default = "default_z_index_base")]
    pub z_index_base: u64,
    /// Id of the shared portal container
    #[serde(default = "default_portal_root")]
    pub portal_root: String,
}

fn default_hover_delay_ms() -> u64 {
    DEFAULT_HOVER_DELAY_MS
}

fn default_gap() -> f32 {
    DEFAULT_GAP
}

fn default_viewport_padding() -> f32 {
    DEFAULT_VIEWPORT_PADDING
}

fn default_drawer_size() -> f32 {
    DEFAULT_DRAWER_SIZE
}

fn default_z_index_base() -> u64 {
    1000
}

fn default_portal_root() -> String {
    "overlay-root".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hover_delay_ms: default_hover_delay_ms(),
            gap: default_gap(),
            viewport_padding: default_viewport_padding(),
            drawer_size: default_drawer_size(),
            z_index_base: default_z_index_base(),
            portal_root: default_portal_root(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults if it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: EngineConfig = serde_yaml::from_str("hover_delay_ms: 350\n").unwrap();
        assert_eq!(config.hover_delay_ms, 350);
        assert_eq!(config.gap, DEFAULT_GAP);
        assert_eq!(config.portal_root, "overlay-root");
    }

    #[test]
    fn test_empty_mapping_is_default() {
        let config: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
