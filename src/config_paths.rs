//! Where the engine and the replay tool keep their files
//!
//! Everything lives in one per-user directory (`$XDG_CONFIG_HOME/overlay-engine`,
//! `~/.config/overlay-engine`, or `%APPDATA%\overlay-engine` on Windows):
//!
//! ```text
//! overlay-engine/
//!   config.yaml   engine defaults (hover delay, gap, z-index base, ...)
//!   logs/         daily debug logs
//!   scripts/      saved replay scenarios, found by bare name
//! ```

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

const APP_DIR: &str = "overlay-engine";

pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Saved replay scenarios
pub fn scripts_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("scripts"))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir().context("No config directory available")?;
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create log directory {}", logs.display()))?;
    Ok(logs)
}

/// Resolve a script argument for `overlay-replay`.
///
/// A path that exists as given wins. Otherwise a bare name is looked up in
/// [`scripts_dir`], with `.yaml` appended when it has no extension.
pub fn resolve_script(arg: &Path) -> PathBuf {
    resolve_script_in(arg, scripts_dir().as_deref())
}

fn resolve_script_in(arg: &Path, scripts: Option<&Path>) -> PathBuf {
    if arg.exists() || arg.is_absolute() || arg.components().count() > 1 {
        return arg.to_path_buf();
    }
    let Some(scripts) = scripts else {
        return arg.to_path_buf();
    };

    let mut candidate = scripts.join(arg);
    if candidate.extension().is_none() {
        candidate.set_extension("yaml");
    }
    if candidate.exists() {
        tracing::debug!("Resolved script {} to {}", arg.display(), candidate.display());
        candidate
    } else {
        arg.to_path_buf()
    }
}
