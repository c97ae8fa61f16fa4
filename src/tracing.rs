//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! overlay lifecycle and stacking issues.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=registry=debug,message=debug` - scoped filtering
//! - `RUST_LOG=overlay_engine::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/overlay-engine/logs/overlay-engine.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{EngineModel, OverlayId, Visibility};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var and goes to stderr so it never
/// mixes with trace output on stdout.
///
/// File logging writes to `~/.config/overlay-engine/logs/overlay-engine.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "overlay-engine.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of overlay and registry state for diffing
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub overlays: Vec<OverlayInfo>,
    /// Open overlays, bottom of the stack first
    pub stack: Vec<OverlayId>,
    pub scroll_locks: usize,
}

#[derive(Debug, Clone)]
pub struct OverlayInfo {
    pub id: OverlayId,
    pub visibility: Visibility,
}

impl RegistrySnapshot {
    pub fn from_model(model: &EngineModel) -> Self {
        Self {
            overlays: model
                .overlays
                .values()
                .map(|o| OverlayInfo {
                    id: o.id,
                    visibility: o.visibility,
                })
                .collect(),
            stack: model.open_overlays(),
            scroll_locks: model.registry.scroll_lock_count(),
        }
    }

    fn visibility_of(&self, id: OverlayId) -> Visibility {
        self.overlays
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.visibility)
            .unwrap_or(Visibility::Closed)
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &RegistrySnapshot) -> Option<String> {
        let mut changes = Vec::new();

        let mut ids: Vec<OverlayId> = self
            .overlays
            .iter()
            .chain(&other.overlays)
            .map(|o| o.id)
            .collect();
        ids.sort();
        ids.dedup();

        for id in ids {
            let before = self.visibility_of(id);
            let after = other.visibility_of(id);
            if before != after {
                changes.push(format!("#{}: {:?} → {:?}", id.0, before, after));
            }
        }

        if self.stack != other.stack {
            let stack: Vec<String> = other.stack.iter().map(|id| id.0.to_string()).collect();
            changes.push(format!("stack: [{}]", stack.join(", ")));
        }

        if self.scroll_locks != other.scroll_locks {
            changes.push(format!(
                "scroll locks: {} → {}",
                self.scroll_locks, other.scroll_locks
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
