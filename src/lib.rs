//! Overlay Engine - Elm-style floating overlay engine
//!
//! This crate provides the core types and logic for positioning, stacking
//! and tearing down floating overlays (tooltips, modals, drawers) on a
//! shared portal surface, implementing the Elm Architecture pattern.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod geometry;
pub mod messages;
pub mod model;
pub mod replay;
pub mod runtime;
pub mod surface;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::{Cmd, OverlayEvent};
pub use config::EngineConfig;
pub use geometry::{compute_position, Placement, Position, Rect, Size, Viewport};
pub use messages::{CloseReason, Key, Msg};
pub use model::{AnchorHandle, EngineModel, OverlayId, Visibility};
pub use runtime::{HeadlessHost, Host, LifecycleCallbacks, OverlayGuard, Runtime};
pub use surface::{Drawer, Modal, Tooltip};
