//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Colour assigned to new measurements until the user picks another (packed 0xRRGGBB)
pub const DEFAULT_MEASUREMENT_COLOR: u32 = 0xe36209;

/// Maximum number of undo snapshots kept; the oldest is evicted first
pub const MAX_UNDO_DEPTH: usize = 50;

/// Control-point hit tolerance in screen pixels
pub const DEFAULT_HIT_RADIUS: f32 = 10.0;

/// Two primary presses closer than this in time form a double-click
pub const DOUBLE_CLICK_SECONDS: f64 = 0.35;

/// Maximum screen-pixel distance between the two presses of a double-click
pub const DOUBLE_CLICK_DISTANCE: f32 = 4.0;

/// Orthographic scale limits for the image camera (zoom = 1 / scale)
pub const MIN_CAMERA_SCALE: f32 = 0.05;
pub const MAX_CAMERA_SCALE: f32 = 20.0;

/// Maximum number of recent images to remember in config
pub const MAX_RECENT_IMAGES: usize = 5;
