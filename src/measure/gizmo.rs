//! Custom gizmo group for measurement overlays.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

/// Custom gizmo group for measurement shapes and the hover highlight
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct MeasureGizmoGroup;

/// Measurement strokes keep a constant on-screen width at every zoom level
pub fn configure_measure_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<MeasureGizmoGroup>();
    config.line.width = 2.0;
    // draw over the image sprite regardless of depth
    config.depth_bias = -1.0;
}
