//! Measurement engine and its bevy adapters.
//!
//! The engine is plain data and runs headless:
//! - [`geometry`] and [`render`]: per-kind formulas, paint commands, labels
//! - [`store`]: primitives, selection, undo/redo snapshots
//! - [`hit_test`] and [`interaction`]: control-point search and the pointer
//!   state machine
//!
//! The remaining modules wire it into the app: input translation
//! ([`systems`]), gizmo and egui drawing ([`rendering`]).

pub mod conditions;
pub mod geometry;
mod gizmo;
pub mod history;
pub mod interaction;
pub mod kind;
pub mod primitive;
pub mod render;
mod rendering;
pub mod snapshot;
pub mod store;
mod systems;

pub use interaction::{InteractionState, KeyCommand, MeasureMode};
pub use kind::PrimitiveKind;
pub use primitive::{PrimitiveId, Rgb};
pub use store::MeasurementStore;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::ConfigLoaded;

use conditions::{mode_is, no_dialog_open};

pub struct MeasurePlugin;

impl Plugin for MeasurePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeasurementStore>()
            .init_resource::<InteractionState>()
            .init_resource::<systems::ClickTracker>()
            .init_gizmo_group::<gizmo::MeasureGizmoGroup>()
            .add_systems(Startup, gizmo::configure_measure_gizmos)
            .add_systems(
                Startup,
                systems::apply_config_to_measure.after(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    systems::handle_measure_shortcuts,
                    systems::handle_pointer_input,
                )
                    .chain()
                    .run_if(no_dialog_open),
            )
            .add_systems(
                Update,
                (
                    rendering::draw_measurements,
                    rendering::draw_hover_highlight.run_if(mode_is(MeasureMode::Select)),
                )
                    .after(systems::handle_pointer_input),
            )
            .add_systems(EguiPrimaryContextPass, rendering::draw_measurement_labels);
    }
}
