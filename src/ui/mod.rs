mod dialogs;
mod export;
mod help;
mod measurement_list;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{ConfigResetNotification, MissingImageWarning};
use crate::surface::SurfaceState;

/// Resource that tracks whether any modal dialog is currently open.
/// Measurement input handlers check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block image input
    pub any_modal_open: bool,
}

/// Resource to track whether the help window is open.
#[derive(Resource, Default)]
pub struct HelpWindowState {
    pub is_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
#[allow(clippy::too_many_arguments)]
fn update_dialog_state(
    help: Res<HelpWindowState>,
    export_window: Res<export::ExportWindowState>,
    file_tasks: Res<export::MeasurementFileTasks>,
    file_error: Res<dialogs::FileErrorDialog>,
    toolbar: Res<toolbar::ToolbarState>,
    missing_image: Res<MissingImageWarning>,
    config_reset: Res<ConfigResetNotification>,
    surface: Res<SurfaceState>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = help.is_open
        || export_window.is_open
        || file_tasks.is_busy()
        || file_error.message.is_some()
        || toolbar.pending_open.is_some()
        || missing_image.show
        || config_reset.show
        || surface.load_error.is_some();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<HelpWindowState>()
            .init_resource::<toolbar::ToolbarState>()
            .init_resource::<measurement_list::MeasurementListState>()
            .init_resource::<export::ExportWindowState>()
            .init_resource::<export::MeasurementFileTasks>()
            .init_resource::<dialogs::FileErrorDialog>()
            .add_systems(
                Update,
                (
                    toolbar::poll_open_image_dialog,
                    export::poll_measurement_file_tasks,
                    help::handle_help_shortcut,
                ),
            )
            // Side panel renders first so the top panel fits beside it
            .add_systems(
                EguiPrimaryContextPass,
                (measurement_list::measurement_list_ui, toolbar::toolbar_ui).chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    export::export_window_ui,
                    help::help_popup_ui,
                    dialogs::missing_image_warning_ui,
                    dialogs::config_reset_notification_ui,
                    dialogs::image_load_error_ui,
                    dialogs::file_error_dialog_ui,
                )
                    .after(toolbar::toolbar_ui),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
