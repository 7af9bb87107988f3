//! Help window listing the measuring modes and shortcuts.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::measure::MeasureMode;

use super::HelpWindowState;

/// Usage hint shown next to each mode
fn mode_usage(mode: MeasureMode) -> &'static str {
    match mode {
        MeasureMode::Select => "Drag control points, hover to highlight",
        MeasureMode::Point => "Click to mark a pixel coordinate",
        MeasureMode::Line => "Drag from start to end",
        MeasureMode::Polyline => "Click vertices, double-click or right-click to finish",
        MeasureMode::Angle => "Click the first arm, the vertex, then the second arm",
        MeasureMode::Circle => "Drag from centre outwards",
        MeasureMode::Rect => "Drag corner to corner",
        MeasureMode::Ellipse => "Drag corner to corner of the bounding box",
        MeasureMode::Polygon => "Click vertices, double-click or right-click to close",
        MeasureMode::None => "",
    }
}

/// Shortcut key parsed from the mode's display name, e.g. "L" from "Line (L)"
fn mode_key(mode: MeasureMode) -> &'static str {
    let name = mode.display_name();
    name.rsplit_once('(')
        .and_then(|(_, rest)| rest.strip_suffix(')'))
        .unwrap_or("")
}

pub fn help_popup_ui(mut contexts: EguiContexts, mut help_state: ResMut<HelpWindowState>) -> Result {
    if !help_state.is_open {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Help")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(420.0)
        .max_height(700.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Scopemark - Image Measurement");

                ui.horizontal(|ui| {
                    ui.label("Version:");
                    ui.strong(env!("CARGO_PKG_VERSION"));
                });

                ui.separator();

                render_modes_section(ui);

                ui.add_space(10.0);
                ui.separator();

                render_editing_section(ui);

                ui.add_space(10.0);
                ui.separator();

                render_camera_section(ui);

                ui.add_space(10.0);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    if ui.button("Close").clicked() {
                        help_state.is_open = false;
                    }
                });
            });
        });

    // Close on Escape key
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        help_state.is_open = false;
    }

    Ok(())
}

fn render_modes_section(ui: &mut egui::Ui) {
    ui.heading("Modes");
    egui::Grid::new("modes_grid")
        .num_columns(2)
        .spacing([20.0, 4.0])
        .show(ui, |ui| {
            for mode in MeasureMode::all() {
                ui.strong(mode_key(*mode));
                ui.label(format!(
                    "{} - {}",
                    mode.display_name().split(" (").next().unwrap_or_default(),
                    mode_usage(*mode)
                ));
                ui.end_row();
            }

            ui.strong("Click active mode");
            ui.label("Leave the mode");
            ui.end_row();
        });
}

fn render_editing_section(ui: &mut egui::Ui) {
    ui.heading("Editing");
    egui::Grid::new("editing_grid")
        .num_columns(2)
        .spacing([20.0, 4.0])
        .show(ui, |ui| {
            ui.strong("Ctrl+Z");
            ui.label("Undo");
            ui.end_row();

            ui.strong("Ctrl+Shift+Z / Ctrl+Y");
            ui.label("Redo");
            ui.end_row();

            ui.strong("Escape");
            ui.label("Cancel the current shape and leave the mode");
            ui.end_row();

            ui.strong("Delete / Backspace");
            ui.label("Delete the selected measurement");
            ui.end_row();

            ui.strong("Right-click");
            ui.label("Cancel a point drag (Select)");
            ui.end_row();

            ui.strong("H");
            ui.label("Toggle this window");
            ui.end_row();
        });
}

fn render_camera_section(ui: &mut egui::Ui) {
    ui.heading("Camera");
    egui::Grid::new("camera_grid")
        .num_columns(2)
        .spacing([20.0, 4.0])
        .show(ui, |ui| {
            ui.strong("Middle mouse drag");
            ui.label("Pan");
            ui.end_row();

            ui.strong("Scroll wheel");
            ui.label("Zoom");
            ui.end_row();

            ui.strong("Fit button");
            ui.label("Fit the image to the window");
            ui.end_row();
        });
}

/// Toggles the help window with H
pub fn handle_help_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut help_state: ResMut<HelpWindowState>,
    mut contexts: EguiContexts,
) {
    // Don't toggle if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyH) {
        help_state.is_open = !help_state.is_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_keys() {
        assert_eq!(mode_key(MeasureMode::Line), "L");
        assert_eq!(mode_key(MeasureMode::Polyline), "O");
        assert_eq!(mode_key(MeasureMode::Select), "S");
        assert_eq!(mode_key(MeasureMode::None), "");
    }

    #[test]
    fn test_every_mode_has_usage() {
        for mode in MeasureMode::all() {
            assert!(!mode_usage(*mode).is_empty(), "{:?} has no usage hint", mode);
        }
    }
}
