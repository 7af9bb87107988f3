use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{egui, EguiContexts};
use futures_lite::future;
use std::path::PathBuf;

use crate::config::{AppConfig, SetDefaultColorRequest};
use crate::measure::{InteractionState, MeasureMode, MeasurementStore, Rgb};
use crate::surface::{
    CameraZoom, FitToImageRequest, ImageSurface, OpenImageRequest, SurfaceCamera, SurfaceState,
};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp", "gif"];

#[derive(Resource, Default)]
pub struct ToolbarState {
    /// Pending async file dialog for opening an image
    pub pending_open: Option<Task<Option<PathBuf>>>,
}

/// Short toolbar label: the mode name without its shortcut suffix
fn mode_button_label(mode: &MeasureMode) -> &'static str {
    let name = mode.display_name();
    name.split(" (").next().unwrap_or(name)
}

/// Clicking the active mode toggles back to no mode
fn toggled_mode(current: MeasureMode, clicked: MeasureMode) -> MeasureMode {
    if current == clicked {
        MeasureMode::None
    } else {
        clicked
    }
}

/// What the pointer is doing right now, if anything
fn status_hint(state: &InteractionState) -> Option<&'static str> {
    if let Some(drag) = state.drag() {
        Some(if drag.moved {
            "Moving point (right-click to cancel)"
        } else {
            "Point grabbed"
        })
    } else if state.is_drawing() {
        Some("Release to finish")
    } else {
        None
    }
}

fn shorten_path(path: &std::path::Path) -> String {
    let path_str = path.to_string_lossy();
    if path_str.chars().count() > 50 {
        let tail: String = path_str
            .chars()
            .rev()
            .take(47)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    } else {
        path_str.to_string()
    }
}

/// Main toolbar: image controls, measure modes and colour
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut toolbar: ResMut<ToolbarState>,
    mut state: ResMut<InteractionState>,
    mut store: ResMut<MeasurementStore>,
    config: Res<AppConfig>,
    surface_state: Res<SurfaceState>,
    surfaces: Query<&ImageSurface>,
    zoom: Query<&CameraZoom, With<SurfaceCamera>>,
    mut open_events: MessageWriter<OpenImageRequest>,
    mut fit_events: MessageWriter<FitToImageRequest>,
    mut color_events: MessageWriter<SetDefaultColorRequest>,
) -> Result {
    let mut new_mode = None;
    let mut new_color = None;
    let mut browse = false;

    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                ui.add_enabled_ui(toolbar.pending_open.is_none(), |ui| {
                    if ui.button("Open Image…").clicked() {
                        browse = true;
                    }
                });

                ui.menu_button("Recent", |ui| {
                    if config.data.recent_images.is_empty() {
                        ui.weak("No recent images");
                    }
                    for path in &config.data.recent_images {
                        if ui
                            .button(shorten_path(path))
                            .on_hover_text(path.to_string_lossy())
                            .clicked()
                        {
                            open_events.write(OpenImageRequest { path: path.clone() });
                            ui.close();
                        }
                    }
                });

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Mode buttons with keyboard shortcuts
                let surface_ready = store.has_surface();
                for mode in MeasureMode::all() {
                    let selected = state.mode() == *mode;
                    let button = egui::Button::new(
                        egui::RichText::new(mode_button_label(mode)).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    let response = ui.add_enabled(surface_ready, button);
                    if response.clicked() {
                        new_mode = Some(toggled_mode(state.mode(), *mode));
                    }
                    response.on_hover_text(mode.display_name());
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                ui.label("Color:");
                let mut rgb = store.default_color().channels();
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    new_color = Some(Rgb::from_channels(rgb));
                }

                if let Some(hint) = status_hint(&state) {
                    ui.add_space(8.0);
                    ui.weak(hint);
                }

                // Right-aligned image info
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Ok(surface) = surfaces.single() {
                        if ui.button("Fit").clicked() {
                            fit_events.write(FitToImageRequest);
                        }
                        if let Ok(zoom) = zoom.single() {
                            ui.label(format!("{:.0}%", zoom.zoom() * 100.0));
                        }
                        ui.weak(format!(
                            "{} ({}×{})",
                            surface.file_name(),
                            surface.size.x,
                            surface.size.y
                        ));
                    } else if let Some(path) = surface_state.pending_path() {
                        ui.spinner();
                        ui.weak(format!("Loading {}…", shorten_path(path)));
                    } else {
                        ui.weak("Open an image to start measuring");
                    }
                });
            });
        });

    if let Some(mode) = new_mode {
        state.set_mode(mode, &mut store);
    }

    if let Some(color) = new_color {
        store.set_default_color(color);
        color_events.write(SetDefaultColorRequest { color: color.0 });
    }

    if browse && toolbar.pending_open.is_none() {
        let task_pool = AsyncComputeTaskPool::get();
        toolbar.pending_open = Some(task_pool.spawn(async {
            rfd::AsyncFileDialog::new()
                .set_title("Open Image")
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        }));
    }

    Ok(())
}

/// Polls the open-image dialog and forwards the chosen path
pub fn poll_open_image_dialog(
    mut toolbar: ResMut<ToolbarState>,
    mut open_events: MessageWriter<OpenImageRequest>,
) {
    let Some(task) = toolbar.pending_open.as_mut() else {
        return;
    };
    let Some(result) = future::block_on(future::poll_once(task)) else {
        return;
    };
    toolbar.pending_open = None;
    if let Some(path) = result {
        open_events.write(OpenImageRequest { path });
    }
}
