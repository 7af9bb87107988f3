//! Notification and error windows.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{AppConfig, ConfigResetNotification, MissingImageWarning, SaveConfigRequest};
use crate::surface::SurfaceState;

/// Error from reading or writing a measurement file
#[derive(Resource, Default)]
pub struct FileErrorDialog {
    pub title: String,
    pub message: Option<String>,
}

impl FileErrorDialog {
    pub fn show(&mut self, title: &str, message: String) {
        self.title = title.to_string();
        self.message = Some(message);
    }
}

fn error_window(ctx: &egui::Context, title: &str, message: &str) -> bool {
    let mut dismissed = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.colored_label(egui::Color32::from_rgb(255, 100, 100), message);
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    dismissed
}

pub fn image_load_error_ui(mut contexts: EguiContexts, mut surface: ResMut<SurfaceState>) -> Result {
    let Some(message) = surface.load_error.clone() else {
        return Ok(());
    };
    if error_window(contexts.ctx_mut()?, "Image Load Error", &message) {
        surface.load_error = None;
    }
    Ok(())
}

pub fn file_error_dialog_ui(mut contexts: EguiContexts, mut dialog: ResMut<FileErrorDialog>) -> Result {
    let Some(message) = dialog.message.clone() else {
        return Ok(());
    };
    let title = if dialog.title.is_empty() {
        "File Error".to_string()
    } else {
        dialog.title.clone()
    };
    if error_window(contexts.ctx_mut()?, &title, &message) {
        dialog.message = None;
    }
    Ok(())
}

/// Shown at startup when the previous image no longer exists
pub fn missing_image_warning_ui(
    mut contexts: EguiContexts,
    mut warning: ResMut<MissingImageWarning>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !warning.show {
        return Ok(());
    }

    egui::Window::new("Image Not Found")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("The last opened image no longer exists:");

            if let Some(ref path) = warning.path {
                ui.add_space(5.0);
                let path_str = path.to_string_lossy();
                ui.label(egui::RichText::new(path_str.as_ref()).weak());
                ui.add_space(10.0);
            }

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    warning.show = false;
                }

                if ui.button("Clear from history").clicked() {
                    if let Some(ref path) = warning.path {
                        config.data.recent_images.retain(|p| p != path);
                    }
                    config.data.last_image_path = None;
                    config.dirty = true;
                    save_events.write(SaveConfigRequest);
                    warning.show = false;
                }
            });
        });

    Ok(())
}

/// Tells the user their settings file could not be used
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(ref reason) = notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_show() {
        let mut dialog = FileErrorDialog::default();
        assert!(dialog.message.is_none());
        dialog.show("Export Failed", "disk full".to_string());
        assert_eq!(dialog.title, "Export Failed");
        assert_eq!(dialog.message.as_deref(), Some("disk full"));
    }
}
