//! Export window plus async save/import of measurement JSON files.

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, IoTaskPool, Task};
use bevy_egui::{egui, EguiContexts};
use futures_lite::future;
use std::path::PathBuf;

use crate::measure::{InteractionState, MeasurementStore};
use crate::paths;

use super::dialogs::FileErrorDialog;

const DEFAULT_EXPORT_NAME: &str = "measurements.json";

#[derive(Resource, Default)]
pub struct ExportWindowState {
    pub is_open: bool,
    json: String,
    /// Store revision the cached JSON was produced from
    shown_revision: Option<u64>,
}

impl ExportWindowState {
    pub fn open(&mut self) {
        self.is_open = true;
        self.shown_revision = None;
    }

    /// Regenerate the JSON when the store changed since it was last shown
    fn refresh(&mut self, store: &MeasurementStore) {
        if self.shown_revision == Some(store.revision()) {
            return;
        }
        self.json = match store.export_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize measurements: {}", e);
                String::new()
            }
        };
        self.shown_revision = Some(store.revision());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Save,
    Import,
}

/// Result of a background file read or write
pub struct FileOutcome {
    pub operation: FileOperation,
    pub path: PathBuf,
    /// File contents for a successful import
    pub contents: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

/// Pending file dialogs and I/O for measurement files
#[derive(Resource, Default)]
pub struct MeasurementFileTasks {
    pending_save_dialog: Option<Task<Option<PathBuf>>>,
    pending_import_dialog: Option<Task<Option<PathBuf>>>,
    save_contents: String,
    io: Option<Task<FileOutcome>>,
}

impl MeasurementFileTasks {
    pub fn is_busy(&self) -> bool {
        self.pending_save_dialog.is_some()
            || self.pending_import_dialog.is_some()
            || self.io.is_some()
    }

    /// Ask for a destination, then write `contents` there
    pub fn request_save(&mut self, contents: String) {
        if self.is_busy() {
            return;
        }
        self.save_contents = contents;
        let start_dir = paths::default_export_dir();
        self.pending_save_dialog = Some(AsyncComputeTaskPool::get().spawn(async move {
            let mut dialog = rfd::AsyncFileDialog::new()
                .set_title("Save Measurements")
                .add_filter("JSON", &["json"])
                .set_file_name(DEFAULT_EXPORT_NAME);
            if let Some(dir) = start_dir {
                dialog = dialog.set_directory(dir);
            }
            dialog.save_file().await.map(|h| h.path().to_path_buf())
        }));
    }

    /// Ask for a measurement file, then read and import it
    pub fn request_import(&mut self) {
        if self.is_busy() {
            return;
        }
        let start_dir = paths::default_export_dir();
        self.pending_import_dialog = Some(AsyncComputeTaskPool::get().spawn(async move {
            let mut dialog = rfd::AsyncFileDialog::new()
                .set_title("Import Measurements")
                .add_filter("JSON", &["json"]);
            if let Some(dir) = start_dir {
                dialog = dialog.set_directory(dir);
            }
            dialog.pick_file().await.map(|h| h.path().to_path_buf())
        }));
    }
}

fn write_measurements(path: PathBuf, contents: String) -> FileOutcome {
    match std::fs::write(&path, contents) {
        Ok(()) => FileOutcome {
            operation: FileOperation::Save,
            path,
            contents: None,
            success: true,
            error: None,
        },
        Err(e) => FileOutcome {
            operation: FileOperation::Save,
            path,
            contents: None,
            success: false,
            error: Some(format!("Failed to write file: {}", e)),
        },
    }
}

fn read_measurements(path: PathBuf) -> FileOutcome {
    match std::fs::read_to_string(&path) {
        Ok(contents) => FileOutcome {
            operation: FileOperation::Import,
            path,
            contents: Some(contents),
            success: true,
            error: None,
        },
        Err(e) => FileOutcome {
            operation: FileOperation::Import,
            path,
            contents: None,
            success: false,
            error: Some(format!("Failed to read file: {}", e)),
        },
    }
}

/// Apply a finished file operation to the store
fn apply_outcome(
    outcome: FileOutcome,
    store: &mut MeasurementStore,
    state: &mut InteractionState,
    errors: &mut FileErrorDialog,
) {
    if !outcome.success {
        let message = outcome.error.unwrap_or_else(|| "Unknown error".to_string());
        error!("{:?} of {:?} failed: {}", outcome.operation, outcome.path, message);
        let title = match outcome.operation {
            FileOperation::Save => "Save Failed",
            FileOperation::Import => "Import Failed",
        };
        errors.show(title, message);
        return;
    }

    match outcome.operation {
        FileOperation::Save => info!("Saved measurements to {:?}", outcome.path),
        FileOperation::Import => {
            // drop any half-built shape before replacing the list
            let mode = state.mode();
            state.set_mode(mode, store);
            store.import_json(outcome.contents.as_deref().unwrap_or_default());
            info!("Imported measurements from {:?}", outcome.path);
        }
    }
}

/// Drives the file dialogs and background reads/writes
pub fn poll_measurement_file_tasks(
    mut tasks: ResMut<MeasurementFileTasks>,
    mut store: ResMut<MeasurementStore>,
    mut state: ResMut<InteractionState>,
    mut errors: ResMut<FileErrorDialog>,
) {
    if let Some(task) = tasks.pending_save_dialog.as_mut()
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        tasks.pending_save_dialog = None;
        if let Some(path) = result {
            let contents = std::mem::take(&mut tasks.save_contents);
            tasks.io = Some(
                IoTaskPool::get().spawn(async move { write_measurements(path, contents) }),
            );
        }
    }

    if let Some(task) = tasks.pending_import_dialog.as_mut()
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        tasks.pending_import_dialog = None;
        if let Some(path) = result {
            tasks.io = Some(IoTaskPool::get().spawn(async move { read_measurements(path) }));
        }
    }

    if let Some(task) = tasks.io.as_mut()
        && let Some(outcome) = future::block_on(future::poll_once(task))
    {
        tasks.io = None;
        apply_outcome(outcome, &mut store, &mut state, &mut errors);
    }
}

pub fn export_window_ui(
    mut contexts: EguiContexts,
    mut window: ResMut<ExportWindowState>,
    mut tasks: ResMut<MeasurementFileTasks>,
    store: Res<MeasurementStore>,
) -> Result {
    if !window.is_open {
        return Ok(());
    }
    window.refresh(&store);

    let ctx = contexts.ctx_mut()?;
    let mut open = window.is_open;
    let mut save_requested = false;

    egui::Window::new("Export Measurements")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([480.0, 420.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} measurements", store.export().len()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let busy = tasks.is_busy();
                    if ui
                        .add_enabled(!busy, egui::Button::new("Save…"))
                        .clicked()
                    {
                        save_requested = true;
                    }
                    if ui.button("Copy").clicked() {
                        ui.ctx().copy_text(window.json.clone());
                    }
                    if busy {
                        ui.spinner();
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut window.json.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
        });

    if save_requested {
        tasks.request_save(window.json.clone());
    }
    window.is_open = open;

    Ok(())
}
