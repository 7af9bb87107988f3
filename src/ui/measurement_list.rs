//! Right side panel listing every measurement.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::measure::{InteractionState, KeyCommand, MeasurementStore, PrimitiveId, Rgb};

use super::export::{ExportWindowState, MeasurementFileTasks};
use super::HelpWindowState;

/// Inline rename in progress
#[derive(Resource, Default)]
pub struct MeasurementListState {
    renaming: Option<(PrimitiveId, String)>,
}

#[derive(Debug, Clone, PartialEq)]
enum ListAction {
    Select(PrimitiveId),
    StartRename(PrimitiveId),
    Rename(PrimitiveId, String),
    CancelRename,
    SetColor(PrimitiveId, Rgb),
    SetVisible(PrimitiveId, bool),
    Delete(PrimitiveId),
    Undo,
    Redo,
    Clear,
    SetLayerVisible(bool),
    OpenExport,
    Import,
}

/// Apply a list action to the engine; returns false when nothing changed
fn apply_action(
    action: ListAction,
    list: &mut MeasurementListState,
    store: &mut MeasurementStore,
    state: &mut InteractionState,
) -> bool {
    match action {
        ListAction::Select(id) => {
            let next = if store.selected() == Some(id) { None } else { Some(id) };
            store.select(next);
            true
        }
        ListAction::StartRename(id) => {
            let Some(primitive) = store.primitive(id) else {
                return false;
            };
            list.renaming = Some((id, primitive.name().to_string()));
            true
        }
        ListAction::Rename(id, name) => {
            list.renaming = None;
            store.rename(id, &name)
        }
        ListAction::CancelRename => list.renaming.take().is_some(),
        ListAction::SetColor(id, color) => store.set_color(id, color),
        ListAction::SetVisible(id, visible) => store.set_visible(id, visible),
        ListAction::Delete(id) => {
            if list.renaming.as_ref().is_some_and(|(r, _)| *r == id) {
                list.renaming = None;
            }
            store.delete_primitive(id)
        }
        ListAction::Undo => state.apply_command(store, KeyCommand::Undo),
        ListAction::Redo => state.apply_command(store, KeyCommand::Redo),
        ListAction::Clear => {
            let mode = state.mode();
            state.set_mode(mode, store);
            list.renaming = None;
            store.clear_all();
            true
        }
        ListAction::SetLayerVisible(visible) => {
            store.set_layer_visible(visible);
            true
        }
        // handled by the panel system
        ListAction::OpenExport | ListAction::Import => false,
    }
}

fn render_header(ui: &mut egui::Ui, store: &MeasurementStore, busy: bool, actions: &mut Vec<ListAction>) {
    ui.heading("Measurements");
    ui.horizontal(|ui| {
        if ui
            .add_enabled(store.can_undo(), egui::Button::new("Undo"))
            .on_hover_text(format!("Ctrl+Z ({} steps)", store.undo_count()))
            .clicked()
        {
            actions.push(ListAction::Undo);
        }
        if ui
            .add_enabled(store.can_redo(), egui::Button::new("Redo"))
            .on_hover_text(format!("Ctrl+Shift+Z ({} steps)", store.redo_count()))
            .clicked()
        {
            actions.push(ListAction::Redo);
        }
        if ui
            .add_enabled(!store.is_empty(), egui::Button::new("Clear"))
            .clicked()
        {
            actions.push(ListAction::Clear);
        }
    });
    ui.horizontal(|ui| {
        if ui.button("Export…").clicked() {
            actions.push(ListAction::OpenExport);
        }
        if ui
            .add_enabled(!busy && store.has_surface(), egui::Button::new("Import…"))
            .clicked()
        {
            actions.push(ListAction::Import);
        }
    });

    let mut layer_visible = store.layer_visible();
    if ui.checkbox(&mut layer_visible, "Show measurements").changed() {
        actions.push(ListAction::SetLayerVisible(layer_visible));
    }
}

fn render_rows(
    ui: &mut egui::Ui,
    store: &MeasurementStore,
    list: &mut MeasurementListState,
    actions: &mut Vec<ListAction>,
) {
    if store.is_empty() {
        ui.weak("No measurements yet");
        return;
    }

    for (index, primitive) in store.primitives().iter().enumerate() {
        let id = primitive.id();
        if store.active() == Some(id) {
            continue;
        }

        ui.horizontal(|ui| {
            let mut visible = primitive.is_visible();
            if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
                actions.push(ListAction::SetVisible(id, visible));
            }

            let mut rgb = primitive.color().channels();
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                actions.push(ListAction::SetColor(id, Rgb::from_channels(rgb)));
            }

            match list.renaming.as_mut() {
                Some((renaming, text)) if *renaming == id => {
                    let response = ui.add(egui::TextEdit::singleline(text).desired_width(110.0));
                    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                        actions.push(ListAction::CancelRename);
                    } else if response.lost_focus() {
                        actions.push(ListAction::Rename(id, text.clone()));
                    } else {
                        response.request_focus();
                    }
                }
                _ => {
                    let selected = store.selected() == Some(id);
                    let response = ui
                        .selectable_label(selected, MeasurementStore::display_name(index, primitive))
                        .on_hover_text("Click to select, double-click to rename");
                    if response.double_clicked() {
                        actions.push(ListAction::StartRename(id));
                    } else if response.clicked() {
                        actions.push(ListAction::Select(id));
                    }
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Del").clicked() {
                    actions.push(ListAction::Delete(id));
                }
            });
        });

        let label = primitive.label_text();
        if !label.is_empty() {
            ui.indent(("measurement_metrics", id.0), |ui| {
                ui.label(egui::RichText::new(label).monospace().weak());
            });
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn measurement_list_ui(
    mut contexts: EguiContexts,
    mut list: ResMut<MeasurementListState>,
    mut store: ResMut<MeasurementStore>,
    mut state: ResMut<InteractionState>,
    mut export_window: ResMut<ExportWindowState>,
    mut file_tasks: ResMut<MeasurementFileTasks>,
    mut help_state: ResMut<HelpWindowState>,
) -> Result {
    let mut actions = Vec::new();

    egui::SidePanel::right("measurement_list")
        .default_width(260.0)
        .show(contexts.ctx_mut()?, |ui| {
            render_header(ui, &store, file_tasks.is_busy(), &mut actions);
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(ui.available_height() - 48.0)
                .show(ui, |ui| {
                    render_rows(ui, &store, &mut list, &mut actions);
                });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                if ui
                    .add_sized([120.0, 28.0], egui::Button::new("Help (H)"))
                    .clicked()
                {
                    help_state.is_open = true;
                }
            });
        });

    for action in actions {
        match action {
            ListAction::OpenExport => export_window.open(),
            ListAction::Import => file_tasks.request_import(),
            action => {
                apply_action(action, &mut list, &mut store, &mut state);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::PrimitiveKind;

    fn store_with_points(n: usize) -> (MeasurementStore, Vec<PrimitiveId>) {
        let mut store = MeasurementStore::default();
        store.set_surface_attached(true);
        let ids = (0..n)
            .map(|i| {
                let id = store.create_primitive(PrimitiveKind::Point).unwrap();
                store.push_point(id, Vec2::new(i as f32, 0.0));
                id
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn test_select_toggles() {
        let (mut store, ids) = store_with_points(2);
        let mut list = MeasurementListState::default();
        let mut state = InteractionState::default();

        apply_action(ListAction::Select(ids[0]), &mut list, &mut store, &mut state);
        assert_eq!(store.selected(), Some(ids[0]));

        apply_action(ListAction::Select(ids[1]), &mut list, &mut store, &mut state);
        assert_eq!(store.selected(), Some(ids[1]));

        apply_action(ListAction::Select(ids[1]), &mut list, &mut store, &mut state);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_rename_flow() {
        let (mut store, ids) = store_with_points(1);
        let mut list = MeasurementListState::default();
        let mut state = InteractionState::default();

        assert!(apply_action(ListAction::StartRename(ids[0]), &mut list, &mut store, &mut state));
        assert_eq!(
            list.renaming.as_ref().map(|(id, _)| *id),
            Some(ids[0])
        );

        apply_action(
            ListAction::Rename(ids[0], "Scale bar".to_string()),
            &mut list,
            &mut store,
            &mut state,
        );
        assert!(list.renaming.is_none());
        assert_eq!(store.primitive(ids[0]).unwrap().name(), "Scale bar");
    }

    #[test]
    fn test_cancel_rename_keeps_name() {
        let (mut store, ids) = store_with_points(1);
        let original = store.primitive(ids[0]).unwrap().name().to_string();
        let mut list = MeasurementListState::default();
        let mut state = InteractionState::default();

        apply_action(ListAction::StartRename(ids[0]), &mut list, &mut store, &mut state);
        assert!(apply_action(ListAction::CancelRename, &mut list, &mut store, &mut state));
        assert!(list.renaming.is_none());
        assert_eq!(store.primitive(ids[0]).unwrap().name(), original);
    }

    #[test]
    fn test_delete_then_undo() {
        let (mut store, ids) = store_with_points(2);
        let mut list = MeasurementListState::default();
        let mut state = InteractionState::default();

        assert!(apply_action(ListAction::Delete(ids[0]), &mut list, &mut store, &mut state));
        assert_eq!(store.len(), 1);

        assert!(apply_action(ListAction::Undo, &mut list, &mut store, &mut state));
        assert_eq!(store.len(), 2);

        assert!(apply_action(ListAction::Redo, &mut list, &mut store, &mut state));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_is_undoable() {
        let (mut store, _) = store_with_points(3);
        let mut list = MeasurementListState::default();
        let mut state = InteractionState::default();

        apply_action(ListAction::Clear, &mut list, &mut store, &mut state);
        assert!(store.is_empty());

        apply_action(ListAction::Undo, &mut list, &mut store, &mut state);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_visibility_actions() {
        let (mut store, ids) = store_with_points(1);
        let mut list = MeasurementListState::default();
        let mut state = InteractionState::default();

        apply_action(ListAction::SetVisible(ids[0], false), &mut list, &mut store, &mut state);
        assert!(!store.primitive(ids[0]).unwrap().is_visible());

        apply_action(ListAction::SetLayerVisible(false), &mut list, &mut store, &mut state);
        assert!(!store.layer_visible());
    }

    #[test]
    fn test_set_color() {
        let (mut store, ids) = store_with_points(1);
        let mut list = MeasurementListState::default();
        let mut state = InteractionState::default();

        apply_action(
            ListAction::SetColor(ids[0], Rgb(0x00ff00)),
            &mut list,
            &mut store,
            &mut state,
        );
        assert_eq!(store.primitive(ids[0]).unwrap().color(), Rgb(0x00ff00));
    }
}
