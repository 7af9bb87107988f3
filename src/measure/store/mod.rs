//! The measurement store: owns every primitive, the in-progress primitive,
//! the selection and the undo/redo history.
//!
//! All mutation of primitives goes through this type. Every mutation bumps
//! [`MeasurementStore::revision`], which is how the list view and the export
//! window learn that they need to refresh.
//!
//! ## History rules
//!
//! - User mutations (create, delete, clear, import, rename, recolour, and the
//!   first movement of a control-point drag) record the pre-mutation state
//!   and clear the redo stack.
//! - Undo/redo move the current state onto the opposite stack instead of
//!   re-deriving it, so round trips reproduce ids and ordering exactly.
//! - Construction steps (adding points, moving the preview) are not recorded.

use bevy::prelude::*;

use super::history::SnapshotHistory;
use super::kind::PrimitiveKind;
use super::primitive::{Primitive, PrimitiveId, Rgb};
use super::snapshot::{PrimitiveRecord, Snapshot};

#[cfg(test)]
mod tests;

#[derive(Resource, Debug)]
pub struct MeasurementStore {
    primitives: Vec<Primitive>,
    active: Option<PrimitiveId>,
    selected: Option<PrimitiveId>,
    history: SnapshotHistory,
    next_id: u64,
    default_color: Rgb,
    surface_attached: bool,
    layer_visible: bool,
    revision: u64,
}

impl Default for MeasurementStore {
    fn default() -> Self {
        Self::new(Rgb::default())
    }
}

impl MeasurementStore {
    pub fn new(default_color: Rgb) -> Self {
        Self {
            primitives: Vec::new(),
            active: None,
            selected: None,
            history: SnapshotHistory::default(),
            next_id: 1,
            default_color,
            surface_attached: false,
            layer_visible: true,
            revision: 0,
        }
    }

    // ------------------------------------------------------------------
    // Surface
    // ------------------------------------------------------------------

    pub fn has_surface(&self) -> bool {
        self.surface_attached
    }

    /// Attach or detach the image surface. Without one, creation fails.
    pub fn set_surface_attached(&mut self, attached: bool) {
        if self.surface_attached != attached {
            self.surface_attached = attached;
            debug!("Measurement surface attached: {}", attached);
            self.notify();
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn active(&self) -> Option<PrimitiveId> {
        self.active
    }

    pub fn active_primitive(&self) -> Option<&Primitive> {
        self.active.and_then(|id| self.primitive(id))
    }

    pub fn selected(&self) -> Option<PrimitiveId> {
        self.selected
    }

    pub fn default_color(&self) -> Rgb {
        self.default_color
    }

    pub fn layer_visible(&self) -> bool {
        self.layer_visible
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    /// List label: one-based position followed by the name.
    pub fn display_name(index: usize, primitive: &Primitive) -> String {
        format!("{}. {}", index + 1, primitive.name())
    }

    // ------------------------------------------------------------------
    // Creation and construction
    // ------------------------------------------------------------------

    /// Create an empty primitive of `kind` at the end of the list.
    ///
    /// Returns `None` when no image surface is attached or the id space is
    /// exhausted.
    pub fn create_primitive(&mut self, kind: PrimitiveKind) -> Option<PrimitiveId> {
        if !self.surface_attached {
            return None;
        }
        let Some(id) = self.allocate_id() else {
            warn!("Measurement ids exhausted, cannot create {:?}", kind);
            return None;
        };
        self.record_undo_state();

        let mut primitive = Primitive::new(id, kind, self.default_color);
        primitive.refresh();
        self.primitives.push(primitive);
        debug!("Created {:?} measurement {}", kind, id);
        self.notify();
        Some(id)
    }

    /// Never hands out `u64::MAX`; `restore` rejects it too, so every id
    /// below `next_id` may be taken and every id from it on is free.
    fn allocate_id(&mut self) -> Option<PrimitiveId> {
        let next = self.next_id.checked_add(1)?;
        let id = PrimitiveId(self.next_id);
        self.next_id = next;
        Some(id)
    }

    /// Mark `id` as the primitive under construction.
    pub fn begin_construction(&mut self, id: PrimitiveId) {
        if self.primitive(id).is_some() {
            self.active = Some(id);
        }
    }

    /// Finish the primitive under construction, dropping its preview point.
    pub fn commit_active(&mut self) -> Option<PrimitiveId> {
        let id = self.active.take()?;
        if let Some(p) = self.primitive_mut(id) {
            p.preview = None;
            p.refresh();
            debug!("Committed {:?} measurement {}", p.kind(), id);
        }
        self.notify();
        Some(id)
    }

    /// Throw away the primitive under construction without leaving history.
    pub fn discard_active(&mut self) -> Option<PrimitiveId> {
        let id = self.active?;
        self.discard_primitive(id).then_some(id)
    }

    /// Remove a primitive that never became a committed measurement.
    ///
    /// The removal itself is not undoable; if the newest undo entry only
    /// recorded the creation of this primitive it is dropped as well.
    pub fn discard_primitive(&mut self, id: PrimitiveId) -> bool {
        if !self.remove(id) {
            return false;
        }
        let current = self.export();
        self.history.drop_if_unchanged(&current);
        debug!("Discarded measurement {}", id);
        self.notify();
        true
    }

    pub fn push_point(&mut self, id: PrimitiveId, pos: Vec2) -> bool {
        self.edit(id, |p| p.points.push(pos))
    }

    /// Overwrite the last point (the moving anchor of a drag-to-define shape).
    pub fn set_last_point(&mut self, id: PrimitiveId, pos: Vec2) -> bool {
        self.edit(id, |p| {
            if let Some(last) = p.points.last_mut() {
                *last = pos;
            }
        })
    }

    /// Overwrite one control point. Fails for an out-of-range index.
    pub fn set_point(&mut self, id: PrimitiveId, index: usize, pos: Vec2) -> bool {
        let in_range = self
            .primitive(id)
            .is_some_and(|p| index < p.points().len());
        in_range && self.edit(id, |p| p.points[index] = pos)
    }

    pub fn set_preview(&mut self, id: PrimitiveId, preview: Option<Vec2>) -> bool {
        self.edit(id, |p| p.preview = preview)
    }

    fn edit(&mut self, id: PrimitiveId, f: impl FnOnce(&mut Primitive)) -> bool {
        let Some(p) = self.primitive_mut(id) else {
            return false;
        };
        f(p);
        p.refresh();
        self.notify();
        true
    }

    fn primitive_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.primitives.iter_mut().find(|p| p.id() == id)
    }

    // ------------------------------------------------------------------
    // User mutations
    // ------------------------------------------------------------------

    /// Delete one primitive. Undoable.
    pub fn delete_primitive(&mut self, id: PrimitiveId) -> bool {
        if self.primitive(id).is_none() {
            return false;
        }
        self.record_undo_state();
        self.remove(id);
        info!("Deleted measurement {}", id);
        self.notify();
        true
    }

    fn remove(&mut self, id: PrimitiveId) -> bool {
        let Some(index) = self.primitives.iter().position(|p| p.id() == id) else {
            return false;
        };
        // dropping the primitive releases its cached rendering
        self.primitives.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        true
    }

    /// Remove every primitive. Undoable, even when already empty.
    pub fn clear_all(&mut self) {
        self.record_undo_state();
        self.primitives.clear();
        self.active = None;
        self.selected = None;
        info!("Cleared all measurements");
        self.notify();
    }

    /// Rename a primitive. Whitespace is trimmed and an empty name falls back
    /// to the kind's default name.
    pub fn rename(&mut self, id: PrimitiveId, name: &str) -> bool {
        let Some(p) = self.primitive(id) else {
            return false;
        };
        let trimmed = name.trim();
        let new_name = if trimmed.is_empty() {
            p.kind().display_name().to_string()
        } else {
            trimmed.to_string()
        };
        if new_name == p.name() {
            return false;
        }
        self.record_undo_state();
        self.edit(id, |p| p.name = new_name)
    }

    pub fn set_color(&mut self, id: PrimitiveId, color: Rgb) -> bool {
        let changes = self.primitive(id).is_some_and(|p| p.color() != color);
        if !changes {
            return false;
        }
        self.record_undo_state();
        self.edit(id, |p| p.color = color)
    }

    /// Change the colour of future primitives; the selected one follows.
    pub fn set_default_color(&mut self, color: Rgb) {
        self.default_color = color;
        if let Some(id) = self.selected {
            self.set_color(id, color);
        }
        self.notify();
    }

    /// Per-primitive visibility. Not part of snapshots, never recorded.
    pub fn set_visible(&mut self, id: PrimitiveId, visible: bool) -> bool {
        self.edit(id, |p| p.visible = visible)
    }

    /// Show or hide the whole measurement layer.
    pub fn set_layer_visible(&mut self, visible: bool) {
        if self.layer_visible != visible {
            self.layer_visible = visible;
            self.notify();
        }
    }

    /// Select a primitive (or clear the selection). Unknown ids clear it.
    pub fn select(&mut self, id: Option<PrimitiveId>) {
        let id = id.filter(|id| self.primitive(*id).is_some());
        if self.selected != id {
            self.selected = id;
            self.notify();
        }
    }

    // ------------------------------------------------------------------
    // Snapshots and history
    // ------------------------------------------------------------------

    /// Every primitive in list order, including one still under construction.
    pub fn serialize(&self) -> Snapshot {
        Snapshot {
            primitives: self.primitives.iter().map(record_of).collect(),
        }
    }

    /// Committed primitives only; the export format.
    pub fn export(&self) -> Snapshot {
        Snapshot {
            primitives: self
                .primitives
                .iter()
                .filter(|p| Some(p.id()) != self.active)
                .map(record_of)
                .collect(),
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.export().to_json()
    }

    /// Replace every primitive with the snapshot's content, keeping ids.
    ///
    /// Not recorded in history. Records with an id already seen earlier in
    /// the snapshot, or with id `u64::MAX`, are skipped.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.primitives.clear();
        self.active = None;
        self.selected = None;

        for record in snapshot.primitives {
            if record.id.0 == u64::MAX {
                warn!("Skipping measurement with out-of-range id {}", record.id);
                continue;
            }
            if self.primitive(record.id).is_some() {
                warn!("Skipping duplicate measurement id {}", record.id);
                continue;
            }
            let mut primitive = Primitive::new(record.id, record.kind, record.color);
            if !record.name.trim().is_empty() {
                primitive.name = record.name;
            }
            primitive.points = record.points.into_iter().map(Vec2::from).collect();
            primitive.refresh();
            self.next_id = self.next_id.max(record.id.0 + 1);
            self.primitives.push(primitive);
        }
        self.notify();
    }

    /// Restore from an external snapshot. Undoable.
    pub fn import(&mut self, snapshot: Snapshot) {
        self.record_undo_state();
        info!("Imported {} measurements", snapshot.len());
        self.restore(snapshot);
    }

    /// Import exported JSON. Malformed input imports as empty.
    pub fn import_json(&mut self, json: &str) {
        self.import(Snapshot::from_json_lenient(json));
    }

    /// Record the current state before a user mutation.
    ///
    /// History only ever holds committed primitives; a shape still under
    /// construction is never restored by undo or redo.
    pub fn record_undo_state(&mut self) {
        let before = self.export();
        self.history.record(before);
    }

    pub fn undo(&mut self) -> bool {
        let current = self.export();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                debug!("Undo ({} left)", self.history.undo_count());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.export();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                debug!("Redo ({} left)", self.history.redo_count());
                true
            }
            None => false,
        }
    }

    fn notify(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn record_of(p: &Primitive) -> PrimitiveRecord {
    PrimitiveRecord {
        id: p.id(),
        kind: p.kind(),
        name: p.name().to_string(),
        points: p.points().iter().copied().map(Into::into).collect(),
        color: p.color(),
    }
}
