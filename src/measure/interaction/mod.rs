//! Pointer and keyboard state machine for drawing and editing measurements.
//!
//! [`InteractionState`] receives toolkit-independent [`InputEvent`]s in image
//! space and turns them into [`MeasurementStore`] operations according to the
//! current [`MeasureMode`]. The bevy systems in `measure::systems` translate
//! raw mouse and keyboard input into these events.

use bevy::prelude::*;

use super::hit_test::{first_hit, hit_radius, nearest_hit, HitTarget};
use super::kind::{Gesture, PrimitiveKind};
use super::store::MeasurementStore;
use crate::constants::DEFAULT_HIT_RADIUS;


/// Drawing modes. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureMode {
    #[default]
    None,
    Point,
    Line,
    Polyline,
    Angle,
    Circle,
    Rect,
    Ellipse,
    Polygon,
    Select,
}

impl MeasureMode {
    pub fn all() -> &'static [MeasureMode] {
        &[
            MeasureMode::Select,
            MeasureMode::Point,
            MeasureMode::Line,
            MeasureMode::Polyline,
            MeasureMode::Angle,
            MeasureMode::Circle,
            MeasureMode::Rect,
            MeasureMode::Ellipse,
            MeasureMode::Polygon,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MeasureMode::None => "None",
            MeasureMode::Point => "Point (P)",
            MeasureMode::Line => "Line (L)",
            MeasureMode::Polyline => "Polyline (O)",
            MeasureMode::Angle => "Angle (A)",
            MeasureMode::Circle => "Circle (C)",
            MeasureMode::Rect => "Rectangle (R)",
            MeasureMode::Ellipse => "Ellipse (E)",
            MeasureMode::Polygon => "Polygon (G)",
            MeasureMode::Select => "Select (S)",
        }
    }

    /// The primitive kind this mode draws, if it is a drawing mode.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            MeasureMode::Point => Some(PrimitiveKind::Point),
            MeasureMode::Line => Some(PrimitiveKind::Line),
            MeasureMode::Polyline => Some(PrimitiveKind::Polyline),
            MeasureMode::Angle => Some(PrimitiveKind::Angle),
            MeasureMode::Circle => Some(PrimitiveKind::Circle),
            MeasureMode::Rect => Some(PrimitiveKind::Rect),
            MeasureMode::Ellipse => Some(PrimitiveKind::Ellipse),
            MeasureMode::Polygon => Some(PrimitiveKind::Polygon),
            MeasureMode::None | MeasureMode::Select => None,
        }
    }

    /// Accumulate modes that need an explicit finishing gesture.
    fn finishes_explicitly(&self) -> bool {
        self.primitive_kind().is_some_and(|k| {
            k.gesture() == Gesture::Accumulate && k.auto_finalize_at().is_none()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    /// Leave the current mode, discarding any shape under construction.
    Cancel,
    DeleteSelected,
}

/// Input in image space. Positions are `None` when the pointer is outside
/// the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Vec2, button: PointerButton },
    PointerMove { pos: Vec2 },
    PointerUp,
    DoubleClick { pos: Option<Vec2> },
    SecondaryClick { pos: Option<Vec2> },
    KeyCommand(KeyCommand),
}

/// A control point being dragged in Select mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPointDrag {
    pub target: HitTarget,
    /// Set once the point has actually moved and the undo entry is recorded.
    pub moved: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct InteractionState {
    mode: MeasureMode,
    is_drawing: bool,
    drag: Option<ControlPointDrag>,
    hover: Option<HitTarget>,
    /// Hit tolerance in screen pixels at zoom 1.
    pub base_hit_radius: f32,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: MeasureMode::None,
            is_drawing: false,
            drag: None,
            hover: None,
            base_hit_radius: DEFAULT_HIT_RADIUS,
        }
    }
}

impl InteractionState {
    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    pub fn drag(&self) -> Option<&ControlPointDrag> {
        self.drag.as_ref()
    }

    pub fn hover(&self) -> Option<&HitTarget> {
        self.hover.as_ref()
    }

    /// Switch modes. Any primitive under construction is discarded, and the
    /// hover highlight and drag state are cleared.
    pub fn set_mode(&mut self, mode: MeasureMode, store: &mut MeasurementStore) {
        if let Some(id) = store.discard_active() {
            debug!("Mode switch discarded measurement {}", id);
        }
        self.reset_transient();
        if self.mode != mode {
            info!("Measure mode: {:?}", mode);
        }
        self.mode = mode;
    }

    fn reset_transient(&mut self) {
        self.is_drawing = false;
        self.drag = None;
        self.hover = None;
    }

    /// Process one event. Returns true when the event changed the store or
    /// the interaction state.
    pub fn handle(&mut self, store: &mut MeasurementStore, event: InputEvent, zoom: f32) -> bool {
        match event {
            InputEvent::PointerDown { pos, button } => {
                button == PointerButton::Primary && self.pointer_down(store, pos, zoom)
            }
            InputEvent::PointerMove { pos } => self.pointer_move(store, pos, zoom),
            InputEvent::PointerUp => self.pointer_up(store),
            InputEvent::DoubleClick { pos } => {
                if self.mode.finishes_explicitly() {
                    self.finish_accumulate(store)
                } else {
                    // the second press of a double-click still counts as a press
                    pos.is_some_and(|pos| self.pointer_down(store, pos, zoom))
                }
            }
            InputEvent::SecondaryClick { .. } => self.secondary_click(store),
            InputEvent::KeyCommand(cmd) => self.apply_command(store, cmd),
        }
    }

    /// Run a keyboard or toolbar command.
    pub fn apply_command(&mut self, store: &mut MeasurementStore, cmd: KeyCommand) -> bool {
        match cmd {
            KeyCommand::Undo => {
                self.reset_transient();
                store.undo()
            }
            KeyCommand::Redo => {
                self.reset_transient();
                store.redo()
            }
            KeyCommand::Cancel => {
                let changed = self.mode != MeasureMode::None || store.active().is_some();
                self.set_mode(MeasureMode::None, store);
                changed
            }
            KeyCommand::DeleteSelected => {
                let Some(id) = store.selected() else {
                    return false;
                };
                self.reset_transient();
                store.delete_primitive(id)
            }
        }
    }

    fn pointer_down(&mut self, store: &mut MeasurementStore, pos: Vec2, zoom: f32) -> bool {
        if self.mode == MeasureMode::Select {
            return self.begin_drag(store, pos, zoom);
        }
        let Some(kind) = self.mode.primitive_kind() else {
            return false;
        };

        match kind.gesture() {
            Gesture::Click => {
                let Some(id) = store.create_primitive(kind) else {
                    return false;
                };
                store.push_point(id, pos);
                true
            }
            Gesture::DragToDefine => {
                let Some(id) = store.create_primitive(kind) else {
                    return false;
                };
                store.begin_construction(id);
                store.push_point(id, pos);
                store.push_point(id, pos);
                self.is_drawing = true;
                true
            }
            Gesture::Accumulate => self.accumulate(store, kind, pos),
        }
    }

    fn accumulate(&mut self, store: &mut MeasurementStore, kind: PrimitiveKind, pos: Vec2) -> bool {
        let id = match store.active_primitive() {
            Some(active) if active.kind() == kind => active.id(),
            _ => {
                store.discard_active();
                let Some(id) = store.create_primitive(kind) else {
                    return false;
                };
                store.begin_construction(id);
                id
            }
        };

        store.set_preview(id, None);
        store.push_point(id, pos);
        self.is_drawing = true;

        let count = store.primitive(id).map_or(0, |p| p.points().len());
        if kind.auto_finalize_at().is_some_and(|limit| count >= limit) {
            store.commit_active();
            self.is_drawing = false;
        }
        true
    }

    fn begin_drag(&mut self, store: &mut MeasurementStore, pos: Vec2, zoom: f32) -> bool {
        let radius = hit_radius(self.base_hit_radius, zoom);
        let Some(target) = first_hit(store.primitives(), pos, radius) else {
            return false;
        };
        store.select(Some(target.id));
        self.drag = Some(ControlPointDrag {
            target,
            moved: false,
        });
        self.hover = Some(target);
        true
    }

    fn pointer_move(&mut self, store: &mut MeasurementStore, pos: Vec2, zoom: f32) -> bool {
        match self.mode {
            MeasureMode::Select => {
                if let Some(drag) = self.drag.as_mut() {
                    if store.primitive(drag.target.id).is_none() {
                        self.drag = None;
                        return false;
                    }
                    if !drag.moved {
                        store.record_undo_state();
                        drag.moved = true;
                    }
                    drag.target.point = pos;
                    self.hover = Some(drag.target);
                    return store.set_point(drag.target.id, drag.target.point_index, pos);
                }
                let radius = hit_radius(self.base_hit_radius, zoom);
                let hover = nearest_hit(store.primitives(), pos, radius);
                let changed = hover != self.hover;
                self.hover = hover;
                changed
            }
            mode => {
                let Some(kind) = mode.primitive_kind() else {
                    return false;
                };
                let Some(id) = store.active() else {
                    return false;
                };
                match kind.gesture() {
                    Gesture::Accumulate => store.set_preview(id, Some(pos)),
                    Gesture::DragToDefine if self.is_drawing => store.set_last_point(id, pos),
                    _ => false,
                }
            }
        }
    }

    fn pointer_up(&mut self, store: &mut MeasurementStore) -> bool {
        let mut changed = false;
        if let Some(drag) = self.drag.take() {
            if drag.moved {
                debug!("Moved point {} of {}", drag.target.point_index, drag.target.id);
            }
            changed = true;
        }

        let drag_to_define = self
            .mode
            .primitive_kind()
            .is_some_and(|k| k.gesture() == Gesture::DragToDefine);
        if drag_to_define && self.is_drawing {
            store.commit_active();
            self.is_drawing = false;
            changed = true;
        }
        changed
    }

    fn secondary_click(&mut self, store: &mut MeasurementStore) -> bool {
        if self.mode == MeasureMode::Select && self.drag.is_some() {
            // the point keeps its last dragged position
            self.drag = None;
            return true;
        }
        self.mode.finishes_explicitly() && self.finish_accumulate(store)
    }

    /// End a Polyline or Polygon. Too few points discards it instead.
    fn finish_accumulate(&mut self, store: &mut MeasurementStore) -> bool {
        self.is_drawing = false;
        let Some(active) = store.active_primitive() else {
            return false;
        };
        let id = active.id();
        if active.points().len() < active.kind().min_committed_points() {
            store.discard_active();
            debug!("Discarded unfinished measurement {}", id);
        } else {
            store.commit_active();
        }
        true
    }
}
