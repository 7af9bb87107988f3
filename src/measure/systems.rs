//! Input adapter: raw bevy mouse/keyboard input to [`InputEvent`]s.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::config::AppConfig;
use crate::constants::{DOUBLE_CLICK_DISTANCE, DOUBLE_CLICK_SECONDS};
use crate::surface::SurfaceCursor;

use super::interaction::{InputEvent, InteractionState, KeyCommand, MeasureMode, PointerButton};
use super::primitive::Rgb;
use super::store::MeasurementStore;

/// Remembers the previous primary press for double-click detection
#[derive(Resource, Default)]
pub struct ClickTracker {
    last_press: Option<(f64, Vec2)>,
}

impl ClickTracker {
    /// Register a primary press at `time` seconds and `screen_pos`. Returns
    /// true when it completes a double-click; the pair is then consumed so a
    /// third press starts over.
    pub fn register_press(&mut self, time: f64, screen_pos: Vec2) -> bool {
        let is_double = self.last_press.is_some_and(|(t, p)| {
            time - t <= DOUBLE_CLICK_SECONDS && p.distance(screen_pos) <= DOUBLE_CLICK_DISTANCE
        });
        self.last_press = if is_double {
            None
        } else {
            Some((time, screen_pos))
        };
        is_double
    }
}

/// Startup system feeding persisted settings into the engine
pub fn apply_config_to_measure(
    config: Res<AppConfig>,
    mut store: ResMut<MeasurementStore>,
    mut state: ResMut<InteractionState>,
) {
    store.set_default_color(Rgb(config.data.default_color));
    state.base_hit_radius = config.data.effective_hit_radius();
    debug!(
        "Measurement defaults: colour {}, hit radius {}",
        Rgb(config.data.default_color).to_hex(),
        state.base_hit_radius
    );
}

/// Collect this frame's pointer events in arrival order
fn pointer_events(
    mouse: &ButtonInput<MouseButton>,
    time: f64,
    screen_pos: Option<Vec2>,
    image_pos: Option<Vec2>,
    moved: bool,
    over_ui: bool,
    tracker: &mut ClickTracker,
) -> Vec<InputEvent> {
    let mut events = Vec::new();

    if moved && let Some(pos) = image_pos {
        events.push(InputEvent::PointerMove { pos });
    }

    if !over_ui {
        if mouse.just_pressed(MouseButton::Left)
            && let Some(screen) = screen_pos
        {
            if tracker.register_press(time, screen) {
                events.push(InputEvent::DoubleClick { pos: image_pos });
            } else if let Some(pos) = image_pos {
                events.push(InputEvent::PointerDown {
                    pos,
                    button: PointerButton::Primary,
                });
            }
        }
        if mouse.just_pressed(MouseButton::Right) {
            events.push(InputEvent::SecondaryClick { pos: image_pos });
        }
    }

    // releases count even over the UI so drags always end
    if mouse.just_released(MouseButton::Left) {
        events.push(InputEvent::PointerUp);
    }
    events
}

pub fn handle_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    cursor: SurfaceCursor,
    mut contexts: EguiContexts,
    mut tracker: ResMut<ClickTracker>,
    mut state: ResMut<InteractionState>,
    mut store: ResMut<MeasurementStore>,
    mut last_image_pos: Local<Option<Vec2>>,
) {
    let over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area() || ctx.wants_pointer_input())
        .unwrap_or(false);

    let screen_pos = cursor.cursor_screen_pos();
    let image_pos = if over_ui {
        None
    } else {
        cursor.cursor_image_pos()
    };
    let moved = image_pos != *last_image_pos;
    *last_image_pos = image_pos;

    let events = pointer_events(
        &mouse,
        time.elapsed_secs_f64(),
        screen_pos,
        image_pos,
        moved,
        over_ui,
        &mut tracker,
    );
    if events.is_empty() {
        return;
    }

    let zoom = cursor.current_zoom();
    for event in events {
        state.handle(&mut store, event, zoom);
    }
}

fn mode_for_key(keyboard: &ButtonInput<KeyCode>) -> Option<MeasureMode> {
    const BINDINGS: [(KeyCode, MeasureMode); 9] = [
        (KeyCode::KeyS, MeasureMode::Select),
        (KeyCode::KeyP, MeasureMode::Point),
        (KeyCode::KeyL, MeasureMode::Line),
        (KeyCode::KeyO, MeasureMode::Polyline),
        (KeyCode::KeyA, MeasureMode::Angle),
        (KeyCode::KeyC, MeasureMode::Circle),
        (KeyCode::KeyR, MeasureMode::Rect),
        (KeyCode::KeyE, MeasureMode::Ellipse),
        (KeyCode::KeyG, MeasureMode::Polygon),
    ];
    BINDINGS
        .iter()
        .find(|(key, _)| keyboard.just_pressed(*key))
        .map(|(_, mode)| *mode)
}

fn key_command(keyboard: &ButtonInput<KeyCode>) -> Option<KeyCommand> {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft)
        || keyboard.pressed(KeyCode::ControlRight)
        || keyboard.pressed(KeyCode::SuperLeft)
        || keyboard.pressed(KeyCode::SuperRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if ctrl && keyboard.just_pressed(KeyCode::KeyZ) {
        // Ctrl+Shift+Z = redo
        Some(if shift { KeyCommand::Redo } else { KeyCommand::Undo })
    } else if ctrl && keyboard.just_pressed(KeyCode::KeyY) {
        Some(KeyCommand::Redo)
    } else if keyboard.just_pressed(KeyCode::Escape) {
        Some(KeyCommand::Cancel)
    } else if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace) {
        Some(KeyCommand::DeleteSelected)
    } else {
        None
    }
}

/// Undo/redo, cancel, delete and the mode hotkeys
pub fn handle_measure_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut state: ResMut<InteractionState>,
    mut store: ResMut<MeasurementStore>,
) {
    // Don't react while typing in a text field (e.g. renaming a measurement)
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if let Some(cmd) = key_command(&keyboard) {
        if state.apply_command(&mut store, cmd) {
            debug!("Key command {:?}", cmd);
        }
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl && let Some(mode) = mode_for_key(&keyboard) {
        state.set_mode(mode, &mut store);
    }
}
