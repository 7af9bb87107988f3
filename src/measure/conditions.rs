//! Run conditions for controlling when measurement systems execute.

use bevy::prelude::*;

use crate::ui::DialogState;

use super::interaction::{InteractionState, MeasureMode};

/// Run condition: returns true when the current measure mode matches.
///
/// Usage: `.run_if(mode_is(MeasureMode::Select))`
pub fn mode_is(mode: MeasureMode) -> impl FnMut(Res<InteractionState>) -> bool + Clone {
    move |state: Res<InteractionState>| state.mode() == mode
}

/// Run condition: returns true when no modal dialog is open.
///
/// Use this to keep pointer and keyboard input away from the image while
/// the user is interacting with a dialog.
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}
