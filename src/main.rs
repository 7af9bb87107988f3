mod config;
mod constants;
mod logging;
mod measure;
mod paths;
mod surface;
mod ui;

use bevy::asset::UnapprovedPathMode;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

fn main() {
    if let Err(e) = paths::ensure_directories() {
        eprintln!("Failed to create application directories: {}", e);
    }

    let _log_guard = logging::init();
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Scopemark".into(),
                        resolution: (DEFAULT_WINDOW_WIDTH as u32, DEFAULT_WINDOW_HEIGHT as u32)
                            .into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Images are opened from arbitrary absolute paths
                    unapproved_path_mode: UnapprovedPathMode::Allow,
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin::default())
        .add_plugins(config::ConfigPlugin)
        .add_plugins(surface::SurfacePlugin)
        .add_plugins(measure::MeasurePlugin)
        .add_plugins(ui::UiPlugin)
        .run();
}
