//! The zoomable, pannable image that measurements are drawn on.
//!
//! An image is opened by path (from the toolbar's file dialog, the recent
//! list, or the last image remembered in config) and loaded through the
//! `AssetServer`. Once loaded it is spawned as a sprite carrying an
//! [`ImageSurface`], and the measurement store is told a surface exists.

mod camera;
mod image;
pub mod params;

pub use camera::{CameraZoom, SurfaceCamera};
pub use image::ImageSurface;
pub use params::SurfaceCursor;

use bevy::asset::LoadState;
use bevy::prelude::*;
use std::path::PathBuf;

use crate::config::{AppConfig, ConfigLoaded, UpdateLastImagePathRequest};
use crate::measure::MeasurementStore;

/// Message to open an image file as the measurement surface
#[derive(Message)]
pub struct OpenImageRequest {
    pub path: PathBuf,
}

/// Message to recentre and zoom the camera on the current image
#[derive(Message)]
pub struct FitToImageRequest;

struct PendingImage {
    handle: Handle<Image>,
    path: PathBuf,
}

#[derive(Resource, Default)]
pub struct SurfaceState {
    pending: Option<PendingImage>,
    /// Last image load failure, shown in an error dialog until dismissed
    pub load_error: Option<String>,
}

impl SurfaceState {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_path(&self) -> Option<&PathBuf> {
        self.pending.as_ref().map(|p| &p.path)
    }
}

/// Startup system to reopen the image from the previous session
fn reopen_last_image(config: Res<AppConfig>, mut open_events: MessageWriter<OpenImageRequest>) {
    if let Some(path) = &config.data.last_image_path
        && path.exists()
    {
        info!("Reopening last image {:?}", path);
        open_events.write(OpenImageRequest { path: path.clone() });
    }
}

fn open_image_system(
    mut events: MessageReader<OpenImageRequest>,
    asset_server: Res<AssetServer>,
    mut state: ResMut<SurfaceState>,
) {
    // only the newest request matters
    let Some(event) = events.read().last() else {
        return;
    };

    if !event.path.exists() {
        warn!("Image not found: {:?}", event.path);
        state.load_error = Some(format!("Image not found:\n{}", event.path.display()));
        return;
    }

    info!("Loading image {:?}", event.path);
    let handle: Handle<Image> = asset_server.load(event.path.clone());
    state.pending = Some(PendingImage {
        handle,
        path: event.path.clone(),
    });
}

/// Swap in the new image sprite once its asset has finished loading
#[allow(clippy::too_many_arguments)]
fn finish_image_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut state: ResMut<SurfaceState>,
    existing: Query<Entity, With<ImageSurface>>,
    mut store: ResMut<MeasurementStore>,
    mut config_events: MessageWriter<UpdateLastImagePathRequest>,
    mut fit_events: MessageWriter<FitToImageRequest>,
) {
    let Some(pending) = &state.pending else {
        return;
    };

    match asset_server.load_state(&pending.handle) {
        LoadState::Loaded => {
            let Some(image) = images.get(&pending.handle) else {
                return;
            };
            let size = image.size_f32();
            let path = pending.path.clone();

            for entity in existing.iter() {
                commands.entity(entity).despawn();
            }
            commands.spawn((
                Sprite::from_image(pending.handle.clone()),
                Transform::from_xyz(0.0, 0.0, 0.0),
                ImageSurface::new(size, path.clone()),
            ));

            info!("Image {:?} loaded ({}x{})", path, size.x, size.y);
            store.set_surface_attached(true);
            config_events.write(UpdateLastImagePathRequest { path });
            fit_events.write(FitToImageRequest);
            state.pending = None;
            state.load_error = None;
        }
        LoadState::Failed(err) => {
            warn!("Failed to load image {:?}: {}", pending.path, err);
            state.load_error = Some(format!(
                "Could not load {}:\n{}",
                pending.path.display(),
                err
            ));
            state.pending = None;
        }
        LoadState::NotLoaded | LoadState::Loading => {}
    }
}

pub struct SurfacePlugin;

impl Plugin for SurfacePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SurfaceState>()
            .add_message::<OpenImageRequest>()
            .add_message::<FitToImageRequest>()
            .add_systems(Startup, camera::spawn_camera)
            .add_systems(Startup, reopen_last_image.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    open_image_system.run_if(on_message::<OpenImageRequest>),
                    finish_image_load,
                    camera::fit_camera_to_image,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_camera_zoom,
                )
                    .chain()
                    .after(camera::fit_camera_to_image),
            );
    }
}
