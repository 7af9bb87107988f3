//! SystemParam bundle for mapping between the cursor, the world and image space.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::camera::{CameraZoom, SurfaceCamera};
use super::image::ImageSurface;

/// Bundled window, camera and surface queries for image-space conversions
#[derive(SystemParam)]
pub struct SurfaceCursor<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<
        'w,
        's,
        (&'static Camera, &'static GlobalTransform, &'static CameraZoom),
        With<SurfaceCamera>,
    >,
    pub surface: Query<'w, 's, &'static ImageSurface>,
}

impl SurfaceCursor<'_, '_> {
    /// Cursor position in window (screen) pixels
    pub fn cursor_screen_pos(&self) -> Option<Vec2> {
        self.window.single().ok()?.cursor_position()
    }

    /// Get the world position of the cursor, if available
    pub fn cursor_world_pos(&self) -> Option<Vec2> {
        let cursor_pos = self.cursor_screen_pos()?;
        let (camera, transform, _) = self.camera.single().ok()?;
        camera.viewport_to_world_2d(transform, cursor_pos).ok()
    }

    /// Cursor in image pixel coordinates. `None` without an image or when the
    /// cursor is outside it.
    pub fn cursor_image_pos(&self) -> Option<Vec2> {
        let surface = self.surface.single().ok()?;
        surface.world_to_image(self.cursor_world_pos()?)
    }

    /// Current display zoom (screen pixels per image pixel)
    pub fn current_zoom(&self) -> f32 {
        self.camera
            .single()
            .map(|(_, _, zoom)| zoom.zoom())
            .unwrap_or(1.0)
    }

    /// Screen position of an image-space point
    pub fn image_to_viewport(&self, image_pos: Vec2) -> Option<Vec2> {
        let surface = self.surface.single().ok()?;
        let (camera, transform, _) = self.camera.single().ok()?;
        let world = surface.image_to_world(image_pos);
        camera.world_to_viewport(transform, world.extend(0.0)).ok()
    }
}
