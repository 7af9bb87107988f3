use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::constants::{MAX_CAMERA_SCALE, MIN_CAMERA_SCALE};

use super::image::ImageSurface;
use super::FitToImageRequest;

#[derive(Component)]
pub struct SurfaceCamera;

/// Orthographic scale of the surface camera. Display zoom is `1 / scale`.
#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl CameraZoom {
    pub fn zoom(&self) -> f32 {
        1.0 / self.scale
    }
}

/// Scale that fits an image of `image_size` into `viewport` with a margin.
pub fn fit_scale(image_size: Vec2, viewport: Vec2) -> f32 {
    if image_size.x <= 0.0 || image_size.y <= 0.0 || viewport.x <= 0.0 || viewport.y <= 0.0 {
        return 1.0;
    }
    let scale = (image_size.x / viewport.x).max(image_size.y / viewport.y) * 1.1;
    scale.clamp(MIN_CAMERA_SCALE, MAX_CAMERA_SCALE)
}

fn is_pointer_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        SurfaceCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<SurfaceCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut CameraZoom, With<SurfaceCamera>>,
    mut contexts: EguiContexts,
) {
    // scrolling the measurement list must not zoom the image
    if is_pointer_over_ui(&mut contexts) {
        scroll_events.clear();
        return;
    }

    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let steps = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.01,
        };
        zoom.scale = (zoom.scale * 0.9_f32.powf(steps)).clamp(MIN_CAMERA_SCALE, MAX_CAMERA_SCALE);
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<SurfaceCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}

/// Centre the camera on the image and zoom so the whole image is visible.
pub fn fit_camera_to_image(
    mut requests: MessageReader<FitToImageRequest>,
    window: Query<&Window, With<PrimaryWindow>>,
    surfaces: Query<&ImageSurface>,
    mut camera_query: Query<(&mut Transform, &mut CameraZoom), With<SurfaceCamera>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    let Ok(surface) = surfaces.single() else {
        return;
    };
    let Ok((mut transform, mut zoom)) = camera_query.single_mut() else {
        return;
    };
    let viewport = window
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(Vec2::ONE);

    transform.translation.x = 0.0;
    transform.translation.y = 0.0;
    zoom.scale = fit_scale(surface.size, viewport);
    debug!("Fit camera to {} (scale {:.3})", surface.file_name(), zoom.scale);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_is_inverse_scale() {
        let zoom = CameraZoom { scale: 0.25 };
        assert_eq!(zoom.zoom(), 4.0);
    }

    #[test]
    fn test_fit_scale_uses_limiting_axis() {
        // tall image in a wide window: height decides
        let scale = fit_scale(Vec2::new(100.0, 2000.0), Vec2::new(1600.0, 900.0));
        assert!((scale - 2000.0 / 900.0 * 1.1).abs() < 1e-4);
    }

    #[test]
    fn test_fit_scale_degenerate_inputs() {
        assert_eq!(fit_scale(Vec2::ZERO, Vec2::new(800.0, 600.0)), 1.0);
        assert_eq!(fit_scale(Vec2::new(800.0, 600.0), Vec2::ZERO), 1.0);
    }

    #[test]
    fn test_fit_scale_is_clamped() {
        assert_eq!(fit_scale(Vec2::splat(1.0), Vec2::splat(10000.0)), MIN_CAMERA_SCALE);
    }
}
