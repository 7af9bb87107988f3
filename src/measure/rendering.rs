//! Rendering systems for measurements: gizmo strokes and egui labels.
//!
//! Each primitive keeps its [`Rendering`](super::render::Rendering) up to
//! date inside the store; these systems only map image space onto the
//! surface and paint.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::surface::{ImageSurface, SurfaceCursor};

use super::gizmo::MeasureGizmoGroup;
use super::interaction::InteractionState;
use super::primitive::{Primitive, Rgb};
use super::render::{hover_highlight, PaintCommand};
use super::store::MeasurementStore;

/// Opacity of primitives that are not selected while another one is
const DIMMED_ALPHA: f32 = 0.4;
const DOT_ALPHA: f32 = 0.9;
const HOVER_ALPHA: f32 = 0.9;

fn rgb_color(rgb: Rgb, alpha: f32) -> Color {
    let [r, g, b] = rgb.channels();
    Color::srgba_u8(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

fn primitive_alpha(store: &MeasurementStore, primitive: &Primitive) -> f32 {
    match store.selected() {
        Some(id) if id != primitive.id() => DIMMED_ALPHA,
        _ => 1.0,
    }
}

fn paint(
    gizmos: &mut Gizmos<MeasureGizmoGroup>,
    surface: &ImageSurface,
    command: &PaintCommand,
    color: Color,
) {
    match command {
        PaintCommand::Segment { from, to } => {
            gizmos.line_2d(surface.image_to_world(*from), surface.image_to_world(*to), color);
        }
        PaintCommand::Dot { center, radius } => {
            let center = Isometry2d::from_translation(surface.image_to_world(*center));
            let dot = color.with_alpha(color.alpha() * DOT_ALPHA);
            // concentric rings read as a filled marker at small radii
            let mut r = *radius;
            while r > 0.5 {
                gizmos.circle_2d(center, r, dot);
                r -= 1.0;
            }
        }
        PaintCommand::Circle { center, radius } => {
            let center = Isometry2d::from_translation(surface.image_to_world(*center));
            gizmos.circle_2d(center, *radius, color);
        }
        PaintCommand::Rect { min, size } => {
            let center = surface.image_to_world(*min + *size / 2.0);
            gizmos.rect_2d(Isometry2d::from_translation(center), *size, color);
        }
        PaintCommand::Ellipse { center, half_size } => {
            let center = Isometry2d::from_translation(surface.image_to_world(*center));
            gizmos.ellipse_2d(center, *half_size, color);
        }
        PaintCommand::Path { points, closed } => {
            let world = points.iter().map(|p| surface.image_to_world(*p));
            let closing = points
                .first()
                .filter(|_| *closed)
                .map(|p| surface.image_to_world(*p));
            gizmos.linestrip_2d(world.chain(closing), color);
        }
    }
}

pub fn draw_measurements(
    mut gizmos: Gizmos<MeasureGizmoGroup>,
    store: Res<MeasurementStore>,
    surfaces: Query<&ImageSurface>,
) {
    if !store.layer_visible() {
        return;
    }
    let Ok(surface) = surfaces.single() else {
        return;
    };

    for primitive in store.primitives().iter().filter(|p| p.is_visible()) {
        let color = rgb_color(primitive.color(), primitive_alpha(&store, primitive));
        for command in &primitive.rendering().commands {
            paint(&mut gizmos, surface, command, color);
        }
    }
}

/// Crosshair over the control point under the cursor in Select mode
pub fn draw_hover_highlight(
    mut gizmos: Gizmos<MeasureGizmoGroup>,
    store: Res<MeasurementStore>,
    state: Res<InteractionState>,
    surfaces: Query<&ImageSurface>,
) {
    if !store.layer_visible() {
        return;
    }
    let (Some(target), Ok(surface)) = (state.hover(), surfaces.single()) else {
        return;
    };

    let color = Color::WHITE.with_alpha(HOVER_ALPHA);
    for command in hover_highlight(target.point) {
        paint(&mut gizmos, surface, &command, color);
    }
}

/// Render measurement labels using egui areas pinned to image positions
pub fn draw_measurement_labels(
    mut contexts: EguiContexts,
    store: Res<MeasurementStore>,
    cursor: SurfaceCursor,
) -> Result {
    if !store.layer_visible() {
        return Ok(());
    }
    let ctx = contexts.ctx_mut()?;

    for primitive in store.primitives().iter().filter(|p| p.is_visible()) {
        let Some(label) = &primitive.rendering().label else {
            continue;
        };
        if label.text.is_empty() {
            continue;
        }
        let Some(screen_pos) = cursor.image_to_viewport(label.anchor) else {
            continue;
        };

        let [r, g, b] = primitive.color().channels();
        let alpha = (primitive_alpha(&store, primitive) * 255.0) as u8;
        let text_color = egui::Color32::from_rgba_unmultiplied(r, g, b, alpha);

        egui::Area::new(egui::Id::new(("measurement_label", primitive.id().0)))
            .fixed_pos(egui::pos2(screen_pos.x, screen_pos.y))
            .order(egui::Order::Background)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_black_alpha(alpha / 2))
                    .inner_margin(egui::Margin::symmetric(3, 1))
                    .corner_radius(2.0)
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&label.text)
                                .color(text_color)
                                .size(12.0)
                                .monospace(),
                        );
                    });
            });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::kind::PrimitiveKind;

    #[test]
    fn test_rgb_color_channels() {
        let srgba = rgb_color(Rgb(0xff8000), 1.0).to_srgba();
        assert!((srgba.red - 1.0).abs() < 1e-3);
        assert!((srgba.green - 128.0 / 255.0).abs() < 1e-3);
        assert!(srgba.blue.abs() < 1e-3);
        assert!((srgba.alpha - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_selection_dims_others() {
        let mut store = MeasurementStore::default();
        store.set_surface_attached(true);
        let a = store.create_primitive(PrimitiveKind::Point).unwrap();
        let b = store.create_primitive(PrimitiveKind::Point).unwrap();

        let alpha_of = |store: &MeasurementStore, id| {
            primitive_alpha(store, store.primitive(id).unwrap())
        };
        assert_eq!(alpha_of(&store, a), 1.0);
        assert_eq!(alpha_of(&store, b), 1.0);

        store.select(Some(b));
        assert_eq!(alpha_of(&store, a), DIMMED_ALPHA);
        assert_eq!(alpha_of(&store, b), 1.0);
    }
}
