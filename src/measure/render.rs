//! Turns a primitive's points into paint commands and a measurement label.
//!
//! The output is backend-agnostic: coordinates stay in image space and the
//! bevy adapter in [`super::rendering`] maps them onto the display surface.

use bevy::math::Vec2;

use super::geometry::{
    angle_degrees, dashed_segments, distance, polygon_area, polygon_perimeter, polyline_length,
    CircleMetrics, EllipseMetrics, RectMetrics,
};
use super::kind::PrimitiveKind;

/// Dash and gap length of pending preview strokes, in image pixels.
pub const DASH_LENGTH: f32 = 8.0;
pub const DASH_GAP: f32 = 4.0;

const POINT_DOT_RADIUS: f32 = 3.0;
const HOVER_RING_RADIUS: f32 = 5.0;
const HOVER_CROSSHAIR_HALF: f32 = 6.0;

/// Default label placement relative to its anchor point.
const LABEL_OFFSET: Vec2 = Vec2::new(6.0, -12.0);

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Segment { from: Vec2, to: Vec2 },
    /// Small filled marker.
    Dot { center: Vec2, radius: f32 },
    Circle { center: Vec2, radius: f32 },
    Rect { min: Vec2, size: Vec2 },
    Ellipse { center: Vec2, half_size: Vec2 },
    /// Chain through `points`; `closed` adds the last → first edge.
    Path { points: Vec<Vec2>, closed: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Top-left of the text, in image space.
    pub anchor: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendering {
    pub commands: Vec<PaintCommand>,
    pub label: Option<Label>,
}

impl Rendering {
    pub fn label_text(&self) -> &str {
        self.label.as_ref().map(|l| l.text.as_str()).unwrap_or("")
    }

    fn dashed(&mut self, from: Vec2, to: Vec2) {
        self.commands.extend(
            dashed_segments(from, to, DASH_LENGTH, DASH_GAP)
                .into_iter()
                .map(|(from, to)| PaintCommand::Segment { from, to }),
        );
    }

    fn label(&mut self, text: String, anchor: Vec2) {
        self.label = Some(Label { text, anchor });
    }
}

/// Renders one primitive. `preview` is the live cursor position while the
/// primitive is still being built; it never counts towards committed totals.
pub fn render(kind: PrimitiveKind, points: &[Vec2], preview: Option<Vec2>) -> Rendering {
    let mut out = Rendering::default();
    match kind {
        PrimitiveKind::Point => render_point(&mut out, points),
        PrimitiveKind::Line => render_line(&mut out, points),
        PrimitiveKind::Polyline => render_polyline(&mut out, points, preview),
        PrimitiveKind::Angle => render_angle(&mut out, points, preview),
        PrimitiveKind::Circle => render_circle(&mut out, points),
        PrimitiveKind::Rect => render_rect(&mut out, points),
        PrimitiveKind::Ellipse => render_ellipse(&mut out, points),
        PrimitiveKind::Polygon => render_polygon(&mut out, points, preview),
    }
    out
}

fn render_point(out: &mut Rendering, points: &[Vec2]) {
    let Some(&p) = points.first() else {
        return;
    };
    out.commands.push(PaintCommand::Dot {
        center: p,
        radius: POINT_DOT_RADIUS,
    });
    out.label(format!("({:.1}, {:.1}) px", p.x, p.y), p + LABEL_OFFSET);
}

fn render_line(out: &mut Rendering, points: &[Vec2]) {
    let [p0, p1, ..] = points else {
        return;
    };
    out.commands.push(PaintCommand::Segment { from: *p0, to: *p1 });
    let mid = (*p0 + *p1) / 2.0;
    out.label(
        format!("{:.2} px", distance(*p0, *p1)),
        mid + Vec2::new(4.0, -14.0),
    );
}

fn render_polyline(out: &mut Rendering, points: &[Vec2], preview: Option<Vec2>) {
    match points {
        [] => {}
        [p0] => {
            if let Some(pv) = preview {
                out.dashed(*p0, pv);
                out.label(format!("L≈{:.2} px", distance(*p0, pv)), pv + LABEL_OFFSET);
            }
        }
        [.., last] => {
            out.commands.push(PaintCommand::Path {
                points: points.to_vec(),
                closed: false,
            });
            if let Some(pv) = preview {
                out.dashed(*last, pv);
            }
            let anchor = preview.unwrap_or(*last);
            out.label(
                format!("L={:.2} px", polyline_length(points)),
                anchor + LABEL_OFFSET,
            );
        }
    }
}

fn render_angle(out: &mut Rendering, points: &[Vec2], preview: Option<Vec2>) {
    match (points, preview) {
        ([p0], Some(pv)) => out.dashed(*p0, pv),
        ([p0, vertex], None) => out.commands.push(PaintCommand::Segment {
            from: *vertex,
            to: *p0,
        }),
        ([p0, vertex], Some(pv)) => {
            out.commands.push(PaintCommand::Segment {
                from: *vertex,
                to: *p0,
            });
            out.dashed(*vertex, pv);
            angle_label(out, *p0, *vertex, pv);
        }
        ([p0, vertex, p2, ..], _) => {
            out.commands.push(PaintCommand::Segment {
                from: *vertex,
                to: *p0,
            });
            out.commands.push(PaintCommand::Segment {
                from: *vertex,
                to: *p2,
            });
            angle_label(out, *p0, *vertex, *p2);
        }
        _ => {}
    }
}

fn angle_label(out: &mut Rendering, p0: Vec2, vertex: Vec2, p2: Vec2) {
    out.label(
        format!("{:.2}°", angle_degrees(p0, vertex, p2)),
        vertex + Vec2::new(6.0, -16.0),
    );
}

fn render_circle(out: &mut Rendering, points: &[Vec2]) {
    let [center, edge, ..] = points else {
        return;
    };
    let circle = CircleMetrics::from_center_edge(*center, *edge);
    out.commands.push(PaintCommand::Circle {
        center: circle.center,
        radius: circle.radius,
    });
    out.label(
        format!(
            "R={:.2} px, D={:.2} px, C={:.2} px",
            circle.radius, circle.diameter, circle.circumference
        ),
        circle.center + Vec2::new(circle.radius + 6.0, -12.0),
    );
}

fn render_rect(out: &mut Rendering, points: &[Vec2]) {
    let [p0, p1, ..] = points else {
        return;
    };
    let rect = RectMetrics::from_corners(*p0, *p1);
    out.commands.push(PaintCommand::Rect {
        min: rect.min,
        size: rect.size(),
    });
    out.label(
        format!(
            "W={:.2} px, H={:.2} px, P={:.2} px, A={:.2} px²",
            rect.width, rect.height, rect.perimeter, rect.area
        ),
        rect.min + Vec2::new(rect.width + 6.0, -12.0),
    );
}

fn render_ellipse(out: &mut Rendering, points: &[Vec2]) {
    let [p0, p1, ..] = points else {
        return;
    };
    let ellipse = EllipseMetrics::from_corners(*p0, *p1);
    out.commands.push(PaintCommand::Ellipse {
        center: ellipse.center,
        half_size: Vec2::new(ellipse.a, ellipse.b),
    });
    out.label(
        format!(
            "a={:.2} px, b={:.2} px, P≈{:.2} px, A={:.2} px²",
            ellipse.a, ellipse.b, ellipse.perimeter, ellipse.area
        ),
        ellipse.center + Vec2::new(ellipse.a + 6.0, -12.0),
    );
}

fn render_polygon(out: &mut Rendering, points: &[Vec2], preview: Option<Vec2>) {
    match points {
        [] => {}
        [p0] => {
            if let Some(pv) = preview {
                out.dashed(*p0, pv);
            }
        }
        [first, second, ..] => {
            let last = points[points.len() - 1];
            let closed = points.len() >= 3;
            out.commands.push(PaintCommand::Path {
                points: points.to_vec(),
                closed,
            });
            if let Some(pv) = preview {
                out.dashed(last, pv);
            }
            let text = if closed {
                format!(
                    "P={:.2} px, A={:.2} px²",
                    polygon_perimeter(points),
                    polygon_area(points)
                )
            } else {
                format!("L={:.2} px", distance(*first, *second))
            };
            out.label(text, preview.unwrap_or(last) + LABEL_OFFSET);
        }
    }
}

/// Crosshair and ring drawn over a hovered control point.
pub fn hover_highlight(point: Vec2) -> Vec<PaintCommand> {
    let dx = Vec2::new(HOVER_CROSSHAIR_HALF, 0.0);
    let dy = Vec2::new(0.0, HOVER_CROSSHAIR_HALF);
    vec![
        PaintCommand::Circle {
            center: point,
            radius: HOVER_RING_RADIUS,
        },
        PaintCommand::Segment {
            from: point - dx,
            to: point + dx,
        },
        PaintCommand::Segment {
            from: point - dy,
            to: point + dy,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn test_point_label() {
        let out = render(PrimitiveKind::Point, &[v(12.34, 5.0)], None);
        assert_eq!(out.label_text(), "(12.3, 5.0) px");
        assert!(matches!(out.commands[0], PaintCommand::Dot { .. }));
    }

    #[test]
    fn test_line_label() {
        let out = render(PrimitiveKind::Line, &[v(0.0, 0.0), v(3.0, 4.0)], None);
        assert_eq!(out.label_text(), "5.00 px");
    }

    #[test]
    fn test_rect_label() {
        let out = render(PrimitiveKind::Rect, &[v(0.0, 0.0), v(4.0, 3.0)], None);
        assert_eq!(
            out.label_text(),
            "W=4.00 px, H=3.00 px, P=14.00 px, A=12.00 px²"
        );
    }

    #[test]
    fn test_circle_label() {
        let out = render(PrimitiveKind::Circle, &[v(0.0, 0.0), v(5.0, 0.0)], None);
        assert_eq!(out.label_text(), "R=5.00 px, D=10.00 px, C=31.42 px");
    }

    #[test]
    fn test_zero_radius_circle_still_renders() {
        let out = render(PrimitiveKind::Circle, &[v(2.0, 2.0), v(2.0, 2.0)], None);
        assert_eq!(
            out.commands,
            vec![PaintCommand::Circle {
                center: v(2.0, 2.0),
                radius: 0.0
            }]
        );
        assert_eq!(out.label_text(), "R=0.00 px, D=0.00 px, C=0.00 px");
    }

    #[test]
    fn test_polygon_label() {
        let pts = [v(0.0, 0.0), v(4.0, 0.0), v(4.0, 3.0), v(0.0, 3.0)];
        let out = render(PrimitiveKind::Polygon, &pts, None);
        assert_eq!(out.label_text(), "P=14.00 px, A=12.00 px²");
        assert!(matches!(
            out.commands[0],
            PaintCommand::Path { closed: true, .. }
        ));
    }

    #[test]
    fn test_polygon_two_points_shows_segment() {
        let out = render(PrimitiveKind::Polygon, &[v(0.0, 0.0), v(6.0, 8.0)], None);
        assert_eq!(out.label_text(), "L=10.00 px");
        assert!(matches!(
            out.commands[0],
            PaintCommand::Path { closed: false, .. }
        ));
    }

    #[test]
    fn test_polygon_single_point_has_no_label() {
        let out = render(PrimitiveKind::Polygon, &[v(0.0, 0.0)], Some(v(10.0, 0.0)));
        assert!(out.label.is_none());
        assert!(!out.commands.is_empty());
    }

    #[test]
    fn test_angle_label() {
        let pts = [v(1.0, 0.0), v(0.0, 0.0), v(0.0, 1.0)];
        let out = render(PrimitiveKind::Angle, &pts, None);
        assert_eq!(out.label_text(), "90.00°");
    }

    #[test]
    fn test_angle_uses_preview_as_second_ray() {
        let pts = [v(10.0, 0.0), v(0.0, 0.0)];
        let out = render(PrimitiveKind::Angle, &pts, Some(v(0.0, -10.0)));
        assert_eq!(out.label_text(), "90.00°");
    }

    #[test]
    fn test_angle_with_one_point_has_no_label() {
        let out = render(PrimitiveKind::Angle, &[v(1.0, 0.0)], Some(v(20.0, 0.0)));
        assert!(out.label.is_none());
    }

    #[test]
    fn test_polyline_pending_segment_prefix() {
        let out = render(PrimitiveKind::Polyline, &[v(0.0, 0.0)], Some(v(3.0, 4.0)));
        assert_eq!(out.label_text(), "L≈5.00 px");
        assert!(out
            .commands
            .iter()
            .all(|c| matches!(c, PaintCommand::Segment { .. })));
    }

    #[test]
    fn test_polyline_single_point_without_preview_is_blank() {
        let out = render(PrimitiveKind::Polyline, &[v(0.0, 0.0)], None);
        assert_eq!(out, Rendering::default());
    }

    #[test]
    fn test_polyline_preview_excluded_from_total() {
        let pts = [v(0.0, 0.0), v(3.0, 4.0)];
        let out = render(PrimitiveKind::Polyline, &pts, Some(v(100.0, 100.0)));
        assert_eq!(out.label_text(), "L=5.00 px");
        // solid chain plus dashed pieces towards the cursor
        assert!(out.commands.len() > 1);
        assert_eq!(
            out.label.as_ref().map(|l| l.anchor),
            Some(v(100.0, 100.0) + LABEL_OFFSET)
        );
    }

    #[test]
    fn test_ellipse_label() {
        let out = render(PrimitiveKind::Ellipse, &[v(0.0, 0.0), v(10.0, 10.0)], None);
        assert_eq!(out.label_text(), "a=5.00 px, b=5.00 px, P≈31.42 px, A=78.54 px²");
    }

    #[test]
    fn test_incomplete_shapes_render_nothing() {
        for kind in [
            PrimitiveKind::Line,
            PrimitiveKind::Circle,
            PrimitiveKind::Rect,
            PrimitiveKind::Ellipse,
        ] {
            assert_eq!(render(kind, &[v(1.0, 1.0)], None), Rendering::default());
        }
        assert_eq!(render(PrimitiveKind::Point, &[], None), Rendering::default());
    }

    #[test]
    fn test_hover_highlight_shape() {
        let cmds = hover_highlight(v(10.0, 10.0));
        assert_eq!(cmds.len(), 3);
        assert_eq!(
            cmds[1],
            PaintCommand::Segment {
                from: v(4.0, 10.0),
                to: v(16.0, 10.0)
            }
        );
    }
}
