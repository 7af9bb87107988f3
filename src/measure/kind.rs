//! The closed set of measurement primitive kinds.

use serde::{Deserialize, Serialize};

/// How a primitive of a given kind is constructed with the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// A single press creates and commits the primitive.
    Click,
    /// Press sets both anchors, moving drags the second one, release commits.
    DragToDefine,
    /// Every press appends one point; an explicit gesture (or the kind's own
    /// point limit) ends construction.
    Accumulate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Point,
    Line,
    Polyline,
    Angle,
    Circle,
    Rect,
    Ellipse,
    Polygon,
}

impl PrimitiveKind {
    pub fn all() -> &'static [PrimitiveKind] {
        &[
            PrimitiveKind::Point,
            PrimitiveKind::Line,
            PrimitiveKind::Polyline,
            PrimitiveKind::Angle,
            PrimitiveKind::Circle,
            PrimitiveKind::Rect,
            PrimitiveKind::Ellipse,
            PrimitiveKind::Polygon,
        ]
    }

    /// Default human-readable name, used for new primitives and when a
    /// rename is cleared.
    pub fn display_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Point => "Point",
            PrimitiveKind::Line => "Line",
            PrimitiveKind::Polyline => "Polyline",
            PrimitiveKind::Angle => "Angle",
            PrimitiveKind::Circle => "Circle",
            PrimitiveKind::Rect => "Rectangle",
            PrimitiveKind::Ellipse => "Ellipse",
            PrimitiveKind::Polygon => "Polygon",
        }
    }

    pub fn gesture(&self) -> Gesture {
        match self {
            PrimitiveKind::Point => Gesture::Click,
            PrimitiveKind::Line
            | PrimitiveKind::Circle
            | PrimitiveKind::Rect
            | PrimitiveKind::Ellipse => Gesture::DragToDefine,
            PrimitiveKind::Polyline | PrimitiveKind::Angle | PrimitiveKind::Polygon => {
                Gesture::Accumulate
            }
        }
    }

    /// Minimum number of points a committed primitive of this kind must hold.
    pub fn min_committed_points(&self) -> usize {
        match self {
            PrimitiveKind::Point => 1,
            PrimitiveKind::Line
            | PrimitiveKind::Polyline
            | PrimitiveKind::Circle
            | PrimitiveKind::Rect
            | PrimitiveKind::Ellipse => 2,
            PrimitiveKind::Angle | PrimitiveKind::Polygon => 3,
        }
    }

    /// Point count at which construction ends on its own, if any.
    pub fn auto_finalize_at(&self) -> Option<usize> {
        match self {
            PrimitiveKind::Angle => Some(3),
            _ => None,
        }
    }
}
