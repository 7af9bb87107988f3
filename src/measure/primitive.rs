//! A single measured shape and its cached rendering.

use std::fmt;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MEASUREMENT_COLOR;

use super::kind::PrimitiveKind;
use super::render::{render, Rendering};

/// Store-unique primitive identifier. Preserved across undo/redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimitiveId(pub u64);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m-{}", self.0)
    }
}

/// Packed `0xRRGGBB` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Default for Rgb {
    fn default() -> Self {
        Rgb(DEFAULT_MEASUREMENT_COLOR)
    }
}

impl Rgb {
    pub fn from_channels([r, g, b]: [u8; 3]) -> Self {
        Rgb((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    pub fn channels(&self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        ]
    }

    /// `#rrggbb` notation, as shown in colour pickers.
    pub fn to_hex(&self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }
}

#[derive(Debug, Clone)]
pub struct Primitive {
    id: PrimitiveId,
    kind: PrimitiveKind,
    pub(super) name: String,
    pub(super) points: Vec<Vec2>,
    pub(super) preview: Option<Vec2>,
    pub(super) color: Rgb,
    pub(super) visible: bool,
    rendering: Rendering,
}

impl Primitive {
    pub(super) fn new(id: PrimitiveId, kind: PrimitiveKind, color: Rgb) -> Self {
        Self {
            id,
            kind,
            name: kind.display_name().to_string(),
            points: Vec::new(),
            preview: None,
            color,
            visible: true,
            rendering: Rendering::default(),
        }
    }

    pub fn id(&self) -> PrimitiveId {
        self.id
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn preview(&self) -> Option<Vec2> {
        self.preview
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn rendering(&self) -> &Rendering {
        &self.rendering
    }

    pub fn label_text(&self) -> &str {
        self.rendering.label_text()
    }

    /// Recomputes paint commands and label from the current points.
    pub(super) fn refresh(&mut self) {
        self.rendering = render(self.kind, &self.points, self.preview);
    }
}
