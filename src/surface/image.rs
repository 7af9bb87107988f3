//! The image surface entity and image-space coordinate conversion.
//!
//! The image sprite is centred on the world origin at one world unit per
//! image pixel. Image space has its origin at the top-left pixel corner with
//! y growing downwards; world space has y growing upwards.

use bevy::prelude::*;
use std::path::PathBuf;

/// Marker and metadata for the sprite that measurements are drawn on.
#[derive(Component, Debug, Clone)]
pub struct ImageSurface {
    /// Image size in pixels
    pub size: Vec2,
    pub path: PathBuf,
}

impl ImageSurface {
    pub fn new(size: Vec2, path: PathBuf) -> Self {
        Self { size, path }
    }

    pub fn contains(&self, image_pos: Vec2) -> bool {
        image_pos.x >= 0.0
            && image_pos.y >= 0.0
            && image_pos.x <= self.size.x
            && image_pos.y <= self.size.y
    }

    /// World position to image pixel coordinates, `None` outside the image.
    pub fn world_to_image(&self, world: Vec2) -> Option<Vec2> {
        let image_pos = Vec2::new(world.x + self.size.x / 2.0, self.size.y / 2.0 - world.y);
        self.contains(image_pos).then_some(image_pos)
    }

    /// Image pixel coordinates to world position. Not clamped: shapes may
    /// extend past the image edge.
    pub fn image_to_world(&self, image_pos: Vec2) -> Vec2 {
        Vec2::new(image_pos.x - self.size.x / 2.0, self.size.y / 2.0 - image_pos.y)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string())
    }
}
