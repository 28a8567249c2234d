use crate::core::gfx::BlendMode;

/// A sprite can be sourced from either a texture or a solid color.
/// For `Solid`, the final color is `tint` (no sampling).
#[derive(Clone, Debug)]
pub enum SpriteSource {
    Texture(String),
    Solid,
}

#[derive(Clone, Debug)]
pub enum Actor {
    Sprite {
        align: [f32; 2],
        offset: [f32; 2],
        size: [f32; 2],
        source: SpriteSource,
        tint: [f32; 4],
        z: i16,
        rot_z_deg: f32,
        visible: bool,
        blend: BlendMode,
    },

    /// Single-line bitmap text. `align` pivots the line box around `offset`;
    /// `zoom` scales on top of the base pixel height.
    Text {
        align: [f32; 2],
        offset: [f32; 2],
        px: f32,
        color: [f32; 4],
        font: &'static str,
        content: String,
        zoom: f32,
        z: i16,
    },
}
