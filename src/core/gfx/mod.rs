pub mod opengl;

use cgmath::Matrix4;
use image::RgbaImage;
use std::{collections::HashMap, error::Error, sync::Arc};
use winit::window::Window;

// --- Public Data Contract ---
#[derive(Clone)]
pub struct RenderList {
    pub clear_color: [f32; 4],
    pub objects: Vec<RenderObject>,
}

#[derive(Clone)]
pub struct RenderObject {
    pub object_type: ObjectType,
    pub transform: Matrix4<f32>,
    pub blend: BlendMode,
    pub z: i16,
    pub order: u32,
}

#[derive(Clone)]
pub enum ObjectType {
    SolidColor {
        color: [f32; 4],
    },
    Sprite {
        texture_id: String,
        tint: [f32; 4],
        uv_scale: [f32; 2],
        uv_offset: [f32; 2],
    },
}

#[allow(dead_code)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Alpha,
    Add,
}

pub use opengl::Texture;

/// The one concrete backend. Everything render-related funnels through here
/// so screens never touch GL directly.
pub struct Backend {
    state: opengl::State,
}

impl Backend {
    pub fn draw(
        &mut self,
        render_list: &RenderList,
        textures: &HashMap<String, Texture>,
    ) -> Result<u32, Box<dyn Error>> {
        opengl::draw(&mut self.state, render_list, textures)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        opengl::resize(&mut self.state, width, height);
    }

    pub fn cleanup(&mut self) {
        opengl::cleanup(&mut self.state);
    }

    pub fn create_texture(&mut self, image: &RgbaImage) -> Result<Texture, Box<dyn Error>> {
        Ok(opengl::create_texture(&self.state.gl, image)?)
    }

    pub fn dispose_textures(&mut self, textures: &mut HashMap<String, Texture>) {
        let old_textures = std::mem::take(textures);
        opengl::delete_textures(&self.state.gl, old_textures.into_values());
    }
}

/// Creates and initializes the graphics backend for a window.
pub fn create_backend(window: Arc<Window>, vsync_enabled: bool) -> Result<Backend, Box<dyn Error>> {
    Ok(Backend {
        state: opengl::init(window, vsync_enabled)?,
    })
}
