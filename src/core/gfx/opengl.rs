use crate::core::gfx::{BlendMode, ObjectType, RenderList};
use crate::core::space;
use cgmath::Matrix4;
use glow::{HasContext, PixelUnpackData, UniformLocation};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextAttributesBuilder, PossiblyCurrentContext},
    display::{Display, DisplayApiPreference},
    prelude::*,
    surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use image::RgbaImage;
use log::{info, warn};
use std::{collections::HashMap, error::Error, ffi::CStr, mem, num::NonZeroU32, sync::Arc};
use winit::window::Window;

// A handle to an OpenGL texture on the GPU.
#[derive(Debug, Clone, Copy)]
pub struct Texture(pub glow::Texture);

pub struct State {
    pub gl: glow::Context,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    program: glow::Program,
    mvp_location: UniformLocation,
    color_location: UniformLocation,
    use_texture_location: UniformLocation,
    texture_location: UniformLocation,
    uv_scale_location: UniformLocation,
    uv_offset_location: UniformLocation,
    projection: Matrix4<f32>,
    window_size: (u32, u32),
    // One shared VAO/VBO/IBO for a unit quad, reused for every object.
    shared_vao: glow::VertexArray,
    shared_vbo: glow::Buffer,
    shared_ibo: glow::Buffer,
    index_count: i32,
}

pub fn init(window: Arc<Window>, vsync_enabled: bool) -> Result<State, Box<dyn Error>> {
    info!("Initializing OpenGL backend...");

    let (gl_surface, gl_context, gl) = create_opengl_context(&window, vsync_enabled)?;
    let (
        program,
        mvp_location,
        color_location,
        use_texture_location,
        texture_location,
        uv_scale_location,
        uv_offset_location,
    ) = create_graphics_program(&gl)?;

    let (shared_vao, shared_vbo, shared_ibo, index_count) = unsafe {
        const UNIT_QUAD_VERTICES: [[f32; 4]; 4] = [
            [-0.5, -0.5, 0.0, 0.0],
            [0.5, -0.5, 1.0, 0.0],
            [0.5, 0.5, 1.0, 1.0],
            [-0.5, 0.5, 0.0, 1.0],
        ];
        const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

        let vao = gl.create_vertex_array()?;
        let vbo = gl.create_buffer()?;
        let ibo = gl.create_buffer()?;

        gl.bind_vertex_array(Some(vao));

        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            cast_slice(&UNIT_QUAD_VERTICES),
            glow::STATIC_DRAW,
        );

        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            cast_slice(&QUAD_INDICES),
            glow::STATIC_DRAW,
        );

        let stride = (4 * mem::size_of::<f32>()) as i32;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(
            1,
            2,
            glow::FLOAT,
            false,
            stride,
            (2 * mem::size_of::<f32>()) as i32,
        );

        gl.bind_vertex_array(None);

        (vao, vbo, ibo, QUAD_INDICES.len() as i32)
    };

    let initial_size = window.inner_size();
    let (vx, vy, vw, vh) = space::viewport_for_window(initial_size.width, initial_size.height);
    unsafe {
        gl.viewport(vx, vy, vw as i32, vh as i32);
    }

    // Constant program state.
    unsafe {
        gl.use_program(Some(program));
        gl.active_texture(glow::TEXTURE0);
        gl.uniform_1_i32(Some(&texture_location), 0);
        gl.uniform_2_f32(Some(&uv_scale_location), 1.0, 1.0);
        gl.uniform_2_f32(Some(&uv_offset_location), 0.0, 0.0);
        gl.use_program(None);
    }

    info!("OpenGL backend initialized successfully.");
    Ok(State {
        gl,
        gl_surface,
        gl_context,
        program,
        mvp_location,
        color_location,
        use_texture_location,
        texture_location,
        uv_scale_location,
        uv_offset_location,
        projection: space::ortho_projection(),
        window_size: (initial_size.width, initial_size.height),
        shared_vao,
        shared_vbo,
        shared_ibo,
        index_count,
    })
}

pub fn create_texture(gl: &glow::Context, image: &RgbaImage) -> Result<Texture, String> {
    unsafe {
        let t = gl.create_texture()?;
        gl.bind_texture(glow::TEXTURE_2D, Some(t));

        // Well-defined pixel-store state for tightly-packed RGBA8 uploads.
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.pixel_store_i32(glow::UNPACK_ROW_LENGTH, 0);
        gl.pixel_store_i32(glow::UNPACK_SKIP_ROWS, 0);
        gl.pixel_store_i32(glow::UNPACK_SKIP_PIXELS, 0);

        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_BASE_LEVEL, 0);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAX_LEVEL, 0);

        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            image.width() as i32,
            image.height() as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            PixelUnpackData::Slice(Some(image.as_raw().as_slice())),
        );

        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(Texture(t))
    }
}

pub fn delete_textures(gl: &glow::Context, textures: impl Iterator<Item = Texture>) {
    unsafe {
        for Texture(handle) in textures {
            gl.delete_texture(handle);
        }
    }
}

pub fn draw(
    state: &mut State,
    render_list: &RenderList,
    textures: &HashMap<String, Texture>,
) -> Result<u32, Box<dyn Error>> {
    let (width, height) = state.window_size;
    if width == 0 || height == 0 {
        return Ok(0);
    }

    #[inline(always)]
    fn apply_blend(gl: &glow::Context, want: BlendMode, last: &mut Option<BlendMode>) {
        if *last == Some(want) {
            return;
        }
        unsafe {
            gl.enable(glow::BLEND);
            gl.blend_equation(glow::FUNC_ADD);
            match want {
                BlendMode::Alpha => gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA),
                BlendMode::Add => gl.blend_func(glow::ONE, glow::ONE),
            }
        }
        *last = Some(want);
    }

    let mut drawn: u32 = 0;

    unsafe {
        let c = render_list.clear_color;
        state.gl.clear_color(c[0], c[1], c[2], c[3]);
        state.gl.clear(glow::COLOR_BUFFER_BIT);

        state.gl.use_program(Some(state.program));
        state.gl.active_texture(glow::TEXTURE0);
        state.gl.uniform_1_i32(Some(&state.texture_location), 0);
        state.gl.bind_vertex_array(Some(state.shared_vao));

        // Track to avoid redundant GL calls.
        let mut last_bound_tex: Option<glow::Texture> = None;
        let mut last_use_texture: Option<bool> = None;
        let mut last_blend: Option<BlendMode> = None;

        for object in &render_list.objects {
            apply_blend(&state.gl, object.blend, &mut last_blend);

            let mvp_array: [[f32; 4]; 4] = (state.projection * object.transform).into();
            state.gl.uniform_matrix_4_f32_slice(
                Some(&state.mvp_location),
                false,
                cast_slice(&mvp_array),
            );

            match &object.object_type {
                ObjectType::SolidColor { color } => {
                    if last_use_texture != Some(false) {
                        state.gl.uniform_1_i32(Some(&state.use_texture_location), 0);
                        last_use_texture = Some(false);
                    }
                    state
                        .gl
                        .uniform_4_f32_slice(Some(&state.color_location), color);
                }
                ObjectType::Sprite {
                    texture_id,
                    tint,
                    uv_scale,
                    uv_offset,
                } => {
                    let bound = bind_texture_for_object(
                        state,
                        textures,
                        texture_id,
                        &mut last_bound_tex,
                        &mut last_use_texture,
                    );
                    if bound {
                        state
                            .gl
                            .uniform_2_f32(Some(&state.uv_scale_location), uv_scale[0], uv_scale[1]);
                        state.gl.uniform_2_f32(
                            Some(&state.uv_offset_location),
                            uv_offset[0],
                            uv_offset[1],
                        );
                        state
                            .gl
                            .uniform_4_f32_slice(Some(&state.color_location), tint);
                    } else {
                        // Missing texture: draw an untextured magenta quad.
                        state.gl.uniform_4_f32_slice(
                            Some(&state.color_location),
                            &[1.0, 0.0, 1.0, 1.0],
                        );
                    }
                }
            }

            state
                .gl
                .draw_elements(glow::TRIANGLES, state.index_count, glow::UNSIGNED_SHORT, 0);
            drawn += 1;
        }

        state.gl.bind_vertex_array(None);
    }

    state.gl_surface.swap_buffers(&state.gl_context)?;
    Ok(drawn)
}

pub fn resize(state: &mut State, width: u32, height: u32) {
    if width > 0 && height > 0 {
        if let (Some(width_nz), Some(height_nz)) = (NonZeroU32::new(width), NonZeroU32::new(height))
        {
            state
                .gl_surface
                .resize(&state.gl_context, width_nz, height_nz);
            let (vx, vy, vw, vh) = space::viewport_for_window(width, height);
            unsafe {
                state.gl.viewport(vx, vy, vw as i32, vh as i32);
            }
            state.window_size = (width, height);
        }
    } else {
        warn!("Ignoring resize to zero dimensions.");
    }
}

pub fn cleanup(state: &mut State) {
    info!("Cleaning up OpenGL resources...");
    unsafe {
        state.gl.delete_program(state.program);
        state.gl.delete_vertex_array(state.shared_vao);
        state.gl.delete_buffer(state.shared_vbo);
        state.gl.delete_buffer(state.shared_ibo);
    }
}

fn create_opengl_context(
    window: &Window,
    vsync_enabled: bool,
) -> Result<(Surface<WindowSurface>, PossiblyCurrentContext, glow::Context), Box<dyn Error>> {
    use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

    let display_handle = window.display_handle()?.as_raw();
    let raw_window_handle = window.window_handle()?.as_raw();

    #[cfg(target_os = "windows")]
    let preference = DisplayApiPreference::Wgl(Some(raw_window_handle));
    #[cfg(target_os = "macos")]
    let preference = DisplayApiPreference::Cgl;
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let preference = DisplayApiPreference::Egl;

    let display = unsafe { Display::new(display_handle, preference)? };

    let template = ConfigTemplateBuilder::new().with_alpha_size(8).build();
    let config = unsafe { display.find_configs(template)?.next() }
        .ok_or("Failed to find a suitable GL config")?;

    let (width, height): (u32, u32) = window.inner_size().into();
    let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(width.max(1)).unwrap(),
        NonZeroU32::new(height.max(1)).unwrap(),
    );
    let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };

    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let context = unsafe { display.create_context(&config, &context_attributes)? }
        .make_current(&surface)?;

    let interval = if vsync_enabled {
        SwapInterval::Wait(NonZeroU32::new(1).unwrap())
    } else {
        SwapInterval::DontWait
    };
    if let Err(e) = surface.set_swap_interval(&context, interval) {
        warn!("Could not set swap interval: {}. VSync state is driver-defined.", e);
    }

    let gl = unsafe {
        glow::Context::from_loader_function_cstr(|s: &CStr| display.get_proc_address(s))
    };
    Ok((surface, context, gl))
}

fn create_graphics_program(
    gl: &glow::Context,
) -> Result<
    (
        glow::Program,
        UniformLocation, // u_model_view_proj
        UniformLocation, // u_color
        UniformLocation, // u_use_texture
        UniformLocation, // u_texture
        UniformLocation, // u_uv_scale
        UniformLocation, // u_uv_offset
    ),
    String,
> {
    unsafe {
        let program = gl.create_program()?;
        let shader_sources = [
            (glow::VERTEX_SHADER, include_str!("shaders/quad.vert")),
            (glow::FRAGMENT_SHADER, include_str!("shaders/quad.frag")),
        ];

        let mut shaders = Vec::with_capacity(shader_sources.len());
        for (shader_type, shader_source) in shader_sources.iter() {
            let shader = gl.create_shader(*shader_type)?;
            gl.shader_source(shader, shader_source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                return Err(gl.get_shader_info_log(shader));
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            return Err(gl.get_program_info_log(program));
        }
        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        let mvp_location = gl
            .get_uniform_location(program, "u_model_view_proj")
            .ok_or("u_model_view_proj")?;
        let color_location = gl
            .get_uniform_location(program, "u_color")
            .ok_or("u_color")?;
        let use_texture_location = gl
            .get_uniform_location(program, "u_use_texture")
            .ok_or("u_use_texture")?;
        let texture_location = gl
            .get_uniform_location(program, "u_texture")
            .ok_or("u_texture")?;
        let uv_scale_location = gl
            .get_uniform_location(program, "u_uv_scale")
            .ok_or("u_uv_scale")?;
        let uv_offset_location = gl
            .get_uniform_location(program, "u_uv_offset")
            .ok_or("u_uv_offset")?;

        Ok((
            program,
            mvp_location,
            color_location,
            use_texture_location,
            texture_location,
            uv_scale_location,
            uv_offset_location,
        ))
    }
}

/// Binds a texture if needed, tracking state changes. Returns true when a
/// valid texture ended up bound.
unsafe fn bind_texture_for_object(
    state: &State,
    textures: &HashMap<String, Texture>,
    texture_id: &str,
    last_bound_tex: &mut Option<glow::Texture>,
    last_use_texture: &mut Option<bool>,
) -> bool {
    unsafe {
        if let Some(Texture(handle)) = textures.get(texture_id) {
            if *last_use_texture != Some(true) {
                state.gl.uniform_1_i32(Some(&state.use_texture_location), 1);
                *last_use_texture = Some(true);
            }
            if *last_bound_tex != Some(*handle) {
                state.gl.bind_texture(glow::TEXTURE_2D, Some(*handle));
                *last_bound_tex = Some(*handle);
            }
            true
        } else {
            if *last_use_texture != Some(false) {
                state.gl.uniform_1_i32(Some(&state.use_texture_location), 0);
                *last_use_texture = Some(false);
            }
            if last_bound_tex.is_some() {
                state.gl.bind_texture(glow::TEXTURE_2D, None);
                *last_bound_tex = None;
            }
            false
        }
    }
}

// Reinterpreting casts for buffer and uniform uploads. Only used as
// f32/u16 -> u8 and [[f32; 4]; 4] -> f32, where align_to splits cleanly; the
// assert keeps us honest.
#[inline(always)]
fn cast_slice<T, U>(slice: &[T]) -> &[U] {
    let (prefix, mid, suffix) = unsafe { slice.align_to::<U>() };
    debug_assert!(prefix.is_empty() && suffix.is_empty(), "cast_slice: misaligned cast");
    mid
}
