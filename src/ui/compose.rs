use crate::core::font::Font;
use crate::core::gfx::{ObjectType, RenderList, RenderObject};
use crate::ui::actors::{Actor, SpriteSource};
use cgmath::{Deg, Matrix4, Vector3};
use std::collections::HashMap;

/* ======================= RENDERER SCREEN BUILDER ======================= */

pub fn build_screen(
    actors: &[Actor],
    clear_color: [f32; 4],
    fonts: &HashMap<&'static str, Font>,
) -> RenderList {
    let mut objects: Vec<RenderObject> = Vec::with_capacity(estimate_object_count(actors));
    let mut order_counter: u32 = 0;

    for actor in actors {
        match actor {
            Actor::Sprite {
                align,
                offset,
                size,
                source,
                tint,
                z,
                rot_z_deg,
                visible,
                blend,
            } => {
                if !*visible || tint[3] <= 0.0 || size[0] <= 0.0 || size[1] <= 0.0 {
                    continue;
                }
                let object_type = match source {
                    SpriteSource::Solid => ObjectType::SolidColor { color: *tint },
                    SpriteSource::Texture(texture_id) => ObjectType::Sprite {
                        texture_id: texture_id.clone(),
                        tint: *tint,
                        uv_scale: [1.0, 1.0],
                        uv_offset: [0.0, 0.0],
                    },
                };
                objects.push(RenderObject {
                    object_type,
                    transform: quad_transform(
                        offset[0] + (0.5 - align[0]) * size[0],
                        offset[1] + (0.5 - align[1]) * size[1],
                        size[0],
                        size[1],
                        *rot_z_deg,
                    ),
                    blend: *blend,
                    z: *z,
                    order: next_order(&mut order_counter),
                });
            }

            Actor::Text {
                align,
                offset,
                px,
                color,
                font,
                content,
                zoom,
                z,
            } => {
                if color[3] <= 0.0 || content.is_empty() {
                    continue;
                }
                let Some(fm) = fonts.get(font) else { continue };
                build_text_glyphs(
                    fm,
                    content,
                    *align,
                    *offset,
                    *px,
                    *zoom,
                    *color,
                    *z,
                    &mut order_counter,
                    &mut objects,
                );
            }
        }
    }

    objects.sort_by_key(|o| (o.z, o.order));
    RenderList {
        clear_color,
        objects,
    }
}

fn estimate_object_count(actors: &[Actor]) -> usize {
    actors
        .iter()
        .map(|a| match a {
            Actor::Sprite { .. } => 1,
            Actor::Text { content, .. } => content.chars().count(),
        })
        .sum()
}

#[inline(always)]
fn next_order(counter: &mut u32) -> u32 {
    let order = *counter;
    *counter += 1;
    order
}

/// Model transform for the shared unit quad: scale to size, rotate, then move
/// the quad center into place.
#[inline(always)]
fn quad_transform(cx: f32, cy: f32, w: f32, h: f32, rot_z_deg: f32) -> Matrix4<f32> {
    let translate = Matrix4::from_translation(Vector3::new(cx, cy, 0.0));
    let scale = Matrix4::from_nonuniform_scale(w, h, 1.0);
    if rot_z_deg != 0.0 {
        translate * Matrix4::from_angle_z(Deg(rot_z_deg)) * scale
    } else {
        translate * scale
    }
}

#[allow(clippy::too_many_arguments)]
fn build_text_glyphs(
    font: &Font,
    content: &str,
    align: [f32; 2],
    offset: [f32; 2],
    px: f32,
    zoom: f32,
    color: [f32; 4],
    z: i16,
    order_counter: &mut u32,
    out: &mut Vec<RenderObject>,
) {
    let glyph_h = px * zoom;
    let advance = font.advance(px) * zoom;
    let total_w = advance * content.chars().count() as f32;

    let line_left = offset[0] - align[0] * total_w;
    let center_y = offset[1] + (0.5 - align[1]) * glyph_h;

    let uv_scale = [1.0 / font.cols as f32, 1.0 / font.rows as f32];

    for (i, c) in content.chars().enumerate() {
        let Some((col, row)) = font.glyph_cell(c) else {
            // Unmapped glyphs still take up their advance.
            continue;
        };
        if c == ' ' {
            continue;
        }
        let center_x = line_left + advance * (i as f32 + 0.5);
        out.push(RenderObject {
            object_type: ObjectType::Sprite {
                texture_id: font.texture_key.clone(),
                tint: color,
                uv_scale,
                uv_offset: [col as f32 * uv_scale[0], row as f32 * uv_scale[1]],
            },
            transform: quad_transform(center_x, center_y, advance, glyph_h, 0.0),
            blend: crate::core::gfx::BlendMode::Alpha,
            z,
            order: next_order(order_counter),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::act;

    fn fonts() -> HashMap<&'static str, Font> {
        let mut map = HashMap::new();
        // 16x6 grid of 8x16 cells.
        map.insert("arcade", Font::new("arcade 16x6.png".to_string(), 128, 96));
        map
    }

    fn translation(m: &Matrix4<f32>) -> (f32, f32) {
        (m.w.x, m.w.y)
    }

    #[test]
    fn top_left_aligned_quad_centers_at_half_size() {
        let actors = [act!(quad: align(0.0, 0.0): xy(100.0, 50.0): zoomto(40.0, 40.0))];
        let list = build_screen(&actors, [0.0; 4], &fonts());
        assert_eq!(list.objects.len(), 1);
        let (cx, cy) = translation(&list.objects[0].transform);
        assert_eq!((cx, cy), (120.0, 70.0));
    }

    #[test]
    fn invisible_and_fully_transparent_actors_are_dropped() {
        let actors = [
            act!(quad: xy(0.0, 0.0): zoomto(10.0, 10.0): visible(false)),
            act!(quad: xy(0.0, 0.0): zoomto(10.0, 10.0): diffusealpha(0.0)),
        ];
        let list = build_screen(&actors, [0.0; 4], &fonts());
        assert!(list.objects.is_empty());
    }

    #[test]
    fn objects_sort_by_z_then_emission_order() {
        let actors = [
            act!(quad: xy(0.0, 0.0): zoomto(1.0, 1.0): z(5)),
            act!(quad: xy(1.0, 0.0): zoomto(1.0, 1.0): z(-5)),
            act!(quad: xy(2.0, 0.0): zoomto(1.0, 1.0): z(5)),
        ];
        let list = build_screen(&actors, [0.0; 4], &fonts());
        let zs: Vec<i16> = list.objects.iter().map(|o| o.z).collect();
        assert_eq!(zs, vec![-5, 5, 5]);
        let (first_top_x, _) = translation(&list.objects[1].transform);
        assert_eq!(first_top_x, 0.5);
    }

    #[test]
    fn text_emits_one_glyph_per_visible_char() {
        let actors = [act!(text: settext("GO GO"): xy(0.0, 0.0): px(16.0))];
        let list = build_screen(&actors, [0.0; 4], &fonts());
        // Space is skipped but keeps its advance.
        assert_eq!(list.objects.len(), 4);
    }

    #[test]
    fn centered_text_straddles_its_anchor() {
        // Two glyphs at px=16 with 8x16 cells: advance 8, total width 16.
        let actors = [act!(text: settext("AB"): align(0.5, 0.5): xy(100.0, 40.0): px(16.0))];
        let list = build_screen(&actors, [0.0; 4], &fonts());
        assert_eq!(list.objects.len(), 2);
        let (ax, ay) = translation(&list.objects[0].transform);
        let (bx, _) = translation(&list.objects[1].transform);
        assert_eq!(ay, 40.0);
        assert_eq!((ax, bx), (96.0, 104.0));
    }

    #[test]
    fn text_zoom_scales_layout() {
        let actors = [act!(text: settext("AB"): align(0.0, 0.5): xy(0.0, 0.0): px(16.0): zoom(2.0))];
        let list = build_screen(&actors, [0.0; 4], &fonts());
        let (ax, _) = translation(&list.objects[0].transform);
        let (bx, _) = translation(&list.objects[1].transform);
        // advance doubles to 16.
        assert_eq!((ax, bx), (8.0, 24.0));
    }

    #[test]
    fn text_without_a_loaded_font_is_skipped() {
        let actors = [act!(text: font("missing"): settext("hi"): xy(0.0, 0.0))];
        let list = build_screen(&actors, [0.0; 4], &fonts());
        assert!(list.objects.is_empty());
    }
}
