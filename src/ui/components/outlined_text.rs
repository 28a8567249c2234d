use crate::act;
use crate::ui::actors::Actor;

/// Outlined bitmap text, drawn the arcade way: the outline is the same string
/// stamped at every integer offset within `thickness`, with the fill on top.
pub struct Params<'a> {
    pub text: &'a str,
    pub center: (f32, f32),
    pub px: f32,
    pub fill: [f32; 4],
    pub outline: Option<[f32; 4]>,
    pub thickness: i32,
    pub zoom: f32,
    pub z: i16,
}

pub fn build(p: Params) -> Vec<Actor> {
    let mut actors = Vec::new();

    if let Some(outline) = p.outline {
        for dx in -p.thickness..=p.thickness {
            for dy in -p.thickness..=p.thickness {
                if dx == 0 && dy == 0 {
                    continue;
                }
                actors.push(act!(text:
                    settext(p.text):
                    align(0.5, 0.5):
                    xy(p.center.0 + dx as f32 * p.zoom, p.center.1 + dy as f32 * p.zoom):
                    px(p.px): zoom(p.zoom):
                    rgba(outline): z(p.z)
                ));
            }
        }
    }

    actors.push(act!(text:
        settext(p.text):
        align(0.5, 0.5): xy(p.center.0, p.center.1):
        px(p.px): zoom(p.zoom):
        rgba(p.fill): z(p.z + 1)
    ));

    actors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_two_stamps_a_5x5_ring_plus_fill() {
        let actors = build(Params {
            text: "Ready?",
            center: (400.0, 420.0),
            px: 48.0,
            fill: [1.0; 4],
            outline: Some([0.0, 0.0, 0.0, 1.0]),
            thickness: 2,
            zoom: 1.0,
            z: 50,
        });
        assert_eq!(actors.len(), 5 * 5 - 1 + 1);
        // Fill is last so it draws over the outline copies.
        assert!(matches!(actors.last(), Some(Actor::Text { z: 51, .. })));
    }

    #[test]
    fn no_outline_means_a_single_actor() {
        let actors = build(Params {
            text: "Time's Up!",
            center: (0.0, 0.0),
            px: 48.0,
            fill: [1.0; 4],
            outline: None,
            thickness: 3,
            zoom: 1.0,
            z: 0,
        });
        assert_eq!(actors.len(), 1);
    }
}
