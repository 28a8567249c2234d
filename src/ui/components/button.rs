use crate::act;
use crate::ui::actors::Actor;

const LABEL_PX: f32 = 24.0;

/// A clickable rect with a centered label. Screens keep one per action and
/// hit-test clicks against it in design-space coordinates.
#[derive(Debug, Clone)]
pub struct Button {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub label: &'static str,
}

impl Button {
    pub fn new(x: f32, y: f32, w: f32, h: f32, label: &'static str) -> Self {
        Button { x, y, w, h, label }
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.x
            && point.0 <= self.x + self.w
            && point.1 >= self.y
            && point.1 <= self.y + self.h
    }

    pub fn build(&self, fill: [f32; 4], label_color: [f32; 4], z: i16) -> Vec<Actor> {
        vec![
            act!(quad:
                align(0.0, 0.0): xy(self.x, self.y):
                zoomto(self.w, self.h):
                rgba(fill): z(z)
            ),
            act!(text:
                settext(self.label):
                align(0.5, 0.5): xy(self.x + self.w / 2.0, self.y + self.h / 2.0):
                px(LABEL_PX): rgba(label_color): z(z + 1)
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_of_edges() {
        let button = Button::new(100.0, 200.0, 150.0, 50.0, "Start");
        assert!(button.contains((100.0, 200.0)));
        assert!(button.contains((250.0, 250.0)));
        assert!(button.contains((175.0, 225.0)));
    }

    #[test]
    fn contains_rejects_outside_points() {
        let button = Button::new(100.0, 200.0, 150.0, 50.0, "Start");
        assert!(!button.contains((99.9, 225.0)));
        assert!(!button.contains((250.1, 225.0)));
        assert!(!button.contains((175.0, 199.9)));
        assert!(!button.contains((175.0, 250.1)));
    }

    #[test]
    fn build_emits_fill_then_label() {
        let button = Button::new(0.0, 0.0, 10.0, 10.0, "Go");
        let actors = button.build([1.0; 4], [0.0, 0.0, 0.0, 1.0], 10);
        assert_eq!(actors.len(), 2);
        assert!(matches!(actors[0], Actor::Sprite { z: 10, .. }));
        assert!(matches!(actors[1], Actor::Text { z: 11, .. }));
    }
}
