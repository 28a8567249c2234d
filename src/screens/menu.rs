use crate::act;
use crate::assets::AssetManager;
use crate::core::input::is_confirm_key;
use crate::core::space::globals::*;
use crate::game::session::BAR_Y;
use crate::screens::{Screen, ScreenAction};
use crate::ui::actors::Actor;
use crate::ui::color::Theme;
use crate::ui::components::{button::Button, outlined_text};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

const TITLE_PX: f32 = 56.0;
const TITLE_OUTLINE_THICKNESS: i32 = 5;

pub struct State {
    start_button: Button,
}

pub fn init() -> State {
    State {
        start_button: Button::new(
            screen_center_x() - 75.0,
            BAR_Y + 200.0,
            150.0,
            50.0,
            "Start",
        ),
    }
}

pub fn handle_key_press(_state: &mut State, event: &KeyEvent) -> ScreenAction {
    if event.state != ElementState::Pressed {
        return ScreenAction::None;
    }
    match event.physical_key {
        PhysicalKey::Code(code) if is_confirm_key(code) => ScreenAction::Navigate(Screen::Gameplay),
        PhysicalKey::Code(KeyCode::Escape) => ScreenAction::Exit,
        _ => ScreenAction::None,
    }
}

pub fn handle_mouse_click(state: &mut State, point: (f32, f32)) -> ScreenAction {
    if state.start_button.contains(point) {
        ScreenAction::Navigate(Screen::Gameplay)
    } else {
        ScreenAction::None
    }
}

// No per-frame state yet; kept for consistency with the other screens.
pub fn update(_state: &mut State, _dt: f32) -> ScreenAction {
    ScreenAction::None
}

pub fn get_actors(state: &State, assets: &AssetManager, theme: &Theme) -> Vec<Actor> {
    let mut actors = Vec::with_capacity(64);

    push_backdrop(&mut actors, theme);

    // Title art at native size in the upper quarter.
    if let Some((w, h)) = assets.texture_dims("title") {
        actors.push(act!(sprite("title"):
            align(0.5, 0.5): xy(screen_center_x(), screen_height() / 4.0):
            zoomto(w as f32, h as f32): z(10)
        ));
    }

    actors.extend(outlined_text::build(outlined_text::Params {
        text: "Arrow Lapse!",
        center: (screen_center_x(), screen_height() * 0.7),
        px: TITLE_PX,
        fill: theme.title_fill,
        outline: theme.title_outline,
        thickness: TITLE_OUTLINE_THICKNESS,
        zoom: 1.0,
        z: 20,
    }));

    actors.extend(
        state
            .start_button
            .build(theme.button_fill, theme.button_label, 30),
    );

    actors
}

/// Background image stretched over the whole design space, plus the hit bar.
/// Every screen draws these so the playfield never pops in or out.
pub fn push_backdrop(actors: &mut Vec<Actor>, theme: &Theme) {
    actors.push(act!(sprite("background"):
        align(0.0, 0.0): xy(0.0, 0.0):
        zoomto(screen_width(), screen_height()): z(-100)
    ));
    actors.push(act!(quad:
        align(0.0, 0.5): xy(0.0, BAR_Y):
        zoomto(screen_width(), 8.0):
        rgba(theme.hit_bar): z(-50)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicking_the_start_button_starts_a_game() {
        let mut state = init();
        assert_eq!(
            handle_mouse_click(&mut state, (400.0, 525.0)),
            ScreenAction::Navigate(Screen::Gameplay)
        );
    }

    #[test]
    fn clicking_elsewhere_does_nothing() {
        let mut state = init();
        assert_eq!(
            handle_mouse_click(&mut state, (10.0, 10.0)),
            ScreenAction::None
        );
    }
}
