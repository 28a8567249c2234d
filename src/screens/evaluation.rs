use crate::act;
use crate::assets::{rank_clip_key, AssetManager, GifPlayer};
use crate::core::input::is_confirm_key;
use crate::core::space::globals::*;
use crate::game::session::SessionSummary;
use crate::game::GameMode;
use crate::screens::menu::push_backdrop;
use crate::screens::{Screen, ScreenAction};
use crate::ui::actors::Actor;
use crate::ui::color::{self, Theme};
use crate::ui::components::{button::Button, outlined_text};
use log::info;
use std::time::Instant;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

const RESULT_PX: f32 = 48.0;
const RESULT_OUTLINE_THICKNESS: i32 = 2;

pub struct State {
    pub summary: Option<SessionSummary>,
    play_again_button: Button,
    rank_anim: GifPlayer,
}

pub fn init(summary: Option<SessionSummary>) -> State {
    if let Some(s) = &summary {
        info!("Session over: {:?} after {:.2}s", s.cause, s.elapsed);
    }
    State {
        summary,
        play_again_button: Button::new(
            screen_center_x() - 100.0,
            screen_height() - 100.0,
            200.0,
            50.0,
            "Play Again",
        ),
        rank_anim: GifPlayer::new(),
    }
}

pub fn handle_key_press(_state: &mut State, event: &KeyEvent) -> ScreenAction {
    if event.state != ElementState::Pressed {
        return ScreenAction::None;
    }
    match event.physical_key {
        PhysicalKey::Code(code) if is_confirm_key(code) => ScreenAction::Navigate(Screen::Menu),
        PhysicalKey::Code(KeyCode::Escape) => ScreenAction::Navigate(Screen::Menu),
        _ => ScreenAction::None,
    }
}

pub fn handle_mouse_click(state: &mut State, point: (f32, f32)) -> ScreenAction {
    if state.play_again_button.contains(point) {
        ScreenAction::Navigate(Screen::Menu)
    } else {
        ScreenAction::None
    }
}

pub fn update(state: &mut State, assets: &AssetManager, _dt: f32) -> ScreenAction {
    if let Some(clip) = result_clip(state, assets) {
        state.rank_anim.advance(clip, Instant::now());
    }
    ScreenAction::None
}

/// Rank clip in ranked mode, the dancer otherwise.
fn result_clip<'a>(state: &State, assets: &'a AssetManager) -> Option<&'a crate::assets::GifClip> {
    match state.summary.as_ref().and_then(|s| s.rank) {
        Some(rank) => assets.clip(&rank_clip_key(rank)),
        None => assets.clip("dancing"),
    }
}

fn result_line(summary: &SessionSummary) -> String {
    match (summary.mode, summary.rank) {
        (GameMode::Ranked, Some(rank)) => format!("You got rank {}", rank),
        _ => "Time's Up!".to_string(),
    }
}

pub fn get_actors(state: &State, assets: &AssetManager, theme: &Theme) -> Vec<Actor> {
    let mut actors = Vec::with_capacity(48);

    push_backdrop(&mut actors, theme);

    if let Some(clip) = result_clip(state, assets) {
        if let Some(frame) = state.rank_anim.frame(clip) {
            actors.push(act!(sprite(frame.texture_key.clone()):
                align(0.5, 0.5): xy(screen_center_x(), screen_height() / 4.0):
                zoomto(frame.width, frame.height): z(5)
            ));
        }
    }

    if let Some(summary) = &state.summary {
        let (fill, outline) = match summary.rank {
            Some(rank) => (
                color::rank_rgba(rank),
                Some(color::rank_outline_rgba(rank)),
            ),
            None => (theme.cue_fill, theme.cue_outline),
        };
        actors.extend(outlined_text::build(outlined_text::Params {
            text: &result_line(summary),
            center: (screen_center_x(), screen_center_y() + 120.0),
            px: RESULT_PX,
            fill,
            outline,
            thickness: RESULT_OUTLINE_THICKNESS,
            zoom: 1.0,
            z: 20,
        }));
    }

    actors.extend(
        state
            .play_again_button
            .build(theme.button_fill, theme.button_label, 30),
    );

    actors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rank::Rank;
    use crate::game::session::GameOverCause;

    fn ranked_summary(rank: Rank) -> SessionSummary {
        SessionSummary {
            mode: GameMode::Ranked,
            cause: GameOverCause::WrongKey,
            elapsed: 5.0,
            rank: Some(rank),
        }
    }

    #[test]
    fn ranked_result_names_the_rank() {
        assert_eq!(result_line(&ranked_summary(Rank::S)), "You got rank S");
    }

    #[test]
    fn timed_result_is_times_up_regardless_of_cause() {
        for cause in [
            GameOverCause::TimeUp,
            GameOverCause::WrongKey,
            GameOverCause::Timeout,
        ] {
            let summary = SessionSummary {
                mode: GameMode::Timed,
                cause,
                elapsed: 42.0,
                rank: None,
            };
            assert_eq!(result_line(&summary), "Time's Up!");
        }
    }

    #[test]
    fn clicking_play_again_returns_to_the_menu() {
        let mut state = init(Some(ranked_summary(Rank::B)));
        assert_eq!(
            handle_mouse_click(&mut state, (400.0, 525.0)),
            ScreenAction::Navigate(Screen::Menu)
        );
        assert_eq!(
            handle_mouse_click(&mut state, (5.0, 5.0)),
            ScreenAction::None
        );
    }
}
