use crate::act;
use crate::assets::{AssetManager, GifPlayer};
use crate::core::input::{lane_from_keycode, Lane};
use crate::core::space::globals::*;
use crate::game::rank::Rank;
use crate::game::session::{self, GameOverCause, Session, SessionSummary, Strike, BOX_SIZE};
use crate::game::GameMode;
use crate::screens::menu::push_backdrop;
use crate::screens::{Screen, ScreenAction};
use crate::ui::actors::Actor;
use crate::ui::color::Theme;
use crate::ui::components::outlined_text;
use log::info;
use std::time::Instant;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/* ----------------------- countdown timing ----------------------- */

pub const READY_TIME: f32 = 0.8;
pub const GO_TIME: f32 = 0.6;
pub const POP_DURATION: f32 = 0.3;

/// Timed mode: the session ends in success once this much survival time has
/// elapsed.
pub const GAME_DURATION: f32 = 120.0;

const TICK_DT: f32 = 1.0 / session::TICKS_PER_SECOND as f32;

/* ----------------------------- layout --------------------------- */

const CUE_PX: f32 = 48.0;
const CUE_OUTLINE_THICKNESS: i32 = 3;
const TIMER_PX: f32 = 24.0;
const ARROW_GLYPH_SIZE: f32 = 20.0;

/// Countdown phases, then live play. Input only matches while `Live`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Ready { elapsed: f32 },
    Go { elapsed: f32 },
    Live,
}

pub struct State {
    pub mode: GameMode,
    pub session: Session,
    pub phase: Phase,
    /// Seconds spent in `Live`; feeds the HUD timer and the rank.
    pub survival: f32,
    tick_accumulator: f32,
    dancer: GifPlayer,
}

pub fn init(mode: GameMode) -> State {
    info!("Starting {} session", mode);
    State {
        mode,
        session: Session::new(),
        phase: Phase::Ready { elapsed: 0.0 },
        survival: 0.0,
        tick_accumulator: 0.0,
        dancer: GifPlayer::new(),
    }
}

pub fn handle_key_press(state: &mut State, event: &KeyEvent) -> ScreenAction {
    if event.state != ElementState::Pressed || event.repeat {
        return ScreenAction::None;
    }
    match event.physical_key {
        PhysicalKey::Code(KeyCode::Escape) => {
            info!("Session aborted, returning to menu");
            ScreenAction::Navigate(Screen::Menu)
        }
        PhysicalKey::Code(code) => match lane_from_keycode(code) {
            Some(lane) => press_lane(state, lane),
            None => ScreenAction::None,
        },
        _ => ScreenAction::None,
    }
}

/// Feeds one directional press to the matcher. No-ops during the countdown
/// and on an empty queue.
pub fn press_lane(state: &mut State, lane: Lane) -> ScreenAction {
    if !matches!(state.phase, Phase::Live) {
        return ScreenAction::None;
    }
    match state.session.strike(lane) {
        Strike::Miss => ScreenAction::Navigate(Screen::Evaluation),
        Strike::Hit | Strike::Ignored => ScreenAction::None,
    }
}

// Clicks during play do nothing; the menu and evaluation screens own the
// buttons.
pub fn handle_mouse_click(_state: &mut State, _point: (f32, f32)) -> ScreenAction {
    ScreenAction::None
}

pub fn update(state: &mut State, assets: &AssetManager, dt: f32) -> ScreenAction {
    if let Some(clip) = assets.clip("dancing") {
        state.dancer.advance(clip, Instant::now());
    }

    match &mut state.phase {
        Phase::Ready { elapsed } => {
            *elapsed += dt;
            if *elapsed >= READY_TIME {
                state.phase = Phase::Go { elapsed: 0.0 };
            }
            ScreenAction::None
        }
        Phase::Go { elapsed } => {
            *elapsed += dt;
            if *elapsed >= GO_TIME {
                info!("Countdown finished, play begins");
                state.phase = Phase::Live;
                state.survival = 0.0;
            }
            ScreenAction::None
        }
        Phase::Live => {
            state.survival += dt;
            if state.mode == GameMode::Timed && state.survival >= GAME_DURATION {
                info!("Session duration reached after {:.2}s", state.survival);
                state.session.end(GameOverCause::TimeUp);
                return ScreenAction::Navigate(Screen::Evaluation);
            }

            state.tick_accumulator += dt;
            while state.tick_accumulator >= TICK_DT {
                state.tick_accumulator -= TICK_DT;
                state.session.tick();
                if state.session.over().is_some() {
                    break;
                }
            }

            if state.session.over().is_some() {
                ScreenAction::Navigate(Screen::Evaluation)
            } else {
                ScreenAction::None
            }
        }
    }
}

/// Snapshot for the evaluation screen; `None` while the session is still
/// running.
pub fn summarize(state: &State) -> Option<SessionSummary> {
    let cause = state.session.over()?;
    let rank = match state.mode {
        GameMode::Ranked => Some(Rank::for_elapsed(state.survival)),
        GameMode::Timed => None,
    };
    Some(SessionSummary {
        mode: state.mode,
        cause,
        elapsed: state.survival,
        rank,
    })
}

/// Pop-in scale for the countdown cue: 50% to 100% over the first
/// `POP_DURATION` of each phase.
pub fn cue_scale(phase_elapsed: f32) -> f32 {
    (phase_elapsed / POP_DURATION).min(1.0) * 0.5 + 0.5
}

fn cue_line(mode: GameMode, phase: Phase) -> Option<(&'static str, f32)> {
    match phase {
        Phase::Ready { elapsed } => Some(("Ready?", elapsed)),
        Phase::Go { elapsed } => {
            let text = match mode {
                GameMode::Ranked => "Gotta go fast!",
                GameMode::Timed => "Go!",
            };
            Some((text, elapsed))
        }
        Phase::Live => None,
    }
}

/// HUD timer: ranked counts up in `m:ss.mmm`, timed shows two-decimal
/// seconds.
pub fn format_timer(mode: GameMode, elapsed: f32) -> String {
    match mode {
        GameMode::Ranked => {
            let minutes = (elapsed / 60.0) as u32;
            let seconds = (elapsed % 60.0) as u32;
            let millis = ((elapsed % 1.0) * 1000.0) as u32;
            format!("{}:{:02}.{:03}", minutes, seconds, millis)
        }
        GameMode::Timed => format!("{:05.2}", elapsed),
    }
}

fn lane_rotation_deg(lane: Lane) -> f32 {
    match lane {
        Lane::Up => 0.0,
        Lane::Right => 90.0,
        Lane::Down => 180.0,
        Lane::Left => 270.0,
    }
}

pub fn get_actors(state: &State, assets: &AssetManager, theme: &Theme) -> Vec<Actor> {
    let mut actors = Vec::with_capacity(32 + state.session.queue_len() * 2);

    push_backdrop(&mut actors, theme);

    if let Some(clip) = assets.clip("dancing") {
        if let Some(frame) = state.dancer.frame(clip) {
            actors.push(act!(sprite(frame.texture_key.clone()):
                align(0.5, 0.5): xy(screen_center_x(), screen_height() / 4.0):
                zoomto(frame.width, frame.height): z(5)
            ));
        }
    }

    if let Some((text, elapsed)) = cue_line(state.mode, state.phase) {
        actors.extend(outlined_text::build(outlined_text::Params {
            text,
            center: (screen_center_x(), screen_height() * 0.7),
            px: CUE_PX,
            fill: theme.cue_fill,
            outline: theme.cue_outline,
            thickness: CUE_OUTLINE_THICKNESS,
            zoom: cue_scale(elapsed),
            z: 60,
        }));
    }

    if matches!(state.phase, Phase::Live) {
        actors.push(act!(text:
            settext(format_timer(state.mode, state.survival)):
            align(1.0, 0.0): xy(screen_right() - 10.0, 10.0):
            px(TIMER_PX): rgba(theme.hud_text): z(70)
        ));
    }

    for arrow in state.session.boxes() {
        let center_x = arrow.x() + BOX_SIZE / 2.0;
        let center_y = arrow.y + BOX_SIZE / 2.0;
        actors.push(act!(quad:
            align(0.0, 0.0): xy(arrow.x(), arrow.y):
            zoomto(BOX_SIZE, BOX_SIZE):
            rgba(theme.box_fill): z(40)
        ));
        actors.push(act!(sprite("arrow"):
            align(0.5, 0.5): xy(center_x, center_y):
            zoomto(ARROW_GLYPH_SIZE, ARROW_GLYPH_SIZE):
            rgba(theme.box_arrow):
            rotate(lane_rotation_deg(arrow.lane)): z(41)
        ));
    }

    actors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_countdown(state: &mut State, assets: &AssetManager) {
        assert_eq!(update(state, assets, READY_TIME), ScreenAction::None);
        assert!(matches!(state.phase, Phase::Go { .. }));
        assert_eq!(update(state, assets, GO_TIME), ScreenAction::None);
        assert!(matches!(state.phase, Phase::Live));
    }

    #[test]
    fn countdown_dwells_total_1400_ms_before_play() {
        let assets = AssetManager::new();
        let mut state = init(GameMode::Ranked);

        // 0.75s in: still Ready.
        assert_eq!(update(&mut state, &assets, 0.75), ScreenAction::None);
        assert!(matches!(state.phase, Phase::Ready { .. }));

        // Crosses the 0.8s dwell into Go.
        update(&mut state, &assets, 0.1);
        assert!(matches!(state.phase, Phase::Go { .. }));

        // 0.55s of Go: not live yet; crossing the 0.6s dwell flips to Live.
        update(&mut state, &assets, 0.55);
        assert!(matches!(state.phase, Phase::Go { .. }));
        update(&mut state, &assets, 0.1);
        assert!(matches!(state.phase, Phase::Live));
        assert!((READY_TIME + GO_TIME - 1.4).abs() < 1e-6);
    }

    #[test]
    fn presses_during_the_countdown_are_ignored() {
        let assets = AssetManager::new();
        let mut state = init(GameMode::Ranked);
        assert_eq!(press_lane(&mut state, Lane::Up), ScreenAction::None);
        update(&mut state, &assets, READY_TIME);
        assert_eq!(press_lane(&mut state, Lane::Up), ScreenAction::None);
        assert_eq!(state.session.over(), None);
    }

    #[test]
    fn cue_scale_pops_from_half_to_full_over_300_ms() {
        assert_eq!(cue_scale(0.0), 0.5);
        assert!((cue_scale(0.15) - 0.75).abs() < 1e-5);
        assert_eq!(cue_scale(POP_DURATION), 1.0);
        assert_eq!(cue_scale(10.0), 1.0);
    }

    #[test]
    fn a_wrong_key_during_play_ends_the_session() {
        let assets = AssetManager::new();
        let mut state = init(GameMode::Ranked);
        run_countdown(&mut state, &assets);

        // One second of play covers the first spawn at tick 35.
        update(&mut state, &assets, 1.0);
        let head = state.session.boxes().next().expect("a box spawned").lane;
        let wrong = match head {
            Lane::Up => Lane::Down,
            _ => Lane::Up,
        };
        assert_eq!(
            press_lane(&mut state, wrong),
            ScreenAction::Navigate(Screen::Evaluation)
        );
        let summary = summarize(&state).unwrap();
        assert_eq!(summary.cause, GameOverCause::WrongKey);
        assert_eq!(summary.rank, Some(Rank::for_elapsed(summary.elapsed)));
    }

    #[test]
    fn matching_every_spawn_keeps_the_session_live() {
        let assets = AssetManager::new();
        let mut state = init(GameMode::Ranked);
        run_countdown(&mut state, &assets);

        // Play four spawn intervals, clearing the queue as it fills.
        for _ in 0..4 {
            update(&mut state, &assets, 35.0 * TICK_DT);
            loop {
                let head = state.session.boxes().next().map(|b| b.lane);
                match head {
                    Some(head) => assert_eq!(press_lane(&mut state, head), ScreenAction::None),
                    None => break,
                }
            }
        }
        assert_eq!(state.session.over(), None);
        assert_eq!(state.session.queue_len(), 0);
    }

    #[test]
    fn timed_mode_ends_at_the_session_cap_even_with_an_empty_queue() {
        let assets = AssetManager::new();
        let mut state = init(GameMode::Timed);
        run_countdown(&mut state, &assets);

        assert_eq!(
            update(&mut state, &assets, GAME_DURATION),
            ScreenAction::Navigate(Screen::Evaluation)
        );
        let summary = summarize(&state).unwrap();
        assert_eq!(summary.cause, GameOverCause::TimeUp);
        assert_eq!(summary.rank, None);
        assert!(summary.elapsed >= GAME_DURATION);
    }

    #[test]
    fn ranked_mode_never_ends_on_the_clock() {
        let assets = AssetManager::new();
        let mut state = init(GameMode::Ranked);
        run_countdown(&mut state, &assets);

        // A huge delta must not trip the timed cutoff; the session ends by
        // timeout miss instead (nobody pressed anything for that long).
        let action = update(&mut state, &assets, GAME_DURATION + 10.0);
        assert_eq!(action, ScreenAction::Navigate(Screen::Evaluation));
        assert_eq!(
            summarize(&state).unwrap().cause,
            GameOverCause::Timeout
        );
    }

    #[test]
    fn timer_formats_per_mode() {
        assert_eq!(format_timer(GameMode::Ranked, 83.5), "1:23.500");
        assert_eq!(format_timer(GameMode::Ranked, 0.0), "0:00.000");
        assert_eq!(format_timer(GameMode::Timed, 5.25), "05.25");
        assert_eq!(format_timer(GameMode::Timed, 110.2), "110.20");
    }

    #[test]
    fn arrow_glyph_rotations_cover_all_lanes() {
        assert_eq!(lane_rotation_deg(Lane::Up), 0.0);
        assert_eq!(lane_rotation_deg(Lane::Right), 90.0);
        assert_eq!(lane_rotation_deg(Lane::Down), 180.0);
        assert_eq!(lane_rotation_deg(Lane::Left), 270.0);
    }
}
