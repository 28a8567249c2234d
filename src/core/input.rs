use winit::keyboard::KeyCode;

/// One of the four playable directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane {
    Left,
    Down,
    Up,
    Right,
}

pub const ALL_LANES: [Lane; 4] = [Lane::Left, Lane::Down, Lane::Up, Lane::Right];

impl Lane {
    pub const fn name(self) -> &'static str {
        match self {
            Lane::Left => "left",
            Lane::Down => "down",
            Lane::Up => "up",
            Lane::Right => "right",
        }
    }
}

#[inline(always)]
pub fn lane_from_keycode(code: KeyCode) -> Option<Lane> {
    match code {
        KeyCode::ArrowLeft => Some(Lane::Left),
        KeyCode::ArrowDown => Some(Lane::Down),
        KeyCode::ArrowUp => Some(Lane::Up),
        KeyCode::ArrowRight => Some(Lane::Right),
        _ => None,
    }
}

/// Start / Play Again confirm key.
#[inline(always)]
pub fn is_confirm_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Enter | KeyCode::NumpadEnter)
}
