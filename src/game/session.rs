use crate::core::input::{Lane, ALL_LANES};
use crate::core::space;
use crate::game::{rank::Rank, GameMode};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

// Timing & difficulty. Speed is in design-space pixels per tick and ramps
// with arrow count, not wall-clock time.
pub const TICKS_PER_SECOND: u32 = 60;
pub const SPAWN_INTERVAL_TICKS: u32 = 35;
pub const INITIAL_SPEED: f32 = 2.5;
pub const SPEED_INCREMENT: f32 = 0.05;

// Playfield geometry.
pub const BOX_SIZE: f32 = 40.0;
pub const BAR_Y: f32 = 300.0;

/// Left edge of a box in the lane belonging to `lane`.
pub fn lane_left_x(lane: Lane) -> f32 {
    let w = space::design_width();
    let column = match lane {
        Lane::Left => w * 0.25,
        Lane::Right => w * 0.75,
        Lane::Up | Lane::Down => w * 0.5,
    };
    column - BOX_SIZE / 2.0
}

/// One scrolling box. Spawned at the hit bar, advanced straight down each
/// tick; the pending-input queue is the boxes themselves, front first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowBox {
    pub lane: Lane,
    pub y: f32,
}

impl ArrowBox {
    fn new(lane: Lane) -> Self {
        ArrowBox { lane, y: BAR_Y }
    }

    #[inline(always)]
    pub fn x(&self) -> f32 {
        lane_left_x(self.lane)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// A pressed direction did not match the queue head.
    WrongKey,
    /// A box fell past the bottom edge unmatched.
    Timeout,
    /// Timed mode only: the session duration elapsed.
    TimeUp,
}

/// Result of feeding one directional press to the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    Hit,
    Miss,
    /// Empty queue or the session is already over; the press has no effect.
    Ignored,
}

/// Everything the Evaluation screen needs about a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub mode: GameMode,
    pub cause: GameOverCause,
    pub elapsed: f32,
    pub rank: Option<Rank>,
}

/// The live play state: the arrow queue, the spawner and the motion updater.
/// Strictly FIFO, single input channel; every box carries its direction, so
/// queue order and box order cannot diverge.
pub struct Session {
    boxes: VecDeque<ArrowBox>,
    spawn_timer: u32,
    speed: f32,
    ticks: u64,
    over: Option<GameOverCause>,
    rng: StdRng,
}

impl Session {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic session for tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Session {
            boxes: VecDeque::new(),
            spawn_timer: 0,
            speed: INITIAL_SPEED,
            ticks: 0,
            over: None,
            rng,
        }
    }

    /// Advances the session by one fixed tick: spawn scheduling first, then
    /// motion, then the fell-off-screen check.
    pub fn tick(&mut self) {
        if self.over.is_some() {
            return;
        }
        self.ticks += 1;

        self.spawn_timer += 1;
        if self.spawn_timer >= SPAWN_INTERVAL_TICKS {
            self.spawn();
        }

        for arrow in self.boxes.iter_mut() {
            arrow.y += self.speed;
        }
        if self
            .boxes
            .iter()
            .any(|arrow| arrow.y > space::design_height())
        {
            debug!("Arrow fell off screen after {} ticks", self.ticks);
            self.over = Some(GameOverCause::Timeout);
        }
    }

    fn spawn(&mut self) {
        let lane = ALL_LANES[self.rng.random_range(0..ALL_LANES.len())];
        self.boxes.push_back(ArrowBox::new(lane));
        self.spawn_timer = 0;
        self.speed += SPEED_INCREMENT;
    }

    /// Matches a directional press against the queue head. A mismatch ends
    /// the session; the unmatched boxes stay where they are.
    pub fn strike(&mut self, lane: Lane) -> Strike {
        if self.over.is_some() {
            return Strike::Ignored;
        }
        match self.boxes.front() {
            None => Strike::Ignored,
            Some(head) if head.lane == lane => {
                self.boxes.pop_front();
                Strike::Hit
            }
            Some(head) => {
                debug!(
                    "Wrong key: pressed {} but queue head is {}",
                    lane.name(),
                    head.lane.name()
                );
                self.over = Some(GameOverCause::WrongKey);
                Strike::Miss
            }
        }
    }

    /// Ends the session from outside the tick loop (the timed-mode cutoff).
    pub fn end(&mut self, cause: GameOverCause) {
        if self.over.is_none() {
            self.over = Some(cause);
        }
    }

    pub fn over(&self) -> Option<GameOverCause> {
        self.over
    }

    pub fn boxes(&self) -> impl Iterator<Item = &ArrowBox> {
        self.boxes.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.boxes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Preloads the queue directly, bypassing the spawner, so matcher tests
    /// are direction-exact.
    fn session_with_lanes(lanes: &[Lane]) -> Session {
        let mut session = Session::seeded(7);
        for &lane in lanes {
            session.boxes.push_back(ArrowBox::new(lane));
        }
        session
    }

    #[test]
    fn spawns_on_every_35th_tick_and_resets_the_timer() {
        let mut session = Session::seeded(1);
        for _ in 0..SPAWN_INTERVAL_TICKS - 1 {
            session.tick();
        }
        assert_eq!(session.queue_len(), 0);
        assert_eq!(session.spawn_timer, SPAWN_INTERVAL_TICKS - 1);

        session.tick();
        assert_eq!(session.queue_len(), 1);
        assert_eq!(session.spawn_timer, 0);

        for _ in 0..SPAWN_INTERVAL_TICKS {
            session.tick();
        }
        assert_eq!(session.queue_len(), 2);
    }

    #[test]
    fn speed_ramps_by_exactly_the_increment_per_spawn() {
        let mut session = Session::seeded(2);
        assert_eq!(session.speed, INITIAL_SPEED);

        let mut last = session.speed;
        for _ in 0..SPAWN_INTERVAL_TICKS * 3 {
            session.tick();
            assert!(session.speed >= last);
            last = session.speed;
        }
        let expected = INITIAL_SPEED + 3.0 * SPEED_INCREMENT;
        assert!((session.speed - expected).abs() < 1e-5);
    }

    #[test]
    fn boxes_advance_by_speed_each_tick() {
        let mut session = session_with_lanes(&[Lane::Up]);
        let y0 = session.boxes().next().unwrap().y;
        session.tick();
        let y1 = session.boxes().next().unwrap().y;
        assert!((y1 - y0 - session.speed).abs() < 1e-5);
    }

    #[test]
    fn correct_presses_shrink_the_queue_one_by_one() {
        let lanes = [Lane::Up, Lane::Down, Lane::Left, Lane::Right];
        let mut session = session_with_lanes(&lanes);
        for (i, &lane) in lanes.iter().enumerate() {
            assert_eq!(session.strike(lane), Strike::Hit);
            assert_eq!(session.queue_len(), lanes.len() - i - 1);
        }
        assert_eq!(session.queue_len(), 0);
        assert_eq!(session.over(), None);
    }

    #[test]
    fn wrong_key_ends_the_session_and_leaves_the_queue_alone() {
        let mut session = session_with_lanes(&[Lane::Left]);
        assert_eq!(session.strike(Lane::Right), Strike::Miss);
        assert_eq!(session.over(), Some(GameOverCause::WrongKey));
        // The unmatched box is still there.
        assert_eq!(session.queue_len(), 1);
        assert_eq!(session.boxes().next().unwrap().lane, Lane::Left);
    }

    #[test]
    fn wrong_key_mid_queue_still_ends_the_session() {
        let mut session = session_with_lanes(&[Lane::Up, Lane::Down, Lane::Left]);
        assert_eq!(session.strike(Lane::Up), Strike::Hit);
        assert_eq!(session.strike(Lane::Right), Strike::Miss);
        assert_eq!(session.over(), Some(GameOverCause::WrongKey));
        assert_eq!(session.queue_len(), 2);
    }

    #[test]
    fn press_on_empty_queue_is_a_no_op() {
        let mut session = Session::seeded(3);
        assert_eq!(session.strike(Lane::Up), Strike::Ignored);
        assert_eq!(session.over(), None);
        session.tick();
        assert_eq!(session.over(), None);
    }

    #[test]
    fn presses_after_game_over_are_ignored() {
        let mut session = session_with_lanes(&[Lane::Left, Lane::Left]);
        assert_eq!(session.strike(Lane::Right), Strike::Miss);
        assert_eq!(session.strike(Lane::Left), Strike::Ignored);
        assert_eq!(session.queue_len(), 2);
    }

    #[test]
    fn unmatched_box_past_the_bottom_edge_is_a_timeout_miss() {
        let mut session = session_with_lanes(&[Lane::Down]);
        // BAR_Y -> bottom at initial speed: (600 - 300) / 2.5 = 120 ticks,
        // plus one to cross the edge. Spawns along the way only add boxes
        // higher up, so the head still falls off first.
        let mut guard = 0;
        while session.over().is_none() {
            session.tick();
            guard += 1;
            assert!(guard < 2_000, "session never timed out");
        }
        assert_eq!(session.over(), Some(GameOverCause::Timeout));
    }

    #[test]
    fn spawned_lanes_are_deterministic_for_a_seed() {
        let collect = |seed| {
            let mut session = Session::seeded(seed);
            for _ in 0..SPAWN_INTERVAL_TICKS * 4 {
                session.tick();
            }
            session.boxes().map(|b| b.lane).collect::<Vec<_>>()
        };
        assert_eq!(collect(42), collect(42));
    }

    #[test]
    fn lane_columns_sit_on_quarter_lines() {
        assert_eq!(lane_left_x(Lane::Left), 200.0 - BOX_SIZE / 2.0);
        assert_eq!(lane_left_x(Lane::Right), 600.0 - BOX_SIZE / 2.0);
        assert_eq!(lane_left_x(Lane::Up), 400.0 - BOX_SIZE / 2.0);
        assert_eq!(lane_left_x(Lane::Down), 400.0 - BOX_SIZE / 2.0);
    }
}
