use std::time::{Duration, Instant};

pub struct FpsCounter {
    last_update_time: Instant,
    frames_since_last_update: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        FpsCounter {
            last_update_time: Instant::now(),
            frames_since_last_update: 0,
        }
    }

    /// Call once per rendered frame. Returns `Some(fps)` roughly once a second.
    pub fn update(&mut self) -> Option<u32> {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update_time);

        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_last_update;
            self.frames_since_last_update = 0;
            // Advance by a whole second to keep the reporting interval stable;
            // resync if we have fallen badly behind.
            self.last_update_time += Duration::from_secs(1);
            if self.last_update_time < now - Duration::from_secs(1) {
                self.last_update_time = now;
            }
            Some(fps)
        } else {
            None
        }
    }
}
