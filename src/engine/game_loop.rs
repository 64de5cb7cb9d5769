/// Fixed timestep frame clock
///
/// The host reports how much wall time each rendered frame took; the clock
/// accumulates it and says how many fixed simulation steps to run. This keeps
/// the simulation deterministic no matter how irregular the host's frames are.

/// Target simulation rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum number of simulation steps per frame to prevent spiral of death
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Frame timing state
#[derive(Debug)]
pub struct FrameClock {
    /// Accumulated seconds not yet consumed by fixed steps
    accumulator: f32,

    /// Whether the simulation is paused
    paused: bool,

    /// Total frames reported by the host
    frame_count: u64,

    /// Total fixed steps handed out
    step_count: u64,

    /// Simulated seconds (fixed steps * timestep)
    simulated_time: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            paused: false,
            frame_count: 0,
            step_count: 0,
            simulated_time: 0.0,
        }
    }

    /// Report a rendered frame of `frame_time` seconds and get the number of
    /// fixed steps to simulate
    pub fn begin_frame(&mut self, frame_time: f32) -> u32 {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time.max(0.0);

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP;
            steps += 1;
        }

        // Drop whatever could not be simulated this frame
        if steps == MAX_STEPS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP {
            log::warn!(
                "Frame clock fell behind; dropping {:.3}s of simulation",
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        self.step_count += steps as u64;
        self.simulated_time += steps as f32 * FIXED_TIMESTEP;
        steps
    }

    /// Fixed timestep for simulation updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Interpolation alpha for rendering between simulation steps
    pub fn alpha(&self) -> f32 {
        self.accumulator / FIXED_TIMESTEP
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn simulated_time(&self) -> f32 {
        self.simulated_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = 0.0;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
