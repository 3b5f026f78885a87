//! Frame-index playback. The renderer turns the current frame into pixels;
//! the simulation only needs to know which frame is showing and whether a
//! one-shot animation has finished or passed its midpoint.

use serde::{Deserialize, Serialize};

/// Frame list and timing for one animation, as written in data files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDef {
    pub frames: Vec<usize>,
    pub interval: f32,
    /// Number of full cycles before the animation is done. `None` loops.
    #[serde(default)]
    pub cycles: Option<u32>,
}

impl AnimationDef {
    pub fn looping(frames: Vec<usize>, interval: f32) -> Self {
        Self { frames, interval, cycles: None }
    }

    pub fn once(frames: Vec<usize>, interval: f32) -> Self {
        Self { frames, interval, cycles: Some(1) }
    }

    /// Frames advance only with a positive interval.
    pub fn is_playable(&self) -> bool {
        self.interval > 0.0 && self.interval.is_finite()
    }

    pub fn total_duration(&self) -> Option<f32> {
        self.cycles
            .map(|cycles| self.frames.len() as f32 * self.interval * cycles as f32)
    }
}

/// Playback position of one animation. Every entity owns its own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    def: AnimationDef,
    timer: f32,
    current: usize,
    times_played: u32,
}

impl Animation {
    pub fn new(def: AnimationDef) -> Self {
        Self {
            def,
            timer: 0.0,
            current: 0,
            times_played: 0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.is_done()
            || !self.def.is_playable()
            || (self.def.frames.len() <= 1 && self.def.cycles.is_none())
        {
            return;
        }

        self.timer += dt;
        while self.timer >= self.def.interval && !self.is_done() {
            self.timer -= self.def.interval;
            self.current += 1;
            if self.current >= self.def.frames.len() {
                self.current = 0;
                self.times_played += 1;
            }
        }
    }

    /// Frame index to draw. A finished one-shot holds its last frame.
    pub fn current_frame(&self) -> usize {
        if self.is_done() {
            return self.def.frames.last().copied().unwrap_or_default();
        }
        self.def.frames.get(self.current).copied().unwrap_or_default()
    }

    pub fn is_done(&self) -> bool {
        self.def
            .cycles
            .is_some_and(|cycles| self.times_played >= cycles)
    }

    /// True once playback reaches the middle frame of the first cycle.
    pub fn is_halfway_done(&self) -> bool {
        self.is_done() || self.times_played > 0 || self.current >= self.def.frames.len() / 2
    }

    pub fn refresh(&mut self) {
        self.timer = 0.0;
        self.current = 0;
        self.times_played = 0;
    }

    pub fn def(&self) -> &AnimationDef {
        &self.def
    }
}
