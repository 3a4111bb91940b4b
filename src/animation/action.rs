#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    Once,
    #[default]
    Loop,
    PingPong,
}

/// Playback state of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Paused,
    Playing,
    /// Playing and held there: user pause/stop requests are ignored.
    Locked,
}

/// A named host animation and its playback cursor.
#[derive(Debug, Clone)]
pub struct Animation {
    name: String,
    pub duration: f32,
    pub time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    state: PlayState,
}

impl Animation {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::default(),
            state: PlayState::Stopped,
        }
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn state(&self) -> PlayState {
        self.state
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state == PlayState::Locked
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlayState::Playing | PlayState::Locked)
    }

    // === User controls ===

    pub fn play(&mut self) {
        if !self.is_locked() {
            self.state = PlayState::Playing;
        }
    }

    /// Ignored while locked.
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    /// Ignored while locked.
    pub fn stop(&mut self) {
        if !self.is_locked() {
            self.state = PlayState::Stopped;
            self.time = 0.0;
        }
    }

    // === Rig controls ===

    pub fn lock(&mut self) {
        self.state = PlayState::Locked;
    }

    /// Releases a lock; the animation stays where it is, paused, under user
    /// control again.
    pub fn unlock(&mut self) {
        if self.is_locked() {
            self.state = PlayState::Paused;
        }
    }

    /// Advances the cursor by `dt` seconds if playing.
    pub fn update(&mut self, dt: f32) {
        if !self.is_playing() || self.duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;
        let duration = self.duration;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration || self.time < 0.0 {
                    self.time = self.time.clamp(0.0, duration);
                    // A locked animation keeps its state at the end frame.
                    if !self.is_locked() {
                        self.state = PlayState::Paused;
                    }
                }
            }
            LoopMode::Loop => {
                self.time = self.time.rem_euclid(duration);
            }
            LoopMode::PingPong => {
                let t = self.time.rem_euclid(duration * 2.0);
                self.time = if t > duration { duration * 2.0 - t } else { t };
            }
        }
    }
}
