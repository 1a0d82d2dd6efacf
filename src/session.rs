//! Session and reset handling
//!
//! The session owns the seed, the RNG stream, the global frame counter and the
//! current stage. Every seed change is followed by a full rebuild of the stage
//! so the same seed always plays the same.

use rand::Rng;

use crate::input::{InputSource, Key};
use crate::render::FrameSnapshot;
use crate::settings::Settings;
use crate::share::{self, LinkOpener, NullOpener};
use crate::sim::{GameState, StageRng, TickReport, next_seed_from_digit, tick};

pub struct Session {
    seed: u64,
    settings: Settings,
    rng: StageRng,
    /// Frames since the session started (never reset)
    frame: u64,
    state: GameState,
    /// Drive the player toward items instead of reading movement keys
    pub autoplay: bool,
    opener: Box<dyn LinkOpener>,
}

impl Session {
    /// Start a session on `seed`. Shares go nowhere until an opener is set.
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut rng = StageRng::new(seed);
        let state = GameState::new(seed, &settings, &mut rng, 0);
        Self {
            seed,
            settings,
            rng,
            frame: 0,
            state,
            autoplay: false,
            opener: Box::new(NullOpener),
        }
    }

    /// Start on a freshly drawn seed
    pub fn with_random_seed(settings: Settings) -> Self {
        let seed = rand::rng().random_range(0..=settings.new_stage_seed_max);
        Self::new(seed, settings)
    }

    pub fn with_opener(mut self, opener: Box<dyn LinkOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Discard the stage and rebuild it from the current seed
    pub fn reset(&mut self) {
        self.state = GameState::new(self.seed, &self.settings, &mut self.rng, self.frame);
    }

    /// Replay the current stage
    pub fn restart(&mut self) {
        log::info!("Restarting stage {}", self.seed);
        self.reset();
    }

    /// Switch to a random stage
    pub fn new_stage(&mut self) {
        self.new_stage_with(&mut rand::rng());
    }

    /// Switch to a stage drawn from `rng`
    pub fn new_stage_with<R: Rng>(&mut self, rng: &mut R) {
        let seed = rng.random_range(0..=self.settings.new_stage_seed_max);
        self.set_seed(seed);
    }

    /// Type a digit into the seed
    pub fn push_digit(&mut self, digit: u8) {
        let seed = next_seed_from_digit(self.seed, digit, self.settings.seed_digit_threshold);
        self.set_seed(seed);
    }

    pub fn set_seed(&mut self, seed: u64) {
        log::info!("Stage seed {} -> {}", self.seed, seed);
        self.seed = seed;
        self.reset();
    }

    /// Run one frame: seed keys, gameplay, then sharing.
    pub fn update(&mut self, input: &impl InputSource) -> TickReport {
        self.frame += 1;

        if input.pressed(Key::Restart) {
            self.restart();
        }
        if input.pressed(Key::NewStage) {
            self.new_stage();
        }
        for digit in 0..10 {
            if input.pressed(Key::Digit(digit)) {
                self.push_digit(digit);
            }
        }

        let mut tick_input = input.tick_input();
        tick_input.idle_mode = self.autoplay;
        let report = tick(&mut self.state, &tick_input, self.frame);

        if input.pressed(Key::Share) {
            self.share();
        }
        report
    }

    /// Open the share link for the current clear. No-op unless cleared.
    pub fn share(&self) -> bool {
        match self.state.clear.clear_time() {
            Some(time) => share::share_clear(self.opener.as_ref(), time, self.seed),
            None => false,
        }
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.state, self.frame)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable stage access, for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
