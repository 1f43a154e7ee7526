use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::storage::GameSettings;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FeedbackEvent {
    Flip,
    Match,
    Win,
    Lose,
    Click,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HapticPattern {
    Tap,
    Success,
    Error,
}

impl FeedbackEvent {
    pub fn sound_name(self) -> &'static str {
        match self {
            FeedbackEvent::Flip => "flip",
            FeedbackEvent::Match => "match",
            FeedbackEvent::Win => "win",
            FeedbackEvent::Lose => "lose",
            FeedbackEvent::Click => "click",
        }
    }

    pub fn haptic(self) -> Option<HapticPattern> {
        match self {
            FeedbackEvent::Flip => Some(HapticPattern::Tap),
            FeedbackEvent::Match | FeedbackEvent::Win => Some(HapticPattern::Success),
            FeedbackEvent::Lose => Some(HapticPattern::Error),
            FeedbackEvent::Click => None,
        }
    }
}

/// Audio/haptic output. Called inline from the session, so implementations
/// must hand the event off and return immediately.
pub trait FeedbackSink: Send + Sync {
    fn notify(&self, event: FeedbackEvent);
}

pub struct NoFeedback;

impl FeedbackSink for NoFeedback {
    fn notify(&self, _event: FeedbackEvent) {}
}

pub trait SoundPlayer: Send + Sync {
    fn play(&self, sound_name: &'static str);
}

pub trait HapticPlayer: Send + Sync {
    fn vibrate(&self, pattern: HapticPattern);
}

/// Splits each event into a sound and a haptic pattern. Sounds are dropped
/// while sound is disabled; haptics always play.
pub struct FeedbackRouter {
    sounds: Arc<dyn SoundPlayer>,
    haptics: Arc<dyn HapticPlayer>,
    sound_enabled: AtomicBool,
}

impl FeedbackRouter {
    pub fn new(sounds: Arc<dyn SoundPlayer>, haptics: Arc<dyn HapticPlayer>, settings: &GameSettings) -> Self {
        Self {
            sounds,
            haptics,
            sound_enabled: AtomicBool::new(settings.sound_enabled),
        }
    }

    pub fn apply_settings(&self, settings: &GameSettings) {
        self.sound_enabled.store(settings.sound_enabled, Ordering::Relaxed);
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::Relaxed)
    }
}

impl FeedbackSink for FeedbackRouter {
    fn notify(&self, event: FeedbackEvent) {
        if self.sound_enabled() {
            self.sounds.play(event.sound_name());
        }
        if let Some(pattern) = event.haptic() {
            self.haptics.vibrate(pattern);
        }
    }
}
