use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::nav::Intent;

pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;
pub const DEFAULT_WHEEL_DEBOUNCE: Duration = Duration::from_millis(50);
pub const DEFAULT_FULLSCREEN_KEY: char = 'f';

/// Slide number reached with the `0` key.
const DIGIT_ZERO_SLIDE: usize = 10;

/// Letters the window binds itself: quit, theme, help.
pub const RESERVED_LETTERS: [char; 3] = ['q', 'd', 'h'];

pub fn is_valid_swipe_threshold(threshold: f32) -> bool {
    threshold.is_finite() && threshold > 0.0
}

/// Whether `c` may be bound to the fullscreen toggle.
pub fn is_valid_fullscreen_key(c: char) -> bool {
    c.is_ascii_alphabetic() && !RESERVED_LETTERS.contains(&c.to_ascii_lowercase())
}

/// Every binding, as shown by `slidedeck keys` and the help overlay.
pub const CONTROLS: &[(&str, &str)] = &[
    ("\u{2192} / Space / Enter", "Next slide"),
    ("\u{2190}", "Previous slide"),
    ("Home", "First slide"),
    ("End", "Last slide"),
    ("1-9", "Jump to slide number"),
    ("0", "Jump to slide 10"),
    ("F", "Toggle fullscreen"),
    ("Esc", "Leave fullscreen"),
    ("Swipe left / right", "Next / previous slide"),
    ("Scroll down / up", "Next / previous slide"),
    ("Click indicator", "Jump to slide"),
    ("H", "Toggle this help"),
    ("D", "Toggle theme"),
    ("Q", "Quit"),
];

/// A key identity, independent of the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    Home,
    End,
    Escape,
    Digit(u8),
    Letter(char),
}

impl Key {
    /// Parse a browser-style key name (`"ArrowRight"`, `" "`, `"5"`, `"f"`).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            " " | "Space" => Self::Space,
            "Enter" => Self::Enter,
            "Home" => Self::Home,
            "End" => Self::End,
            "Escape" | "Esc" => Self::Escape,
            _ => {
                let mut chars = name.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                if let Some(d) = c.to_digit(10) {
                    Self::Digit(d as u8)
                } else if c.is_ascii_alphabetic() {
                    Self::Letter(c.to_ascii_lowercase())
                } else {
                    return None;
                }
            }
        };
        Some(key)
    }

    /// Whether the host's default action for this key must be suppressed.
    pub fn suppresses_default(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft | Self::ArrowRight | Self::Space | Self::Enter | Self::Home | Self::End
        )
    }
}

/// Map a key press to a navigation intent for a deck of `total` slides.
pub fn key_intent(key: Key, total: usize) -> Option<Intent> {
    match key {
        Key::ArrowRight | Key::Space | Key::Enter => Some(Intent::Next),
        Key::ArrowLeft => Some(Intent::Previous),
        Key::Home => Some(Intent::GoTo(0)),
        Key::End => Some(Intent::GoTo(total.saturating_sub(1))),
        Key::Digit(0) => {
            (DIGIT_ZERO_SLIDE <= total).then_some(Intent::GoTo(DIGIT_ZERO_SLIDE - 1))
        }
        Key::Digit(d) if d <= 9 => {
            let slide = d as usize;
            (slide <= total).then_some(Intent::GoTo(slide - 1))
        }
        _ => None,
    }
}

/// Raw input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    /// Vertical wheel delta; positive scrolls down.
    Wheel { delta_y: f32 },
    TouchStart { x: f32 },
    TouchEnd { x: f32 },
    IndicatorClick(usize),
    PrevButton,
    NextButton,
}

/// What an input event asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Navigate(Intent),
    ToggleFullscreen,
    ExitFullscreen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputSettings {
    pub swipe_threshold: f32,
    pub wheel_debounce: Duration,
    pub fullscreen_key: char,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            wheel_debounce: DEFAULT_WHEEL_DEBOUNCE,
            fullscreen_key: DEFAULT_FULLSCREEN_KEY,
        }
    }
}

impl InputSettings {
    pub fn from_config(config: &Config) -> Self {
        let mut settings = Self::default();
        if let Some(input) = &config.input {
            match input.swipe_threshold {
                Some(threshold) if is_valid_swipe_threshold(threshold) => {
                    settings.swipe_threshold = threshold;
                }
                Some(threshold) => {
                    tracing::warn!(threshold, "ignoring invalid input.swipe_threshold");
                }
                None => {}
            }
            if let Some(ms) = input.wheel_debounce_ms {
                settings.wheel_debounce = Duration::from_millis(ms);
            }
            if let Some(name) = input.fullscreen_key.as_deref() {
                match Key::from_name(name) {
                    Some(Key::Letter(c)) if is_valid_fullscreen_key(c) => {
                        settings.fullscreen_key = c;
                    }
                    _ => tracing::warn!(key = name, "ignoring invalid input.fullscreen_key"),
                }
            }
        }
        settings
    }
}

/// Turns raw key, wheel, touch and click events into [`Action`]s.
#[derive(Debug)]
pub struct InputNormalizer {
    settings: InputSettings,
    wheel: Debouncer<Option<Intent>>,
    touch_start: Option<f32>,
}

impl InputNormalizer {
    pub fn new(settings: InputSettings) -> Self {
        let wheel = Debouncer::new(settings.wheel_debounce);
        Self {
            settings,
            wheel,
            touch_start: None,
        }
    }

    /// Handle one event. Wheel events never act immediately; their intent
    /// surfaces later through [`poll`](Self::poll).
    pub fn handle(&mut self, event: InputEvent, now: Instant, total: usize) -> Option<Action> {
        match event {
            InputEvent::Key(key) => self.handle_key(key, total),
            InputEvent::Wheel { delta_y } => {
                let intent = wheel_intent(delta_y);
                if self.wheel.schedule(intent, now) {
                    tracing::trace!(delta_y, "wheel debounce restarted");
                }
                None
            }
            InputEvent::TouchStart { x } => {
                self.touch_start = Some(x);
                None
            }
            InputEvent::TouchEnd { x } => {
                let start = self.touch_start.take()?;
                swipe_intent(start, x, self.settings.swipe_threshold).map(Action::Navigate)
            }
            InputEvent::IndicatorClick(index) => Some(Action::Navigate(Intent::GoTo(index))),
            InputEvent::PrevButton => Some(Action::Navigate(Intent::Previous)),
            InputEvent::NextButton => Some(Action::Navigate(Intent::Next)),
        }
    }

    fn handle_key(&self, key: Key, total: usize) -> Option<Action> {
        match key {
            Key::Escape => Some(Action::ExitFullscreen),
            Key::Letter(c) if c.eq_ignore_ascii_case(&self.settings.fullscreen_key) => {
                Some(Action::ToggleFullscreen)
            }
            _ => {
                let intent = key_intent(key, total);
                if intent.is_none() && matches!(key, Key::Digit(_)) {
                    tracing::debug!(?key, total, "digit key beyond deck length ignored");
                }
                intent.map(Action::Navigate)
            }
        }
    }

    /// Fire the debounced wheel intent once the wheel has been quiet long enough.
    pub fn poll(&mut self, now: Instant) -> Option<Action> {
        let intent = self.wheel.poll(now)??;
        tracing::trace!(?intent, "wheel gesture settled");
        Some(Action::Navigate(intent))
    }

    /// When the host should call [`poll`](Self::poll) next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.wheel.deadline()
    }
}

fn wheel_intent(delta_y: f32) -> Option<Intent> {
    if delta_y > 0.0 {
        Some(Intent::Next)
    } else if delta_y < 0.0 {
        Some(Intent::Previous)
    } else {
        None
    }
}

/// Resolve a horizontal swipe. Dragging content left (finger moving left)
/// advances.
pub fn swipe_intent(start_x: f32, end_x: f32, threshold: f32) -> Option<Intent> {
    let diff = start_x - end_x;
    if diff.abs() <= threshold {
        return None;
    }
    if diff > 0.0 {
        Some(Intent::Next)
    } else {
        Some(Intent::Previous)
    }
}
