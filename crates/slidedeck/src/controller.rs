use std::time::Instant;

use crate::fullscreen::{FullscreenError, FullscreenRequest, FullscreenToggle};
use crate::input::{Action, InputEvent, InputNormalizer, InputSettings};
use crate::nav::{Intent, Position};
use crate::reveal::RevealTracker;
use crate::surface::Surface;
use crate::view::ViewState;

/// Owns all presentation state and pushes changes into a [`Surface`].
///
/// Events go in through [`handle`](Self::handle) and the `on_*` methods;
/// deferred work (debounced wheel, fullscreen timeouts) runs from
/// [`tick`](Self::tick).
pub struct Controller<S: Surface> {
    position: Position,
    input: InputNormalizer,
    fullscreen: FullscreenToggle,
    reveal: RevealTracker,
    loaded: bool,
    surface: S,
}

impl<S: Surface> Controller<S> {
    /// `element_counts` holds the number of content elements per slide and
    /// defines the deck length. Returns `None` for an empty deck.
    pub fn new(element_counts: &[usize], settings: InputSettings, mut surface: S) -> Option<Self> {
        let position = Position::new(element_counts.len())?;
        surface.set_opacity(0.0);
        surface.render(&ViewState::from_position(&position));
        Some(Self {
            position,
            input: InputNormalizer::new(settings),
            fullscreen: FullscreenToggle::default(),
            reveal: RevealTracker::new(element_counts.iter().copied()),
            loaded: false,
            surface,
        })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    #[cfg(test)]
    pub fn mode(&self) -> crate::fullscreen::PresentationMode {
        self.fullscreen.mode()
    }

    #[cfg(test)]
    pub fn play_state(&self, slide: usize, element: usize) -> crate::reveal::PlayState {
        self.reveal.play_state(slide, element)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Feed one raw input event.
    pub fn handle(&mut self, event: InputEvent, now: Instant) {
        let action = self.input.handle(event, now, self.position.total());
        if let Some(action) = action {
            self.perform(action, now);
        }
    }

    /// Run deferred work that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Some(action) = self.input.poll(now) {
            self.perform(action, now);
        }
        self.fullscreen.poll(now);
    }

    /// Earliest instant at which [`tick`](Self::tick) has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.input.next_deadline(), self.fullscreen.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn perform(&mut self, action: Action, now: Instant) {
        match action {
            Action::Navigate(intent) => {
                self.navigate(intent);
            }
            Action::ToggleFullscreen => {
                let request = self.fullscreen.toggle(now);
                self.send(request);
            }
            Action::ExitFullscreen => {
                let request = self.fullscreen.escape(now);
                self.send(request);
            }
        }
    }

    /// Toggle presentation mode without a key press.
    pub fn toggle_fullscreen(&mut self, now: Instant) {
        self.perform(Action::ToggleFullscreen, now);
    }

    fn send(&mut self, request: Option<FullscreenRequest>) {
        if let Some(request) = request {
            self.surface.request_fullscreen(request.enters());
        }
    }

    /// Apply an intent and resynchronize the surface if the slide changed.
    pub fn navigate(&mut self, intent: Intent) -> bool {
        if !self.position.apply(intent) {
            tracing::debug!(?intent, current = self.position.current(), "navigation ignored");
            return false;
        }
        tracing::debug!(
            ?intent,
            slide = self.position.current() + 1,
            total = self.position.total(),
            "navigated"
        );
        self.surface.render(&ViewState::from_position(&self.position));
        true
    }

    pub fn on_fullscreen_changed(&mut self, fullscreen: bool) {
        self.fullscreen.on_surface_changed(fullscreen);
    }

    /// For hosts that report refusals; egui only ever times out.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn on_fullscreen_rejected(&mut self, reason: impl Into<String>) {
        self.fullscreen
            .on_rejected(FullscreenError::Rejected(reason.into()));
    }

    /// Report how much of a content element is visible.
    pub fn on_visibility(&mut self, slide: usize, element: usize, visible_ratio: f32) {
        if self.reveal.observe(slide, element, visible_ratio) {
            tracing::trace!(slide, element, "reveal animation started");
            self.surface.start_animation(slide, element);
        }
    }

    /// The host finished loading; fade the presentation in.
    pub fn on_load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        self.surface.set_opacity(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fullscreen::PresentationMode;
    use crate::input::Key;
    use crate::reveal::PlayState;
    use crate::surface::RecordingSurface;
    use std::time::Duration;

    fn controller(total: usize) -> Controller<RecordingSurface> {
        let counts = vec![2; total];
        Controller::new(&counts, InputSettings::default(), RecordingSurface::default()).unwrap()
    }

    fn press(c: &mut Controller<RecordingSurface>, key: Key) {
        c.handle(InputEvent::Key(key), Instant::now());
    }

    #[test]
    fn test_empty_deck_has_no_controller() {
        let c = Controller::new(&[], InputSettings::default(), RecordingSurface::default());
        assert!(c.is_none());
    }

    #[test]
    fn test_initial_render() {
        let c = controller(4);
        assert_eq!(c.surface().renders.len(), 1);
        assert_eq!(c.surface().last().counter, 1);
        assert_eq!(c.surface().opacity, Some(0.0));
    }

    #[test]
    fn test_keyboard_scenario_twelve_slides() {
        let mut c = controller(12);

        press(&mut c, Key::End);
        assert_eq!(c.position().current(), 11);
        assert!(c.surface().last().next_disabled);
        assert_eq!(c.surface().last().progress, 100.0);

        press(&mut c, Key::Home);
        assert_eq!(c.position().current(), 0);
        assert!(c.surface().last().prev_disabled);
        assert_eq!(c.surface().last().progress, 0.0);

        press(&mut c, Key::Digit(5));
        assert_eq!(c.position().current(), 4);

        press(&mut c, Key::Digit(0));
        assert_eq!(c.position().current(), 9);
        assert_eq!(c.surface().last().counter, 10);
    }

    #[test]
    fn test_digit_zero_in_short_deck_is_ignored() {
        let mut c = controller(4);
        press(&mut c, Key::Digit(3));
        press(&mut c, Key::Digit(0));
        assert_eq!(c.position().current(), 2);
    }

    #[test]
    fn test_render_only_on_change() {
        let mut c = controller(3);
        press(&mut c, Key::ArrowLeft);
        press(&mut c, Key::Home);
        assert_eq!(c.surface().renders.len(), 1);
        press(&mut c, Key::Space);
        assert_eq!(c.surface().renders.len(), 2);
        c.handle(InputEvent::IndicatorClick(9), Instant::now());
        assert_eq!(c.surface().renders.len(), 2);
    }

    #[test]
    fn test_wheel_burst_moves_once() {
        let mut c = controller(5);
        let t0 = Instant::now();
        for i in 0..6 {
            let at = t0 + Duration::from_millis(i * 15);
            c.handle(InputEvent::Wheel { delta_y: 40.0 }, at);
            c.tick(at);
        }
        assert_eq!(c.position().current(), 0);
        let due = c.next_deadline().unwrap();
        assert_eq!(due, t0 + Duration::from_millis(75 + 50));
        c.tick(due);
        assert_eq!(c.position().current(), 1);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn test_swipe_scenarios() {
        let mut c = controller(5);
        let now = Instant::now();
        c.handle(InputEvent::TouchStart { x: 300.0 }, now);
        c.handle(InputEvent::TouchEnd { x: 270.0 }, now);
        assert_eq!(c.position().current(), 0);
        c.handle(InputEvent::TouchStart { x: 300.0 }, now);
        c.handle(InputEvent::TouchEnd { x: 200.0 }, now);
        assert_eq!(c.position().current(), 1);
    }

    #[test]
    fn test_fullscreen_round_trip() {
        let mut c = controller(3);
        press(&mut c, Key::Letter('f'));
        assert_eq!(c.surface().fullscreen_requests, vec![true]);
        assert_eq!(c.mode(), PresentationMode::Normal);
        c.on_fullscreen_changed(true);
        assert_eq!(c.mode(), PresentationMode::Fullscreen);

        press(&mut c, Key::Escape);
        assert_eq!(c.surface().fullscreen_requests, vec![true, false]);
        c.on_fullscreen_changed(false);
        assert_eq!(c.mode(), PresentationMode::Normal);

        // Escape outside fullscreen does nothing
        press(&mut c, Key::Escape);
        assert_eq!(c.surface().fullscreen_requests.len(), 2);
    }

    #[test]
    fn test_fullscreen_rejection_keeps_position_and_mode() {
        let mut c = controller(3);
        press(&mut c, Key::ArrowRight);
        press(&mut c, Key::Letter('F'));
        c.on_fullscreen_rejected("not allowed");
        assert_eq!(c.mode(), PresentationMode::Normal);
        assert_eq!(c.position().current(), 1);
    }

    #[test]
    fn test_fullscreen_timeout_through_tick() {
        let mut c = controller(3);
        let now = Instant::now();
        c.handle(InputEvent::Key(Key::Letter('f')), now);
        let due = c.next_deadline().unwrap();
        c.tick(due);
        assert_eq!(c.next_deadline(), None);
        assert_eq!(c.mode(), PresentationMode::Normal);
    }

    #[test]
    fn test_reveal_starts_animation_once() {
        let mut c = controller(3);
        c.on_visibility(1, 0, 0.5);
        c.on_visibility(1, 0, 0.9);
        c.on_visibility(1, 1, 0.01);
        assert_eq!(c.surface().animations, vec![(1, 0)]);
        assert_eq!(c.play_state(1, 0), PlayState::Running);
        assert_eq!(c.play_state(1, 1), PlayState::Paused);
    }

    #[test]
    fn test_load_fades_in() {
        let mut c = controller(2);
        c.on_load();
        assert_eq!(c.surface().opacity, Some(1.0));
    }
}
