/// Visible fraction an element needs before its animation starts.
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Paused,
    Running,
}

/// Animation play state of every content element, per slide.
///
/// Elements start paused and switch to running the first time they are seen.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    states: Vec<Vec<PlayState>>,
}

impl RevealTracker {
    /// `element_counts[i]` is the number of content elements on slide `i`.
    pub fn new(element_counts: impl IntoIterator<Item = usize>) -> Self {
        let states = element_counts
            .into_iter()
            .map(|n| vec![PlayState::Paused; n])
            .collect();
        Self { states }
    }

    /// Record the visible ratio of an element. Returns `true` when this
    /// observation started its animation.
    pub fn observe(&mut self, slide: usize, element: usize, visible_ratio: f32) -> bool {
        let Some(state) = self.states.get_mut(slide).and_then(|s| s.get_mut(element)) else {
            return false;
        };
        if *state == PlayState::Running || visible_ratio < VISIBILITY_THRESHOLD {
            return false;
        }
        *state = PlayState::Running;
        true
    }

    #[cfg(test)]
    pub fn play_state(&self, slide: usize, element: usize) -> PlayState {
        self.states
            .get(slide)
            .and_then(|s| s.get(element))
            .copied()
            .unwrap_or(PlayState::Paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_paused() {
        let tracker = RevealTracker::new([2, 3]);
        assert_eq!(tracker.play_state(1, 2), PlayState::Paused);
    }

    #[test]
    fn test_runs_once_visible() {
        let mut tracker = RevealTracker::new([2]);
        assert!(!tracker.observe(0, 0, 0.05));
        assert_eq!(tracker.play_state(0, 0), PlayState::Paused);
        assert!(tracker.observe(0, 0, 0.1));
        assert_eq!(tracker.play_state(0, 0), PlayState::Running);
        // Already running: not reported again, and never paused again
        assert!(!tracker.observe(0, 0, 1.0));
        assert!(!tracker.observe(0, 0, 0.0));
        assert_eq!(tracker.play_state(0, 0), PlayState::Running);
        assert_eq!(tracker.play_state(0, 1), PlayState::Paused);
    }

    #[test]
    fn test_unknown_element_ignored() {
        let mut tracker = RevealTracker::new([1]);
        assert!(!tracker.observe(0, 5, 1.0));
        assert!(!tracker.observe(3, 0, 1.0));
        assert_eq!(tracker.play_state(3, 0), PlayState::Paused);
    }
}
