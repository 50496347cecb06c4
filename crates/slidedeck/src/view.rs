use crate::nav::Position;

/// Per-slide state used for directional transition styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideMarker {
    Passed,
    Active,
    Upcoming,
}

/// Everything the surface shows that depends on the current position.
///
/// Built by [`ViewState::from_position`], which is pure: the same position
/// always yields the same view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub markers: Vec<SlideMarker>,
    /// 1-based slide number shown in the counter.
    pub counter: usize,
    pub total: usize,
    /// Progress fill in percent, `0.0..=100.0`.
    pub progress: f32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub indicators: Vec<bool>,
}

impl ViewState {
    pub fn from_position(position: &Position) -> Self {
        let current = position.current();
        let total = position.total();

        let markers = (0..total)
            .map(|i| match i.cmp(&current) {
                std::cmp::Ordering::Less => SlideMarker::Passed,
                std::cmp::Ordering::Equal => SlideMarker::Active,
                std::cmp::Ordering::Greater => SlideMarker::Upcoming,
            })
            .collect();

        // A one-slide deck is both first and last; show it as complete.
        let progress = if total > 1 {
            current as f32 / (total - 1) as f32 * 100.0
        } else {
            100.0
        };

        Self {
            markers,
            counter: current + 1,
            total,
            progress,
            prev_disabled: position.is_first(),
            next_disabled: position.is_last(),
            indicators: (0..total).map(|i| i == current).collect(),
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<usize> {
        self.markers.iter().position(|m| *m == SlideMarker::Active)
    }

    pub fn counter_text(&self) -> String {
        format!("{} / {}", self.counter, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::Intent;

    fn view_at(total: usize, index: usize) -> ViewState {
        let mut pos = Position::new(total).unwrap();
        pos.go_to(index);
        ViewState::from_position(&pos)
    }

    #[test]
    fn test_markers_split_around_current() {
        let view = view_at(5, 2);
        assert_eq!(
            view.markers,
            vec![
                SlideMarker::Passed,
                SlideMarker::Passed,
                SlideMarker::Active,
                SlideMarker::Upcoming,
                SlideMarker::Upcoming,
            ]
        );
        assert_eq!(view.active(), Some(2));
    }

    #[test]
    fn test_exactly_one_active_after_any_navigation() {
        let mut pos = Position::new(6).unwrap();
        let intents = [
            Intent::Next,
            Intent::Next,
            Intent::GoTo(5),
            Intent::Next,
            Intent::Previous,
            Intent::GoTo(0),
            Intent::Previous,
            Intent::GoTo(42),
        ];
        for intent in intents {
            pos.apply(intent);
            let view = ViewState::from_position(&pos);
            let active = view
                .markers
                .iter()
                .filter(|m| **m == SlideMarker::Active)
                .count();
            assert_eq!(active, 1, "after {intent:?}");
            assert_eq!(view.indicators.iter().filter(|on| **on).count(), 1);
            assert!(view.indicators[pos.current()]);
            assert_eq!(view.counter, pos.current() + 1);
        }
    }

    #[test]
    fn test_progress_endpoints() {
        assert_eq!(view_at(12, 0).progress, 0.0);
        assert_eq!(view_at(12, 11).progress, 100.0);
        assert_eq!(view_at(5, 2).progress, 50.0);
    }

    #[test]
    fn test_single_slide_progress_is_finite() {
        let view = view_at(1, 0);
        assert_eq!(view.progress, 100.0);
        assert!(view.prev_disabled);
        assert!(view.next_disabled);
    }

    #[test]
    fn test_button_enablement() {
        let first = view_at(3, 0);
        assert!(first.prev_disabled);
        assert!(!first.next_disabled);

        let middle = view_at(3, 1);
        assert!(!middle.prev_disabled);
        assert!(!middle.next_disabled);

        let last = view_at(3, 2);
        assert!(!last.prev_disabled);
        assert!(last.next_disabled);
    }

    #[test]
    fn test_idempotent() {
        let pos = Position::new(4).unwrap();
        assert_eq!(ViewState::from_position(&pos), ViewState::from_position(&pos));
    }

    #[test]
    fn test_counter_text() {
        assert_eq!(view_at(12, 4).counter_text(), "5 / 12");
    }
}
