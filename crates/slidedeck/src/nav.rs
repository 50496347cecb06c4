/// A normalized navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Next,
    Previous,
    GoTo(usize),
}

/// Current slide and slide count. `current < total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    current: usize,
    total: usize,
}

impl Position {
    /// Returns `None` for an empty deck.
    pub fn new(total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Self { current: 0, total })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn last(&self) -> usize {
        self.total - 1
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current == self.last()
    }

    /// Advance one slide, saturating at the last one.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Go back one slide, saturating at the first one.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to `index`. Out-of-range targets are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total {
            return false;
        }
        self.current = index;
        true
    }

    /// Apply an intent, returning whether the position moved.
    ///
    /// `GoTo` the current slide is accepted but reports no movement.
    pub fn apply(&mut self, intent: Intent) -> bool {
        let before = self.current;
        let accepted = match intent {
            Intent::Next => self.next(),
            Intent::Previous => self.previous(),
            Intent::GoTo(index) => self.go_to(index),
        };
        accepted && self.current != before
    }
}
