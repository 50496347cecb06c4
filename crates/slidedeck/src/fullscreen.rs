use std::time::{Duration, Instant};

use thiserror::Error;

/// How long the surface gets to confirm a fullscreen change.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Normal,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenRequest {
    Enter,
    Exit,
}

impl FullscreenRequest {
    pub fn enters(self) -> bool {
        self == Self::Enter
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FullscreenError {
    #[error("fullscreen request rejected: {0}")]
    Rejected(String),
    #[error("no fullscreen confirmation after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    request: FullscreenRequest,
    deadline: Instant,
}

/// Presentation mode state machine.
///
/// The mode only changes once the surface confirms it, so a rejected
/// request leaves the mode untouched.
#[derive(Debug)]
pub struct FullscreenToggle {
    mode: PresentationMode,
    /// What the surface last reported.
    surface_fullscreen: bool,
    in_flight: Option<InFlight>,
    timeout: Duration,
}

impl Default for FullscreenToggle {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_TIMEOUT)
    }
}

impl FullscreenToggle {
    pub fn new(timeout: Duration) -> Self {
        Self {
            mode: PresentationMode::Normal,
            surface_fullscreen: false,
            in_flight: None,
            timeout,
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Enter fullscreen unless the surface already is; otherwise leave it.
    pub fn toggle(&mut self, now: Instant) -> Option<FullscreenRequest> {
        let request = if self.surface_fullscreen {
            FullscreenRequest::Exit
        } else {
            FullscreenRequest::Enter
        };
        self.begin(request, now)
    }

    /// Leave fullscreen, if we are in it.
    pub fn escape(&mut self, now: Instant) -> Option<FullscreenRequest> {
        if self.mode != PresentationMode::Fullscreen || !self.surface_fullscreen {
            return None;
        }
        self.begin(FullscreenRequest::Exit, now)
    }

    fn begin(&mut self, request: FullscreenRequest, now: Instant) -> Option<FullscreenRequest> {
        if let Some(pending) = self.in_flight {
            tracing::debug!(request = ?pending.request, "fullscreen request already in flight");
            return None;
        }
        self.in_flight = Some(InFlight {
            request,
            deadline: now + self.timeout,
        });
        Some(request)
    }

    /// The surface reported its fullscreen state.
    pub fn on_surface_changed(&mut self, fullscreen: bool) {
        self.surface_fullscreen = fullscreen;
        let confirmed = match self.in_flight {
            Some(pending) => pending.request.enters() == fullscreen,
            None => true,
        };
        if !confirmed {
            return;
        }
        self.in_flight = None;
        let mode = if fullscreen {
            PresentationMode::Fullscreen
        } else {
            PresentationMode::Normal
        };
        if mode != self.mode {
            tracing::info!(?mode, "presentation mode changed");
            self.mode = mode;
        }
    }

    /// The surface refused the in-flight request.
    pub fn on_rejected(&mut self, error: FullscreenError) {
        match self.in_flight.take() {
            Some(pending) => {
                tracing::warn!(request = ?pending.request, %error, "Fullscreen request failed");
            }
            None => tracing::debug!(%error, "fullscreen rejection with nothing in flight"),
        }
    }

    /// Time out an unconfirmed request.
    pub fn poll(&mut self, now: Instant) {
        if let Some(pending) = self.in_flight {
            if now >= pending.deadline {
                self.on_rejected(FullscreenError::TimedOut(self.timeout));
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.in_flight.map(|p| p.deadline)
    }
}
