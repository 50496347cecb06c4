use crate::view::ViewState;

/// The rendering side of the presentation. The controller pushes state in;
/// nothing flows back except through controller methods.
pub trait Surface {
    /// Show the given view. Called once at startup and after every move.
    fn render(&mut self, view: &ViewState);

    /// Ask the host to enter (`true`) or leave (`false`) fullscreen. The
    /// outcome is reported back asynchronously.
    fn request_fullscreen(&mut self, enter: bool);

    /// Start the reveal animation of one content element.
    fn start_animation(&mut self, slide: usize, element: usize);

    /// Opacity of the root container.
    fn set_opacity(&mut self, opacity: f32);
}

/// Records every call, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub renders: Vec<ViewState>,
    pub fullscreen_requests: Vec<bool>,
    pub animations: Vec<(usize, usize)>,
    pub opacity: Option<f32>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn last(&self) -> &ViewState {
        self.renders.last().expect("nothing rendered")
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn render(&mut self, view: &ViewState) {
        self.renders.push(view.clone());
    }

    fn request_fullscreen(&mut self, enter: bool) {
        self.fullscreen_requests.push(enter);
    }

    fn start_animation(&mut self, slide: usize, element: usize) {
        self.animations.push((slide, element));
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = Some(opacity);
    }
}
