use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::controller::Controller;
use crate::deck::{Block, Deck};
use crate::input::{CONTROLS, InputEvent, InputSettings, Key};
use crate::nav::Intent;
use crate::surface::Surface;
use crate::theme::Theme;
use crate::view::{SlideMarker, ViewState};

const SLIDE_TRANSITION_DURATION: f32 = 0.4;
const REVEAL_DURATION: f32 = 0.6;
const LOAD_FADE_DURATION: f32 = 0.5;

/// Keys forwarded to the controller. The fullscreen key is added at startup.
const KEY_MAP: &[(egui::Key, Key)] = &[
    (egui::Key::ArrowRight, Key::ArrowRight),
    (egui::Key::ArrowLeft, Key::ArrowLeft),
    (egui::Key::Space, Key::Space),
    (egui::Key::Enter, Key::Enter),
    (egui::Key::Home, Key::Home),
    (egui::Key::End, Key::End),
    (egui::Key::Escape, Key::Escape),
    (egui::Key::Num0, Key::Digit(0)),
    (egui::Key::Num1, Key::Digit(1)),
    (egui::Key::Num2, Key::Digit(2)),
    (egui::Key::Num3, Key::Digit(3)),
    (egui::Key::Num4, Key::Digit(4)),
    (egui::Key::Num5, Key::Digit(5)),
    (egui::Key::Num6, Key::Digit(6)),
    (egui::Key::Num7, Key::Digit(7)),
    (egui::Key::Num8, Key::Digit(8)),
    (egui::Key::Num9, Key::Digit(9)),
];

/// Retained state the egui frame is drawn from.
struct EguiSurface {
    view: ViewState,
    opacity: f32,
    fullscreen_requests: Vec<bool>,
    /// When each content element started revealing, per slide.
    reveals: Vec<Vec<Option<Instant>>>,
}

impl EguiSurface {
    fn new(deck: &Deck) -> Self {
        Self {
            view: ViewState {
                markers: Vec::new(),
                counter: 0,
                total: 0,
                progress: 0.0,
                prev_disabled: true,
                next_disabled: true,
                indicators: Vec::new(),
            },
            opacity: 0.0,
            fullscreen_requests: Vec::new(),
            reveals: deck
                .slides
                .iter()
                .map(|s| vec![None; s.blocks.len()])
                .collect(),
        }
    }

    /// 0.0 while paused, easing to 1.0 once running.
    fn reveal_progress(&self, slide: usize, element: usize) -> f32 {
        let started = self
            .reveals
            .get(slide)
            .and_then(|s| s.get(element))
            .copied()
            .flatten();
        match started {
            Some(start) => {
                let t = (start.elapsed().as_secs_f32() / REVEAL_DURATION).clamp(0.0, 1.0);
                ease_in_out(t)
            }
            None => 0.0,
        }
    }

    fn is_revealing(&self) -> bool {
        self.reveals
            .iter()
            .flatten()
            .flatten()
            .any(|start| start.elapsed().as_secs_f32() < REVEAL_DURATION)
    }
}

impl Surface for EguiSurface {
    fn render(&mut self, view: &ViewState) {
        self.view = view.clone();
    }

    fn request_fullscreen(&mut self, enter: bool) {
        self.fullscreen_requests.push(enter);
    }

    fn start_animation(&mut self, slide: usize, element: usize) {
        if let Some(slot) = self.reveals.get_mut(slide).and_then(|s| s.get_mut(element)) {
            *slot = Some(Instant::now());
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}

/// Clickable chrome hit during the last frame.
enum ChromeClick {
    Prev,
    Next,
    Indicator(usize),
}

struct PresentationApp {
    deck: Deck,
    controller: Controller<EguiSurface>,
    theme: Theme,
    fullscreen_key: (egui::Key, Key),
    show_help: bool,
    /// Viewport fullscreen state last reported to the controller.
    reported_fullscreen: Option<bool>,
    start_fullscreen: bool,
    loaded: bool,
}

impl PresentationApp {
    fn new(deck: Deck, theme: Theme, settings: InputSettings, start_fullscreen: bool) -> Option<Self> {
        let letter = settings.fullscreen_key;
        let egui_key = egui::Key::from_name(&letter.to_ascii_uppercase().to_string())
            .unwrap_or(egui::Key::F);
        let surface = EguiSurface::new(&deck);
        let controller = Controller::new(&deck.element_counts(), settings, surface)?;
        Some(Self {
            deck,
            controller,
            theme,
            fullscreen_key: (egui_key, Key::Letter(letter)),
            show_help: false,
            reported_fullscreen: None,
            start_fullscreen,
            loaded: false,
        })
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        let ref_w = 1920.0;
        let ref_h = 1080.0;
        (rect.width() / ref_w).min(rect.height() / ref_h)
    }

    /// Translate this frame's egui input into controller events.
    fn collect_input(&mut self, ctx: &egui::Context) -> (Vec<InputEvent>, bool) {
        let mut events = Vec::new();
        let mut close = false;
        let (fs_egui, fs_key) = self.fullscreen_key;

        ctx.input_mut(|i| {
            if i.key_pressed(fs_egui) {
                events.push(InputEvent::Key(fs_key));
            } else if i.key_pressed(egui::Key::Q) {
                close = true;
            } else if i.key_pressed(egui::Key::D) {
                self.theme = self.theme.toggled();
            } else if i.key_pressed(egui::Key::H) {
                self.show_help = !self.show_help;
            }

            for &(egui_key, key) in KEY_MAP {
                let pressed = if key.suppresses_default() {
                    i.consume_key(egui::Modifiers::NONE, egui_key)
                } else {
                    i.key_pressed(egui_key)
                };
                if pressed {
                    events.push(InputEvent::Key(key));
                }
            }

            events.extend(pointer_events(&i.events));
        });

        (events, close)
    }

    fn sync_fullscreen(&mut self, ctx: &egui::Context, now: Instant) {
        let fullscreen = ctx.input(|i| i.viewport().fullscreen).unwrap_or(false);
        if self.reported_fullscreen != Some(fullscreen) {
            self.reported_fullscreen = Some(fullscreen);
            self.controller.on_fullscreen_changed(fullscreen);
        }
        if self.start_fullscreen {
            self.start_fullscreen = false;
            if !fullscreen {
                self.controller.toggle_fullscreen(now);
            }
        }
    }

    fn draw(&mut self, ui: &egui::Ui, rect: egui::Rect) -> Option<ChromeClick> {
        let ctx = ui.ctx().clone();
        let scale = Self::compute_scale(rect);
        let root = ctx.animate_value_with_time(
            egui::Id::new("root_opacity"),
            self.controller.surface().opacity,
            LOAD_FADE_DURATION,
        );

        let markers = self.controller.surface().view.markers.clone();
        let mut visibility = Vec::new();
        for (index, marker) in markers.iter().enumerate() {
            let target = match marker {
                SlideMarker::Passed => -1.0,
                SlideMarker::Active => 0.0,
                SlideMarker::Upcoming => 1.0,
            };
            let offset = ctx.animate_value_with_time(
                egui::Id::new(("slide_offset", index)),
                target,
                SLIDE_TRANSITION_DURATION,
            );
            if offset.abs() >= 1.0 {
                continue;
            }
            let slide_rect = rect.translate(egui::vec2(offset * rect.width(), 0.0));
            let opacity = root * (1.0 - offset.abs());
            for (element, block_rect) in self
                .draw_slide(ui, index, slide_rect, opacity, scale)
                .into_iter()
                .enumerate()
            {
                visibility.push((index, element, visible_ratio(block_rect, rect)));
            }
        }
        for (slide, element, ratio) in visibility {
            self.controller.on_visibility(slide, element, ratio);
        }

        let click = self.draw_chrome(ui, rect, root, scale);

        if self.show_help {
            draw_help(ui, &self.theme, rect, scale);
        }
        click
    }

    /// Draw one slide and return the rect of each content element.
    fn draw_slide(
        &self,
        ui: &egui::Ui,
        index: usize,
        rect: egui::Rect,
        opacity: f32,
        scale: f32,
    ) -> Vec<egui::Rect> {
        let Some(slide) = self.deck.slides.get(index) else {
            return Vec::new();
        };
        let theme = &self.theme;
        let surface = self.controller.surface();
        let content = rect.shrink(80.0 * scale);
        let gap = 28.0 * scale;
        let mut y = content.top();
        let mut rects = Vec::with_capacity(slide.blocks.len());

        for (element, block) in slide.blocks.iter().enumerate() {
            let reveal = surface.reveal_progress(index, element);
            let alpha = opacity * reveal;
            let lift = (1.0 - reveal) * 20.0 * scale;

            let (text, font, color, background) = match block {
                Block::Heading { level, text } => (
                    text.clone(),
                    egui::FontId::proportional(theme.heading_size(*level) * scale),
                    theme.heading_color,
                    None,
                ),
                Block::Paragraph { text } => (
                    text.clone(),
                    egui::FontId::proportional(theme.body_size * scale),
                    theme.foreground,
                    None,
                ),
                Block::List { items } => (
                    items
                        .iter()
                        .map(|item| format!("\u{2022} {item}"))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    egui::FontId::proportional(theme.body_size * scale),
                    theme.foreground,
                    None,
                ),
                Block::Quote { text } => (
                    format!("\u{201C}{text}\u{201D}"),
                    egui::FontId::proportional(theme.body_size * 1.1 * scale),
                    theme.accent,
                    None,
                ),
                Block::Code { code, .. } => (
                    code.clone(),
                    egui::FontId::monospace(theme.code_size * scale),
                    theme.code_foreground,
                    Some(theme.code_background),
                ),
            };

            let inset = if background.is_some() { 24.0 * scale } else { 0.0 };
            let galley = ui.painter().layout(
                text,
                font,
                Theme::with_opacity(color, alpha),
                content.width() - inset * 2.0,
            );
            let block_rect = egui::Rect::from_min_size(
                egui::pos2(content.left(), y),
                egui::vec2(content.width(), galley.size().y + inset * 2.0),
            );
            let drawn = block_rect.translate(egui::vec2(0.0, lift));
            if let Some(bg) = background {
                ui.painter()
                    .rect_filled(drawn, 8.0 * scale, Theme::with_opacity(bg, alpha));
            }
            ui.painter().galley(
                drawn.min + egui::vec2(inset, inset),
                galley,
                Theme::with_opacity(color, alpha),
            );

            rects.push(block_rect);
            y = block_rect.bottom() + gap;
        }
        rects
    }

    fn draw_chrome(
        &self,
        ui: &egui::Ui,
        rect: egui::Rect,
        opacity: f32,
        scale: f32,
    ) -> Option<ChromeClick> {
        let theme = &self.theme;
        let view = &self.controller.surface().view;
        let painter = ui.painter();
        let mut click = None;

        // Progress bar
        let bar_h = 6.0 * scale;
        let track = egui::Rect::from_min_size(rect.left_top(), egui::vec2(rect.width(), bar_h));
        painter.rect_filled(track, 0.0, Theme::with_opacity(theme.track, opacity));
        let fill = egui::Rect::from_min_size(
            rect.left_top(),
            egui::vec2(rect.width() * view.progress / 100.0, bar_h),
        );
        painter.rect_filled(fill, 0.0, Theme::with_opacity(theme.accent, opacity));

        // Slide counter
        let counter_color = Theme::with_opacity(theme.foreground, 0.5 * opacity);
        painter.text(
            egui::pos2(rect.right() - 24.0 * scale, rect.bottom() - 40.0 * scale),
            egui::Align2::RIGHT_CENTER,
            view.counter_text(),
            egui::FontId::monospace(22.0 * scale),
            counter_color,
        );

        // Prev / next buttons
        let radius = 24.0 * scale;
        let buttons = [
            ("\u{2039}", view.prev_disabled, 0.0, ChromeClick::Prev),
            ("\u{203A}", view.next_disabled, 1.0, ChromeClick::Next),
        ];
        for (label, disabled, slot, action) in buttons {
            let center = egui::pos2(
                rect.left() + 40.0 * scale + slot * (radius * 2.0 + 16.0 * scale),
                rect.bottom() - 40.0 * scale,
            );
            let hit = egui::Rect::from_center_size(center, egui::vec2(radius * 2.0, radius * 2.0));
            let sense = if disabled {
                egui::Sense::hover()
            } else {
                egui::Sense::click()
            };
            let response = ui.interact(hit, egui::Id::new(("nav_button", label)), sense);
            let alpha = (if disabled { 0.25 } else { 0.8 }) * opacity;
            let fill = if response.hovered() && !disabled {
                theme.accent
            } else {
                theme.track
            };
            painter.circle_filled(center, radius, Theme::with_opacity(fill, alpha));
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(32.0 * scale),
                Theme::with_opacity(theme.foreground, alpha),
            );
            if response.clicked() {
                click = Some(action);
            }
        }

        // Indicator dots
        let dot = 6.0 * scale;
        let spacing = 22.0 * scale;
        let count = view.indicators.len() as f32;
        let start_x = rect.center().x - (count - 1.0).max(0.0) * spacing / 2.0;
        for (i, active) in view.indicators.iter().enumerate() {
            let center = egui::pos2(start_x + i as f32 * spacing, rect.bottom() - 40.0 * scale);
            let hit = egui::Rect::from_center_size(center, egui::vec2(spacing, spacing));
            let response = ui
                .interact(hit, egui::Id::new(("indicator", i)), egui::Sense::click())
                .on_hover_cursor(egui::CursorIcon::PointingHand);
            let (color, r) = if *active {
                (theme.accent, dot * 1.4)
            } else {
                (theme.track, dot)
            };
            painter.circle_filled(center, r, Theme::with_opacity(color, opacity));
            if response.clicked() {
                click = Some(ChromeClick::Indicator(i));
            }
        }

        click
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        let (events, close) = self.collect_input(ctx);
        if close {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        for event in events {
            self.controller.handle(event, now);
        }

        self.sync_fullscreen(ctx, now);
        self.controller.tick(now);

        // Send fullscreen requests outside any input closure
        let requests = std::mem::take(&mut self.controller.surface_mut().fullscreen_requests);
        for enter in requests {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(enter));
        }

        let bg = self.theme.background;
        let click = egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                self.draw(ui, rect)
            })
            .inner;

        match click {
            Some(ChromeClick::Prev) => self.controller.handle(InputEvent::PrevButton, now),
            Some(ChromeClick::Next) => self.controller.handle(InputEvent::NextButton, now),
            Some(ChromeClick::Indicator(i)) => {
                self.controller.handle(InputEvent::IndicatorClick(i), now)
            }
            None => {}
        }

        if !self.loaded {
            self.loaded = true;
            self.controller.on_load();
        }

        if click.is_some() || self.controller.surface().is_revealing() {
            ctx.request_repaint();
        }
        if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

/// Wheel and touch events in arrival order, one per raw event.
///
/// Every wheel event is forwarded, including zero vertical deltas, so each
/// one restarts the debounce. egui reports positive y for scrolling up.
fn pointer_events(events: &[egui::Event]) -> Vec<InputEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::MouseWheel { delta, .. } => Some(InputEvent::Wheel { delta_y: -delta.y }),
            egui::Event::Touch { phase, pos, .. } => match phase {
                egui::TouchPhase::Start => Some(InputEvent::TouchStart { x: pos.x }),
                egui::TouchPhase::End => Some(InputEvent::TouchEnd { x: pos.x }),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Fraction of `element` inside `viewport`.
fn visible_ratio(element: egui::Rect, viewport: egui::Rect) -> f32 {
    let area = element.area();
    if area <= 0.0 || !element.intersects(viewport) {
        return 0.0;
    }
    element.intersect(viewport).area() / area
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

fn draw_help(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, scale: f32) {
    let bg = Theme::with_opacity(theme.code_background, 0.92);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0 * scale;
    let line_height = 32.0 * scale;
    let height = CONTROLS.len() as f32 * line_height + padding * 2.0 + 40.0 * scale;
    let width = 480.0 * scale;
    let help_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(width, height));

    ui.painter().rect_filled(help_rect, 12.0 * scale, bg);
    ui.painter().text(
        egui::pos2(help_rect.left() + padding, help_rect.top() + padding),
        egui::Align2::LEFT_TOP,
        "Controls",
        egui::FontId::proportional(20.0 * scale),
        Theme::with_opacity(theme.heading_color, 0.9),
    );

    let mut y = help_rect.top() + padding + 40.0 * scale;
    for (keys, action) in CONTROLS {
        ui.painter().text(
            egui::pos2(help_rect.left() + padding, y),
            egui::Align2::LEFT_TOP,
            keys,
            egui::FontId::monospace(15.0 * scale),
            key_color,
        );
        ui.painter().text(
            egui::pos2(help_rect.left() + padding + 230.0 * scale, y),
            egui::Align2::LEFT_TOP,
            action,
            egui::FontId::proportional(15.0 * scale),
            text_color,
        );
        y += line_height;
    }
}

pub fn run(file: PathBuf, fullscreen: bool, start_slide: Option<usize>) -> anyhow::Result<()> {
    let deck = Deck::load(&file)?;
    let config = Config::load_or_default();
    let settings = InputSettings::from_config(&config);
    let theme = Theme::from_name(config.theme().unwrap_or("dark"));
    let start_fullscreen = fullscreen || config.starts_fullscreen();

    let title = deck.title().map(str::to_string).unwrap_or_else(|| {
        format!(
            "slidedeck \u{2014} {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        )
    });

    for (keys, action) in CONTROLS {
        tracing::debug!("{keys}: {action}");
    }

    let start_index = match start_slide {
        Some(n) if (1..=deck.len()).contains(&n) => Some(n - 1),
        Some(n) => {
            tracing::warn!(slide = n, total = deck.len(), "start slide out of range, using slide 1");
            None
        }
        None => None,
    };

    let mut app = PresentationApp::new(deck, theme, settings, start_fullscreen)
        .ok_or_else(|| anyhow::anyhow!("No slides found in {}", file.display()))?;
    if let Some(index) = start_index {
        app.controller.navigate(Intent::GoTo(index));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_ratio() {
        let viewport = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let inside = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(20.0, 20.0));
        assert_eq!(visible_ratio(inside, viewport), 1.0);

        let half = egui::Rect::from_min_size(egui::pos2(90.0, 0.0), egui::vec2(20.0, 10.0));
        assert!((visible_ratio(half, viewport) - 0.5).abs() < 1e-6);

        let outside = egui::Rect::from_min_size(egui::pos2(200.0, 0.0), egui::vec2(20.0, 20.0));
        assert_eq!(visible_ratio(outside, viewport), 0.0);
    }

    #[test]
    fn test_ease_in_out_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_surface_reveal_progress() {
        let deck = Deck::parse("# One\n\nBody");
        let mut surface = EguiSurface::new(&deck);
        assert_eq!(surface.reveal_progress(0, 1), 0.0);
        surface.start_animation(0, 1);
        assert!(surface.is_revealing());
        // Out-of-range elements are ignored
        surface.start_animation(4, 0);
        assert_eq!(surface.reveal_progress(4, 0), 0.0);
    }

    fn wheel(y: f32) -> egui::Event {
        egui::Event::MouseWheel {
            unit: egui::MouseWheelUnit::Point,
            delta: egui::vec2(0.0, y),
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_pointer_events_one_per_wheel_event() {
        let horizontal = egui::Event::MouseWheel {
            unit: egui::MouseWheelUnit::Line,
            delta: egui::vec2(3.0, 0.0),
            modifiers: egui::Modifiers::NONE,
        };
        let events = pointer_events(&[wheel(-40.0), horizontal, wheel(5.0)]);
        assert_eq!(
            events,
            vec![
                InputEvent::Wheel { delta_y: 40.0 },
                InputEvent::Wheel { delta_y: 0.0 },
                InputEvent::Wheel { delta_y: -5.0 },
            ]
        );
    }

    #[test]
    fn test_wheel_burst_in_one_frame_follows_last_event() {
        use crate::input::{Action, DEFAULT_WHEEL_DEBOUNCE, InputNormalizer};

        let ctx = egui::Context::default();
        let raw = egui::RawInput {
            events: vec![wheel(-40.0), wheel(5.0)],
            ..Default::default()
        };
        let mut events = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            events = ctx.input(|i| pointer_events(&i.events));
        });
        assert_eq!(events.len(), 2, "each wheel event is kept: {events:?}");

        let t0 = Instant::now();
        let mut input = InputNormalizer::new(InputSettings::default());
        for event in events {
            assert_eq!(input.handle(event, t0, 12), None);
        }
        assert_eq!(
            input.poll(t0 + DEFAULT_WHEEL_DEBOUNCE),
            Some(Action::Navigate(Intent::Previous))
        );
    }
}

