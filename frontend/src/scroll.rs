//! Scroll-position effects: the reading progress bar and parallax layers.
//!
//! Scroll events only mark a frame as pending. The actual recompute runs in
//! the frame callback and reads the scroll position at that moment, so a burst
//! of events inside one frame costs a single pass.

use std::cell::Cell;
use std::rc::Rc;

use log::warn;

use crate::error::Result;
use crate::geometry::{intersects_viewport, Rect, Viewport};
use crate::host::FrameHost;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    /// Full document height (`scrollHeight`).
    pub scroll_height: f64,
    pub viewport: Viewport,
}

/// `scroll_y / (scroll_height - viewport height)`, clamped to `[0, 1]`.
/// A page that cannot scroll reports 0.
pub fn progress_fraction(metrics: ScrollMetrics) -> f64 {
    let scrollable = metrics.scroll_height - metrics.viewport.height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (metrics.scroll_y / scrollable).clamp(0.0, 1.0)
}

pub trait ScrollSource {
    fn metrics(&self) -> ScrollMetrics;
}

pub trait ProgressBar {
    fn set_progress(&self, fraction: f64);
}

pub trait ParallaxLayer {
    /// Rect of the section the layer sits in, relative to the viewport.
    fn section_rect(&self) -> Option<Rect>;
    fn set_offset(&self, offset: f64);
}

/// Page-lifetime state shared by every scroll turn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSession {
    pub fraction: f64,
    pub frame_pending: bool,
    pub recomputes: u64,
}

pub struct ScrollEffects {
    source: Box<dyn ScrollSource>,
    frames: Rc<dyn FrameHost>,
    progress: Option<Box<dyn ProgressBar>>,
    layers: Vec<Box<dyn ParallaxLayer>>,
    parallax_speed: f64,
    session: Cell<ScrollSession>,
}

impl ScrollEffects {
    pub fn new(source: Box<dyn ScrollSource>, frames: Rc<dyn FrameHost>) -> Self {
        Self {
            source,
            frames,
            progress: None,
            layers: Vec::new(),
            parallax_speed: 0.5,
            session: Cell::new(ScrollSession::default()),
        }
    }

    pub fn with_progress(mut self, bar: Box<dyn ProgressBar>) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn with_parallax(mut self, layers: Vec<Box<dyn ParallaxLayer>>, speed: f64) -> Self {
        self.layers = layers;
        self.parallax_speed = speed;
        self
    }

    pub fn session(&self) -> ScrollSession {
        self.session.get()
    }

    pub fn has_effects(&self) -> bool {
        self.progress.is_some() || !self.layers.is_empty()
    }

    /// Scroll signal. Returns whether this call scheduled a frame.
    pub fn on_scroll(self: &Rc<Self>) -> Result<bool> {
        let mut session = self.session.get();
        if session.frame_pending {
            return Ok(false);
        }
        session.frame_pending = true;
        self.session.set(session);

        let bus = Rc::clone(self);
        if let Err(err) = self.frames.request_frame(Box::new(move || bus.run_frame())) {
            warn!("could not schedule scroll frame: {}", err);
            session.frame_pending = false;
            self.session.set(session);
            return Err(err);
        }
        Ok(true)
    }

    fn run_frame(&self) {
        self.recompute();
        let mut session = self.session.get();
        session.frame_pending = false;
        session.recomputes += 1;
        self.session.set(session);
    }

    /// One pass over every effect using the current scroll position.
    pub fn recompute(&self) {
        let metrics = self.source.metrics();
        let fraction = progress_fraction(metrics);

        if let Some(bar) = &self.progress {
            bar.set_progress(fraction);
        }

        let offset = metrics.scroll_y * self.parallax_speed;
        for layer in &self.layers {
            let on_screen = layer
                .section_rect()
                .map(|rect| intersects_viewport(rect, metrics.viewport))
                .unwrap_or(false);
            if on_screen {
                layer.set_offset(offset);
            }
        }

        let mut session = self.session.get();
        session.fraction = fraction;
        self.session.set(session);
    }
}
