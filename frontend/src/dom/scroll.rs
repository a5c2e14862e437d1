use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use super::{
    best_effort, body, create_html, element_rect, query_html_all, set_styles, viewport, Listener,
};
use crate::config::ScrollConfig;
use crate::error::{EnhanceError, Result};
use crate::geometry::{Rect, Viewport};
use crate::host::{FrameHost, Turn};
use crate::scroll::{ParallaxLayer, ProgressBar, ScrollEffects, ScrollMetrics, ScrollSource};

const PROGRESS_CLASS: &str = "scroll-progress";

/// `requestAnimationFrame` on the page's window.
pub struct AnimationFrames {
    window: Window,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameHost for AnimationFrames {
    fn request_frame(&self, turn: Turn) -> Result<()> {
        let callback = Closure::once_into_js(move |_timestamp: f64| turn());
        self.window
            .request_animation_frame(callback.unchecked_ref())
            .map(|_| ())
            .map_err(EnhanceError::from)
    }
}

pub struct WindowScroll {
    window: Window,
    root: Option<Element>,
}

impl WindowScroll {
    pub fn new(window: Window, document: &Document) -> Self {
        Self {
            window,
            root: document.document_element(),
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

impl ScrollSource for WindowScroll {
    fn metrics(&self) -> ScrollMetrics {
        let viewport = viewport(&self.window).unwrap_or(Viewport::new(0.0, 0.0));
        let scroll_height = self
            .root
            .as_ref()
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or(viewport.height);
        ScrollMetrics {
            scroll_y: self.scroll_y(),
            scroll_height,
            viewport,
        }
    }
}

pub struct DomProgressBar(HtmlElement);

impl DomProgressBar {
    pub fn mount(document: &Document) -> Result<Self> {
        let bar = create_html(document, "div")?;
        bar.set_class_name(PROGRESS_CLASS);
        set_styles(
            &bar,
            &[
                ("position", "fixed"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "3px"),
                (
                    "background",
                    "linear-gradient(90deg, var(--color-primary), var(--color-primary-hover))",
                ),
                ("z-index", "9998"),
                ("transform-origin", "left"),
                ("transform", "scaleX(0)"),
                ("transition", "transform 0.1s ease"),
            ],
        )?;
        body(document)?.append_child(&bar)?;
        Ok(Self(bar))
    }
}

impl ProgressBar for DomProgressBar {
    fn set_progress(&self, fraction: f64) {
        let transform = format!("scaleX({})", fraction);
        best_effort("progress transform", self.0.style().set_property("transform", &transform));
    }
}

/// A parallax background and the section it decorates.
pub struct DomParallaxLayer {
    layer: HtmlElement,
    section: Element,
}

impl DomParallaxLayer {
    pub fn new(layer: HtmlElement) -> Self {
        let section = layer
            .closest("section")
            .ok()
            .flatten()
            .or_else(|| layer.parent_element())
            .unwrap_or_else(|| Element::from(layer.clone()));
        Self { layer, section }
    }
}

impl ParallaxLayer for DomParallaxLayer {
    fn section_rect(&self) -> Option<Rect> {
        element_rect(&self.section)
    }

    fn set_offset(&self, offset: f64) {
        let transform = format!("translate3d(0, {}px, 0)", offset);
        best_effort("parallax transform", self.layer.style().set_property("transform", &transform));
    }
}

/// Mounts the progress bar, collects parallax layers (desktop only) and
/// subscribes the effects bus to window scroll.
pub fn init_scroll_effects(
    window: &Window,
    document: &Document,
    config: &ScrollConfig,
    desktop: bool,
) -> Result<Rc<ScrollEffects>> {
    let frames: Rc<dyn FrameHost> = Rc::new(AnimationFrames::new(window.clone()));
    let source = WindowScroll::new(window.clone(), document);
    let mut effects = ScrollEffects::new(Box::new(source), frames);

    match DomProgressBar::mount(document) {
        Ok(bar) => effects = effects.with_progress(Box::new(bar)),
        Err(err) => warn!("scroll progress bar unavailable: {}", err),
    }

    if desktop {
        let layers: Vec<Box<dyn ParallaxLayer>> = query_html_all(document, &config.parallax_selector)?
            .into_iter()
            .map(|layer| Box::new(DomParallaxLayer::new(layer)) as Box<dyn ParallaxLayer>)
            .collect();
        debug!("parallax layers: {}", layers.len());
        effects = effects.with_parallax(layers, config.parallax_speed);
    }

    let effects = Rc::new(effects);
    if !effects.has_effects() {
        return Ok(effects);
    }

    let bus = effects.clone();
    Listener::passive(window, "scroll", move |_| {
        if let Err(err) = bus.on_scroll() {
            warn!("scroll effects skipped a frame: {}", err);
        }
    })?
    .forget();

    // Paint the initial state for pages restored mid-scroll.
    effects.recompute();
    Ok(effects)
}
