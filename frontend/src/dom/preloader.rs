use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::{Document, HtmlElement, Storage, Window};

use super::{best_effort, body, create_html, set_styles, Listener};
use crate::config::PreloaderConfig;
use crate::error::{EnhanceError, Result};
use crate::host::{SessionStore, Timers, Turn};
use crate::preloader::{Overlay, Preloader};

const OVERLAY_ID: &str = "preloader";
const PULSE_KEYFRAMES: &str = "@keyframes pulse { 0%, 100% { opacity: 1; } 50% { opacity: 0.5; } }";

pub struct BrowserSession(Storage);

impl BrowserSession {
    pub fn open(window: &Window) -> Result<Self> {
        window
            .session_storage()?
            .map(Self)
            .ok_or(EnhanceError::MissingGlobal("sessionStorage"))
    }
}

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.0.set_item(key, value).map_err(EnhanceError::from)
    }
}

pub struct GlooTimers;

impl Timers for GlooTimers {
    fn after(&self, delay_ms: u32, turn: Turn) {
        Timeout::new(delay_ms, turn).forget();
    }
}

pub struct DomOverlay {
    document: Document,
    root: HtmlElement,
}

impl DomOverlay {
    pub fn build(document: &Document, config: &PreloaderConfig) -> Result<Self> {
        let root = create_html(document, "div")?;
        root.set_id(OVERLAY_ID);
        set_styles(
            &root,
            &[
                ("position", "fixed"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("background", "#000"),
                ("display", "flex"),
                ("align-items", "center"),
                ("justify-content", "center"),
                ("z-index", "99999"),
            ],
        )?;
        root.style()
            .set_property("transition", &format!("opacity {}ms ease", config.fade_ms))?;

        let label = create_html(document, "div")?;
        label.set_text_content(Some(&config.label));
        set_styles(
            &label,
            &[
                ("color", "var(--color-primary)"),
                ("font-size", "2rem"),
                ("font-weight", "700"),
                ("letter-spacing", "0.2rem"),
                ("animation", "pulse 1.5s ease infinite"),
            ],
        )?;
        root.append_child(&label)?;

        Ok(Self {
            document: document.clone(),
            root,
        })
    }
}

impl Overlay for DomOverlay {
    fn mount(&self) -> Result<()> {
        super::effects::inject_style(&self.document, "preloader-keyframes", PULSE_KEYFRAMES)?;
        body(&self.document)?.append_child(&self.root)?;
        Ok(())
    }

    fn fade_out(&self) {
        best_effort("preloader fade", self.root.style().set_property("opacity", "0"));
    }

    fn remove(&self) {
        if self.root.is_connected() {
            self.root.remove();
        }
    }
}

/// Shows the overlay on the first page of a session and wires its dismissal
/// to the window load event.
pub fn init_preloader(window: &Window, document: &Document, config: &PreloaderConfig) -> Result<Rc<Preloader>> {
    let session = BrowserSession::open(window)?;
    let timers: Rc<dyn Timers> = Rc::new(GlooTimers);
    let preloader = Preloader::start(&session, config, timers, || {
        let overlay: Rc<dyn Overlay> = Rc::new(DomOverlay::build(document, config)?);
        Ok(overlay)
    })?;

    // Scripts can boot after load already fired.
    if document.ready_state() == "complete" {
        preloader.on_load();
        return Ok(preloader);
    }

    let on_load = preloader.clone();
    Listener::new(window, "load", move |_| on_load.on_load())?.forget();
    Ok(preloader)
}
