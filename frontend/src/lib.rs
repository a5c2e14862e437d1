//! Scroll-driven reveal animations and small page embellishments for the
//! static marketing site, compiled to WebAssembly.
//!
//! The logic in [`reveal`], [`scroll`], [`preloader`] and [`controls`] never
//! touches `web-sys`; it talks to the page through the traits in [`host`] and
//! the element traits of each module. [`dom`] implements those against the
//! real browser.

pub mod config;
pub mod controls;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod host;
pub mod preloader;
pub mod reveal;
pub mod scroll;

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use config::{SiteConfig, CONFIG_ELEMENT_ID};
use dom::Listener;
use error::Result;

#[wasm_bindgen(start)]
pub fn start() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(config::log_level()).is_err() {
        warn!("logger was already initialised");
    }

    info!("Starting site enhancements");
    if let Err(err) = boot() {
        warn!("site enhancements not attached: {}", err);
    }
}

fn boot() -> Result<()> {
    let window = dom::window()?;
    let document = dom::document(&window)?;

    if document.ready_state() == "loading" {
        let (ready_window, ready_document) = (window.clone(), document.clone());
        Listener::new(&document, "DOMContentLoaded", move |_| {
            init(&ready_window, &ready_document)
        })?
        .forget();
    } else {
        init(&window, &document);
    }
    Ok(())
}

/// Reads overrides from the page's JSON config block, falling back to the
/// defaults when it is absent or malformed.
pub fn load_config(document: &Document) -> SiteConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!("{}, using defaults", err);
            SiteConfig::default()
        }
    }
}

fn attach<T>(feature: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => {
            debug!("{} attached", feature);
            Some(value)
        }
        Err(err) => {
            warn!("{} skipped: {}", feature, err);
            None
        }
    }
}

/// Attaches every enhancement. A failing one is logged and the rest still run.
pub fn init(window: &Window, document: &Document) {
    let config = load_config(document);
    let desktop = dom::viewport(window)
        .map(|viewport| config.is_desktop(viewport.width))
        .unwrap_or(false);

    attach(
        "back-to-top",
        dom::controls::init_back_to_top(window, document, config.scroll.back_to_top_threshold),
    );
    attach("lazy loading", dom::controls::init_lazy_loading(document));
    attach("top banner", dom::controls::init_top_banner(document));
    attach("smooth scroll", dom::controls::init_smooth_scroll(document));

    attach("base styles", dom::effects::init_base_styles(document));
    if let Some(summary) = attach("scroll reveal", dom::reveal::init_reveal(window, document, &config.reveal)) {
        debug!("reveal: {} visible, {} pending", summary.revealed, summary.pending);
    }
    attach(
        "hover lift",
        dom::effects::init_hover_lift(document, &config.effects.hover_selector),
    );
    attach(
        "scroll effects",
        dom::scroll::init_scroll_effects(window, document, &config.scroll, desktop),
    );

    if config.effects.particles {
        attach(
            "particles",
            dom::effects::init_particles(document, config.effects.particle_count),
        );
    }
    if config.preloader.enabled {
        attach(
            "preloader",
            dom::preloader::init_preloader(window, document, &config.preloader),
        );
    }

    if !desktop {
        info!("narrow viewport, skipping cursor and parallax");
    } else if config.effects.custom_cursor {
        attach("custom cursor", dom::effects::init_custom_cursor(document));
    }
}
