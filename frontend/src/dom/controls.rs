use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, ScrollBehavior, ScrollToOptions, Window};

use super::{best_effort, html_by_id, query_all, query_html_all, set_styles, Listener};
use super::scroll::WindowScroll;
use crate::controls::{image_loading, BackToTop, ClassToggle, HIDDEN_CLASS};
use crate::error::Result;

pub const BACK_TO_TOP_ID: &str = "backToTop";
pub const BANNER_ID: &str = "topBanner";
pub const BANNER_CLOSE_ID: &str = "closeBanner";
const HERO_SELECTOR: &str = ".hero-section";

impl ClassToggle for HtmlElement {
    fn set_class(&self, class: &str, on: bool) {
        best_effort(class, self.class_list().toggle_with_force(class, on));
    }
}

pub fn init_back_to_top(window: &Window, document: &Document, threshold: f64) -> Result<()> {
    let Some(button) = html_by_id(document, BACK_TO_TOP_ID) else {
        debug!("no #{} on this page", BACK_TO_TOP_ID);
        return Ok(());
    };

    let control = Rc::new(BackToTop::new(button.clone(), threshold));
    let scroll = WindowScroll::new(window.clone(), document);
    control.on_scroll(scroll.scroll_y());

    let on_scroll = control.clone();
    Listener::passive(window, "scroll", move |_| on_scroll.on_scroll(scroll.scroll_y()))?.forget();

    let target = window.clone();
    Listener::new(&button, "click", move |event| {
        event.prevent_default();
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        target.scroll_to_with_scroll_to_options(&options);
    })?
    .forget();
    Ok(())
}

pub fn init_top_banner(document: &Document) -> Result<()> {
    let (Some(banner), Some(close)) = (html_by_id(document, BANNER_ID), html_by_id(document, BANNER_CLOSE_ID)) else {
        return Ok(());
    };

    let hero = document.query_selector(HERO_SELECTOR)?;
    Listener::new(&close, "click", move |event| {
        event.prevent_default();
        event.stop_propagation();
        banner.set_class(HIDDEN_CLASS, true);
        if let Some(hero) = hero.as_ref().and_then(|el| el.dyn_ref::<HtmlElement>()) {
            best_effort("hero padding", hero.style().set_property("padding-top", "0"));
        }
    })?
    .forget();
    Ok(())
}

pub fn init_lazy_loading(document: &Document) -> Result<()> {
    let images = query_all(document, "img")?;
    for image in images.iter().filter_map(|el| el.dyn_ref::<HtmlImageElement>()) {
        let in_hero = image.closest(HERO_SELECTOR)?.is_some();
        image.set_attribute("loading", image_loading(in_hero))?;
    }
    debug!("loading policy set on {} images", images.len());
    Ok(())
}

pub fn init_smooth_scroll(document: &Document) -> Result<()> {
    if let Some(root) = document
        .document_element()
        .and_then(|el: Element| el.dyn_into::<HtmlElement>().ok())
    {
        set_styles(&root, &[("scroll-snap-type", "none"), ("scroll-behavior", "smooth")])?;
    }
    for section in query_html_all(document, "section")? {
        section.style().set_property("scroll-snap-align", "none")?;
    }
    Ok(())
}
