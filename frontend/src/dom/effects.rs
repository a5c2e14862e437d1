use gloo_timers::callback::Timeout;
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Math;
use web_sys::{Document, HtmlElement, MouseEvent};

use super::{best_effort, body, create_html, query_html_all, set_styles, Listener};
use crate::controls::{hover_transform, Particle, HOVER_TRANSITION};
use crate::error::{EnhanceError, Result};

const BASE_STYLES: &str = "
.revealed {
    opacity: 1 !important;
    transform: translateY(0) !important;
}

@keyframes float {
    0%, 100% { transform: translateY(100vh) translateX(0); }
    50% { transform: translateY(-10vh) translateX(20px); }
}
";

const FOLLOWER_LAG_MS: u32 = 50;

/// Appends a `<style>` block to `<head>` unless one with `id` is already there.
pub fn inject_style(document: &Document, id: &str, css: &str) -> Result<()> {
    if document.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let head = document.head().ok_or(EnhanceError::MissingGlobal("document.head"))?;
    let style = document.create_element("style")?;
    style.set_id(id);
    style.set_text_content(Some(css));
    head.append_child(&style)?;
    Ok(())
}

pub fn init_base_styles(document: &Document) -> Result<()> {
    inject_style(document, "site-enhancements-styles", BASE_STYLES)
}

pub fn init_hover_lift(document: &Document, selector: &str) -> Result<()> {
    let cards = query_html_all(document, selector)?;
    for card in &cards {
        let entered = card.clone();
        Listener::new(card, "mouseenter", move |_| {
            best_effort(
                "hover lift",
                set_styles(
                    &entered,
                    &[("transition", HOVER_TRANSITION), ("transform", hover_transform(true))],
                ),
            );
        })?
        .forget();

        let left = card.clone();
        Listener::new(card, "mouseleave", move |_| {
            best_effort("hover reset", left.style().set_property("transform", hover_transform(false)));
        })?
        .forget();
    }
    debug!("hover lift on {} cards", cards.len());
    Ok(())
}

pub fn init_particles(document: &Document, count: usize) -> Result<()> {
    let container = create_html(document, "div")?;
    container.set_class_name("particles-container");
    set_styles(
        &container,
        &[
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("pointer-events", "none"),
            ("z-index", "1"),
            ("overflow", "hidden"),
        ],
    )?;

    let mut random = Math::random;
    for _ in 0..count {
        let particle = create_html(document, "div")?;
        particle.set_class_name("particle");
        particle
            .style()
            .set_css_text(&Particle::generate(&mut random).css());
        container.append_child(&particle)?;
    }
    body(document)?.append_child(&container)?;
    Ok(())
}

fn cursor_element(document: &Document, class: &str, size_px: u32, border: &str, z_index: &str, transition: &str) -> Result<HtmlElement> {
    let element = create_html(document, "div")?;
    element.set_class_name(class);
    let size = format!("{}px", size_px);
    set_styles(
        &element,
        &[
            ("width", size.as_str()),
            ("height", size.as_str()),
            ("border", border),
            ("border-radius", "50%"),
            ("position", "fixed"),
            ("pointer-events", "none"),
            ("z-index", z_index),
            ("transition", transition),
            ("display", "none"),
        ],
    )?;
    Ok(element)
}

/// Dot that tracks the pointer plus a ring that trails it. Desktop only.
pub fn init_custom_cursor(document: &Document) -> Result<()> {
    let cursor = cursor_element(
        document,
        "custom-cursor",
        10,
        "2px solid var(--color-primary)",
        "9999",
        "transform 0.2s ease",
    )?;
    let follower = cursor_element(
        document,
        "custom-cursor-follower",
        30,
        "2px solid rgba(255, 215, 0, 0.3)",
        "9998",
        "all 0.3s ease",
    )?;
    let page = body(document)?;
    page.append_child(&cursor)?;
    page.append_child(&follower)?;

    {
        let cursor = cursor.clone();
        Listener::new(document, "mousemove", move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let left = format!("{}px", event.client_x());
            let top = format!("{}px", event.client_y());
            best_effort(
                "cursor position",
                set_styles(&cursor, &[("display", "block"), ("left", left.as_str()), ("top", top.as_str())]),
            );
            best_effort("follower display", follower.style().set_property("display", "block"));

            let follower = follower.clone();
            Timeout::new(FOLLOWER_LAG_MS, move || {
                best_effort(
                    "follower position",
                    set_styles(&follower, &[("left", left.as_str()), ("top", top.as_str())]),
                );
            })
            .forget();
        })?
        .forget();
    }

    for link in query_html_all(document, "a, button")? {
        let entered = cursor.clone();
        Listener::new(&link, "mouseenter", move |_| {
            best_effort(
                "cursor grow",
                set_styles(
                    &entered,
                    &[("transform", "scale(1.5)"), ("border-color", "var(--color-primary-hover)")],
                ),
            );
        })?
        .forget();

        let left = cursor.clone();
        Listener::new(&link, "mouseleave", move |_| {
            best_effort(
                "cursor shrink",
                set_styles(&left, &[("transform", "scale(1)"), ("border-color", "var(--color-primary)")]),
            );
        })?
        .forget();
    }
    Ok(())
}
