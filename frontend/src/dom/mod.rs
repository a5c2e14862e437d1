//! Browser bindings for the enhancement logic.

pub mod controls;
pub mod effects;
pub mod preloader;
pub mod reveal;
pub mod scroll;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::error::{EnhanceError, Result};
use crate::geometry::{Rect, Viewport};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(EnhanceError::MissingGlobal("window"))
}

pub fn document(window: &Window) -> Result<Document> {
    window.document().ok_or(EnhanceError::MissingGlobal("document"))
}

pub fn body(document: &Document) -> Result<HtmlElement> {
    document.body().ok_or(EnhanceError::MissingGlobal("document.body"))
}

pub fn viewport(window: &Window) -> Result<Viewport> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Viewport::new(width, height))
}

/// Every element matching `selector`, in document order.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn query_html_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>> {
    Ok(query_all(document, selector)?
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect())
}

pub fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Logs a failed DOM write at debug level. Returns the value when it worked.
pub fn best_effort<T, E>(what: &str, result: std::result::Result<T, E>) -> Option<T>
where
    E: Into<EnhanceError>,
{
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("{} failed: {}", what, err.into());
            None
        }
    }
}

pub fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<()> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}

/// `None` for elements no longer in the document.
pub fn element_rect(element: &Element) -> Option<Rect> {
    if !element.is_connected() {
        return None;
    }
    let rect = element.get_bounding_client_rect();
    Some(Rect::new(rect.top(), rect.height()))
}

pub fn create_html(document: &Document, tag: &str) -> Result<HtmlElement> {
    document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| EnhanceError::Js(format!("<{}> is not an HTMLElement", tag)))
}

/// A registered event listener. Dropping it removes the listener again;
/// [`Listener::forget`] keeps it for the rest of the page's life.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Option<Closure<dyn FnMut(Event)>>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        Self::register(target, event, handler, false)
    }

    /// Listener that promises never to call `preventDefault`, for scroll.
    pub fn passive<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        Self::register(target, event, handler, true)
    }

    fn register<F>(target: &EventTarget, event: &'static str, handler: F, passive: bool) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback: Some(callback),
        })
    }

    pub fn forget(mut self) {
        if let Some(callback) = self.callback.take() {
            callback.forget();
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            best_effort(
                "removeEventListener",
                self.target
                    .remove_event_listener_with_callback(self.event, callback.as_ref().unchecked_ref()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_effort_passes_values_through() {
        assert_eq!(best_effort("read", Ok::<_, EnhanceError>(3)), Some(3));
    }

    #[test]
    fn best_effort_swallows_failures() {
        let failed: std::result::Result<(), EnhanceError> =
            Err(EnhanceError::Js("style is read-only".to_string()));
        assert_eq!(best_effort("set transform", failed), None);
    }
}
