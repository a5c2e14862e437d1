use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use super::{best_effort, element_rect, query_html_all, set_styles, viewport};
use crate::config::RevealConfig;
use crate::error::Result;
use crate::geometry::Rect;
use crate::reveal::{
    IntersectionEntry, PendingStyle, RevealScheduler, RevealSummary, RevealTarget, TargetId,
    VisibilityWatcher,
};

pub const REVEALED_CLASS: &str = "revealed";
const ID_ATTRIBUTE: &str = "data-reveal-id";

pub struct DomRevealTarget {
    element: HtmlElement,
}

impl DomRevealTarget {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl RevealTarget for DomRevealTarget {
    fn bounding_rect(&self) -> Option<Rect> {
        element_rect(&self.element)
    }

    fn reveal_once(&self) -> bool {
        self.element.dataset().get("revealOnce").as_deref() != Some("false")
    }

    fn show_pending(&self, style: &PendingStyle) {
        let transform = style.transform();
        best_effort("clear revealed class", self.element.class_list().remove_1(REVEALED_CLASS));
        best_effort(
            "pending styles",
            set_styles(
                &self.element,
                &[
                    ("opacity", "0"),
                    ("transform", transform.as_str()),
                    ("transition", style.transition.as_str()),
                ],
            ),
        );
    }

    fn show_revealed(&self) {
        best_effort("add revealed class", self.element.class_list().add_1(REVEALED_CLASS));
        best_effort(
            "revealed styles",
            set_styles(&self.element, &[("opacity", "1"), ("transform", "translateY(0)")]),
        );
    }
}

/// Maps scheduler ids onto an `IntersectionObserver`. The observer is filled
/// in after construction because its callback needs the watcher too.
pub struct ObserverWatcher {
    observer: RefCell<Option<IntersectionObserver>>,
    elements: Vec<Element>,
}

impl VisibilityWatcher for ObserverWatcher {
    fn watch(&self, id: TargetId) {
        if let (Some(observer), Some(element)) = (self.observer.borrow().as_ref(), self.elements.get(id)) {
            observer.observe(element);
        }
    }

    fn unwatch(&self, id: TargetId) {
        if let (Some(observer), Some(element)) = (self.observer.borrow().as_ref(), self.elements.get(id)) {
            observer.unobserve(element);
        }
    }
}

pub fn intersection_supported(window: &Window) -> bool {
    Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

fn read_entries(entries: &Array) -> Vec<IntersectionEntry> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .filter_map(|entry| {
            let id = entry.target().get_attribute(ID_ATTRIBUTE)?.parse().ok()?;
            Some(IntersectionEntry {
                id,
                is_intersecting: entry.is_intersecting(),
            })
        })
        .collect()
}

/// Scans the reveal candidates once and hooks the pending ones up to an
/// observer. Elements added to the page later are not picked up.
pub fn init_reveal(window: &Window, document: &Document, config: &RevealConfig) -> Result<RevealSummary> {
    if config.selectors.is_empty() {
        return Ok(RevealSummary::default());
    }
    let elements = query_html_all(document, &config.selectors.join(", "))?;
    if elements.is_empty() {
        debug!("no reveal candidates on this page");
        return Ok(RevealSummary::default());
    }

    for (id, element) in elements.iter().enumerate() {
        element.set_attribute(ID_ATTRIBUTE, &id.to_string())?;
    }

    let watcher = Rc::new(ObserverWatcher {
        observer: RefCell::new(None),
        elements: elements.iter().map(|el| Element::from(el.clone())).collect(),
    });
    let targets = elements.into_iter().map(DomRevealTarget::new).collect();
    let scheduler = Rc::new(RefCell::new(RevealScheduler::new(targets, config)));
    let viewport = viewport(window)?;

    if !intersection_supported(window) {
        info!("IntersectionObserver unavailable, showing all content");
        return Ok(scheduler.borrow_mut().initialize(viewport, None));
    }

    let callback = {
        let scheduler = scheduler.clone();
        let watcher = watcher.clone();
        Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
            let entries = read_entries(&entries);
            scheduler.borrow_mut().handle_entries(&entries, watcher.as_ref());
        }) as Box<dyn FnMut(Array, IntersectionObserver)>)
    };

    let options = IntersectionObserverInit::new();
    options.set_root_margin(&format!("0px 0px {}px 0px", config.margin));
    options.set_threshold(&JsValue::from_f64(config.threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();
    *watcher.observer.borrow_mut() = Some(observer);

    let summary = scheduler
        .borrow_mut()
        .initialize(viewport, Some(watcher.as_ref() as &dyn VisibilityWatcher));
    Ok(summary)
}
