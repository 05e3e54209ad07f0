//! Small helpers over `web_sys` shared by every page feature.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlCollection, NodeList, Window};

use crate::error::{BoardError, Result};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(BoardError::MissingGlobal("window"))
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(BoardError::MissingGlobal("document"))
}

/// Collects the nodes of a `NodeList` that cast to `T`, skipping the rest.
pub fn nodes<T: JsCast>(list: &NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// Same as [`nodes`] for live `HtmlCollection`s.
pub fn elements<T: JsCast>(collection: &HtmlCollection) -> Vec<T> {
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .filter_map(|el| el.dyn_into::<T>().ok())
        .collect()
}

pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>> {
    Ok(nodes(&document.query_selector_all(selector)?))
}

pub fn query_all_in<T: JsCast>(root: &Element, selector: &str) -> Result<Vec<T>> {
    Ok(nodes(&root.query_selector_all(selector)?))
}

pub fn optional_by_id<T: JsCast>(document: &Document, id: &str) -> Result<Option<T>> {
    match document.get_element_by_id(id) {
        None => Ok(None),
        Some(el) => el
            .dyn_into::<T>()
            .map(Some)
            .map_err(|_| BoardError::WrongType(format!("#{}", id))),
    }
}

/// Walks `depth` levels up the element tree.
pub fn ancestor(el: &Element, depth: usize) -> Option<Element> {
    let mut current = el.clone();
    for _ in 0..depth {
        current = current.parent_element()?;
    }
    Some(current)
}

/// Attaches `handler` for the page's lifetime. Errors raised by the handler
/// are reported on the console.
pub fn listen<F>(target: &EventTarget, event: &str, mut handler: F) -> Result<()>
where
    F: FnMut(Event) -> Result<()> + 'static,
{
    let name = event.to_string();
    let closure = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
        if let Err(err) = handler(e) {
            crate::log_error(&format!("{} handler failed: {}", name, err));
        }
    });
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Renders a number the way an HTML number input expects it.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
