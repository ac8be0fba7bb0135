//! Thin helpers over `web_sys` for building and measuring the page.

use foundation::{SectionBounds, Viewport};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn log_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

pub fn scroll_to(y: f64) {
    if let Some(w) = web_sys::window() {
        w.scroll_to_with_x_and_y(0.0, y.max(0.0));
    }
}

pub fn viewport() -> Viewport {
    let Some(w) = web_sys::window() else {
        return Viewport::new(0.0, 0.0);
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(width, height)
}

/// Document-relative bounds of `el` at the current scroll position.
pub fn section_bounds(el: &Element) -> SectionBounds {
    let rect = el.get_bounding_client_rect();
    SectionBounds::new(rect.top() + scroll_y(), rect.height())
}

pub fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .is_some_and(|m| m.matches())
}

pub fn find(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

pub fn find_all(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn alert(msg: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(msg);
    }
}

/// Small element builder; attribute and append failures only occur for
/// malformed names, which are all literals here.
#[derive(Clone)]
pub struct El(Element);

pub fn el(tag: &str) -> Result<El, JsValue> {
    Ok(El(document()?.create_element(tag)?))
}

impl El {
    pub fn class(self, class: &str) -> Self {
        self.0.set_class_name(class);
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.0.set_id(id);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        let _ = self.0.set_attribute(name, value);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.0.set_text_content(Some(text));
        self
    }

    /// Trusted markup only (editor output stored by the admin).
    pub fn html(self, html: &str) -> Self {
        self.0.set_inner_html(html);
        self
    }

    pub fn child(self, child: El) -> Self {
        let _ = self.0.append_child(&child.0);
        self
    }

    /// Internal link handled by the router.
    pub fn link(self, href: &str) -> Self {
        self.attr("href", href).attr("data-link", "")
    }

    pub fn element(&self) -> &Element {
        &self.0
    }

    pub fn into_element(self) -> Element {
        self.0
    }

    pub fn html_element(&self) -> Option<HtmlElement> {
        self.0.clone().dyn_into::<HtmlElement>().ok()
    }
}

pub fn link(href: &str, label: &str) -> Result<El, JsValue> {
    Ok(el("a")?.link(href).text(label))
}

pub fn image(src: &str, alt: &str) -> Result<El, JsValue> {
    Ok(el("img")?.attr("src", src).attr("alt", alt).attr("loading", "lazy"))
}

/// Image whose `src` is held back until the lazy controller reveals it.
pub fn lazy_image(src: &str, alt: &str) -> Result<El, JsValue> {
    Ok(el("img")?
        .class("lazy-image")
        .attr("data-src", src)
        .attr("alt", alt))
}
