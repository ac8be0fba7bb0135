//! Browser entry point: content state, router and the page controllers.

mod api;
mod controllers;
mod dom;
mod pages;
mod router;
mod toast;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use content::{ContentState, VIEW_BUMP_PERIOD};
use gloo_timers::callback::Interval;
use site::{HOME_SECTIONS, section_label};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::api::HttpContentStore;
use crate::dom::el;
use crate::router::Router;
use crate::toast::Toaster;

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

const OUTLET_ID: &str = "app";
const SPY_NAV_ID: &str = "spy-nav";

pub type Content = ContentState<HttpContentStore>;

/// Shared handles passed into every page.
#[derive(Clone)]
pub struct App {
    pub content: Rc<Content>,
    pub toaster: Toaster,
}

impl App {
    /// True until the first content load has finished.
    pub fn content_pending(&self) -> bool {
        self.content.is_loading() || self.content.revision() == 0
    }
}

thread_local! {
    static VIEW_BUMPER: RefCell<Option<Interval>> = const { RefCell::new(None) };
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = info.to_string();
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

pub(crate) fn spy_nav() -> Option<Element> {
    dom::document().ok()?.get_element_by_id(SPY_NAV_ID)
}

fn mount_spy_nav(body: &Element) -> Result<Element, JsValue> {
    if let Some(existing) = spy_nav() {
        return Ok(existing);
    }
    let mut nav = el("nav")?.id(SPY_NAV_ID).class("spy-nav is-hidden");
    for id in HOME_SECTIONS {
        nav = nav.child(
            el("a")?
                .link(&format!("/#{id}"))
                .attr("data-spy", id)
                .text(section_label(id)),
        );
    }
    let nav = nav.into_element();
    body.append_child(&nav)?;
    Ok(nav)
}

fn mount_outlet(body: &Element) -> Result<Element, JsValue> {
    if let Some(existing) = dom::document()?.get_element_by_id(OUTLET_ID) {
        return Ok(existing);
    }
    let outlet = el("main")?.id(OUTLET_ID).into_element();
    body.append_child(&outlet)?;
    Ok(outlet)
}

fn start_view_bumper(content: Rc<Content>) {
    let period_ms = u32::try_from(VIEW_BUMP_PERIOD.as_millis()).unwrap_or(u32::MAX);
    let interval = Interval::new(period_ms, move || {
        let content = Rc::clone(&content);
        spawn_local(async move {
            let mut rng = rand::thread_rng();
            if let Err(err) = content.bump_random_post_views(&mut rng).await {
                dom::log_error(&format!("view counter: {err}"));
            }
        });
    });
    VIEW_BUMPER.with(|slot| *slot.borrow_mut() = Some(interval));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();

    let body: Element = dom::document()?
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .into();
    let outlet = mount_outlet(&body)?;
    let nav = mount_spy_nav(&body)?;
    let toaster = Toaster::mount(&body).ok_or_else(|| JsValue::from_str("no toast host"))?;
    let api_base = body.get_attribute("data-api-base").unwrap_or_default();
    let app = App {
        content: Rc::new(ContentState::new(HttpContentStore::new(api_base))),
        toaster,
    };

    let content = Rc::clone(&app.content);
    spawn_local(async move {
        if let Err(err) = content.load_all().await {
            dom::log_error(&format!("content load failed: {err}"));
        }
    });
    start_view_bumper(Rc::clone(&app.content));

    Router::start(app, outlet, nav)
}
