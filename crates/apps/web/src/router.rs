//! History-driven page switching with per-path scroll restoration.

use std::cell::RefCell;
use std::rc::Rc;

use content::Subscription;
use gloo_events::{EventListener, EventListenerOptions};
use runtime::Disposer;
use site::{Navigation, Resolution, Route, ScrollMemory, ScrollTarget, fragment, resolve};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollRestoration};

use crate::App;
use crate::dom::{self, set_class};
use crate::pages;

thread_local! {
    static ROUTER: RefCell<Option<Rc<Router>>> = const { RefCell::new(None) };
}

struct Mounted {
    route: Route,
    url: String,
    /// Built before the first load finished.
    stale: bool,
    _page: Disposer,
}

pub struct Router {
    app: App,
    outlet: Element,
    nav: Element,
    memory: RefCell<ScrollMemory>,
    current: RefCell<Option<Mounted>>,
    guards: RefCell<Vec<EventListener>>,
    subscription: RefCell<Option<Subscription>>,
}

fn current_url() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return "/".to_string();
    };
    format!(
        "{}{}{}",
        location.pathname().unwrap_or_else(|_| "/".to_string()),
        location.search().unwrap_or_default(),
        location.hash().unwrap_or_default()
    )
}

fn scroll_to_anchor(id: &str) {
    let Some(target) = dom::document().ok().and_then(|d| d.get_element_by_id(id)) else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

impl Router {
    /// Install the router and render the page for the current location.
    pub fn start(app: App, outlet: Element, nav: Element) -> Result<(), JsValue> {
        let window = dom::window()?;
        window
            .history()?
            .set_scroll_restoration(ScrollRestoration::Manual)?;
        let router = Rc::new(Router {
            app: app.clone(),
            outlet,
            nav,
            memory: RefCell::new(ScrollMemory::new()),
            current: RefCell::new(None),
            guards: RefCell::new(Vec::new()),
            subscription: RefCell::new(None),
        });

        let on_pop = Rc::downgrade(&router);
        let popstate = EventListener::new(&window, "popstate", move |_| {
            if let Some(router) = on_pop.upgrade() {
                router.remember_scroll();
                router.render(&current_url(), Navigation::Pop);
            }
        });
        let document = dom::document()?;
        let clicks = EventListener::new_with_options(
            &document,
            "click",
            EventListenerOptions::enable_prevent_default(),
            |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                if mouse.button() != 0
                    || mouse.ctrl_key()
                    || mouse.meta_key()
                    || mouse.shift_key()
                    || mouse.alt_key()
                {
                    return;
                }
                let link = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|t| t.closest("a[data-link]").ok().flatten());
                let Some(href) = link.and_then(|l| l.get_attribute("href")) else {
                    return;
                };
                event.prevent_default();
                navigate(&href);
            },
        );
        router.guards.borrow_mut().extend([popstate, clicks]);

        let on_change = Rc::downgrade(&router);
        let subscription = app.content.subscribe(move || {
            if let Some(router) = on_change.upgrade() {
                router.on_content_changed();
            }
        });
        *router.subscription.borrow_mut() = Some(subscription);

        ROUTER.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&router)));
        router.render(&current_url(), Navigation::Push);
        Ok(())
    }

    fn remember_scroll(&self) {
        if let Some(mounted) = self.current.borrow().as_ref() {
            self.memory
                .borrow_mut()
                .remember(&mounted.url, dom::scroll_y());
        }
    }

    fn push(&self, url: &str) {
        let pushed = dom::window()
            .and_then(|w| w.history())
            .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(url)));
        if let Err(err) = pushed {
            dom::log_error(&format!("history push failed: {err:?}"));
        }
    }

    fn replace(&self, url: &str) {
        let replaced = dom::window()
            .and_then(|w| w.history())
            .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(url)));
        if let Err(err) = replaced {
            dom::log_error(&format!("history replace failed: {err:?}"));
        }
    }

    fn navigate(&self, url: &str) {
        // Same-page anchor jumps keep the mounted page.
        let same_page = self
            .current
            .borrow()
            .as_ref()
            .is_some_and(|m| m.route == Route::parse(url));
        if same_page {
            if let Some(anchor) = fragment(url) {
                self.push(url);
                scroll_to_anchor(anchor);
                return;
            }
        }
        self.remember_scroll();
        self.push(url);
        self.render(url, Navigation::Push);
    }

    fn render(&self, url: &str, navigation: Navigation) {
        let authenticated = self.app.content.is_authenticated();
        let route = match resolve(url, authenticated) {
            Resolution::Render(route) => route,
            Resolution::Redirect(to) => {
                self.replace(&to);
                match resolve(&to, authenticated) {
                    Resolution::Render(route) => route,
                    Resolution::Redirect(_) => Route::NotFound,
                }
            }
        };
        let url = if route == Route::parse(url) {
            url.to_string()
        } else {
            route.path()
        };
        self.mount(route, &url);
        match self.memory.borrow().target(&url, navigation) {
            ScrollTarget::Offset(y) => dom::scroll_to(y),
            ScrollTarget::Anchor(id) => scroll_to_anchor(&id),
        }
    }

    fn mount(&self, route: Route, url: &str) {
        // Tear the old page down before the new one attaches its controllers.
        let previous = self.current.borrow_mut().take();
        drop(previous);
        self.outlet.set_inner_html("");
        set_class(&self.nav, "is-hidden", route != Route::Home);
        let page = match pages::render(&self.app, &route, &self.outlet) {
            Ok(page) => page,
            Err(err) => {
                dom::log_error(&format!("render {route} failed: {err:?}"));
                Disposer::new()
            }
        };
        *self.current.borrow_mut() = Some(Mounted {
            route,
            url: url.to_string(),
            stale: self.app.content_pending(),
            _page: page,
        });
    }

    /// Re-render when the page was built before the first load finished, or
    /// when the session ended under an admin page.
    fn on_content_changed(&self) {
        let content = &self.app.content;
        let refresh = match self.current.borrow().as_ref() {
            Some(m) => {
                (m.stale && !self.app.content_pending())
                    || (m.route.requires_auth() && !content.is_authenticated())
            }
            None => false,
        };
        if !refresh {
            return;
        }
        let Some(url) = self.current.borrow().as_ref().map(|m| m.url.clone()) else {
            return;
        };
        let y = dom::scroll_y();
        match resolve(&url, content.is_authenticated()) {
            Resolution::Render(route) => {
                self.mount(route, &url);
                dom::scroll_to(y);
            }
            Resolution::Redirect(to) => {
                self.replace(&to);
                self.render(&to, Navigation::Push);
            }
        }
    }
}

/// Push `url` and render it. No-op before the router has started.
pub fn navigate(url: &str) {
    let router = ROUTER.with(|slot| slot.borrow().clone());
    if let Some(router) = router {
        router.navigate(url);
    }
}
