//! Pinned services stack: scroll slides the list and swaps the active image.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use motion::{ServicesGeometry, ServicesSwap};
use runtime::Disposer;
use web_sys::{Element, HtmlElement};

use crate::dom::{self, find, find_all, section_bounds, set_class, set_style};

struct Services {
    container: HtmlElement,
    stack: HtmlElement,
    images: Vec<HtmlElement>,
    items: Vec<HtmlElement>,
    swap: ServicesSwap,
}

impl Services {
    fn geometry(&self) -> ServicesGeometry {
        let bounds = section_bounds(&self.container);
        ServicesGeometry {
            container_top: bounds.top,
            container_height: bounds.height,
            viewport_height: dom::viewport().height,
            item_count: self.items.len(),
        }
    }

    fn remeasure(&mut self) {
        let geometry = self.geometry();
        self.swap.set_geometry(geometry);
        self.update(true);
    }

    fn update(&mut self, force: bool) {
        let (frame, changed) = self.swap.on_scroll(dom::scroll_y());
        set_style(
            &self.stack,
            "transform",
            &format!("translate3d(0, {}px, 0)", -frame.translate_y),
        );
        if changed || force {
            for group in [&self.images, &self.items] {
                for (i, el) in group.iter().enumerate() {
                    set_class(el, "is-active", frame.active_index == Some(i));
                }
            }
        }
    }
}

pub fn attach(root: &Element) -> Option<Disposer> {
    let container = find(root, ".services-pin")?;
    let stack = find(&container, ".services-stack")?;
    let items = find_all(&stack, ".service-item");
    if items.is_empty() {
        return None;
    }
    let images = find_all(&container, ".service-image");
    let mut services = Services {
        container,
        stack,
        images,
        items,
        swap: ServicesSwap::new(ServicesGeometry::default()),
    };
    services.remeasure();
    let services = Rc::new(RefCell::new(services));

    let window = web_sys::window()?;
    let mut disposer = Disposer::new();
    let on_scroll = Rc::clone(&services);
    disposer.hold(EventListener::new(&window, "scroll", move |_| {
        on_scroll.borrow_mut().update(false);
    }));
    let on_resize = Rc::clone(&services);
    disposer.hold(EventListener::new(&window, "resize", move |_| {
        on_resize.borrow_mut().remeasure();
    }));
    Some(disposer)
}
