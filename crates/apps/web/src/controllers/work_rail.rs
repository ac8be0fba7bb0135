//! Pinned work rail: vertical scroll drives the horizontal track.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use motion::{RailConfig, RailLayout, RailMeasurements, RailTrack};
use runtime::Disposer;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, WheelEvent};

use crate::dom::{self, find, find_all, section_bounds, set_style};

const LINE_HEIGHT_PX: f64 = 16.0;

struct Rail {
    container: HtmlElement,
    track: HtmlElement,
    state: RailTrack,
}

impl Rail {
    fn measure(&self) -> RailLayout {
        let first_item_width = find(&self.track, ".rail-item")
            .map_or(0.0, |item| f64::from(item.offset_width()));
        RailLayout::measure(
            RailMeasurements {
                viewport: dom::viewport(),
                container_top: section_bounds(&self.container).top,
                first_item_width,
                track_scroll_width: f64::from(self.track.scroll_width()),
            },
            RailConfig::default(),
        )
    }

    fn relayout(&mut self) {
        let layout = self.measure();
        set_style(
            &self.container,
            "height",
            &format!("{}px", layout.container_height),
        );
        let x = self.state.relayout(layout, dom::scroll_y());
        self.apply(x);
    }

    fn on_scroll(&mut self) {
        let x = self.state.on_scroll(dom::scroll_y());
        self.apply(x);
    }

    fn apply(&self, x: f64) {
        set_style(&self.track, "transform", &format!("translate3d({x}px, 0, 0)"));
    }
}

fn wheel_delta_px(event: &WheelEvent) -> f64 {
    match event.delta_mode() {
        WheelEvent::DOM_DELTA_LINE => event.delta_y() * LINE_HEIGHT_PX,
        WheelEvent::DOM_DELTA_PAGE => event.delta_y() * dom::viewport().height,
        _ => event.delta_y(),
    }
}

pub fn attach(root: &Element) -> Option<Disposer> {
    let container = find(root, ".work-rail")?;
    let track = find(&container, ".rail-track")?;
    let rail = Rc::new(RefCell::new(Rail {
        container,
        track: track.clone(),
        state: RailTrack::new(RailLayout::default()),
    }));
    rail.borrow_mut().relayout();

    let window = web_sys::window()?;
    let mut disposer = Disposer::new();

    let on_scroll = Rc::clone(&rail);
    disposer.hold(EventListener::new(&window, "scroll", move |_| {
        on_scroll.borrow_mut().on_scroll();
    }));

    let on_resize = Rc::clone(&rail);
    disposer.hold(EventListener::new(&window, "resize", move |_| {
        on_resize.borrow_mut().relayout();
    }));

    // Item widths are only known once their images arrive.
    for img in find_all(&track, "img") {
        let on_load = Rc::clone(&rail);
        disposer.hold(EventListener::new(&img, "load", move |_| {
            on_load.borrow_mut().relayout();
        }));
    }

    let on_wheel = Rc::clone(&rail);
    disposer.hold(EventListener::new_with_options(
        &window,
        "wheel",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            let target = on_wheel
                .borrow()
                .state
                .layout()
                .wheel_target(dom::scroll_y(), wheel_delta_px(wheel));
            if let Some(y) = target {
                event.prevent_default();
                dom::scroll_to(y);
            }
        },
    ));

    Some(disposer)
}
