//! Infinite gallery strip. Three copies of the items scroll left; the
//! offset wraps every copy width.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_render::{AnimationFrame, request_animation_frame};
use motion::{DEFAULT_MARQUEE_SPEED_PX_S, Marquee, MarqueeFlags, MARQUEE_COPIES};
use runtime::{Disposer, FrameClock};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, MediaQueryList, PointerEvent};

use super::observer::Observer;
use crate::dom::{self, find, find_all, set_class, set_style};

struct Loop {
    clock: FrameClock,
    marquee: Marquee,
    track: HtmlElement,
    handle: Option<AnimationFrame>,
}

impl Loop {
    fn measure(&mut self) {
        let width = f64::from(self.track.scroll_width()) / MARQUEE_COPIES as f64;
        self.marquee.set_copy_width(width);
        self.apply(self.marquee.offset());
    }

    fn apply(&self, offset: f64) {
        set_style(
            &self.track,
            "transform",
            &format!("translate3d({offset}px, 0, 0)"),
        );
    }

    fn update_flags(this: &Rc<RefCell<Loop>>, f: impl FnOnce(&mut MarqueeFlags)) {
        let mut state = this.borrow_mut();
        f(state.marquee.flags_mut());
    }
}

fn schedule(this: &Rc<RefCell<Loop>>) {
    let next = Rc::clone(this);
    let handle = request_animation_frame(move |timestamp_ms| {
        let mut state = next.borrow_mut();
        state.handle.take();
        let Some(frame) = state.clock.advance(timestamp_ms) else {
            return;
        };
        if !state.marquee.is_paused() {
            let offset = state.marquee.on_frame(frame);
            state.apply(offset);
        }
        drop(state);
        schedule(&next);
    });
    this.borrow_mut().handle = Some(handle);
}

fn media(query: &str) -> Option<MediaQueryList> {
    web_sys::window()?.match_media(query).ok().flatten()
}

pub fn attach(root: &Element) -> Option<Disposer> {
    let strip = find(root, ".marquee")?;
    let track = find(&strip, ".marquee-track")?;
    let state = Rc::new(RefCell::new(Loop {
        clock: FrameClock::new(),
        marquee: Marquee::new(DEFAULT_MARQUEE_SPEED_PX_S),
        track: track.clone(),
        handle: None,
    }));
    {
        let mut s = state.borrow_mut();
        s.marquee.flags_mut().reduced_motion = dom::prefers_reduced_motion();
        s.measure();
        s.clock.start();
    }
    schedule(&state);

    let window = web_sys::window()?;
    let mut disposer = Disposer::new();

    let on_resize = Rc::clone(&state);
    disposer.hold(EventListener::new(&window, "resize", move |_| {
        on_resize.borrow_mut().measure();
    }));
    for img in find_all(&track, "img") {
        let on_load = Rc::clone(&state);
        disposer.hold(EventListener::new(&img, "load", move |_| {
            on_load.borrow_mut().measure();
        }));
    }

    if let Some(query) = media("(prefers-reduced-motion: reduce)") {
        let on_change = Rc::clone(&state);
        let list = query.clone();
        disposer.hold(EventListener::new(&query, "change", move |_| {
            let reduced = list.matches();
            Loop::update_flags(&on_change, |f| f.reduced_motion = reduced);
        }));
    }

    let on_visibility = Rc::clone(&state);
    let observer = Observer::new("0px", 0.0, move |entries, _| {
        if let Some(entry) = entries.last() {
            let visible = entry.is_intersecting();
            Loop::update_flags(&on_visibility, |f| f.intersecting = visible);
        }
    })
    .ok()?;
    observer.observe(&strip);
    disposer.hold(observer);

    if let Some(query) = media("(hover: hover)") {
        state.borrow_mut().marquee.set_hover_capable(query.matches());
        let on_change = Rc::clone(&state);
        let list = query.clone();
        disposer.hold(EventListener::new(&query, "change", move |_| {
            let capable = list.matches();
            on_change.borrow_mut().marquee.set_hover_capable(capable);
        }));
    }
    for (event, hovered) in [("mouseenter", true), ("mouseleave", false)] {
        let on_hover = Rc::clone(&state);
        disposer.hold(EventListener::new(&strip, event, move |_| {
            on_hover.borrow_mut().marquee.hover(hovered);
        }));
    }
    for (event, focused) in [("focusin", true), ("focusout", false)] {
        let on_focus = Rc::clone(&state);
        let target = strip.clone();
        disposer.hold(EventListener::new(&strip, event, move |_| {
            let keyboard = target.matches(":focus-visible").unwrap_or(false);
            on_focus.borrow_mut().marquee.focus(focused, keyboard);
        }));
    }

    let on_down = Rc::clone(&state);
    let capture = strip.clone();
    disposer.hold(EventListener::new(&strip, "pointerdown", move |event| {
        let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        // Without capture a release outside the strip arrives as pointerleave.
        if capture.set_pointer_capture(pointer.pointer_id()).is_err() {
            web_sys::console::debug_1(&JsValue::from_str("marquee: pointer capture unavailable"));
        }
        set_class(&capture, "is-dragging", true);
        on_down
            .borrow_mut()
            .marquee
            .pointer_down(f64::from(pointer.client_x()));
    }));
    let on_move = Rc::clone(&state);
    disposer.hold(EventListener::new(&strip, "pointermove", move |event| {
        let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        let mut s = on_move.borrow_mut();
        if let Some(offset) = s.marquee.pointer_move(f64::from(pointer.client_x())) {
            s.apply(offset);
        }
    }));
    for event in ["pointerup", "pointercancel", "pointerleave", "lostpointercapture"] {
        let on_up = Rc::clone(&state);
        let strip_el = strip.clone();
        disposer.hold(EventListener::new(&strip, event, move |_| {
            set_class(&strip_el, "is-dragging", false);
            on_up.borrow_mut().marquee.pointer_up();
        }));
    }

    disposer.on_dispose(move || {
        let mut s = state.borrow_mut();
        s.clock.stop();
        s.handle = None;
    });
    Some(disposer)
}
