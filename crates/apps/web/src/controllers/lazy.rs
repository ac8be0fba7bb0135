//! One-shot fade-in for `[data-reveal]` blocks and `img.lazy-image`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use motion::{
    LazyImage, LazyImageAction, LazyReveal, REVEAL_ROOT_MARGIN, RevealOptions, RevealStyle,
    RevealTransition, parse_threshold,
};
use runtime::Disposer;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlElement, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
};

use super::observer::Observer;
use crate::dom::{find_all, set_style};

fn apply_style(el: &HtmlElement, style: RevealStyle) {
    set_style(el, "opacity", &style.opacity.to_string());
    set_style(
        el,
        "transform",
        &format!("translate3d(0, {}px, 0)", style.translate_y_px),
    );
    set_style(el, "transition-delay", &format!("{}ms", style.delay_ms));
}

fn options_for(el: &HtmlElement) -> RevealOptions {
    let mut options = RevealOptions::default();
    if let Some(delay) = el
        .get_attribute("data-reveal-delay")
        .and_then(|d| d.parse().ok())
    {
        options.delay_ms = delay;
    }
    if let Some(threshold) = el
        .get_attribute("data-reveal-threshold")
        .as_deref()
        .and_then(parse_threshold)
    {
        options.threshold = threshold;
    }
    options
}

/// Targets sharing one observer threshold.
#[derive(Default)]
struct Groups(Vec<(f64, Vec<Element>)>);

impl Groups {
    fn add(&mut self, threshold: f64, target: Element) {
        match self.0.iter_mut().find(|(t, _)| *t == threshold) {
            Some((_, targets)) => targets.push(target),
            None => self.0.push((threshold, vec![target])),
        }
    }
}

struct Block {
    el: HtmlElement,
    state: LazyReveal,
}

struct Image {
    el: HtmlImageElement,
    state: LazyImage,
    fallback: Option<Timeout>,
}

impl Image {
    fn run(this: &Rc<RefCell<Image>>, action: LazyImageAction) {
        match action {
            LazyImageAction::None => {}
            LazyImageAction::LoadAndArmFallback { fallback_ms } => {
                let mut image = this.borrow_mut();
                if let Some(src) = image.el.get_attribute("data-src") {
                    image.el.set_src(&src);
                }
                let weak: Weak<RefCell<Image>> = Rc::downgrade(this);
                image.fallback = Some(Timeout::new(fallback_ms, move || {
                    let Some(this) = weak.upgrade() else {
                        return;
                    };
                    let action = {
                        let mut image = this.borrow_mut();
                        image.fallback = None;
                        image.state.on_fallback_elapsed()
                    };
                    Image::run(&this, action);
                }));
            }
            LazyImageAction::Show => {
                let mut image = this.borrow_mut();
                image.fallback = None;
                let style = image.state.style();
                apply_style(&image.el, style);
            }
        }
    }
}

fn on_entries(
    entries: &[IntersectionObserverEntry],
    observer: &IntersectionObserver,
    blocks: &RefCell<Vec<Block>>,
    images: &[Rc<RefCell<Image>>],
) {
    for entry in entries {
        let target = entry.target();
        let hit = entry.is_intersecting();
        if let Some(block) = blocks.borrow_mut().iter_mut().find(|b| *b.el == target) {
            if block.state.on_intersection(hit) == RevealTransition::Appeared {
                apply_style(&block.el, block.state.style());
                observer.unobserve(&target);
            }
            continue;
        }
        let Some(image) = images
            .iter()
            .find(|i| *i.borrow().el == *target.unchecked_ref::<HtmlElement>())
        else {
            continue;
        };
        let action = image.borrow_mut().state.on_intersection(hit);
        if !image.borrow().state.should_observe() {
            observer.unobserve(&target);
        }
        Image::run(image, action);
    }
}

pub fn attach(root: &Element) -> Option<Disposer> {
    let mut groups = Groups::default();
    let blocks: Vec<Block> = find_all(root, "[data-reveal]")
        .into_iter()
        .map(|el| {
            let options = options_for(&el);
            groups.add(options.threshold, el.clone().into());
            let state = LazyReveal::new(options);
            apply_style(&el, state.style());
            Block { el, state }
        })
        .collect();
    let images: Vec<Rc<RefCell<Image>>> = find_all(root, "img.lazy-image")
        .into_iter()
        .filter_map(|el| {
            let options = options_for(&el);
            let state = LazyImage::new(options);
            apply_style(&el, state.style());
            let el = el.dyn_into::<HtmlImageElement>().ok()?;
            groups.add(options.threshold, el.clone().into());
            Some(Rc::new(RefCell::new(Image {
                el,
                state,
                fallback: None,
            })))
        })
        .collect();
    if blocks.is_empty() && images.is_empty() {
        return None;
    }

    let mut disposer = Disposer::new();
    for image in &images {
        let target = image.borrow().el.clone();
        let on_load = Rc::clone(image);
        disposer.hold(EventListener::new(&target, "load", move |_| {
            let action = on_load.borrow_mut().state.on_load();
            Image::run(&on_load, action);
        }));
    }

    let blocks = Rc::new(RefCell::new(blocks));
    let images = Rc::new(images);
    for (threshold, targets) in groups.0 {
        let blocks = Rc::clone(&blocks);
        let observed = Rc::clone(&images);
        let observer = Observer::new(REVEAL_ROOT_MARGIN, threshold, move |entries, observer| {
            on_entries(entries, observer, &blocks, &observed);
        })
        .ok()?;
        for target in &targets {
            observer.observe(target);
        }
        disposer.hold(observer);
    }
    // Pending fallbacks are cancelled with the images.
    disposer.on_dispose(move || {
        for image in images.iter() {
            image.borrow_mut().fallback = None;
        }
    });
    Some(disposer)
}
