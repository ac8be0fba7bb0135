//! Pinned about section: characters colour in as the section scrolls.

use std::cell::Cell;
use std::rc::Rc;

use gloo_events::EventListener;
use motion::{RevealText, reveal_progress, revealed_chars};
use runtime::Disposer;
use web_sys::{Element, HtmlElement};

use crate::dom::{self, el, find, section_bounds};

pub fn attach(root: &Element) -> Option<Disposer> {
    let section = find(root, ".about-pin")?;
    let text_el = find(root, ".about-text")?;
    let text = text_el.text_content().unwrap_or_default();
    let reveal = RevealText::new(&text);
    if reveal.char_count() == 0 {
        return None;
    }

    // Rebuild the paragraph as words of character spans. Whitespace runs stay
    // text nodes so lines only break between words.
    text_el.set_text_content(None);
    let mut chars: Vec<Option<HtmlElement>> = Vec::with_capacity(reveal.char_count());
    for token in reveal.tokens() {
        if token.is_space {
            let node = dom::document().ok()?.create_text_node(&token.text);
            let _ = text_el.append_child(&node);
            chars.extend(std::iter::repeat_n(None, token.char_count));
            continue;
        }
        let mut word = el("span").ok()?.class("reveal-word");
        for ch in token.text.chars() {
            let span = el("span").ok()?.class("reveal-char").text(&ch.to_string());
            chars.push(span.html_element());
            word = word.child(span);
        }
        let _ = text_el.append_child(word.element());
    }

    let shown = Rc::new(Cell::new(0usize));
    let update = Rc::new(move || {
        let bounds = section_bounds(&section);
        let progress = reveal_progress(dom::scroll_y(), bounds, dom::viewport().height);
        let count = revealed_chars(progress, chars.len());
        let before = shown.replace(count);
        if before == count {
            return;
        }
        let (lo, hi) = (before.min(count), before.max(count));
        for span in chars[lo..hi].iter().flatten() {
            dom::set_class(span, "is-revealed", count > before);
        }
    });
    update();

    let window = web_sys::window()?;
    let mut disposer = Disposer::new();
    let on_scroll = Rc::clone(&update);
    disposer.hold(EventListener::new(&window, "scroll", move |_| on_scroll()));
    let on_resize = Rc::clone(&update);
    disposer.hold(EventListener::new(&window, "resize", move |_| on_resize()));
    Some(disposer)
}
