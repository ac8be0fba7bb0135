//! Admin feedback: short-lived success toasts, blocking alerts for failures.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::Element;

use crate::dom::{self, el};

pub const TOAST_DISMISS_MS: u32 = 3_000;

#[derive(Default)]
struct Pending {
    next: Cell<u64>,
    timers: RefCell<BTreeMap<u64, (Element, Timeout)>>,
}

/// Toast stack pinned to the page; cloning shares the stack.
#[derive(Clone)]
pub struct Toaster {
    host: Element,
    pending: Rc<Pending>,
}

impl Toaster {
    pub fn mount(parent: &Element) -> Option<Self> {
        let host = el("div").ok()?.class("toasts").into_element();
        parent.append_child(&host).ok()?;
        Some(Self {
            host,
            pending: Rc::default(),
        })
    }

    pub fn success(&self, message: &str) {
        let Ok(toast) = el("div") else {
            return;
        };
        let toast = toast.class("toast toast-success").text(message).into_element();
        if self.host.append_child(&toast).is_err() {
            return;
        }
        let key = self.pending.next.get();
        self.pending.next.set(key + 1);
        let pending = Rc::downgrade(&self.pending);
        let timeout = Timeout::new(TOAST_DISMISS_MS, move || {
            if let Some(pending) = pending.upgrade() {
                if let Some((toast, _)) = pending.timers.borrow_mut().remove(&key) {
                    toast.remove();
                }
            }
        });
        self.pending
            .timers
            .borrow_mut()
            .insert(key, (toast, timeout));
    }

    pub fn failure(&self, context: &str, err: impl std::fmt::Display) {
        dom::log_error(&format!("{context}: {err}"));
        dom::alert(&format!("{context}: {err}"));
    }
}
