use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use motion::Typewriter;
use runtime::Disposer;
use web_sys::HtmlElement;

struct Cycle {
    typewriter: Typewriter,
    target: HtmlElement,
    pending: Option<Timeout>,
}

fn arm(this: &Rc<RefCell<Cycle>>, delay_ms: u32) {
    let next = Rc::clone(this);
    let timeout = Timeout::new(delay_ms, move || {
        let delay = {
            let mut cycle = next.borrow_mut();
            cycle.pending = None;
            let delay = cycle.typewriter.tick();
            cycle
                .target
                .set_text_content(Some(cycle.typewriter.displayed()));
            delay
        };
        arm(&next, millis(delay));
    });
    this.borrow_mut().pending = Some(timeout);
}

fn millis(d: std::time::Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}

/// Cycles `roles` through `target`. Nothing runs for an empty role list.
pub fn attach(target: &HtmlElement, roles: Vec<String>) -> Option<Disposer> {
    let typewriter = Typewriter::new(roles)?;
    target.set_text_content(Some(typewriter.displayed()));
    let first = millis(typewriter.first_delay());
    let cycle = Rc::new(RefCell::new(Cycle {
        typewriter,
        target: target.clone(),
        pending: None,
    }));
    arm(&cycle, first);

    let mut disposer = Disposer::new();
    disposer.on_dispose(move || {
        cycle.borrow_mut().pending = None;
    });
    Some(disposer)
}
