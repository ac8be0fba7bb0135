//! Highlights the nav link of the home section currently in view.

use std::cell::RefCell;
use std::rc::Rc;

use foundation::SectionId;
use motion::{IntersectionSample, SPY_ROOT_MARGIN, SPY_THRESHOLD, ScrollSpy};
use runtime::Disposer;
use web_sys::{Element, HtmlElement};

use super::observer::Observer;
use crate::dom::{find_all, set_class};

/// Watches `#id` sections under `root`; toggles `is-active` on `[data-spy=id]`
/// links under `nav`.
pub fn attach(root: &Element, nav: &Element, ids: Vec<SectionId>) -> Option<Disposer> {
    let sections: Vec<Element> = ids
        .iter()
        .filter_map(|id| root.query_selector(&format!("#{id}")).ok().flatten())
        .collect();
    if sections.is_empty() {
        return None;
    }
    let links = find_all(nav, "[data-spy]");
    let spy = Rc::new(RefCell::new(ScrollSpy::new(ids)));

    let observer = Observer::new(SPY_ROOT_MARGIN, SPY_THRESHOLD, move |entries, _| {
        let batch: Vec<IntersectionSample> = entries
            .iter()
            .map(|entry| {
                IntersectionSample::new(
                    entry.target().id().as_str(),
                    entry.is_intersecting(),
                    entry.intersection_ratio(),
                )
            })
            .collect();
        let mut spy = spy.borrow_mut();
        if spy.apply(&batch) {
            highlight(&links, spy.active());
        }
    })
    .ok()?;
    for section in &sections {
        observer.observe(section);
    }

    let mut disposer = Disposer::new();
    disposer.hold(observer);
    Some(disposer)
}

fn highlight(links: &[HtmlElement], active: Option<&SectionId>) {
    for link in links {
        let on = link.get_attribute("data-spy").as_deref() == active.map(SectionId::as_str);
        set_class(link, "is-active", on);
    }
}
