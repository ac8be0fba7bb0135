use std::rc::Rc;

use content::categories;
use gloo_events::EventListener;
use runtime::Disposer;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::{back_link, loading, page_header, project_card};
use crate::App;
use crate::dom::{El, el, find_all, lazy_image, set_class};

const ALL: &str = "All";

fn filter_bar(names: &[String]) -> Result<El, JsValue> {
    let mut bar = el("div")?.class("filter-bar");
    for name in std::iter::once(ALL).chain(names.iter().map(String::as_str)) {
        let class = if name == ALL {
            "filter is-active"
        } else {
            "filter"
        };
        bar = bar.child(
            el("button")?
                .class(class)
                .attr("type", "button")
                .attr("data-filter", name)
                .text(name),
        );
    }
    Ok(bar)
}

pub fn render_list(app: &App, outlet: &Element) -> Result<Disposer, JsValue> {
    let projects = app.content.projects();
    let mut grid = el("div")?.class("project-grid");
    if projects.is_empty() && app.content_pending() {
        grid = grid.child(loading()?);
    }
    for project in &projects {
        grid = grid.child(project_card(project)?);
    }
    let root = el("div")?
        .class("page page-portfolio")
        .child(page_header("Portfolio", "Identity, editorial and digital work.")?)
        .child(filter_bar(&categories(&projects))?)
        .child(grid)
        .into_element();
    outlet.append_child(&root)?;

    let mut page = Disposer::new();
    let buttons = Rc::new(find_all(&root, "[data-filter]"));
    let cards = Rc::new(find_all(&root, ".project-card"));
    for button in buttons.iter() {
        let buttons = Rc::clone(&buttons);
        let cards = Rc::clone(&cards);
        let selected = button.get_attribute("data-filter").unwrap_or_default();
        page.hold(EventListener::new(button, "click", move |_| {
            for b in buttons.iter() {
                let on = b.get_attribute("data-filter").as_deref() == Some(selected.as_str());
                set_class(b, "is-active", on);
            }
            for card in cards.iter() {
                let shown = selected == ALL
                    || card.get_attribute("data-category").as_deref() == Some(selected.as_str());
                card.set_hidden(!shown);
            }
        }));
    }
    Ok(page)
}

pub fn render_detail(app: &App, id: &str, outlet: &Element) -> Result<Disposer, JsValue> {
    let Some(project) = app.content.project(id) else {
        let body = if app.content_pending() {
            loading()?
        } else {
            el("p")?.text("This project could not be found.")
        };
        let root = el("div")?
            .class("page page-project")
            .child(body)
            .child(back_link("/portfolio", "Back to portfolio")?);
        outlet.append_child(root.element())?;
        return Ok(Disposer::new());
    };

    let mut meta = el("dl")?.class("project-meta");
    let details = [
        ("Category", Some(project.category.as_str())),
        ("Year", project.year.as_deref()),
        ("Client", project.client.as_deref()),
    ];
    for (label, value) in details {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            meta = meta
                .child(el("dt")?.text(label))
                .child(el("dd")?.text(value));
        }
    }
    let mut gallery = el("div")?.class("project-gallery");
    for src in &project.gallery {
        gallery = gallery.child(lazy_image(src, &project.title)?);
    }
    let mut tags = el("ul")?.class("tags");
    for tag in &project.tags {
        tags = tags.child(el("li")?.text(tag));
    }
    let mut root = el("article")?
        .class("page page-project")
        .child(back_link("/portfolio", "Back to portfolio")?)
        .child(page_header(&project.title, "")?)
        .child(meta);
    if !project.cover_image.is_empty() {
        root = root.child(lazy_image(&project.cover_image, &project.title)?.class("lazy-image cover"));
    }
    let root = root
        .child(
            el("p")?
                .class("project-description")
                .attr("data-reveal", "")
                .text(&project.description),
        )
        .child(gallery)
        .child(tags);
    outlet.append_child(root.element())?;
    Ok(Disposer::new())
}
