//! Page builders. Each renders into the router outlet and returns the
//! disposer for whatever controllers and listeners it attached.

mod admin;
mod blog;
mod home;
mod info;
mod portfolio;

use std::rc::Rc;

use content::{BlogPost, Project};
use runtime::Disposer;
use site::Route;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::App;
use crate::controllers::lazy;
use crate::dom::{El, el, find, find_all, lazy_image, link};

pub fn render(app: &App, route: &Route, outlet: &Element) -> Result<Disposer, JsValue> {
    let mut page = match route {
        Route::Home => home::render(app, outlet)?,
        Route::Portfolio => portfolio::render_list(app, outlet)?,
        Route::Project(id) => portfolio::render_detail(app, id, outlet)?,
        Route::Blog => blog::render_list(app, outlet)?,
        Route::Post(id) => blog::render_detail(app, id, outlet)?,
        Route::About => info::render_about(app, outlet)?,
        Route::Services => info::render_services(app, outlet)?,
        Route::Contact => info::render_contact(app, outlet)?,
        Route::NotFound => info::render_not_found(outlet)?,
        admin_route => admin::render(app, admin_route, outlet)?,
    };
    if let Some(reveals) = lazy::attach(outlet) {
        page.adopt(reveals);
    }
    Ok(page)
}

pub(crate) fn page_header(title: &str, lead: &str) -> Result<El, JsValue> {
    let header = el("header")?
        .class("page-header")
        .attr("data-reveal", "")
        .child(el("h1")?.text(title));
    if lead.is_empty() {
        return Ok(header);
    }
    Ok(header.child(el("p")?.class("lead").text(lead)))
}

pub(crate) fn loading() -> Result<El, JsValue> {
    Ok(el("p")?.class("loading").text("Loading…"))
}

pub(crate) fn project_card(project: &Project) -> Result<El, JsValue> {
    let mut card = el("a")?
        .class("project-card")
        .link(&format!("/portfolio/{}", project.id))
        .attr("data-category", &project.category)
        .attr("data-reveal", "");
    if !project.cover_image.is_empty() {
        card = card.child(lazy_image(&project.cover_image, &project.title)?);
    }
    Ok(card
        .child(el("span")?.class("project-category").text(&project.category))
        .child(el("h3")?.text(&project.title)))
}

pub(crate) fn post_card(post: &BlogPost) -> Result<El, JsValue> {
    let mut card = el("a")?
        .class("post-card")
        .link(&format!("/blog/{}", post.id))
        .attr("data-post", &post.id)
        .attr("data-reveal", "");
    if !post.cover_image.is_empty() {
        card = card.child(lazy_image(&post.cover_image, &post.title)?);
    }
    Ok(card
        .child(el("h3")?.text(&post.title))
        .child(el("p")?.class("excerpt").text(&post.excerpt))
        .child(el("span")?.class("views").text(&views_label(post.views))))
}

/// Keep every `[data-post] .views` label under `root` in step with the view counter.
pub(crate) fn live_view_counts(app: &App, root: &Element, page: &mut Disposer) {
    let content = Rc::downgrade(&app.content);
    let root = root.clone();
    page.hold(app.content.subscribe(move || {
        let Some(content) = content.upgrade() else {
            return;
        };
        for card in find_all(&root, "[data-post]") {
            let id = card.get_attribute("data-post").unwrap_or_default();
            if let (Some(post), Some(label)) = (content.post(&id), find(&card, ".views")) {
                label.set_text_content(Some(&views_label(post.views)));
            }
        }
    }));
}

pub(crate) fn views_label(views: u64) -> String {
    match views {
        1 => "1 view".to_string(),
        n => format!("{n} views"),
    }
}

pub(crate) fn back_link(href: &str, label: &str) -> Result<El, JsValue> {
    Ok(link(href, label)?.class("back-link"))
}

#[cfg(test)]
mod tests {
    use super::views_label;

    #[test]
    fn view_labels_pluralise() {
        assert_eq!(views_label(0), "0 views");
        assert_eq!(views_label(1), "1 view");
        assert_eq!(views_label(42), "42 views");
    }
}
