use content::published_posts;
use runtime::Disposer;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::{back_link, live_view_counts, loading, page_header, post_card, views_label};
use crate::App;
use crate::dom::{el, lazy_image};

pub fn render_list(app: &App, outlet: &Element) -> Result<Disposer, JsValue> {
    let posts = app.content.posts();
    let published = published_posts(&posts);
    let mut list = el("div")?.class("post-grid");
    if published.is_empty() {
        list = list.child(if app.content_pending() {
            loading()?
        } else {
            el("p")?.text("Nothing published yet.")
        });
    }
    for post in published {
        list = list.child(post_card(post)?);
    }
    let root = el("div")?
        .class("page page-blog")
        .child(page_header("Journal", "Notes on process, type and colour.")?)
        .child(list)
        .into_element();
    outlet.append_child(&root)?;
    let mut page = Disposer::new();
    live_view_counts(app, &root, &mut page);
    Ok(page)
}

pub fn render_detail(app: &App, id: &str, outlet: &Element) -> Result<Disposer, JsValue> {
    let visible = app
        .content
        .post(id)
        .filter(|p| p.published || app.content.is_authenticated());
    let Some(post) = visible else {
        let body = if app.content_pending() {
            loading()?
        } else {
            el("p")?.text("This post could not be found.")
        };
        let root = el("div")?
            .class("page page-post")
            .child(body)
            .child(back_link("/blog", "Back to the journal")?);
        outlet.append_child(root.element())?;
        return Ok(Disposer::new());
    };

    let mut byline = el("p")?.class("byline");
    if !post.author.is_empty() {
        byline = byline.child(el("span")?.class("author").text(&post.author));
    }
    byline = byline.child(el("span")?.class("views").text(&views_label(post.views)));
    let mut root = el("article")?
        .class("page page-post")
        .attr("data-post", &post.id)
        .child(back_link("/blog", "Back to the journal")?)
        .child(page_header(&post.title, &post.excerpt)?)
        .child(byline);
    if !post.cover_image.is_empty() {
        root = root.child(lazy_image(&post.cover_image, &post.title)?.class("lazy-image cover"));
    }
    let mut tags = el("ul")?.class("tags");
    for tag in &post.tags {
        tags = tags.child(el("li")?.text(tag));
    }
    let root = root
        .child(el("div")?.class("post-content").html(&post.content))
        .child(tags)
        .into_element();
    outlet.append_child(&root)?;
    let mut page = Disposer::new();
    live_view_counts(app, outlet, &mut page);
    Ok(page)
}
