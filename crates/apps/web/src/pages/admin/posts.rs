use content::BlogPost;
use gloo_events::EventListener;
use runtime::Disposer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use super::form::{
    checkbox, checked, field, image_input, on_submit, split_list, submit, text_area, text_input,
    value, wire_uploads,
};
use crate::App;
use crate::dom::{self, el, find_all, link};
use crate::pages::views_label;
use crate::router::navigate;

const LIST_PATH: &str = "/admin/posts";

pub fn render_list(app: &App, body: &Element) -> Result<Disposer, JsValue> {
    let mut rows = el("tbody")?;
    for post in app.content.posts() {
        let status = if post.published { "Published" } else { "Draft" };
        rows = rows.child(
            el("tr")?
                .child(el("td")?.text(&post.title))
                .child(el("td")?.text(status))
                .child(el("td")?.text(&views_label(post.views)))
                .child(
                    el("td")?
                        .child(link(&format!("{LIST_PATH}/{}", post.id), "Edit")?)
                        .child(
                            el("button")?
                                .attr("type", "button")
                                .attr("data-delete", &post.id)
                                .attr("data-title", &post.title)
                                .text("Delete"),
                        ),
                ),
        );
    }
    let view = el("section")?
        .child(el("h1")?.text("Posts"))
        .child(link(&format!("{LIST_PATH}/new"), "New post")?.class("button"))
        .child(
            el("table")?
                .class("admin-table")
                .child(
                    el("thead")?
                        .html("<tr><th>Title</th><th>Status</th><th>Views</th><th></th></tr>"),
                )
                .child(rows),
        )
        .into_element();
    body.append_child(&view)?;

    let mut page = Disposer::new();
    for button in find_all(&view, "[data-delete]") {
        let id = button.get_attribute("data-delete").unwrap_or_default();
        let title = button.get_attribute("data-title").unwrap_or_default();
        let row = button.closest("tr").ok().flatten();
        let app = app.clone();
        page.hold(EventListener::new(&button, "click", move |_| {
            let confirmed = dom::window()
                .and_then(|w| w.confirm_with_message(&format!("Delete \"{title}\"?")))
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let (app, id, row) = (app.clone(), id.clone(), row.clone());
            spawn_local(async move {
                match app.content.delete_post(&id).await {
                    Ok(()) => {
                        if let Some(row) = row {
                            row.remove();
                        }
                        app.toaster.success("Post deleted");
                    }
                    Err(err) => app.toaster.failure("Delete failed", err),
                }
            });
        }));
    }
    Ok(page)
}

fn read(scope: &Element, base: BlogPost) -> BlogPost {
    BlogPost {
        title: value(scope, "title").trim().to_string(),
        excerpt: value(scope, "excerpt").trim().to_string(),
        content: value(scope, "content"),
        cover_image: value(scope, "cover_image").trim().to_string(),
        author: value(scope, "author").trim().to_string(),
        tags: split_list(&value(scope, "tags")),
        published: checked(scope, "published"),
        ..base
    }
}

pub fn render_edit(app: &App, id: Option<&str>, body: &Element) -> Result<Disposer, JsValue> {
    let existing = match id {
        Some(id) => match app.content.post(id) {
            Some(post) => Some(post),
            None => {
                let missing = el("p")?.text(if app.content_pending() {
                    "Loading…"
                } else {
                    "Post not found."
                });
                body.append_child(missing.element())?;
                return Ok(Disposer::new());
            }
        },
        None => None,
    };
    let is_new = existing.is_none();
    let post = existing.unwrap_or_default();

    let form = el("form")?
        .class("admin-form")
        .child(el("h1")?.text(if is_new { "New post" } else { "Edit post" }))
        .child(field("Title", text_input("title", &post.title)?.attr("required", ""))?)
        .child(field("Excerpt", text_area("excerpt", &post.excerpt, 3)?)?)
        .child(field("Content (HTML)", text_area("content", &post.content, 16)?)?)
        .child(field("Cover image", image_input("cover_image", &post.cover_image)?)?)
        .child(field("Author", text_input("author", &post.author)?)?)
        .child(field("Tags (comma separated)", text_input("tags", &post.tags.join(", "))?)?)
        .child(field("Published", checkbox("published", post.published)?)?)
        .child(submit(if is_new { "Create" } else { "Save" })?)
        .into_element();
    body.append_child(&form)?;

    let mut page = Disposer::new();
    wire_uploads(app, &mut page, &form, "posts");
    let app = app.clone();
    let scope = form.clone();
    on_submit(&mut page, &form, move || {
        let app = app.clone();
        // Start from the live row so view counts bumped meanwhile survive the save.
        let base = app
            .content
            .post(&post.id)
            .unwrap_or_else(|| post.clone());
        let edited = read(&scope, base);
        async move {
            let saved = if is_new {
                app.content.add_post(edited).await
            } else {
                app.content.update_post(edited).await
            };
            match saved {
                Ok(_) => {
                    app.toaster.success("Post saved");
                    navigate(LIST_PATH);
                }
                Err(err) => app.toaster.failure("Save failed", err),
            }
        }
    });
    Ok(page)
}
