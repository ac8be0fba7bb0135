use content::Project;
use gloo_events::EventListener;
use runtime::Disposer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use super::form::{
    checkbox, checked, field, image_input, on_submit, optional, split_lines, split_list, submit,
    text_area, text_input, value, wire_uploads,
};
use crate::App;
use crate::dom::{self, el, find_all, link};
use crate::router::navigate;

const LIST_PATH: &str = "/admin/projects";

pub fn render_list(app: &App, body: &Element) -> Result<Disposer, JsValue> {
    let mut rows = el("tbody")?;
    for project in app.content.projects() {
        rows = rows.child(
            el("tr")?
                .child(el("td")?.text(&project.title))
                .child(el("td")?.text(&project.category))
                .child(el("td")?.text(if project.featured { "★" } else { "" }))
                .child(
                    el("td")?
                        .child(link(&format!("{LIST_PATH}/{}", project.id), "Edit")?)
                        .child(
                            el("button")?
                                .attr("type", "button")
                                .attr("data-delete", &project.id)
                                .attr("data-title", &project.title)
                                .text("Delete"),
                        ),
                ),
        );
    }
    let view = el("section")?
        .child(el("h1")?.text("Projects"))
        .child(link(&format!("{LIST_PATH}/new"), "New project")?.class("button"))
        .child(
            el("table")?
                .class("admin-table")
                .child(el("thead")?.html(
                    "<tr><th>Title</th><th>Category</th><th>Featured</th><th></th></tr>",
                ))
                .child(rows),
        )
        .into_element();
    body.append_child(&view)?;

    let mut page = Disposer::new();
    for button in find_all(&view, "[data-delete]") {
        let id = button.get_attribute("data-delete").unwrap_or_default();
        let title = button.get_attribute("data-title").unwrap_or_default();
        let app = app.clone();
        let row = button.closest("tr").ok().flatten();
        page.hold(EventListener::new(&button, "click", move |_| {
            let confirmed = dom::window()
                .and_then(|w| w.confirm_with_message(&format!("Delete \"{title}\"?")))
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let app = app.clone();
            let id = id.clone();
            let row = row.clone();
            spawn_local(async move {
                match app.content.delete_project(&id).await {
                    Ok(()) => {
                        if let Some(row) = row {
                            row.remove();
                        }
                        app.toaster.success("Project deleted");
                    }
                    Err(err) => app.toaster.failure("Delete failed", err),
                }
            });
        }));
    }
    Ok(page)
}

fn read(scope: &Element, base: Project) -> Project {
    Project {
        title: value(scope, "title").trim().to_string(),
        category: value(scope, "category").trim().to_string(),
        description: value(scope, "description"),
        cover_image: value(scope, "cover_image").trim().to_string(),
        gallery: split_lines(&value(scope, "gallery")),
        year: optional(scope, "year"),
        client: optional(scope, "client"),
        tags: split_list(&value(scope, "tags")),
        featured: checked(scope, "featured"),
        ..base
    }
}

pub fn render_edit(app: &App, id: Option<&str>, body: &Element) -> Result<Disposer, JsValue> {
    let existing = match id {
        Some(id) => match app.content.project(id) {
            Some(project) => Some(project),
            None => {
                let missing = el("p")?.text(if app.content_pending() {
                    "Loading…"
                } else {
                    "Project not found."
                });
                body.append_child(missing.element())?;
                return Ok(Disposer::new());
            }
        },
        None => None,
    };
    let is_new = existing.is_none();
    let project = existing.unwrap_or_default();

    let form = el("form")?
        .class("admin-form")
        .child(el("h1")?.text(if is_new { "New project" } else { "Edit project" }))
        .child(field("Title", text_input("title", &project.title)?.attr("required", ""))?)
        .child(field("Category", text_input("category", &project.category)?)?)
        .child(field("Description", text_area("description", &project.description, 6)?)?)
        .child(field("Cover image", image_input("cover_image", &project.cover_image)?)?)
        .child(field(
            "Gallery (one URL per line)",
            text_area("gallery", &project.gallery.join("\n"), 4)?,
        )?)
        .child(field("Year", text_input("year", project.year.as_deref().unwrap_or(""))?)?)
        .child(field(
            "Client",
            text_input("client", project.client.as_deref().unwrap_or(""))?,
        )?)
        .child(field("Tags (comma separated)", text_input("tags", &project.tags.join(", "))?)?)
        .child(field("Featured", checkbox("featured", project.featured)?)?)
        .child(submit(if is_new { "Create" } else { "Save" })?)
        .into_element();
    body.append_child(&form)?;

    let mut page = Disposer::new();
    wire_uploads(app, &mut page, &form, "projects");
    let app = app.clone();
    let scope = form.clone();
    on_submit(&mut page, &form, move || {
        let app = app.clone();
        let edited = read(&scope, project.clone());
        async move {
            let saved = if is_new {
                app.content.add_project(edited).await
            } else {
                app.content.update_project(edited).await
            };
            match saved {
                Ok(_) => {
                    app.toaster.success("Project saved");
                    navigate(LIST_PATH);
                }
                Err(err) => app.toaster.failure("Save failed", err),
            }
        }
    });
    Ok(page)
}
