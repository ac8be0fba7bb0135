//! Password-gated content editor.

mod form;
mod posts;
mod projects;
mod settings;

use content::published_posts;
use gloo_events::EventListener;
use runtime::Disposer;
use site::{ADMIN_HOME_PATH, Route};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use self::form::{field, on_submit, password_input, submit, value};
use crate::App;
use crate::dom::{El, el, find, link};
use crate::router::navigate;

pub fn render(app: &App, route: &Route, outlet: &Element) -> Result<Disposer, JsValue> {
    if *route == Route::AdminLogin {
        return login(app, outlet);
    }
    let body = el("div")?.class("admin-body").into_element();
    let shell = shell(route)?;
    shell.element().append_child(&body)?;
    outlet.append_child(shell.element())?;

    let mut page = Disposer::new();
    if let Some(button) = find(shell.element(), ".logout") {
        let app = app.clone();
        page.hold(EventListener::new(&button, "click", move |_| {
            // The router sends the page to the login form once the session flag clears.
            let app = app.clone();
            spawn_local(async move { app.content.logout().await });
        }));
    }
    let view = match route {
        Route::AdminProjects => projects::render_list(app, &body)?,
        Route::AdminProjectEdit(id) => projects::render_edit(app, id.as_deref(), &body)?,
        Route::AdminPosts => posts::render_list(app, &body)?,
        Route::AdminPostEdit(id) => posts::render_edit(app, id.as_deref(), &body)?,
        Route::AdminSettings => settings::render(app, &body)?,
        _ => dashboard(app, &body)?,
    };
    page.adopt(view);
    Ok(page)
}

fn shell(route: &Route) -> Result<El, JsValue> {
    let mut nav = el("nav")?.class("admin-nav");
    let entries = [
        (ADMIN_HOME_PATH, "Dashboard", Route::AdminDashboard),
        ("/admin/projects", "Projects", Route::AdminProjects),
        ("/admin/posts", "Posts", Route::AdminPosts),
        ("/admin/settings", "Settings", Route::AdminSettings),
    ];
    for (href, label, target) in entries {
        let active = match (route, &target) {
            (Route::AdminProjectEdit(_), Route::AdminProjects)
            | (Route::AdminPostEdit(_), Route::AdminPosts) => true,
            _ => *route == target,
        };
        let item = link(href, label)?;
        nav = nav.child(if active { item.class("is-active") } else { item });
    }
    nav = nav
        .child(link("/", "View site")?)
        .child(el("button")?.attr("type", "button").class("logout").text("Sign out"));
    Ok(el("div")?.class("page page-admin").child(nav))
}

fn login(app: &App, outlet: &Element) -> Result<Disposer, JsValue> {
    let form = el("form")?
        .class("admin-login")
        .child(el("h1")?.text("Admin"))
        .child(field("Password", password_input("password")?)?)
        .child(submit("Sign in")?)
        .into_element();
    outlet.append_child(&form)?;

    let mut page = Disposer::new();
    let app = app.clone();
    let scope = form.clone();
    on_submit(&mut page, &form, move || {
        let app = app.clone();
        let password = value(&scope, "password");
        async move {
            match app.content.login(&password).await {
                Ok(true) => navigate(ADMIN_HOME_PATH),
                Ok(false) => crate::dom::alert("Wrong password"),
                Err(err) => app.toaster.failure("Sign-in failed", err),
            }
        }
    });
    Ok(page)
}

fn dashboard(app: &App, body: &Element) -> Result<Disposer, JsValue> {
    let projects = app.content.projects();
    let posts = app.content.posts();
    let views: u64 = posts.iter().map(|p| p.views).sum();
    let stats = [
        ("Projects", projects.len().to_string()),
        ("Posts", posts.len().to_string()),
        ("Published", published_posts(&posts).len().to_string()),
        ("Total views", views.to_string()),
    ];
    let mut grid = el("div")?.class("stats");
    for (label, count) in stats {
        grid = grid.child(
            el("div")?
                .class("stat")
                .child(el("strong")?.text(&count))
                .child(el("span")?.text(label)),
        );
    }
    let view = el("section")?
        .child(el("h1")?.text("Dashboard"))
        .child(grid)
        .child(link("/admin/projects/new", "New project")?.class("button"))
        .child(link("/admin/posts/new", "New post")?.class("button"));
    body.append_child(view.element())?;
    Ok(Disposer::new())
}
