use content::{Project, published_posts};
use motion::tripled;
use runtime::Disposer;
use site::home_section_ids;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::{live_view_counts, loading, post_card};
use crate::App;
use crate::controllers::{about_text, marquee, scroll_spy, services, typewriter, work_rail};
use crate::dom::{El, el, find, image, link};

const BLOG_TEASER_POSTS: usize = 3;

fn hero(app: &App) -> Result<El, JsValue> {
    let hero = app.content.settings().hero;
    Ok(el("section")?
        .id("home")
        .class("hero")
        .child(el("h1")?.text(&hero.headline))
        .child(el("p")?.class("hero-subheadline").text(&hero.subheadline))
        .child(
            el("p")?
                .class("hero-role")
                .child(el("span")?.class("typewriter"))
                .child(el("span")?.class("caret").text("|")),
        ))
}

fn about(app: &App) -> Result<El, JsValue> {
    let about = app.content.settings().about;
    Ok(el("section")?.id("about").class("about-pin").child(
        el("div")?
            .class("about-sticky")
            .child(el("p")?.class("about-text").text(&about.text)),
    ))
}

fn rail_item(project: &Project) -> Result<El, JsValue> {
    Ok(el("a")?
        .class("rail-item")
        .link(&format!("/portfolio/{}", project.id))
        .child(image(&project.cover_image, &project.title)?)
        .child(el("span")?.class("project-category").text(&project.category))
        .child(el("h3")?.text(&project.title)))
}

fn work(app: &App) -> Result<El, JsValue> {
    let projects = app.content.projects();
    let mut track = el("div")?.class("rail-track");
    if projects.is_empty() && app.content_pending() {
        track = track.child(loading()?);
    }
    for project in &projects {
        track = track.child(rail_item(project)?);
    }
    Ok(el("section")?.id("work").class("work-rail").child(
        el("div")?
            .class("rail-sticky")
            .child(el("h2")?.text("Selected work"))
            .child(track)
            .child(link("/portfolio", "All projects")?.class("rail-more")),
    ))
}

fn services_section(app: &App) -> Result<El, JsValue> {
    let items = app.content.settings().services;
    let mut images = el("div")?.class("services-images");
    let mut stack = el("div")?.class("services-stack");
    for item in &items {
        images = images.child(image(&item.image, &item.title)?.class("service-image"));
        stack = stack.child(
            el("div")?
                .class("service-item")
                .child(el("h3")?.text(&item.title))
                .child(el("p")?.text(&item.description)),
        );
    }
    Ok(el("section")?.id("services").class("services-pin").child(
        el("div")?
            .class("services-sticky")
            .child(images)
            .child(el("div")?.class("services-window").child(stack)),
    ))
}

fn blog_teaser(app: &App) -> Result<El, JsValue> {
    let posts = app.content.posts();
    let mut list = el("div")?.class("post-grid");
    for post in published_posts(&posts).into_iter().take(BLOG_TEASER_POSTS) {
        list = list.child(post_card(post)?);
    }
    Ok(el("section")?
        .id("blog")
        .class("blog-teaser")
        .child(
            el("h2")?
                .attr("data-reveal", "")
                .attr("data-reveal-threshold", "0.6")
                .text("Journal"),
        )
        .child(list)
        .child(link("/blog", "Read the journal")?))
}

fn gallery(app: &App) -> Result<El, JsValue> {
    let covers: Vec<(String, String)> = app
        .content
        .projects()
        .into_iter()
        .filter(|p| !p.cover_image.is_empty())
        .map(|p| (p.cover_image, p.title))
        .collect();
    let mut track = el("div")?.class("marquee-track");
    for (src, alt) in tripled(&covers) {
        track = track.child(el("div")?.class("marquee-item").child(image(&src, &alt)?));
    }
    Ok(el("div")?
        .class("marquee")
        .attr("tabindex", "0")
        .child(track))
}

fn contact(app: &App) -> Result<El, JsValue> {
    let settings = app.content.settings();
    let contact = settings.contact;
    let mut section = el("section")?
        .id("contact")
        .class("contact")
        .child(el("h2")?.attr("data-reveal", "").text("Let's work together"));
    if !contact.email.is_empty() {
        section = section.child(
            el("a")?
                .class("contact-email")
                .attr("href", &format!("mailto:{}", contact.email))
                .text(&contact.email),
        );
    }
    Ok(section
        .child(el("p")?.text(&contact.phone))
        .child(el("p")?.text(&contact.location)))
}

pub fn render(app: &App, outlet: &Element) -> Result<Disposer, JsValue> {
    let root = el("div")?
        .class("page page-home")
        .child(hero(app)?)
        .child(about(app)?)
        .child(work(app)?)
        .child(services_section(app)?)
        .child(blog_teaser(app)?)
        .child(gallery(app)?)
        .child(contact(app)?)
        .into_element();
    outlet.append_child(&root)?;

    let mut page = Disposer::new();
    live_view_counts(app, &root, &mut page);
    if let Some(target) = find(&root, ".typewriter") {
        let roles = app.content.settings().hero.roles;
        if let Some(cycle) = typewriter::attach(&target, roles) {
            page.adopt(cycle);
        }
    }
    let attached = [
        about_text::attach(&root),
        work_rail::attach(&root),
        services::attach(&root),
        marquee::attach(&root),
    ];
    for controller in attached.into_iter().flatten() {
        page.adopt(controller);
    }
    if let Some(nav) = crate::spy_nav() {
        if let Some(spy) = scroll_spy::attach(&root, &nav, home_section_ids()) {
            page.adopt(spy);
        }
    }
    Ok(page)
}
