//! About, services, contact and the not-found page.

use runtime::Disposer;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::page_header;
use crate::App;
use crate::dom::{El, el, lazy_image, link};

fn service_list(app: &App) -> Result<El, JsValue> {
    let mut list = el("div")?.class("service-list");
    for item in app.content.settings().services {
        let mut entry = el("div")?.class("service-entry").attr("data-reveal", "");
        if !item.image.is_empty() {
            entry = entry.child(lazy_image(&item.image, &item.title)?);
        }
        list = list.child(
            entry
                .child(el("h3")?.text(&item.title))
                .child(el("p")?.text(&item.description)),
        );
    }
    Ok(list)
}

pub fn render_about(app: &App, outlet: &Element) -> Result<Disposer, JsValue> {
    let about = app.content.settings().about;
    let mut root = el("div")?
        .class("page page-about")
        .child(page_header("About", "")?);
    if !about.portrait.is_empty() {
        root = root.child(lazy_image(&about.portrait, "Portrait")?.class("lazy-image portrait"));
    }
    let root = root
        .child(el("p")?.class("about-copy").attr("data-reveal", "").text(&about.text))
        .child(el("h2")?.text("What I do"))
        .child(service_list(app)?);
    outlet.append_child(root.element())?;
    Ok(Disposer::new())
}

pub fn render_services(app: &App, outlet: &Element) -> Result<Disposer, JsValue> {
    let root = el("div")?
        .class("page page-services")
        .child(page_header("Services", "From first sketch to final files.")?)
        .child(service_list(app)?)
        .child(link("/contact", "Start a project")?.class("cta"));
    outlet.append_child(root.element())?;
    Ok(Disposer::new())
}

fn social_links(app: &App) -> Result<El, JsValue> {
    let social = app.content.settings().social;
    let mut list = el("ul")?.class("social-links");
    let entries = [
        ("Instagram", social.instagram),
        ("Behance", social.behance),
        ("Dribbble", social.dribbble),
        ("LinkedIn", social.linkedin),
    ];
    for (label, href) in entries {
        if href.is_empty() {
            continue;
        }
        list = list.child(
            el("li")?.child(
                el("a")?
                    .attr("href", &href)
                    .attr("target", "_blank")
                    .attr("rel", "noopener")
                    .text(label),
            ),
        );
    }
    Ok(list)
}

pub fn render_contact(app: &App, outlet: &Element) -> Result<Disposer, JsValue> {
    let contact = app.content.settings().contact;
    let mut details = el("dl")?.class("contact-details");
    if !contact.email.is_empty() {
        details = details.child(el("dt")?.text("Email")).child(
            el("dd")?.child(
                el("a")?
                    .attr("href", &format!("mailto:{}", contact.email))
                    .text(&contact.email),
            ),
        );
    }
    for (label, value) in [("Phone", &contact.phone), ("Location", &contact.location)] {
        if !value.is_empty() {
            details = details
                .child(el("dt")?.text(label))
                .child(el("dd")?.text(value));
        }
    }
    let root = el("div")?
        .class("page page-contact")
        .child(page_header("Contact", "Tell me about your project.")?)
        .child(details)
        .child(social_links(app)?);
    outlet.append_child(root.element())?;
    Ok(Disposer::new())
}

pub fn render_not_found(outlet: &Element) -> Result<Disposer, JsValue> {
    let root = el("div")?
        .class("page page-not-found")
        .child(el("h1")?.text("Page not found"))
        .child(link("/", "Back home")?);
    outlet.append_child(root.element())?;
    Ok(Disposer::new())
}
