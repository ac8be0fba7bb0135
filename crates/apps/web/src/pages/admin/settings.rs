use std::cell::{Cell, RefCell};
use std::rc::Rc;

use content::{
    AboutSettings, ContactSettings, HeroSettings, ServiceItem, SiteSettings, SocialLinks,
};
use gloo_events::EventListener;
use runtime::Disposer;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::form::{
    field, image_input, on_submit, split_lines, submit, text_area, text_input, value, wire_uploads,
};
use crate::App;
use crate::dom::{El, el, find, find_all};

fn service_group(index: usize, item: &ServiceItem) -> Result<El, JsValue> {
    Ok(el("fieldset")?
        .class("service-group")
        .attr("data-service", &index.to_string())
        .child(el("legend")?.text(&format!("Service {}", index + 1)))
        .child(field("Title", text_input(&format!("service_title_{index}"), &item.title)?)?)
        .child(field(
            "Description",
            text_area(&format!("service_description_{index}"), &item.description, 3)?,
        )?)
        .child(field(
            "Image",
            image_input(&format!("service_image_{index}"), &item.image)?,
        )?)
        .child(
            el("button")?
                .attr("type", "button")
                .class("remove-service")
                .text("Remove"),
        ))
}

fn read(scope: &Element) -> SiteSettings {
    let services = find_all(scope, "[data-service]")
        .iter()
        .filter_map(|group| group.get_attribute("data-service"))
        .map(|i| ServiceItem {
            title: value(scope, &format!("service_title_{i}")).trim().to_string(),
            description: value(scope, &format!("service_description_{i}")),
            image: value(scope, &format!("service_image_{i}")).trim().to_string(),
        })
        .filter(|s| !s.title.is_empty())
        .collect();
    SiteSettings {
        hero: HeroSettings {
            headline: value(scope, "hero_headline"),
            subheadline: value(scope, "hero_subheadline"),
            roles: split_lines(&value(scope, "hero_roles")),
        },
        about: AboutSettings {
            text: value(scope, "about_text"),
            portrait: value(scope, "about_image").trim().to_string(),
        },
        contact: ContactSettings {
            email: value(scope, "contact_email").trim().to_string(),
            phone: value(scope, "contact_phone").trim().to_string(),
            location: value(scope, "contact_location").trim().to_string(),
        },
        social: SocialLinks {
            instagram: value(scope, "social_instagram").trim().to_string(),
            behance: value(scope, "social_behance").trim().to_string(),
            dribbble: value(scope, "social_dribbble").trim().to_string(),
            linkedin: value(scope, "social_linkedin").trim().to_string(),
        },
        services,
    }
}

fn wire_remove(page: &mut Disposer, group: &Element) {
    let Some(button) = find(group, ".remove-service") else {
        return;
    };
    let group = group.clone();
    page.hold(EventListener::new(&button, "click", move |_| group.remove()));
}

pub fn render(app: &App, body: &Element) -> Result<Disposer, JsValue> {
    let s = app.content.settings();
    let mut services = el("div")?.class("service-groups");
    for (i, item) in s.services.iter().enumerate() {
        services = services.child(service_group(i, item)?);
    }
    let form = el("form")?
        .class("admin-form")
        .child(el("h1")?.text("Site settings"))
        .child(el("h2")?.text("Hero"))
        .child(field("Headline", text_input("hero_headline", &s.hero.headline)?)?)
        .child(field("Subheadline", text_input("hero_subheadline", &s.hero.subheadline)?)?)
        .child(field(
            "Roles (one per line)",
            text_area("hero_roles", &s.hero.roles.join("\n"), 4)?,
        )?)
        .child(el("h2")?.text("About"))
        .child(field("Text", text_area("about_text", &s.about.text, 6)?)?)
        .child(field("Portrait", image_input("about_image", &s.about.portrait)?)?)
        .child(el("h2")?.text("Contact"))
        .child(field("Email", text_input("contact_email", &s.contact.email)?)?)
        .child(field("Phone", text_input("contact_phone", &s.contact.phone)?)?)
        .child(field("Location", text_input("contact_location", &s.contact.location)?)?)
        .child(el("h2")?.text("Social"))
        .child(field("Instagram", text_input("social_instagram", &s.social.instagram)?)?)
        .child(field("Behance", text_input("social_behance", &s.social.behance)?)?)
        .child(field("Dribbble", text_input("social_dribbble", &s.social.dribbble)?)?)
        .child(field("LinkedIn", text_input("social_linkedin", &s.social.linkedin)?)?)
        .child(el("h2")?.text("Services"))
        .child(services)
        .child(
            el("button")?
                .attr("type", "button")
                .class("add-service")
                .text("Add service"),
        )
        .child(submit("Save settings")?)
        .into_element();
    body.append_child(&form)?;

    let mut page = Disposer::new();
    wire_uploads(app, &mut page, &form, "settings");
    for group in find_all(&form, "[data-service]") {
        wire_remove(&mut page, &group);
    }

    // New groups get fresh indices; gaps left by removals are harmless.
    if let (Some(add), Some(groups)) = (find(&form, ".add-service"), find(&form, ".service-groups"))
    {
        let app = app.clone();
        let next = Cell::new(s.services.len());
        let added = Rc::new(RefCell::new(Disposer::new()));
        let held = Rc::clone(&added);
        page.hold(EventListener::new(&add, "click", move |_| {
            let index = next.get();
            next.set(index + 1);
            let Ok(group) = service_group(index, &ServiceItem::default()) else {
                return;
            };
            let group = group.into_element();
            if groups.append_child(&group).is_err() {
                return;
            }
            let mut added = held.borrow_mut();
            wire_remove(&mut added, &group);
            wire_uploads(&app, &mut added, &group, "settings");
        }));
        page.on_dispose(move || added.borrow_mut().dispose());
    }

    let app = app.clone();
    let scope = form.clone();
    on_submit(&mut page, &form, move || {
        let app = app.clone();
        let edited = read(&scope);
        async move {
            match app.content.save_settings(edited).await {
                Ok(_) => app.toaster.success("Settings saved"),
                Err(err) => app.toaster.failure("Save failed", err),
            }
        }
    });
    Ok(page)
}
