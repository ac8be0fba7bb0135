//! Form building and reading for the admin editors.

use std::future::Future;

use gloo_events::{EventListener, EventListenerOptions};
use runtime::Disposer;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

use crate::App;
use crate::dom::{El, el, find_all};

pub fn field(label: &str, input: El) -> Result<El, JsValue> {
    Ok(el("label")?
        .class("field")
        .child(el("span")?.text(label))
        .child(input))
}

pub fn text_input(name: &str, value: &str) -> Result<El, JsValue> {
    Ok(el("input")?
        .attr("type", "text")
        .attr("name", name)
        .attr("value", value))
}

pub fn password_input(name: &str) -> Result<El, JsValue> {
    Ok(el("input")?
        .attr("type", "password")
        .attr("name", name)
        .attr("autocomplete", "current-password"))
}

pub fn text_area(name: &str, value: &str, rows: u32) -> Result<El, JsValue> {
    Ok(el("textarea")?
        .attr("name", name)
        .attr("rows", &rows.to_string())
        .text(value))
}

pub fn checkbox(name: &str, checked: bool) -> Result<El, JsValue> {
    let input = el("input")?.attr("type", "checkbox").attr("name", name);
    Ok(if checked { input.attr("checked", "") } else { input })
}

/// URL text field plus a file picker that uploads into it.
pub fn image_input(name: &str, value: &str) -> Result<El, JsValue> {
    Ok(el("div")?
        .class("image-input")
        .child(text_input(name, value)?)
        .child(
            el("input")?
                .attr("type", "file")
                .attr("accept", "image/*")
                .attr("data-upload-for", name),
        ))
}

pub fn submit(label: &str) -> Result<El, JsValue> {
    Ok(el("button")?.attr("type", "submit").class("button").text(label))
}

/// Current value of the named input or textarea under `scope`.
pub fn value(scope: &Element, name: &str) -> String {
    let Ok(Some(found)) = scope.query_selector(&format!("[name=\"{name}\"]")) else {
        return String::new();
    };
    if let Some(input) = found.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(area) = found.dyn_ref::<HtmlTextAreaElement>() {
        return area.value();
    }
    String::new()
}

pub fn checked(scope: &Element, name: &str) -> bool {
    scope
        .query_selector(&format!("[name=\"{name}\"]"))
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        .is_some_and(|i| i.checked())
}

pub fn optional(scope: &Element, name: &str) -> Option<String> {
    Some(value(scope, name).trim().to_string()).filter(|v| !v.is_empty())
}

/// Comma separated list; blanks dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// One entry per non-blank line.
pub fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run `on_submit` for every submit of `form`, suppressing the native post.
pub fn on_submit<F, Fut>(page: &mut Disposer, form: &Element, on_submit: F)
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    page.hold(EventListener::new_with_options(
        form,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            spawn_local(on_submit());
        },
    ));
}

async fn read_file(input: &HtmlInputElement) -> Result<Option<(Vec<u8>, String)>, JsValue> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Some((bytes, file.type_())))
}

/// Wire every `[data-upload-for]` picker under `scope` to upload its file and
/// write the resulting URL into the paired text field.
pub fn wire_uploads(app: &App, page: &mut Disposer, scope: &Element, prefix: &'static str) {
    for picker in find_all(scope, "input[data-upload-for]") {
        let Ok(picker) = picker.dyn_into::<HtmlInputElement>() else {
            continue;
        };
        let target = picker.get_attribute("data-upload-for").unwrap_or_default();
        let scope = scope.clone();
        let app = app.clone();
        let input = picker.clone();
        page.hold(EventListener::new(&picker, "change", move |_| {
            let app = app.clone();
            let input = input.clone();
            let scope = scope.clone();
            let target = target.clone();
            spawn_local(async move {
                let file = match read_file(&input).await {
                    Ok(Some(file)) => file,
                    Ok(None) => return,
                    Err(err) => {
                        app.toaster.failure("Could not read file", format!("{err:?}"));
                        return;
                    }
                };
                let (bytes, mime) = file;
                match app.content.upload_image(prefix, bytes, &mime).await {
                    Ok(url) => {
                        if let Some(field) = scope
                            .query_selector(&format!("[name=\"{target}\"]"))
                            .ok()
                            .flatten()
                            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
                        {
                            field.set_value(&url);
                        }
                        app.toaster.success("Image uploaded");
                    }
                    Err(err) => app.toaster.failure("Upload failed", err),
                }
                input.set_value("");
            });
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_lists_drop_blanks() {
        assert_eq!(split_list(" brand, ,print ,"), vec!["brand", "print"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn line_lists_trim_each_entry() {
        assert_eq!(
            split_lines("Designer\n\n  Illustrator \r\nArt Director"),
            vec!["Designer", "Illustrator", "Art Director"]
        );
    }
}
