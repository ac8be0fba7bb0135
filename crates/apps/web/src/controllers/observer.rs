use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Owned `IntersectionObserver`; disconnects on drop.
pub struct Observer {
    inner: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Observer {
    pub fn new(
        root_margin: &str,
        threshold: f64,
        mut on_entries: impl FnMut(&[IntersectionObserverEntry], &IntersectionObserver) + 'static,
    ) -> Result<Self, JsValue> {
        let callback: ObserverCallback = Closure::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let entries: Vec<IntersectionObserverEntry> = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                    .collect();
                on_entries(&entries, &observer);
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_root_margin(root_margin);
        init.set_threshold(&JsValue::from_f64(threshold));
        let inner =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self {
            inner,
            _callback: callback,
        })
    }

    pub fn observe(&self, target: &Element) {
        self.inner.observe(target);
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.inner.disconnect();
    }
}
