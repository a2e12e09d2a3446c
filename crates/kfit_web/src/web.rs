use std::rc::Rc;

use kfit::plot::PlotSpec;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::binder::{self, BinderConfig, FormBinder};

mod dom;
mod files;
mod fitplot;
mod transport;

use dom::DomPage;
use transport::{FetchTransport, FormBody};

const GREETING: &str = "Hello from kfit!";

/// Greeter: called once when the module loads.
#[wasm_bindgen]
pub fn greet() {
    log::info!("{GREETING}");
}

/// Fit `num_clusters` centres to the CSV points and return the SVG plot.
#[wasm_bindgen]
pub fn fit_draw(
    csv_content: &[u8],
    num_clusters: usize,
    width: usize,
    height: usize,
    padding: usize,
    title: &str,
) -> Result<String, JsValue> {
    let spec = PlotSpec {
        width,
        height,
        padding,
        title: title.to_string(),
    };
    kfit::fit_draw(csv_content, num_clusters, &spec).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Fitted centres as a flat `[x0, y0, x1, y1, ...]` array.
#[wasm_bindgen]
pub fn fit(csv_content: &[u8], num_clusters: usize) -> Result<Vec<f64>, JsValue> {
    kfit::fit_centers_flat(csv_content, num_clusters).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("kfit: no document");
        return;
    };
    let ready = document.ready_state() != "loading";

    binder::startup(greet, ready, bind_page, move |bind| {
        let on_ready = Closure::once_into_js(move || bind());
        if document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
            .is_err()
        {
            log::error!("kfit: failed to listen for DOMContentLoaded");
        }
    });
}

fn bind_page() {
    let cfg = BinderConfig::default();
    if let Err(e) = bind_form(cfg.clone()) {
        log::error!("kfit: {e}");
    }
    if let Err(e) = fitplot::bind(&cfg) {
        log::error!("kfit: {e}");
    }
}

fn bind_form(cfg: BinderConfig) -> Result<(), String> {
    let form: web_sys::HtmlFormElement = dom::query(cfg.form)?;
    let binder = Rc::new(FormBinder::new(cfg));

    let submitted = form.clone();
    let on_submit = Closure::wrap(Box::new(move |ev: web_sys::Event| {
        ev.prevent_default();

        let body = match FormBody::from_form(&submitted) {
            Ok(body) => body,
            Err(e) => {
                log::error!("kfit: {e}");
                return;
            }
        };
        let binder = Rc::clone(&binder);
        let form = submitted.clone();
        wasm_bindgen_futures::spawn_local(async move {
            binder.submit(&DomPage, &FetchTransport, &form, body).await;
        });
    }) as Box<dyn FnMut(_)>);

    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(|_| "form: add_event_listener failed".to_string())?;
    on_submit.forget();
    Ok(())
}
