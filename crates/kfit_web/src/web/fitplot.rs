//! `#fitplot`: run the k-means fit in the browser on the CSV picked in the form.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::dom::{self, DomPage};
use super::files;
use crate::binder::{BinderConfig, Page};
use crate::form_fields::fit_settings;

const CSV_FIELD: &str = "csv";

pub(super) fn bind(cfg: &BinderConfig) -> Result<(), String> {
    let button: web_sys::HtmlElement = dom::query(cfg.button)?;
    let form: web_sys::HtmlFormElement = dom::query(cfg.form)?;
    let target = cfg.target;

    let on_click = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
        let form = form.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let res = match fit_from_form(&form).await {
                Ok(svg) => DomPage.set_inner_html(target, &svg),
                Err(e) => Err(e),
            };
            if let Err(e) = res {
                log::warn!("fitplot: {e}");
            }
        });
    }) as Box<dyn FnMut(_)>);

    button
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(|_| "fitplot: add_event_listener failed".to_string())?;
    on_click.forget();
    Ok(())
}

async fn fit_from_form(form: &web_sys::HtmlFormElement) -> Result<String, String> {
    let csv = csv_bytes(form).await?;
    let settings = fit_settings(|name| dom::input_value(form, name));
    log::info!(
        "fitplot: {} bytes, k={}",
        csv.len(),
        settings.clusters
    );
    kfit::fit_draw(&csv, settings.clusters, &settings.spec).map_err(|e| e.to_string())
}

async fn csv_bytes(form: &web_sys::HtmlFormElement) -> Result<Vec<u8>, String> {
    let input = form
        .query_selector(&format!("[name=\"{CSV_FIELD}\"]"))
        .map_err(|_| "form: query_selector threw".to_string())?
        .ok_or("form: no csv field".to_string())?
        .dyn_into::<web_sys::HtmlInputElement>()
        .map_err(|_| "form: csv field is not an <input>".to_string())?;

    if input.type_() == "file" {
        return files::first_file_bytes(&input)
            .await?
            .ok_or("form: no csv file selected".to_string());
    }
    Ok(input.value().into_bytes())
}
