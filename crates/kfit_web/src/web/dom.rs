use wasm_bindgen::JsCast;

use crate::binder::Page;

pub(super) fn document() -> Result<web_sys::Document, String> {
    let window = web_sys::window().ok_or("no window".to_string())?;
    window.document().ok_or("no document".to_string())
}

pub(super) fn query<T: JsCast>(selector: &str) -> Result<T, String> {
    document()?
        .query_selector(selector)
        .map_err(|_| format!("{selector}: query_selector threw"))?
        .ok_or(format!("{selector}: not found"))?
        .dyn_into::<T>()
        .map_err(|_| format!("{selector}: unexpected element type"))
}

/// Current value of the form control called `name`, if it is an `<input>`.
pub(super) fn input_value(form: &web_sys::HtmlFormElement, name: &str) -> Option<String> {
    form.query_selector(&format!("[name=\"{name}\"]"))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
}

/// The live document.
pub(super) struct DomPage;

impl Page for DomPage {
    fn set_inner_html(&self, selector: &str, html: &str) -> Result<(), String> {
        let el: web_sys::Element = query(selector)?;
        el.set_inner_html(html);
        Ok(())
    }

    fn set_disabled(&self, selector: &str, disabled: bool) -> Result<(), String> {
        let el: web_sys::Element = query(selector)?;
        let res = if disabled {
            el.set_attribute("disabled", "")
        } else {
            el.remove_attribute("disabled")
        };
        res.map_err(|_| format!("{selector}: failed to update disabled"))
    }
}
