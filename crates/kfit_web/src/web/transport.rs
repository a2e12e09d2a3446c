use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::binder::{Reply, SubmitError, SubmitRequest, Transport};

/// Serialized form fields. Forms with a file input go out as
/// `multipart/form-data`, everything else url-encoded.
pub(super) enum FormBody {
    Multipart(web_sys::FormData),
    UrlEncoded(web_sys::UrlSearchParams),
}

impl FormBody {
    pub(super) fn from_form(form: &web_sys::HtmlFormElement) -> Result<Self, String> {
        let data = web_sys::FormData::new_with_form(form)
            .map_err(|_| "form: FormData::new failed".to_string())?;

        let has_file = form
            .query_selector("input[type=file]")
            .map_err(|_| "form: query_selector threw".to_string())?
            .is_some();
        if has_file {
            return Ok(FormBody::Multipart(data));
        }

        let params = web_sys::UrlSearchParams::new_with_str_sequence_sequence(data.as_ref())
            .map_err(|_| "form: URLSearchParams::new failed".to_string())?;
        Ok(FormBody::UrlEncoded(params))
    }

    fn as_js(&self) -> &JsValue {
        match self {
            FormBody::Multipart(data) => data.as_ref(),
            FormBody::UrlEncoded(params) => params.as_ref(),
        }
    }
}

fn network(ctx: &str, e: JsValue) -> SubmitError {
    let detail = e.as_string().unwrap_or_else(|| format!("{e:?}"));
    SubmitError::Network(format!("{ctx}: {detail}"))
}

/// `window.fetch`; the browser sets the content type from the body kind.
pub(super) struct FetchTransport;

impl Transport for FetchTransport {
    type Body = FormBody;

    async fn send(&self, req: &SubmitRequest<FormBody>) -> Result<Reply, SubmitError> {
        let window = web_sys::window().ok_or(SubmitError::Network("no window".to_string()))?;

        let init = web_sys::RequestInit::new();
        init.set_method(req.method.as_str());
        init.set_body(req.body.as_js());
        let request = web_sys::Request::new_with_str_and_init(req.url, &init)
            .map_err(|e| network("request", e))?;

        let resp = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| network("fetch", e))?
            .dyn_into::<web_sys::Response>()
            .map_err(|_| SubmitError::Network("fetch: expected Response".to_string()))?;

        let text = resp.text().map_err(|e| network("response", e))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| network("response body", e))?
            .as_string()
            .unwrap_or_default();

        Ok(Reply {
            status: resp.status(),
            status_text: resp.status_text(),
            body,
        })
    }
}
