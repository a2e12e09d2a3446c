use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub(super) async fn read_file_bytes(file: web_sys::File) -> Result<Vec<u8>, String> {
    let promise = file_reader_array_buffer_promise(file)?;
    let v = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|_| "file: read failed".to_string())?;

    let buf = v
        .dyn_into::<js_sys::ArrayBuffer>()
        .map_err(|_| "file: expected ArrayBuffer".to_string())?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

fn file_reader_array_buffer_promise(file: web_sys::File) -> Result<js_sys::Promise, String> {
    let reader =
        web_sys::FileReader::new().map_err(|_| "file: FileReader::new failed".to_string())?;
    reader
        .read_as_array_buffer(&file)
        .map_err(|_| "file: read_as_array_buffer failed".to_string())?;

    Ok(js_sys::Promise::new(&mut |resolve, reject| {
        let reject_err = reject.clone();
        let reader_ok = reader.clone();
        let onload = Closure::once(move |_ev: web_sys::ProgressEvent| {
            let _ = match reader_ok.result() {
                Ok(v) if !v.is_null() && !v.is_undefined() => resolve.call1(&JsValue::UNDEFINED, &v),
                Ok(_) => reject.call1(&JsValue::UNDEFINED, &JsValue::from_str("file: missing result")),
                Err(_) => reject.call1(&JsValue::UNDEFINED, &JsValue::from_str("file: result() threw")),
            };
        });
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let onerror = Closure::once(move |_ev: web_sys::ProgressEvent| {
            let _ = reject_err.call1(&JsValue::UNDEFINED, &JsValue::from_str("file: read error"));
        });
        reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }))
}

/// Bytes of the first file picked in `input`, if any.
pub(super) async fn first_file_bytes(
    input: &web_sys::HtmlInputElement,
) -> Result<Option<Vec<u8>>, String> {
    let Some(file) = input.files().and_then(|list| list.get(0)) else {
        return Ok(None);
    };
    read_file_bytes(file).await.map(Some)
}
