// ============================================================================
// DOWNLOAD - Guardar archivos y avisos bloqueantes en el navegador
// ============================================================================

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{window, Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::services::error::{ApiError, FetchResult};

/// Destino de los archivos exportados
pub trait FileSink {
    fn save(&self, file_name: &str, mime: &str, content: &str) -> FetchResult<()>;

    /// Aviso bloqueante al usuario
    fn alert(&self, message: &str);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserFileSink;

impl FileSink for BrowserFileSink {
    fn save(&self, file_name: &str, mime: &str, content: &str) -> FetchResult<()> {
        let window = window().ok_or_else(|| ApiError::browser("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| ApiError::browser("No document"))?;
        let body = document
            .body()
            .ok_or_else(|| ApiError::browser("No body"))?;

        let parts = js_sys::Array::of1(&JsValue::from_str(content));
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
            .map_err(js_error("Error creando Blob"))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(js_error("Error creando URL"))?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_error("Error creando <a>"))?
            .dyn_into()
            .map_err(|_| ApiError::browser("El elemento creado no es <a>"))?;
        anchor.set_href(&url);
        anchor.set_download(file_name);

        body.append_child(&anchor).map_err(js_error("Error insertando <a>"))?;
        anchor.click();
        let _ = body.remove_child(&anchor);
        let _ = Url::revoke_object_url(&url);

        log::info!("💾 [DOWNLOAD] Archivo generado: {}", file_name);
        Ok(())
    }

    fn alert(&self, message: &str) {
        if let Some(window) = window() {
            let _ = window.alert_with_message(message);
        }
    }
}

fn js_error(what: &'static str) -> impl Fn(JsValue) -> ApiError {
    move |e| ApiError::browser(format!("{}: {:?}", what, e))
}
