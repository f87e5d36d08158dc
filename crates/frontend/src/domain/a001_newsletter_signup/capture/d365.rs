use super::{CaptureError, FormCapture};
use contracts::domain::a001_newsletter_signup::{CaptureConfig, MappingTable};
use js_sys::{Function, Promise, Reflect, JSON};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlFormElement;

/// Global installed by the Dynamics 365 form-capture bundle
const CAPTURE_GLOBAL: &str = "d365mktformcapture";

/// Vendor API reached through `window.d365mktformcapture`
pub struct D365FormCapture {
    api: JsValue,
}

impl D365FormCapture {
    /// Look up the global; fails if the bundle has not run yet
    pub fn from_window() -> Result<Self, CaptureError> {
        let window = web_sys::window()
            .ok_or_else(|| CaptureError::vendor_missing("window is not available"))?;
        let api = Reflect::get(&window, &JsValue::from_str(CAPTURE_GLOBAL))?;
        if api.is_undefined() || api.is_null() {
            return Err(CaptureError::vendor_missing(format!(
                "window.{} is not defined",
                CAPTURE_GLOBAL
            )));
        }
        Ok(Self { api })
    }

    fn method(&self, name: &str) -> Result<Function, CaptureError> {
        Reflect::get(&self.api, &JsValue::from_str(name))?
            .dyn_into::<Function>()
            .map_err(|_| {
                CaptureError::vendor_missing(format!("{}.{} is not a function", CAPTURE_GLOBAL, name))
            })
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, CaptureError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| CaptureError::serialize(e.to_string()))
}

impl FormCapture for D365FormCapture {
    type Form = HtmlFormElement;
    type Payload = JsValue;

    async fn wait_for_element(&self, selector: &str) -> Result<HtmlFormElement, CaptureError> {
        let promise: Promise = self
            .method("waitForElement")?
            .call1(&self.api, &JsValue::from_str(selector))?
            .dyn_into()
            .map_err(|_| CaptureError::element("waitForElement did not return a promise"))?;

        let element = JsFuture::from(promise)
            .await
            .map_err(|e| CaptureError::from(e).with_details(selector.to_string()))?;

        element
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| CaptureError::element(format!("{} is not a <form>", selector)))
    }

    fn serialize_form(
        &self,
        form: &HtmlFormElement,
        mappings: &MappingTable,
    ) -> Result<JsValue, CaptureError> {
        let serialized = self
            .method("serializeForm")?
            .call2(&self.api, form, &to_js(mappings)?)
            .map_err(|e| CaptureError::serialize(CaptureError::from(e).message))?;

        if let Ok(dump) = JSON::stringify(&serialized) {
            log::debug!("serialized form: {}", String::from(dump));
        }

        let builder = Reflect::get(&serialized, &JsValue::from_str("SerializedForm"))?;
        let build = Reflect::get(&builder, &JsValue::from_str("build"))?
            .dyn_into::<Function>()
            .map_err(|_| CaptureError::serialize("SerializedForm.build is not a function"))?;

        build
            .call0(&builder)
            .map_err(|e| CaptureError::serialize(CaptureError::from(e).message))
    }

    fn submit_form(&self, config: &CaptureConfig, payload: JsValue) -> Result<(), CaptureError> {
        self.method("submitForm")?
            .call2(&self.api, &to_js(config)?, &payload)
            .map_err(|e| CaptureError::submit(CaptureError::from(e).message))?;
        log::info!("form payload handed to {}", config.form_api_url);
        Ok(())
    }

    fn intercept_submit(
        &self,
        form: &HtmlFormElement,
        handler: Box<dyn Fn()>,
    ) -> Result<(), CaptureError> {
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            handler();
        }) as Box<dyn FnMut(_)>);

        form.add_event_listener_with_callback_and_bool(
            "submit",
            closure.as_ref().unchecked_ref(),
            true,
        )?;
        // Lives as long as the form element
        closure.forget();
        Ok(())
    }
}
