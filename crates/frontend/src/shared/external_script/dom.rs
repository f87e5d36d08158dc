use super::{ScriptHost, ScriptResource, ScriptStatus, SettleCallback};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, HtmlScriptElement};

/// Injects scripts into `document.head`
#[derive(Debug, Clone, Copy, Default)]
pub struct DomScriptHost;

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

impl ScriptHost for DomScriptHost {
    fn append(&self, resource: &ScriptResource, on_settled: SettleCallback) -> Result<(), String> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or_else(|| "document is not available".to_string())?;
        let head = document
            .head()
            .ok_or_else(|| "document has no <head>".to_string())?;

        let script: HtmlScriptElement = document
            .create_element("script")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| "created element is not a <script>".to_string())?;
        script.set_id(&resource.id);
        script.set_src(&resource.src);
        script.set_async(true);

        // load and error share one callback; whichever fires first wins
        let settle = Rc::new(RefCell::new(Some(on_settled)));
        let on_load = {
            let settle = settle.clone();
            Closure::once_into_js(move || {
                let callback = settle.borrow_mut().take();
                if let Some(callback) = callback {
                    callback(ScriptStatus::Loaded);
                }
            })
        };
        let on_error = Closure::once_into_js(move || {
            let callback = settle.borrow_mut().take();
            if let Some(callback) = callback {
                callback(ScriptStatus::Failed);
            }
        });
        script.set_onload(Some(on_load.unchecked_ref()));
        script.set_onerror(Some(on_error.unchecked_ref()));

        head.append_child(&script).map_err(js_err)?;
        Ok(())
    }

    fn remove(&self, id: &str) -> bool {
        let Some(document) = window().and_then(|w| w.document()) else {
            return false;
        };
        match document.get_element_by_id(id) {
            Some(element) => {
                element.remove();
                true
            }
            None => false,
        }
    }
}
