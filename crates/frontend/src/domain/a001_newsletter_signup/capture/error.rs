use wasm_bindgen::{JsCast, JsValue};

/// Failure at the form-capture boundary. Logged, never shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl CaptureError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn vendor_missing(message: impl Into<String>) -> Self {
        Self::new("VENDOR_MISSING", message)
    }

    pub fn script(message: impl Into<String>) -> Self {
        Self::new("SCRIPT_ERROR", message)
    }

    pub fn element(message: impl Into<String>) -> Self {
        Self::new("ELEMENT_ERROR", message)
    }

    pub fn serialize(message: impl Into<String>) -> Self {
        Self::new("SERIALIZE_ERROR", message)
    }

    pub fn submit(message: impl Into<String>) -> Self {
        Self::new("SUBMIT_ERROR", message)
    }

    pub fn mapping(message: impl Into<String>) -> Self {
        Self::new("MAPPING_ERROR", message)
    }
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for CaptureError {}

impl From<anyhow::Error> for CaptureError {
    fn from(err: anyhow::Error) -> Self {
        CaptureError::mapping(err.to_string())
    }
}

/// Thrown JS values: `Error` objects keep their message, anything else is
/// rendered with `Debug`
impl From<JsValue> for CaptureError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{:?}", value));
        CaptureError::new("JS_ERROR", message)
    }
}
