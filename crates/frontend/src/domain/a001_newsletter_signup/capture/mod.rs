//! Binding between the rendered signup form and the vendor form-capture
//! script.
//!
//! - `FormCapture`: the vendor capabilities the form relies on
//! - `FormCaptureAdapter`: waits for the form, registers the mapping table and
//!   forwards every submit to the vendor
//! - `d365`: browser implementation backed by `window.d365mktformcapture`

mod d365;
mod error;

pub use d365::D365FormCapture;
pub use error::CaptureError;

use crate::shared::config::CaptureSettings;
use contracts::domain::a001_newsletter_signup::{newsletter_mappings, CaptureConfig, MappingTable};
use std::rc::Rc;

/// Capability set exposed by the vendor script
#[allow(async_fn_in_trait)]
pub trait FormCapture: 'static {
    type Form: Clone + 'static;
    type Payload;

    /// Resolves once an element matching `selector` exists. Never times out.
    async fn wait_for_element(&self, selector: &str) -> Result<Self::Form, CaptureError>;

    fn serialize_form(
        &self,
        form: &Self::Form,
        mappings: &MappingTable,
    ) -> Result<Self::Payload, CaptureError>;

    /// Fire-and-forget hand-off to the remote API
    fn submit_form(&self, config: &CaptureConfig, payload: Self::Payload) -> Result<(), CaptureError>;

    /// Run `handler` in the capture phase of every submit event on `form`
    fn intercept_submit(&self, form: &Self::Form, handler: Box<dyn Fn()>) -> Result<(), CaptureError>;
}

struct AdapterInner<C> {
    capture: C,
    mappings: MappingTable,
    config: CaptureConfig,
    selector: String,
}

pub struct FormCaptureAdapter<C> {
    inner: Rc<AdapterInner<C>>,
}

impl<C> Clone for FormCaptureAdapter<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: FormCapture> FormCaptureAdapter<C> {
    /// Adapter for the newsletter form with the standard mapping table
    pub fn new(capture: C, settings: &CaptureSettings) -> Result<Self, CaptureError> {
        let mappings = newsletter_mappings()?;
        Self::with_mappings(
            capture,
            mappings,
            settings.capture.clone(),
            settings.form_selector.clone(),
        )
    }

    pub fn with_mappings(
        capture: C,
        mappings: MappingTable,
        config: CaptureConfig,
        selector: impl Into<String>,
    ) -> Result<Self, CaptureError> {
        mappings
            .validate()
            .map_err(|e| CaptureError::mapping(e.to_string()))?;

        Ok(Self {
            inner: Rc::new(AdapterInner {
                capture,
                mappings,
                config,
                selector: selector.into(),
            }),
        })
    }

    /// Wait for the form and attach the submit interceptor
    pub async fn initialize(&self) -> Result<C::Form, CaptureError> {
        let form = self
            .inner
            .capture
            .wait_for_element(&self.inner.selector)
            .await?;

        let adapter = self.clone();
        let bound = form.clone();
        self.inner.capture.intercept_submit(
            &form,
            Box::new(move || {
                if let Err(e) = adapter.submit_once(&bound) {
                    log::error!("Error submitting form capture: {}", e);
                }
            }),
        )?;

        log::info!("form capture bound to {}", self.inner.selector);
        Ok(form)
    }

    /// Serialize the form through the mapping table and hand it to the vendor
    pub fn submit_once(&self, form: &C::Form) -> Result<(), CaptureError> {
        let inner = &self.inner;
        let payload = inner.capture.serialize_form(form, &inner.mappings)?;
        inner.capture.submit_form(&inner.config, payload)
    }

    /// Initialize and swallow the outcome; failures are only logged
    pub async fn run(self) {
        if let Err(e) = self.initialize().await {
            log::error!("Error initializing form capture: {}", e);
        }
    }
}
