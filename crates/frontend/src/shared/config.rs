//! Form-capture settings.
//!
//! Defaults are compiled in. A host page may override any subset of them with
//! an inline JSON block:
//!
//! ```html
//! <script type="application/json" id="newsletter-settings">
//!   { "submit_delay_ms": 500 }
//! </script>
//! ```

use contracts::domain::a001_newsletter_signup::capture_config::DEFAULT_SCRIPT_URL;
use contracts::domain::a001_newsletter_signup::CaptureConfig;
use serde::Deserialize;

/// Id of the inline settings block in the host page
pub const SETTINGS_ELEMENT_ID: &str = "newsletter-settings";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Vendor form-capture bundle
    pub script_url: String,
    /// Id given to the injected `<script>` element
    pub script_element_id: String,
    /// Selector the vendor waits for before binding
    pub form_selector: String,
    pub capture: CaptureConfig,
    /// Cosmetic delay before the thank-you card
    pub submit_delay_ms: u32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            script_element_id: "d365-form-capture".to_string(),
            form_selector: "#newsletterForm".to_string(),
            capture: CaptureConfig::default(),
            submit_delay_ms: 1000,
        }
    }
}

impl CaptureSettings {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Element id of the form, derived from `form_selector`
    pub fn form_id(&self) -> &str {
        self.form_selector.trim_start_matches('#')
    }

    /// Read overrides from the host page, falling back to defaults
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(SETTINGS_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(raw) = raw else {
            log::debug!("no #{} block, using default settings", SETTINGS_ELEMENT_ID);
            return Self::default();
        };

        match Self::from_json(&raw) {
            Ok(settings) => {
                log::info!("loaded settings from #{}", SETTINGS_ELEMENT_ID);
                settings
            }
            Err(e) => {
                log::warn!("invalid #{} block ({}), using defaults", SETTINGS_ELEMENT_ID, e);
                Self::default()
            }
        }
    }
}
