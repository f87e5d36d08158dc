use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Regional public endpoint of the marketing forms API
pub const DEFAULT_API_BASE: &str = "https://public-usa.mkt.dynamics.com/api/v1.0";

/// Marketing organization the form belongs to
pub const DEFAULT_ORG_ID: Uuid = Uuid::from_u128(0x7b97bdf6_ba6f_f011_8587_00224820bd18);

/// Landing page form registered for the newsletter
pub const DEFAULT_FORM_ID: Uuid = Uuid::from_u128(0x753ede66_db70_f011_bec2_000d3a11bb02);

/// Hosted form-capture bundle
pub const DEFAULT_SCRIPT_URL: &str =
    "https://cxppusa1formui01cdnsa01-endpoint.azureedge.net/usa/FormCapture/FormCapture.bundle.js";

/// Target handed to the vendor's submit routine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(rename = "FormId")]
    pub form_id: Uuid,

    #[serde(rename = "FormApiUrl")]
    pub form_api_url: String,
}

impl CaptureConfig {
    pub fn landing_page_form(api_base: &str, org_id: Uuid, form_id: Uuid) -> Self {
        Self {
            form_id,
            form_api_url: format!(
                "{}/orgs/{}/landingpageforms",
                api_base.trim_end_matches('/'),
                org_id
            ),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::landing_page_form(DEFAULT_API_BASE, DEFAULT_ORG_ID, DEFAULT_FORM_ID)
    }
}
