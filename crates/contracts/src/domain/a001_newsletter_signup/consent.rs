use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Consent purpose: commercial communications
pub const NEWSLETTER_PURPOSE_ID: Uuid = Uuid::from_u128(0x10000000_0000_0000_0000_000000000003);

/// Topic for the newsletter mailing
pub const NEWSLETTER_TOPIC_ID: Uuid = Uuid::from_u128(0xfda62239_dc70_f011_bec2_000d3a11bb02);

/// Compliance profile the consent is recorded against
pub const COMPLIANCE_SETTINGS_ID: Uuid = Uuid::from_u128(0x7f4a6355_1811_4cde_bde3_fee8c85f56b1);

/// Opt-in declaration attached to every submission.
///
/// The capture API expects this record as a JSON string inside a static
/// mapping value, not as a nested object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub msdynmkt_purposeid: Uuid,
    pub msdynmkt_topicid: Uuid,
    pub msdynmkt_consenttypevalue: Option<String>,
    pub channels: String,
    /// The API reads this as a string, not a JSON boolean
    pub optinwhenchecked: String,
    pub msdynmkt_value: String,
    #[serde(rename = "labelText")]
    pub label_text: String,
    pub msdynmkt_compliancesettings4id: Uuid,
}

impl ConsentRecord {
    pub fn newsletter_opt_in() -> Self {
        Self {
            msdynmkt_purposeid: NEWSLETTER_PURPOSE_ID,
            msdynmkt_topicid: NEWSLETTER_TOPIC_ID,
            msdynmkt_consenttypevalue: None,
            channels: "Email".to_string(),
            optinwhenchecked: "true".to_string(),
            msdynmkt_value: "Opted In".to_string(),
            label_text: "I agree to subscribe".to_string(),
            msdynmkt_compliancesettings4id: COMPLIANCE_SETTINGS_ID,
        }
    }

    /// Serialize into the string carried by the consent mapping entry
    pub fn to_field_value(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opt_in_record_fields() {
        let raw = ConsentRecord::newsletter_opt_in().to_field_value().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            json!({
                "msdynmkt_purposeid": "10000000-0000-0000-0000-000000000003",
                "msdynmkt_topicid": "fda62239-dc70-f011-bec2-000d3a11bb02",
                "msdynmkt_consenttypevalue": null,
                "channels": "Email",
                "optinwhenchecked": "true",
                "msdynmkt_value": "Opted In",
                "labelText": "I agree to subscribe",
                "msdynmkt_compliancesettings4id": "7f4a6355-1811-4cde-bde3-fee8c85f56b1"
            })
        );
    }

    #[test]
    fn test_field_order_is_stable() {
        let raw = ConsentRecord::newsletter_opt_in().to_field_value().unwrap();
        assert!(raw.starts_with("{\"msdynmkt_purposeid\":"));
        assert!(raw.ends_with("\"msdynmkt_compliancesettings4id\":\"7f4a6355-1811-4cde-bde3-fee8c85f56b1\"}"));
    }
}
