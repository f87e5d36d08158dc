use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::consent::ConsentRecord;

// ============================================================================
// Field mapping entry
// ============================================================================

/// Translation of a submitted form value into a remote option-set code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSetMapping {
    #[serde(rename = "FormValue")]
    pub form_value: String,

    #[serde(rename = "DataverseValue")]
    pub dataverse_value: String,
}

/// Value carried by a mapping entry instead of (or in addition to) user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Always submitted as-is
    Static(String),
    /// Submitted form value is translated through this list
    OptionSet(Vec<OptionSetMapping>),
}

/// Correspondence between a local form field and a remote Dataverse field.
///
/// Key names follow the vendor's mapping format, so the serialized entry can
/// be handed to the form-capture script without further conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(rename = "FormFieldName", default, skip_serializing_if = "Option::is_none")]
    pub form_field_name: Option<String>,

    #[serde(rename = "DataverseFieldName")]
    pub dataverse_field_name: String,

    #[serde(rename = "DataverseFieldValue", default, skip_serializing_if = "Option::is_none")]
    pub dataverse_field_value: Option<FieldValue>,
}

impl FieldMapping {
    /// Map a local input straight onto a remote field
    pub fn field(form_field: impl Into<String>, dataverse_field: impl Into<String>) -> Self {
        Self {
            form_field_name: Some(form_field.into()),
            dataverse_field_name: dataverse_field.into(),
            dataverse_field_value: None,
        }
    }

    /// Remote field that receives a fixed value on every submission
    pub fn fixed(dataverse_field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            form_field_name: None,
            dataverse_field_name: dataverse_field.into(),
            dataverse_field_value: Some(FieldValue::Static(value.into())),
        }
    }

    /// Local input whose values are translated into option-set codes
    pub fn option_set(
        form_field: impl Into<String>,
        dataverse_field: impl Into<String>,
        values: Vec<OptionSetMapping>,
    ) -> Self {
        Self {
            form_field_name: Some(form_field.into()),
            dataverse_field_name: dataverse_field.into(),
            dataverse_field_value: Some(FieldValue::OptionSet(values)),
        }
    }

    /// Static entries have no local field and always submit their value
    pub fn is_static(&self) -> bool {
        self.form_field_name.is_none()
    }
}

// ============================================================================
// Newsletter mapping table
// ============================================================================

/// Remote field holding the constituent classification
pub const CONSTITUENT_TYPE_FIELD: &str = "a1a_constituenttype";

/// Constituent type code for newsletter subscribers
pub const CONSTITUENT_TYPE_SUBSCRIBER: &str = "['740490000']";

/// Remote field holding the serialized consent record
pub const CONSENT_FIELD: &str = "consentsubmissionvalues";

/// Ordered list of mappings registered with the form-capture script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    entries: Vec<FieldMapping>,
}

impl MappingTable {
    pub fn new(entries: Vec<FieldMapping>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FieldMapping] {
        &self.entries
    }

    /// Entries submitted regardless of what the visitor entered
    pub fn static_entries(&self) -> impl Iterator<Item = &FieldMapping> {
        self.entries.iter().filter(|m| m.is_static())
    }

    /// Reject tables the capture script would silently mis-submit
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.dataverse_field_name.trim().is_empty() {
                bail!("mapping entry without a Dataverse field name");
            }
            if !seen.insert(entry.dataverse_field_name.as_str()) {
                bail!(
                    "Dataverse field '{}' is mapped more than once",
                    entry.dataverse_field_name
                );
            }
            if entry.is_static() && entry.dataverse_field_value.is_none() {
                bail!(
                    "static entry '{}' has no value",
                    entry.dataverse_field_name
                );
            }
        }
        Ok(())
    }
}

/// Mapping table for the newsletter form.
///
/// The two static entries are always present: the constituent type and the
/// consent record. The `newsletter` checkbox is deliberately not mapped.
pub fn newsletter_mappings() -> anyhow::Result<MappingTable> {
    let consent = ConsentRecord::newsletter_opt_in().to_field_value()?;

    Ok(MappingTable::new(vec![
        FieldMapping::field("firstName", "firstname"),
        FieldMapping::field("lastName", "lastname"),
        FieldMapping::field("email", "emailaddress1"),
        FieldMapping::fixed(CONSTITUENT_TYPE_FIELD, CONSTITUENT_TYPE_SUBSCRIBER),
        FieldMapping::fixed(CONSENT_FIELD, consent),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_newsletter_table_layout() {
        let table = newsletter_mappings().unwrap();
        let names: Vec<_> = table
            .entries()
            .iter()
            .map(|m| m.dataverse_field_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "firstname",
                "lastname",
                "emailaddress1",
                CONSTITUENT_TYPE_FIELD,
                CONSENT_FIELD
            ]
        );
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_static_entries_carry_fixed_values() {
        let table = newsletter_mappings().unwrap();
        let statics: Vec<_> = table.static_entries().collect();
        assert_eq!(statics.len(), 2);
        assert_eq!(
            statics[0].dataverse_field_value,
            Some(FieldValue::Static("['740490000']".to_string()))
        );
        match &statics[1].dataverse_field_value {
            Some(FieldValue::Static(raw)) => {
                let consent: serde_json::Value = serde_json::from_str(raw).unwrap();
                assert_eq!(consent["optinwhenchecked"], "true");
            }
            other => panic!("unexpected consent value: {:?}", other),
        }
    }

    #[test]
    fn test_checkbox_is_not_mapped() {
        let table = newsletter_mappings().unwrap();
        assert!(table
            .entries()
            .iter()
            .all(|m| m.form_field_name.as_deref() != Some("newsletter")));
    }

    #[test]
    fn test_serializes_with_vendor_keys() {
        let value = serde_json::to_value(FieldMapping::field("email", "emailaddress1")).unwrap();
        assert_eq!(
            value,
            json!({ "FormFieldName": "email", "DataverseFieldName": "emailaddress1" })
        );

        let value = serde_json::to_value(FieldMapping::fixed("a", "b")).unwrap();
        assert_eq!(
            value,
            json!({ "DataverseFieldName": "a", "DataverseFieldValue": "b" })
        );
    }

    #[test]
    fn test_option_set_value() {
        let mapping = FieldMapping::option_set(
            "kind",
            CONSTITUENT_TYPE_FIELD,
            vec![OptionSetMapping {
                form_value: "member".into(),
                dataverse_value: "740490001".into(),
            }],
        );
        let value = serde_json::to_value(&mapping).unwrap();
        assert_eq!(
            value["DataverseFieldValue"],
            json!([{ "FormValue": "member", "DataverseValue": "740490001" }])
        );

        let back: FieldMapping = serde_json::from_value(value).unwrap();
        assert_eq!(back, mapping);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let table = MappingTable::new(vec![
            FieldMapping::field("email", "emailaddress1"),
            FieldMapping::field("email2", "emailaddress1"),
        ]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_static_without_value() {
        let table = MappingTable::new(vec![FieldMapping {
            form_field_name: None,
            dataverse_field_name: "orphan".into(),
            dataverse_field_value: None,
        }]);
        assert!(table.validate().is_err());
    }
}
