pub mod capture_config;
pub mod consent;
pub mod field_mapping;
pub mod form;

pub use capture_config::CaptureConfig;
pub use consent::ConsentRecord;
pub use field_mapping::{newsletter_mappings, FieldMapping, FieldValue, MappingTable, OptionSetMapping};
pub use form::SignupForm;
