use serde::{Deserialize, Serialize};

/// Values entered into the signup form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignupForm {
    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    pub email: String,

    /// Collected but not mapped; consent is sent as a fixed record
    pub newsletter: bool,
}

impl SignupForm {
    /// Names of required inputs the browser would refuse to submit.
    ///
    /// Native `required` only rejects an empty value, so whitespace counts.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.first_name.is_empty() {
            missing.push("firstName");
        }
        if self.last_name.is_empty() {
            missing.push("lastName");
        }
        if self.email.is_empty() {
            missing.push("email");
        }
        missing
    }

    pub fn is_submittable(&self) -> bool {
        self.missing_required().is_empty()
    }
}
