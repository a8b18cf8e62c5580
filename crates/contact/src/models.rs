// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Per-request data: the raw submission, the verification verdict and the
//! dispatch target.

use crate::error::{ContactError, RejectReason};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Form field names posted by the contact form widget.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const COMPANY: &str = "company";
    pub const REASON: &str = "reason";
    pub const MESSAGE: &str = "message";
    /// Hidden input that people never fill in
    pub const HONEYPOT: &str = "_hp_";
    pub const RECAPTCHA_TOKEN: &str = "grecaptchaToken";

    /// Fields that must be non-blank for a submission to be relayed.
    pub const REQUIRED: [&str; 3] = [NAME, EMAIL, MESSAGE];
}

/// One untrusted form submission, as field name to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    fields: BTreeMap<String, String>,
}

impl Submission {
    /// Decode a JSON request body. The body must be a JSON object.
    pub fn from_json(body: &[u8]) -> Result<Self, ContactError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ContactError::InvalidPayload(e.to_string()))?;
        Self::from_value(value)
    }

    /// Build from a decoded JSON value.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified, and
    /// nulls, arrays and nested objects are dropped.
    pub fn from_value(value: Value) -> Result<Self, ContactError> {
        let Value::Object(map) = value else {
            return Err(ContactError::InvalidPayload(
                "expected a JSON object".to_string(),
            ));
        };

        let fields = map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                Value::Number(n) => Some((key, n.to_string())),
                Value::Bool(b) => Some((key, b.to_string())),
                Value::Null | Value::Array(_) | Value::Object(_) => None,
            })
            .collect();

        Ok(Submission { fields })
    }

    /// Builder used by callers that assemble a submission by hand.
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        let _ = self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Raw value of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Trimmed value of a field, `None` when absent or blank.
    pub fn trimmed(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Trimmed value of a field, or the empty string.
    pub fn or_empty(&self, field: &str) -> &str {
        self.trimmed(field).unwrap_or("")
    }
}

/// Outcome of the bot-mitigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Rejected(RejectReason),
}

/// Which relay delivers submissions for this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchTarget {
    /// Monkeysmail transactional email API
    Monkeysmail,
    /// Drupal Webform REST relay
    Webform,
}

impl DispatchTarget {
    /// Selector used when none is configured.
    pub const DEFAULT: DispatchTarget = DispatchTarget::Monkeysmail;

    /// Resolve the configured selector. `None` means "not configured".
    pub fn resolve(selector: Option<&str>) -> Result<Self, ContactError> {
        match selector.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Self::DEFAULT),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for DispatchTarget {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monkeysmail" => Ok(DispatchTarget::Monkeysmail),
            "drupal" | "webform" => Ok(DispatchTarget::Webform),
            _ => Err(ContactError::InvalidDestination(s.to_string())),
        }
    }
}

impl fmt::Display for DispatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchTarget::Monkeysmail => write!(f, "monkeysmail"),
            DispatchTarget::Webform => write!(f, "webform"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_object_and_coerces_scalars() {
        let body = json!({
            "name": "Ada",
            "age": 36,
            "subscribe": true,
            "nothing": null,
            "nested": {"a": 1},
            "list": ["x"],
        });
        let sub = Submission::from_json(body.to_string().as_bytes()).expect("decode");
        assert_eq!(sub.get("name"), Some("Ada"));
        assert_eq!(sub.get("age"), Some("36"));
        assert_eq!(sub.get("subscribe"), Some("true"));
        assert_eq!(sub.get("nothing"), None);
        assert_eq!(sub.get("nested"), None);
        assert_eq!(sub.get("list"), None);
        assert_eq!(sub, Submission::default().with("name", "Ada").with("age", "36").with("subscribe", "true"));
    }

    #[test]
    fn rejects_non_objects_and_garbage() {
        let err = Submission::from_json(b"[1,2]").expect_err("array");
        assert_eq!(err.code(), "invalid_payload");

        let err = Submission::from_json(b"{not json").expect_err("garbage");
        assert_eq!(err.code(), "invalid_payload");
    }

    #[test]
    fn trimmed_treats_blank_as_absent() {
        let sub = Submission::default().with("name", "   ").with("email", " a@b.c ");
        assert_eq!(sub.trimmed("name"), None);
        assert_eq!(sub.trimmed("email"), Some("a@b.c"));
        assert_eq!(sub.or_empty("company"), "");
    }

    #[test]
    fn dispatch_target_selection() {
        assert_eq!(DispatchTarget::resolve(None).expect("default"), DispatchTarget::Monkeysmail);
        assert_eq!(DispatchTarget::resolve(Some("  ")).expect("blank"), DispatchTarget::Monkeysmail);
        assert_eq!(
            DispatchTarget::resolve(Some("Drupal")).expect("drupal"),
            DispatchTarget::Webform
        );
        assert_eq!(
            "webform".parse::<DispatchTarget>().expect("webform"),
            DispatchTarget::Webform
        );

        let err = DispatchTarget::resolve(Some("carrier-pigeon")).expect_err("unknown");
        assert_eq!(err.code(), "invalid_destination");
    }
}
