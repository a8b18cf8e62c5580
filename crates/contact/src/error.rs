// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for contact submissions.
//!
//! Every variant carries a stable machine-readable code. Callers match on
//! the variants; the HTTP layer turns them into status codes and bodies.

use thiserror::Error;

/// Why the bot-mitigation check did not accept a token.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("recaptcha_misconfigured")]
    Misconfigured,

    #[error("recaptcha_unreachable")]
    Unreachable,

    #[error("recaptcha_parse_error")]
    ParseError,

    #[error("recaptcha_failed")]
    Failed,

    #[error("recaptcha_action_mismatch")]
    ActionMismatch,

    #[error("recaptcha_low_score")]
    LowScore,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::Misconfigured => "recaptcha_misconfigured",
            RejectReason::Unreachable => "recaptcha_unreachable",
            RejectReason::ParseError => "recaptcha_parse_error",
            RejectReason::Failed => "recaptcha_failed",
            RejectReason::ActionMismatch => "recaptcha_action_mismatch",
            RejectReason::LowScore => "recaptcha_low_score",
        }
    }
}

/// Failure of an outbound relay (mail provider or webform).
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{relay} is not configured: {detail}")]
    Misconfigured { relay: &'static str, detail: String },

    #[error("{relay} request failed: {detail}")]
    Transport { relay: &'static str, detail: String },

    #[error("{relay} returned HTTP {status}: {body}")]
    Status {
        relay: &'static str,
        status: u16,
        body: String,
    },

    #[error("{relay} could not obtain a CSRF token: {detail}")]
    Token { relay: &'static str, detail: String },

    #[error("{relay} payload could not be encoded: {source}")]
    Encode {
        relay: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl DispatchError {
    pub(crate) fn transport(relay: &'static str, err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            format!("timed out: {err}")
        } else {
            err.to_string()
        };
        DispatchError::Transport { relay, detail }
    }

    /// Provider status code, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Every way a submission can end without a delivered message.
#[derive(Error, Debug)]
pub enum ContactError {
    #[error("invalid_payload: {0}")]
    InvalidPayload(String),

    #[error("missing_fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("missing_recaptcha")]
    MissingRecaptcha,

    #[error("{0}")]
    Verification(RejectReason),

    #[error("invalid_destination: {0}")]
    InvalidDestination(String),

    #[error("dispatch_failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("server_error: {0}")]
    Internal(String),
}

impl ContactError {
    /// Machine-readable code returned to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            ContactError::InvalidPayload(_) => "invalid_payload",
            ContactError::MissingFields(_) => "missing_fields",
            ContactError::MissingRecaptcha => "missing_recaptcha",
            ContactError::Verification(reason) => reason.code(),
            ContactError::InvalidDestination(_) => "invalid_destination",
            ContactError::Dispatch(_) => "dispatch_failed",
            ContactError::Internal(_) => "server_error",
        }
    }

    /// True when the caller sent something we will not act on.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ContactError::Dispatch(_) | ContactError::Internal(_))
    }
}

impl From<RejectReason> for ContactError {
    fn from(reason: RejectReason) -> Self {
        ContactError::Verification(reason)
    }
}

/// Configuration could not be loaded or is unusable.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file already exists: {0}")]
    AlreadyExists(String),

    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    #[error("Invalid value for {key}: {detail}")]
    InvalidValue { key: &'static str, detail: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_display_for_verification() {
        for reason in [
            RejectReason::Misconfigured,
            RejectReason::Unreachable,
            RejectReason::ParseError,
            RejectReason::Failed,
            RejectReason::ActionMismatch,
            RejectReason::LowScore,
        ] {
            assert_eq!(reason.to_string(), reason.code());
            assert_eq!(ContactError::from(reason).code(), reason.code());
        }
    }

    #[test]
    fn dispatch_errors_are_server_side() {
        let err = ContactError::from(DispatchError::Status {
            relay: "monkeysmail",
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert_eq!(err.code(), "dispatch_failed");
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("502"));

        assert!(ContactError::MissingRecaptcha.is_client_error());
        assert!(ContactError::InvalidDestination("x".into()).is_client_error());
    }

    #[test]
    fn missing_fields_lists_names() {
        let err = ContactError::MissingFields(vec!["name", "message"]);
        assert_eq!(err.to_string(), "missing_fields: name, message");
    }
}
