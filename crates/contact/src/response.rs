// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! What the caller sees for each outcome.

use crate::config::Posture;
use crate::error::ContactError;
use crate::pipeline::Outcome;
use serde_json::{Value, json};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    Text(String),
    Json(Value),
}

/// Status and body for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: ReplyBody,
}

impl Reply {
    pub fn from_outcome(outcome: &Outcome, posture: Posture) -> Self {
        match outcome {
            Outcome::Ignored => Reply::text(StatusCode::OK, "OK"),
            Outcome::Delivered { .. } => Reply {
                status: StatusCode::OK,
                body: ReplyBody::Json(json!({ "ok": true })),
            },
            Outcome::Rejected(e) => Reply::from_error(e, posture),
        }
    }

    pub fn from_error(err: &ContactError, posture: Posture) -> Self {
        match err {
            ContactError::Dispatch(detail) => {
                let body = match posture {
                    Posture::Production => err.code().to_string(),
                    Posture::Development => format!("{}: {detail}", err.code()),
                };
                Reply::text(StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            ContactError::Internal(_) => {
                Reply::text(StatusCode::INTERNAL_SERVER_ERROR, err.code())
            }
            _ => Reply::text(StatusCode::BAD_REQUEST, err.code()),
        }
    }

    fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Reply {
            status,
            body: ReplyBody::Text(body.into()),
        }
    }

    pub fn into_response(self) -> Response {
        match self.body {
            ReplyBody::Text(text) => {
                warp::reply::with_status(text, self.status).into_response()
            }
            ReplyBody::Json(value) => {
                warp::reply::with_status(warp::reply::json(&value), self.status).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DispatchError, RejectReason};

    fn provider_failure() -> Outcome {
        Outcome::Rejected(ContactError::Dispatch(DispatchError::Status {
            relay: "monkeysmail",
            status: 503,
            body: "maintenance".to_string(),
        }))
    }

    #[test]
    fn success_shapes() {
        let reply = Reply::from_outcome(&Outcome::Ignored, Posture::Production);
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, ReplyBody::Text("OK".to_string()));

        let reply = Reply::from_outcome(
            &Outcome::Delivered { relay: "monkeysmail" },
            Posture::Production,
        );
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, ReplyBody::Json(json!({"ok": true})));
    }

    #[test]
    fn client_errors_carry_codes() {
        let cases = [
            (ContactError::MissingFields(vec!["name"]), "missing_fields"),
            (ContactError::MissingRecaptcha, "missing_recaptcha"),
            (ContactError::Verification(RejectReason::LowScore), "recaptcha_low_score"),
            (ContactError::InvalidDestination("x".into()), "invalid_destination"),
            (ContactError::InvalidPayload("eof".into()), "invalid_payload"),
        ];
        for (err, code) in cases {
            let reply = Reply::from_error(&err, Posture::Development);
            assert_eq!(reply.status, StatusCode::BAD_REQUEST);
            assert_eq!(reply.body, ReplyBody::Text(code.to_string()));
        }
    }

    #[test]
    fn dispatch_detail_depends_on_posture() {
        let prod = Reply::from_outcome(&provider_failure(), Posture::Production);
        assert_eq!(prod.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(prod.body, ReplyBody::Text("dispatch_failed".to_string()));

        let dev = Reply::from_outcome(&provider_failure(), Posture::Development);
        assert_eq!(dev.status, StatusCode::INTERNAL_SERVER_ERROR);
        match dev.body {
            ReplyBody::Text(text) => {
                assert!(text.starts_with("dispatch_failed: "));
                assert!(text.contains("503"));
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn internal_errors_are_generic() {
        let reply = Reply::from_error(
            &ContactError::Internal("stack trace".to_string()),
            Posture::Development,
        );
        assert_eq!(reply.body, ReplyBody::Text("server_error".to_string()));
    }
}
