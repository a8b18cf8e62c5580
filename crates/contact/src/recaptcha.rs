// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! reCAPTCHA v3 token verification.

use crate::config::RecaptchaConfig;
use crate::error::RejectReason;
use crate::models::Verification;
use async_trait::async_trait;
use diagnostics::*;
use serde::Deserialize;

/// Anything that can judge a bot-mitigation token.
#[async_trait]
pub trait Verify: Send + Sync {
    async fn verify(&self, token: &str, expected_action: &str) -> Verification;
}

/// Body returned by the siteverify endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteVerifyResponse {
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

impl SiteVerifyResponse {
    /// Apply the acceptance rules.
    ///
    /// A score below `min_score` rejects the token whatever the success
    /// flag says. An action is only compared when the service reports one.
    pub fn evaluate(&self, expected_action: &str, min_score: f64) -> Verification {
        if let Some(score) = self.score {
            if score < min_score {
                return Verification::Rejected(RejectReason::LowScore);
            }
        }
        if !self.success {
            return Verification::Rejected(RejectReason::Failed);
        }
        if let Some(action) = &self.action {
            if action != expected_action {
                return Verification::Rejected(RejectReason::ActionMismatch);
            }
        }
        Verification::Verified
    }
}

/// Client for Google's siteverify API.
pub struct RecaptchaClient {
    http: reqwest::Client,
    secret: Option<String>,
    verify_url: String,
    min_score: f64,
}

impl RecaptchaClient {
    pub fn new(http: reqwest::Client, config: &RecaptchaConfig) -> Self {
        RecaptchaClient {
            http,
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
            min_score: config.min_score,
        }
    }

    async fn fetch(&self, secret: &str, token: &str) -> Result<SiteVerifyResponse, RejectReason> {
        let response = self
            .http
            .post(&self.verify_url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .map_err(|e| {
                let detail = e.to_string();
                let timed_out = e.is_timeout();
                error!("reCAPTCHA verification request failed (timeout: {timed_out}): {detail}");
                RejectReason::Unreachable
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            let detail = e.to_string();
            error!("Failed to read reCAPTCHA response body: {detail}");
            RejectReason::Unreachable
        })?;

        serde_json::from_str(&body).map_err(|e| {
            let detail = e.to_string();
            error!("Failed to parse reCAPTCHA response (HTTP {status}): {detail}");
            RejectReason::ParseError
        })
    }
}

#[async_trait]
impl Verify for RecaptchaClient {
    async fn verify(&self, token: &str, expected_action: &str) -> Verification {
        let Some(secret) = self.secret.as_deref() else {
            error!("RECAPTCHA_SECRET is not configured");
            return Verification::Rejected(RejectReason::Misconfigured);
        };

        let response = match self.fetch(secret, token).await {
            Ok(response) => response,
            Err(reason) => return Verification::Rejected(reason),
        };

        let verdict = response.evaluate(expected_action, self.min_score);
        if let Verification::Rejected(reason) = verdict {
            let code = reason.code();
            let success = response.success;
            let score = response.score.unwrap_or(-1.0);
            let action = response.action.clone().unwrap_or_default();
            let hostname = response.hostname.clone().unwrap_or_default();
            let error_codes = response.error_codes.join(",");
            warn!("reCAPTCHA rejected token: {code} (success: {success}, score: {score}, action: {action}, hostname: {hostname}, error-codes: {error_codes})");
        } else {
            debug!("reCAPTCHA token verified");
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(success: bool, score: Option<f64>, action: Option<&str>) -> SiteVerifyResponse {
        SiteVerifyResponse {
            success,
            score,
            action: action.map(str::to_string),
            hostname: None,
            error_codes: vec![],
        }
    }

    #[test]
    fn accepts_good_token() {
        let r = response(true, Some(0.9), Some("contact"));
        assert_eq!(r.evaluate("contact", 0.5), Verification::Verified);
    }

    #[test]
    fn accepts_without_action_or_score() {
        let r = response(true, None, None);
        assert_eq!(r.evaluate("contact", 0.5), Verification::Verified);
    }

    #[test]
    fn threshold_is_inclusive() {
        let r = response(true, Some(0.5), Some("contact"));
        assert_eq!(r.evaluate("contact", 0.5), Verification::Verified);
    }

    #[test]
    fn failure_flag() {
        let r = response(false, None, Some("contact"));
        assert_eq!(
            r.evaluate("contact", 0.5),
            Verification::Rejected(RejectReason::Failed)
        );
    }

    #[test]
    fn action_mismatch() {
        let r = response(true, Some(0.9), Some("login"));
        assert_eq!(
            r.evaluate("contact", 0.5),
            Verification::Rejected(RejectReason::ActionMismatch)
        );
    }

    #[test]
    fn low_score_regardless_of_success() {
        for success in [true, false] {
            let r = response(success, Some(0.3), Some("contact"));
            assert_eq!(
                r.evaluate("contact", 0.5),
                Verification::Rejected(RejectReason::LowScore)
            );
        }
    }

    #[test]
    fn threshold_is_configurable() {
        let r = response(true, Some(0.6), None);
        assert_eq!(
            r.evaluate("contact", 0.7),
            Verification::Rejected(RejectReason::LowScore)
        );
    }

    #[test]
    fn decodes_google_shape() {
        let body = r#"{"success":false,"error-codes":["timeout-or-duplicate"],"hostname":"colibriv.com"}"#;
        let r: SiteVerifyResponse = serde_json::from_str(body).expect("decode");
        assert!(!r.success);
        assert_eq!(r.error_codes, vec!["timeout-or-duplicate"]);
        assert_eq!(r.score, None);
    }

    #[tokio::test]
    async fn missing_secret_skips_the_network() {
        let config = RecaptchaConfig {
            secret: None,
            // Nothing listens here; a request would fail as Unreachable
            verify_url: "http://127.0.0.1:9/siteverify".to_string(),
            ..RecaptchaConfig::default()
        };
        let client = RecaptchaClient::new(reqwest::Client::new(), &config);
        assert_eq!(
            client.verify("tok", "contact").await,
            Verification::Rejected(RejectReason::Misconfigured)
        );
    }
}
