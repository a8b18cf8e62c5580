// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::{Relay, status_error};
use crate::config::WebformConfig;
use crate::error::DispatchError;
use crate::models::{Submission, fields};
use async_trait::async_trait;
use diagnostics::*;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::Serialize;

const RELAY: &str = "webform";
const CSRF_HEADER: &str = "X-CSRF-Token";

/// Drupal Webform REST relay: stores the submission as a webform entry.
pub struct WebformRelay {
    http: reqwest::Client,
    config: WebformConfig,
}

#[derive(Serialize)]
struct WebformSubmission<'a> {
    webform_id: &'a str,
    name: &'a str,
    email: &'a str,
    company: &'a str,
    reason: &'a str,
    message: &'a str,
}

impl WebformRelay {
    pub fn new(http: reqwest::Client, config: WebformConfig) -> Self {
        WebformRelay { http, config }
    }

    fn base_url(&self) -> Result<&str, DispatchError> {
        self.config
            .base_url
            .as_deref()
            .map(|base| base.trim_end_matches('/'))
            .filter(|base| !base.is_empty())
            .ok_or_else(|| DispatchError::Misconfigured {
                relay: RELAY,
                detail: "DRUPAL_BASE_URL is not set".to_string(),
            })
    }

    fn token_url(base: &str) -> String {
        format!("{base}/session/token")
    }

    fn submit_url(base: &str, webform_id: &str) -> String {
        format!("{base}/webform_rest/submit/{webform_id}")
    }

    /// Fetch the anti-forgery token required for cookie-less POSTs.
    async fn csrf_token(&self, base: &str) -> Result<String, DispatchError> {
        let response = self
            .http
            .get(Self::token_url(base))
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| DispatchError::Token {
                relay: RELAY,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Token {
                relay: RELAY,
                detail: format!("HTTP {}", status.as_u16()),
            });
        }

        let token = response.text().await.map_err(|e| DispatchError::Token {
            relay: RELAY,
            detail: e.to_string(),
        })?;
        let token = token.trim();
        if token.is_empty() {
            return Err(DispatchError::Token {
                relay: RELAY,
                detail: "empty token".to_string(),
            });
        }
        Ok(token.to_string())
    }
}

#[async_trait]
impl Relay for WebformRelay {
    fn name(&self) -> &'static str {
        RELAY
    }

    async fn deliver(&self, submission: &Submission) -> Result<(), DispatchError> {
        let base = self.base_url()?;
        let webform_id = self.config.webform_id.as_str();

        let token = self.csrf_token(base).await?;
        debug!("Obtained CSRF token for webform {webform_id}");

        let payload = WebformSubmission {
            webform_id,
            name: submission.or_empty(fields::NAME),
            email: submission.or_empty(fields::EMAIL),
            company: submission.or_empty(fields::COMPANY),
            reason: submission.or_empty(fields::REASON),
            message: submission.or_empty(fields::MESSAGE),
        };
        let body = serde_json::to_vec(&payload)
            .map_err(|source| DispatchError::Encode { relay: RELAY, source })?;

        let response = self
            .http
            .post(Self::submit_url(base, webform_id))
            .header(CONTENT_TYPE, "application/json")
            .header(CSRF_HEADER, token)
            .body(body)
            .send()
            .await
            .map_err(|e| DispatchError::transport(RELAY, e))?;

        if !response.status().is_success() {
            return Err(status_error(RELAY, response).await);
        }

        info!("Contact submission stored in webform {webform_id}");
        Ok(())
    }
}
