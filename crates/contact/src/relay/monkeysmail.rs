// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::{Relay, status_error};
use crate::config::MonkeysmailConfig;
use crate::error::DispatchError;
use crate::message::{Mailbox, OutboundMessage};
use crate::models::Submission;
use async_trait::async_trait;
use diagnostics::*;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

const RELAY: &str = "monkeysmail";
const API_KEY_HEADER: &str = "X-API-Key";

/// Monkeysmail transactional email relay.
pub struct MonkeysmailRelay {
    http: reqwest::Client,
    config: MonkeysmailConfig,
}

#[derive(Serialize)]
struct SendFrom<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: SendFrom<'a>,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl<'a> From<&'a OutboundMessage> for SendRequest<'a> {
    fn from(msg: &'a OutboundMessage) -> Self {
        SendRequest {
            from: SendFrom {
                email: &msg.from.email,
                name: &msg.from.name,
            },
            to: &msg.to,
            subject: &msg.subject,
            text: &msg.text,
            html: &msg.html,
            tags: &msg.tags,
            reply_to: msg.reply_to.as_deref(),
        }
    }
}

impl MonkeysmailRelay {
    pub fn new(http: reqwest::Client, config: MonkeysmailConfig) -> Self {
        MonkeysmailRelay { http, config }
    }

    fn send_url(&self) -> String {
        format!(
            "{}/messages/send?mode=sync",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn misconfigured(detail: &str) -> DispatchError {
        DispatchError::Misconfigured {
            relay: RELAY,
            detail: detail.to_string(),
        }
    }

    /// Build the message, or say which setting is missing.
    pub fn compose(&self, submission: &Submission) -> Result<OutboundMessage, DispatchError> {
        let from_email = self
            .config
            .from_email
            .as_deref()
            .ok_or_else(|| Self::misconfigured("MONKEYSMAIL_FROM_EMAIL is not set"))?;

        let to = self.config.recipients();
        if to.is_empty() {
            return Err(Self::misconfigured("MONKEYSMAIL_TO has no recipients"));
        }

        let from = Mailbox {
            email: from_email.to_string(),
            name: self.config.from_name.clone(),
        };
        Ok(OutboundMessage::compose(submission, from, to))
    }
}

#[async_trait]
impl Relay for MonkeysmailRelay {
    fn name(&self) -> &'static str {
        RELAY
    }

    async fn deliver(&self, submission: &Submission) -> Result<(), DispatchError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Self::misconfigured("MONKEYSMAIL_API_KEY is not set"))?;
        let message = self.compose(submission)?;

        let body = serde_json::to_vec(&SendRequest::from(&message))
            .map_err(|source| DispatchError::Encode { relay: RELAY, source })?;

        let url = self.send_url();
        let recipients = message.to.len();
        debug!("Sending contact email via Monkeysmail to {recipients} recipients");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key)
            .body(body)
            .send()
            .await
            .map_err(|e| DispatchError::transport(RELAY, e))?;

        if !response.status().is_success() {
            return Err(status_error(RELAY, response).await);
        }

        info!("Contact email accepted by Monkeysmail");
        Ok(())
    }
}
