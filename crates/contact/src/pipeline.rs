// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The contact submission pipeline.
//!
//! intake -> verification -> destination -> relay. Each step runs only if
//! the previous one succeeded. Nothing is shared between submissions
//! except read-only configuration and the HTTP client pool.

use crate::config::ContactConfig;
use crate::error::{ConfigError, ContactError};
use crate::intake::{Intake, screen};
use crate::models::{DispatchTarget, Submission, Verification};
use crate::recaptcha::{RecaptchaClient, Verify};
use crate::relay::Relays;
use diagnostics::*;
use std::sync::Arc;

/// How a submission ended.
#[derive(Debug)]
pub enum Outcome {
    /// Honeypot tripped; nothing was sent.
    Ignored,
    /// Delivered through the named relay.
    Delivered { relay: &'static str },
    Rejected(ContactError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Rejected(_))
    }
}

/// Handles contact submissions. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<ContactConfig>,
    verifier: Arc<dyn Verify>,
    relays: Relays,
}

impl Pipeline {
    pub fn new(config: ContactConfig, verifier: Arc<dyn Verify>, relays: Relays) -> Self {
        Pipeline {
            config: Arc::new(config),
            verifier,
            relays,
        }
    }

    /// Wire the production verifier and relays around one HTTP client.
    pub fn from_config(config: ContactConfig) -> Result<Self, ConfigError> {
        let http = config.http_client()?;
        let verifier = Arc::new(RecaptchaClient::new(http.clone(), &config.recaptcha));
        let relays = Relays::from_config(&config, http);
        Ok(Pipeline::new(config, verifier, relays))
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// Run one submission to completion.
    pub async fn submit(&self, submission: &Submission) -> Outcome {
        let outcome = match self.process(submission).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Rejected(e),
        };

        match &outcome {
            Outcome::Ignored => info!("Honeypot tripped; submission ignored"),
            Outcome::Delivered { relay } => {
                let relay = *relay;
                info!("Contact submission delivered via {relay}");
            }
            Outcome::Rejected(e) if e.is_client_error() => {
                let code = e.code();
                let detail = e.to_string();
                warn!("Contact submission rejected ({code}): {detail}");
            }
            Outcome::Rejected(e) => {
                let code = e.code();
                let detail = e.to_string();
                error!("Contact submission failed ({code}): {detail}");
            }
        }
        outcome
    }

    async fn process(&self, submission: &Submission) -> Result<Outcome, ContactError> {
        let token = match screen(submission)? {
            Intake::Honeypot => return Ok(Outcome::Ignored),
            Intake::Accepted { token } => token,
        };

        let expected_action = self.config.recaptcha.expected_action.as_str();
        if let Verification::Rejected(reason) = self.verifier.verify(token, expected_action).await {
            return Err(reason.into());
        }

        let target = DispatchTarget::resolve(self.config.destination.as_deref())?;
        let relay = self.relays.select(target);
        relay.deliver(submission).await?;

        Ok(Outcome::Delivered {
            relay: relay.name(),
        })
    }
}
