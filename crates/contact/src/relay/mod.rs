// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Delivery of accepted submissions.
//!
//! Each [`DispatchTarget`] has one [`Relay`]. The pipeline asks
//! [`Relays`] for the relay of the configured target and calls it once.
//!
//! Deliveries carry no idempotency key. A client that retries after a
//! transport failure may cause the same submission to be delivered twice.

mod monkeysmail;
mod webform;

pub use monkeysmail::MonkeysmailRelay;
pub use webform::WebformRelay;

use crate::config::ContactConfig;
use crate::error::DispatchError;
use crate::models::{DispatchTarget, Submission};
use async_trait::async_trait;
use std::sync::Arc;

/// Sends one normalized submission to an external system.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    async fn deliver(&self, submission: &Submission) -> Result<(), DispatchError>;
}

/// One relay per dispatch target.
#[derive(Clone)]
pub struct Relays {
    monkeysmail: Arc<dyn Relay>,
    webform: Arc<dyn Relay>,
}

impl Relays {
    pub fn new(monkeysmail: Arc<dyn Relay>, webform: Arc<dyn Relay>) -> Self {
        Relays {
            monkeysmail,
            webform,
        }
    }

    /// Production relays sharing one HTTP client.
    pub fn from_config(config: &ContactConfig, http: reqwest::Client) -> Self {
        Relays {
            monkeysmail: Arc::new(MonkeysmailRelay::new(http.clone(), config.monkeysmail.clone())),
            webform: Arc::new(WebformRelay::new(http, config.webform.clone())),
        }
    }

    pub fn select(&self, target: DispatchTarget) -> &dyn Relay {
        match target {
            DispatchTarget::Monkeysmail => self.monkeysmail.as_ref(),
            DispatchTarget::Webform => self.webform.as_ref(),
        }
    }
}

/// Turn a non-2xx provider response into a [`DispatchError::Status`].
async fn status_error(relay: &'static str, response: reqwest::Response) -> DispatchError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| format!("HTTP {status}"));
    DispatchError::Status { relay, status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl Relay for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn deliver(&self, _submission: &Submission) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    #[test]
    fn select_by_target() {
        let relays = Relays::new(Arc::new(Named("mail")), Arc::new(Named("form")));
        assert_eq!(relays.select(DispatchTarget::Monkeysmail).name(), "mail");
        assert_eq!(relays.select(DispatchTarget::Webform).name(), "form");
    }

    #[test]
    fn from_config_wires_real_relays() {
        let relays = Relays::from_config(&ContactConfig::default(), reqwest::Client::new());
        assert_eq!(relays.select(DispatchTarget::Monkeysmail).name(), "monkeysmail");
        assert_eq!(relays.select(DispatchTarget::Webform).name(), "webform");
    }
}
