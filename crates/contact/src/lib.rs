// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Contact form relay for the ColibriV website.
//!
//! A submission is screened (honeypot, required fields, token present),
//! verified with reCAPTCHA, and delivered through one configured relay:
//! Monkeysmail email or a Drupal webform entry.

pub mod config;
pub mod error;
pub mod intake;
pub mod message;
pub mod models;
pub mod pipeline;
pub mod recaptcha;
pub mod relay;
pub mod response;
pub mod routes;

// Re-export key types for the server binary and tests
pub use crate::config::{ContactConfig, Posture, create_example_config, load_config_file};
pub use crate::error::{ConfigError, ContactError, DispatchError, RejectReason};
pub use crate::message::OutboundMessage;
pub use crate::models::{DispatchTarget, Submission, Verification};
pub use crate::pipeline::{Outcome, Pipeline};
pub use crate::recaptcha::{RecaptchaClient, Verify};
pub use crate::relay::{MonkeysmailRelay, Relay, Relays, WebformRelay};
pub use crate::routes::routes;
