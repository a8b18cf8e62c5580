// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Test doubles for the verifier and relays.

#![allow(dead_code)]

use async_trait::async_trait;
use contact::config::ContactConfig;
use contact::{
    DispatchError, Pipeline, RejectReason, Relay, Relays, Submission, Verification, Verify,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Verifier that returns a fixed verdict and counts calls.
pub struct FakeVerifier {
    verdict: Verification,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
}

impl FakeVerifier {
    pub fn new(verdict: Verification) -> Arc<Self> {
        Arc::new(FakeVerifier {
            verdict,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn passing() -> Arc<Self> {
        Self::new(Verification::Verified)
    }

    pub fn rejecting(reason: RejectReason) -> Arc<Self> {
        Self::new(Verification::Rejected(reason))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (token, expected action) pairs seen so far
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Verify for FakeVerifier {
    async fn verify(&self, token: &str, expected_action: &str) -> Verification {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("lock")
            .push((token.to_string(), expected_action.to_string()));
        self.verdict
    }
}

/// Relay that records deliveries, optionally failing with an HTTP status.
pub struct FakeRelay {
    name: &'static str,
    fail_status: Option<u16>,
    delivered: Mutex<Vec<Submission>>,
}

impl FakeRelay {
    pub fn ok(name: &'static str) -> Arc<Self> {
        Arc::new(FakeRelay {
            name,
            fail_status: None,
            delivered: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &'static str, status: u16) -> Arc<Self> {
        Arc::new(FakeRelay {
            name,
            fail_status: Some(status),
            delivered: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.delivered.lock().expect("lock").len()
    }

    pub fn delivered(&self) -> Vec<Submission> {
        self.delivered.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Relay for FakeRelay {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn deliver(&self, submission: &Submission) -> Result<(), DispatchError> {
        self.delivered.lock().expect("lock").push(submission.clone());
        match self.fail_status {
            None => Ok(()),
            Some(status) => Err(DispatchError::Status {
                relay: self.name,
                status,
                body: "provider exploded".to_string(),
            }),
        }
    }
}

/// A pipeline plus handles on every double it uses.
pub struct Harness {
    pub pipeline: Pipeline,
    pub verifier: Arc<FakeVerifier>,
    pub mail: Arc<FakeRelay>,
    pub webform: Arc<FakeRelay>,
}

impl Harness {
    pub fn new(config: ContactConfig, verifier: Arc<FakeVerifier>) -> Self {
        Self::with_relays(config, verifier, FakeRelay::ok("monkeysmail"), FakeRelay::ok("webform"))
    }

    pub fn with_relays(
        config: ContactConfig,
        verifier: Arc<FakeVerifier>,
        mail: Arc<FakeRelay>,
        webform: Arc<FakeRelay>,
    ) -> Self {
        let relays = Relays::new(mail.clone(), webform.clone());
        let pipeline = Pipeline::new(config, verifier.clone(), relays);
        Harness {
            pipeline,
            verifier,
            mail,
            webform,
        }
    }

    /// Total outbound calls of any kind.
    pub fn outbound_calls(&self) -> usize {
        self.verifier.calls() + self.mail.calls() + self.webform.calls()
    }
}

/// A submission that passes every guard clause.
pub fn valid_submission() -> Submission {
    Submission::default()
        .with("name", "Ada")
        .with("email", "ada@example.com")
        .with("company", "Analytical Engines Ltd")
        .with("reason", "Partnerships")
        .with("message", "We would like to discuss a hydrogen testbed.")
        .with("grecaptchaToken", "token-123")
}
