// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Guard clauses run before any network call.

use crate::error::ContactError;
use crate::models::{Submission, fields};

/// Result of screening a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intake<'a> {
    /// The honeypot was filled in. Answer as if it worked and stop.
    Honeypot,
    /// Well-formed; carries the verification token.
    Accepted { token: &'a str },
}

/// Screen a submission: honeypot, then required fields, then the token.
pub fn screen(submission: &Submission) -> Result<Intake<'_>, ContactError> {
    // Any content at all counts, whitespace included
    if submission
        .get(fields::HONEYPOT)
        .is_some_and(|value| !value.is_empty())
    {
        return Ok(Intake::Honeypot);
    }

    let missing: Vec<&'static str> = fields::REQUIRED
        .into_iter()
        .filter(|field| submission.trimmed(field).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ContactError::MissingFields(missing));
    }

    match submission.trimmed(fields::RECAPTCHA_TOKEN) {
        Some(token) => Ok(Intake::Accepted { token }),
        None => Err(ContactError::MissingRecaptcha),
    }
}
