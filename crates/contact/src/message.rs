// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Turning a submission into an email for the team inbox.

use crate::models::{Submission, fields};

const FALLBACK_REASON: &str = "General";
const FALLBACK_NAME: &str = "Unknown";
const TAG: &str = "contact-form";

/// Sender of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub email: String,
    pub name: String,
}

/// Provider-neutral email built from one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: Mailbox,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub reply_to: Option<String>,
    pub tags: Vec<String>,
}

impl OutboundMessage {
    pub fn compose(submission: &Submission, from: Mailbox, to: Vec<String>) -> Self {
        OutboundMessage {
            from,
            to,
            subject: subject_line(submission),
            text: text_body(submission),
            html: html_body(submission),
            reply_to: submission.trimmed(fields::EMAIL).map(str::to_string),
            tags: vec![TAG.to_string()],
        }
    }
}

/// `[Contact] {reason} — {name}`, with fallbacks for blank fields.
pub fn subject_line(submission: &Submission) -> String {
    let reason = submission.trimmed(fields::REASON).unwrap_or(FALLBACK_REASON);
    let name = submission.trimmed(fields::NAME).unwrap_or(FALLBACK_NAME);
    format!("[Contact] {reason} — {name}")
}

fn labelled(submission: &Submission) -> [(&'static str, &str); 4] {
    [
        ("Name", submission.or_empty(fields::NAME)),
        ("Email", submission.or_empty(fields::EMAIL)),
        ("Company", submission.or_empty(fields::COMPANY)),
        ("Reason", submission.or_empty(fields::REASON)),
    ]
}

pub fn text_body(submission: &Submission) -> String {
    let mut lines: Vec<String> = labelled(submission)
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();
    lines.push(String::new());
    lines.push(submission.or_empty(fields::MESSAGE).to_string());
    lines.join("\n")
}

pub fn html_body(submission: &Submission) -> String {
    let rows: String = labelled(submission)
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr>\
                 <td style=\"padding:6px 8px;border:1px solid #e2e8f0;background:#f8fafc;font-weight:600\">{label}</td>\
                 <td style=\"padding:6px 8px;border:1px solid #e2e8f0\">{}</td>\
                 </tr>",
                escape_html(value)
            )
        })
        .collect();

    format!(
        "<div style=\"font-family:system-ui,Segoe UI,Roboto,Helvetica,Arial,sans-serif;line-height:1.45;color:#0f172a\">\
         <h2 style=\"margin:0 0 8px 0\">New contact submission</h2>\
         <table style=\"border-collapse:collapse;width:100%;max-width:640px;margin:8px 0\"><tbody>{rows}</tbody></table>\
         <div style=\"margin-top:12px;padding:10px;border:1px solid #e2e8f0;background:#f1f5f9;white-space:pre-wrap\">{}</div>\
         </div>",
        escape_html(submission.or_empty(fields::MESSAGE))
    )
}

/// Escape the characters that matter inside element content and
/// double-quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Split a comma-separated address list, dropping blank entries.
pub fn split_recipients(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
