// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Service configuration.
//!
//! Built once at startup from an optional YAML file, then overlaid with
//! environment variables, then validated. The result is read-only and is
//! handed to the verification client and each relay.
//!
//! ```yaml
//! posture: production
//! destination: monkeysmail
//! http_timeout_secs: 5
//! recaptcha:
//!   secret: "..."
//!   min_score: 0.5
//! monkeysmail:
//!   api_key: "..."
//!   from_email: "no-reply@colibriv.com"
//!   to: "team@colibriv.com, press@colibriv.com"
//! webform:
//!   base_url: "https://cms.colibriv.com"
//!   webform_id: "contact"
//! ```

use crate::error::ConfigError;
use crate::message::split_recipients;
use crate::models::DispatchTarget;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_ACTION: &str = "contact";
pub const DEFAULT_MIN_SCORE: f64 = 0.5;
pub const DEFAULT_MONKEYSMAIL_BASE: &str = "https://smtp.monkeysmail.com";
pub const DEFAULT_FROM_NAME: &str = "ColibriV";
pub const DEFAULT_WEBFORM_ID: &str = "contact";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// How much failure detail callers get to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    #[default]
    Production,
    Development,
}

impl FromStr for Posture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Posture::Production),
            "development" | "dev" => Ok(Posture::Development),
            other => Err(format!("expected 'production' or 'development', got '{other}'")),
        }
    }
}

/// Everything the submission pipeline reads.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub posture: Posture,
    /// Raw relay selector; resolved per request so a bad value surfaces
    /// as `invalid_destination`.
    pub destination: Option<String>,
    pub http_timeout_secs: u64,
    pub recaptcha: RecaptchaConfig,
    pub monkeysmail: MonkeysmailConfig,
    pub webform: WebformConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecaptchaConfig {
    pub secret: Option<String>,
    pub verify_url: String,
    pub expected_action: String,
    pub min_score: f64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonkeysmailConfig {
    pub api_key: Option<String>,
    pub from_email: Option<String>,
    pub from_name: String,
    /// Comma-separated recipient list
    pub to: Option<String>,
    pub api_base: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebformConfig {
    pub base_url: Option<String>,
    pub webform_id: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        ContactConfig {
            posture: Posture::default(),
            destination: None,
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            recaptcha: RecaptchaConfig::default(),
            monkeysmail: MonkeysmailConfig::default(),
            webform: WebformConfig::default(),
        }
    }
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        RecaptchaConfig {
            secret: None,
            verify_url: DEFAULT_VERIFY_URL.to_string(),
            expected_action: DEFAULT_ACTION.to_string(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl Default for MonkeysmailConfig {
    fn default() -> Self {
        MonkeysmailConfig {
            api_key: None,
            from_email: None,
            from_name: DEFAULT_FROM_NAME.to_string(),
            to: None,
            api_base: DEFAULT_MONKEYSMAIL_BASE.to_string(),
        }
    }
}

impl Default for WebformConfig {
    fn default() -> Self {
        WebformConfig {
            base_url: None,
            webform_id: DEFAULT_WEBFORM_ID.to_string(),
        }
    }
}

impl MonkeysmailConfig {
    pub fn recipients(&self) -> Vec<String> {
        self.to.as_deref().map(split_recipients).unwrap_or_default()
    }
}

impl ContactConfig {
    /// Load from an optional YAML file plus environment overrides, then
    /// validate. `lookup` reads one environment variable.
    pub fn load<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => load_config_file(path)?,
            None => ContactConfig::default(),
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load using the process environment.
    pub fn from_process_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load(path, |key| std::env::var(key).ok())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Overlay environment variables. Set-but-empty variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CONTACT_ENV") {
            self.posture = v.parse().map_err(|detail| ConfigError::InvalidValue {
                key: "CONTACT_ENV",
                detail,
            })?;
        }
        if let Some(v) = get("CONTACT_DESTINATION") {
            self.destination = Some(v);
        }
        if let Some(v) = get("CONTACT_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_number("CONTACT_HTTP_TIMEOUT_SECS", &v)?;
        }

        if let Some(v) = get("RECAPTCHA_SECRET") {
            self.recaptcha.secret = Some(v);
        }
        if let Some(v) = get("RECAPTCHA_VERIFY_URL") {
            self.recaptcha.verify_url = v;
        }
        if let Some(v) = get("RECAPTCHA_ACTION") {
            self.recaptcha.expected_action = v;
        }
        if let Some(v) = get("RECAPTCHA_MIN_SCORE") {
            self.recaptcha.min_score = parse_number("RECAPTCHA_MIN_SCORE", &v)?;
        }

        if let Some(v) = get("MONKEYSMAIL_API_KEY") {
            self.monkeysmail.api_key = Some(v);
        }
        if let Some(v) = get("MONKEYSMAIL_FROM_EMAIL") {
            self.monkeysmail.from_email = Some(v);
        }
        if let Some(v) = get("MONKEYSMAIL_FROM_NAME") {
            self.monkeysmail.from_name = v;
        }
        if let Some(v) = get("MONKEYSMAIL_TO") {
            self.monkeysmail.to = Some(v);
        }
        if let Some(v) = get("MONKEYSMAIL_API_BASE") {
            self.monkeysmail.api_base = v;
        }

        if let Some(v) = get("DRUPAL_BASE_URL").or_else(|| get("NEXT_PUBLIC_DRUPAL_BASE_URL")) {
            self.webform.base_url = Some(v);
        }
        if let Some(v) = get("DRUPAL_WEBFORM_ID") {
            self.webform.webform_id = v;
        }

        Ok(())
    }

    /// Reject values that would make every request fail the same way.
    ///
    /// Missing provider credentials are not errors here; see
    /// [`ContactConfig::warnings`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "http_timeout_secs",
                detail: "must be greater than 0".to_string(),
            });
        }

        let score = self.recaptcha.min_score;
        if !(0.0..=1.0).contains(&score) {
            return Err(ConfigError::InvalidValue {
                key: "recaptcha.min_score",
                detail: format!("{score} is outside 0.0..=1.0"),
            });
        }

        if self.recaptcha.expected_action.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "recaptcha.expected_action",
                detail: "cannot be empty".to_string(),
            });
        }

        check_url("recaptcha.verify_url", &self.recaptcha.verify_url)?;
        check_url("monkeysmail.api_base", &self.monkeysmail.api_base)?;
        if let Some(base) = &self.webform.base_url {
            check_url("webform.base_url", base)?;
        }

        Ok(())
    }

    /// Gaps that will fail submissions at request time.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.recaptcha.secret.is_none() {
            warnings.push("RECAPTCHA_SECRET is not set; every submission will fail verification".to_string());
        }

        match DispatchTarget::resolve(self.destination.as_deref()) {
            Err(_) => warnings.push(format!(
                "destination '{}' is not recognized; submissions will be rejected",
                self.destination.as_deref().unwrap_or_default()
            )),
            Ok(DispatchTarget::Monkeysmail) => {
                if self.monkeysmail.api_key.is_none() {
                    warnings.push("MONKEYSMAIL_API_KEY is not set".to_string());
                }
                if self.monkeysmail.from_email.is_none() {
                    warnings.push("MONKEYSMAIL_FROM_EMAIL is not set".to_string());
                }
                if self.monkeysmail.recipients().is_empty() {
                    warnings.push("MONKEYSMAIL_TO has no recipients".to_string());
                }
            }
            Ok(DispatchTarget::Webform) => {
                if self.webform.base_url.is_none() {
                    warnings.push("DRUPAL_BASE_URL is not set".to_string());
                }
            }
        }

        warnings
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// The one HTTP client every outbound call shares.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout())
            .connect_timeout(self.timeout())
            .build()?)
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            detail: format!("'{value}': {e}"),
        })
}

fn check_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        key,
        detail: format!("'{value}': {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidValue {
            key,
            detail: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    if secret.is_some() { "<redacted>" } else { "<unset>" }
}

impl fmt::Debug for ContactConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactConfig")
            .field("posture", &self.posture)
            .field("destination", &self.destination)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("recaptcha", &self.recaptcha)
            .field("monkeysmail", &self.monkeysmail)
            .field("webform", &self.webform)
            .finish()
    }
}

impl fmt::Debug for RecaptchaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecaptchaConfig")
            .field("secret", &redact(&self.secret))
            .field("verify_url", &self.verify_url)
            .field("expected_action", &self.expected_action)
            .field("min_score", &self.min_score)
            .finish()
    }
}

impl fmt::Debug for MonkeysmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonkeysmailConfig")
            .field("api_key", &redact(&self.api_key))
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("to", &self.recipients())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl fmt::Debug for WebformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebformConfig")
            .field("base_url", &self.base_url)
            .field("webform_id", &self.webform_id)
            .finish()
    }
}

/// Load configuration from a YAML file. Environment overrides are not
/// applied; see [`ContactConfig::load`].
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<ContactConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    ContactConfig::from_yaml_str(&content)
}

const EXAMPLE_CONFIG: &str = r#"# Contact form relay configuration.
# Every key can be overridden by the environment variable named beside it.

posture: production            # CONTACT_ENV: production | development
destination: monkeysmail       # CONTACT_DESTINATION: monkeysmail | drupal
http_timeout_secs: 5           # CONTACT_HTTP_TIMEOUT_SECS

recaptcha:
  secret: "your-recaptcha-secret"          # RECAPTCHA_SECRET
  verify_url: "https://www.google.com/recaptcha/api/siteverify"
  expected_action: "contact"               # RECAPTCHA_ACTION
  min_score: 0.5                           # RECAPTCHA_MIN_SCORE

monkeysmail:
  api_key: "your-monkeysmail-api-key"      # MONKEYSMAIL_API_KEY
  from_email: "no-reply@colibriv.com"      # MONKEYSMAIL_FROM_EMAIL
  from_name: "ColibriV"                    # MONKEYSMAIL_FROM_NAME
  to: "contact@colibriv.com"               # MONKEYSMAIL_TO (comma-separated)
  api_base: "https://smtp.monkeysmail.com" # MONKEYSMAIL_API_BASE

webform:
  base_url: "https://cms.colibriv.com"     # DRUPAL_BASE_URL
  webform_id: "contact"                    # DRUPAL_WEBFORM_ID
"#;

/// Write an example configuration file. Refuses to overwrite.
pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.display().to_string()));
    }
    std::fs::write(path, EXAMPLE_CONFIG).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}
