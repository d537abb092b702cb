//! Setup-time validation of the user's API configuration
//!
//! The user pastes a JSON blob with `url`, `method` and `headers`. It is
//! parsed, checked for the required keys, and then probed once against the
//! vendor to confirm the endpoint answers with a success envelope. The probe
//! payload is discarded; only the original request description is kept.

use crate::api::{ApiConfig, Envelope, HttpTransport};
use crate::error::{SetupError, StarChargeError};
use crate::logging::{StructuredLogger, get_logger};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Title given to a created entry
pub const ENTRY_TITLE: &str = "StarCharge API";

/// Form step shown to the user
pub const STEP_USER: &str = "user";

const REQUIRED_KEYS: [&str; 3] = ["url", "method", "headers"];

/// Validates setup blobs, probing the vendor with the injected transport
#[derive(Clone)]
pub struct ConfigValidator {
    transport: Arc<dyn HttpTransport>,
    logger: StructuredLogger,
}

impl ConfigValidator {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            logger: get_logger("setup"),
        }
    }

    /// Parse and shape-check a setup blob without touching the network
    pub fn parse(raw_text: &str) -> Result<ApiConfig, SetupError> {
        let value: Value = serde_json::from_str(raw_text).map_err(|_| SetupError::InvalidJson)?;

        let Some(object) = value.as_object() else {
            return Err(SetupError::InvalidApiConfig);
        };
        if REQUIRED_KEYS
            .iter()
            .any(|key| object.get(*key).is_none_or(Value::is_null))
        {
            return Err(SetupError::InvalidApiConfig);
        }

        let config: ApiConfig =
            serde_json::from_value(value).map_err(|_| SetupError::InvalidApiConfig)?;
        config
            .http_method()
            .map_err(|_| SetupError::InvalidApiConfig)?;
        Ok(config)
    }

    /// Full validation: parse, then one probe request
    pub async fn validate(&self, raw_text: &str) -> Result<ApiConfig, SetupError> {
        let config = Self::parse(raw_text)?;
        self.probe(&config).await?;
        self.logger
            .info(&format!("Validated API configuration for {}", config.url));
        Ok(config)
    }

    async fn probe(&self, config: &ApiConfig) -> Result<(), SetupError> {
        let response = match self.transport.execute(config).await {
            Ok(response) => response,
            Err(
                e @ (StarChargeError::Network { .. }
                | StarChargeError::Timeout { .. }
                | StarChargeError::Api { .. }),
            ) => {
                self.logger.warn(&format!("Probe request failed: {}", e));
                return Err(SetupError::CannotConnect);
            }
            Err(e) => return Err(SetupError::Unknown(e.to_string())),
        };

        let envelope = Envelope::parse(&response).map_err(|e| {
            self.logger.warn(&format!("Probe response rejected: {}", e));
            SetupError::CannotConnect
        })?;
        if !envelope.is_success() {
            self.logger.warn(&format!(
                "Probe returned API code {}",
                envelope.code_text()
            ));
            return Err(SetupError::CannotConnect);
        }
        Ok(())
    }
}

/// Result of one submission of the setup form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetupOutcome {
    CreateEntry {
        title: String,
        data: ApiConfig,
    },
    ShowForm {
        step_id: String,
        errors: BTreeMap<String, String>,
    },
}

impl SetupOutcome {
    fn form_error(error: &SetupError) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert("base".to_string(), error.form_code().to_string());
        SetupOutcome::ShowForm {
            step_id: STEP_USER.to_string(),
            errors,
        }
    }
}

/// The user-facing setup step: every failure becomes a form error code
#[derive(Clone)]
pub struct SetupFlow {
    validator: ConfigValidator,
}

impl SetupFlow {
    pub fn new(validator: ConfigValidator) -> Self {
        Self { validator }
    }

    pub async fn submit(&self, user_input: &str) -> SetupOutcome {
        let validator = self.validator.clone();
        let input = user_input.to_string();
        // Run on its own task so a panic in the probe surfaces as "unknown"
        let joined = tokio::spawn(async move { validator.validate(&input).await }).await;

        let result = joined.unwrap_or_else(|e| Err(SetupError::Unknown(e.to_string())));
        match result {
            Ok(data) => SetupOutcome::CreateEntry {
                title: ENTRY_TITLE.to_string(),
                data,
            },
            Err(error) => {
                if let SetupError::Unknown(cause) = &error {
                    self.validator
                        .logger
                        .error(&format!("Unexpected exception during setup: {}", cause));
                }
                SetupOutcome::form_error(&error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_non_json() {
        for input in ["", "{", "url=http://x", "{'url': 'x'}"] {
            assert_eq!(
                ConfigValidator::parse(input).unwrap_err(),
                SetupError::InvalidJson
            );
        }
    }

    #[test]
    fn parse_requires_all_keys() {
        let cases = [
            r#"{"method":"GET","headers":{}}"#,
            r#"{"url":"http://x","headers":{}}"#,
            r#"{"url":"http://x","method":"GET"}"#,
            r#"{"url":null,"method":"GET","headers":{}}"#,
            r#"[]"#,
            r#""just a string""#,
        ];
        for input in cases {
            assert_eq!(
                ConfigValidator::parse(input).unwrap_err(),
                SetupError::InvalidApiConfig,
                "input {}",
                input
            );
        }
    }

    #[test]
    fn parse_rejects_wrong_types() {
        let cases = [
            r#"{"url":1,"method":"GET","headers":{}}"#,
            r#"{"url":"http://x","method":"GET","headers":{"X":1}}"#,
            r#"{"url":"http://x","method":"GET","headers":[]}"#,
            r#"{"url":"http://x","method":"BAD VERB","headers":{}}"#,
        ];
        for input in cases {
            assert_eq!(
                ConfigValidator::parse(input).unwrap_err(),
                SetupError::InvalidApiConfig
            );
        }
    }

    #[test]
    fn parse_keeps_headers_and_ignores_extras() {
        let cfg = ConfigValidator::parse(
            r#"{"url":"https://api.example/stub","method":"POST","headers":{"token":"abc"},"comment":"x"}"#,
        )
        .unwrap();
        assert_eq!(cfg.url, "https://api.example/stub");
        assert_eq!(cfg.method, "POST");
        assert_eq!(cfg.headers.get("token").map(String::as_str), Some("abc"));
    }

    #[test]
    fn outcome_serializes_like_a_form() {
        let outcome = SetupOutcome::form_error(&SetupError::CannotConnect);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "show_form");
        assert_eq!(json["step_id"], "user");
        assert_eq!(json["errors"]["base"], "cannot_connect");
    }
}
