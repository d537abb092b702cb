use crate::error::{Result, StarChargeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Validated request description for the vendor API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Target endpoint
    pub url: String,

    /// HTTP verb, e.g. `GET` or `POST`
    pub method: String,

    /// Headers sent verbatim with every request
    pub headers: BTreeMap<String, String>,
}

impl ApiConfig {
    /// The configured verb as an HTTP method (case-insensitive)
    pub fn http_method(&self) -> Result<reqwest::Method> {
        reqwest::Method::from_bytes(self.method.trim().to_uppercase().as_bytes()).map_err(|_| {
            StarChargeError::validation(
                "method".to_string(),
                format!("Invalid HTTP method: {}", self.method),
            )
        })
    }
}

/// Latest accepted `data` payload from the vendor
///
/// The payload is kept as-is; accessors pull out the few fields sensors use.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TelemetrySnapshot {
    data: Map<String, Value>,
}

impl TelemetrySnapshot {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Station identifier (`stubId`); numeric ids are rendered as text
    pub fn stub_id(&self) -> Option<String> {
        match self.data.get("stubId")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Raw vendor status code (`stubStatus`)
    pub fn stub_status(&self) -> Option<&str> {
        self.data.get("stubStatus").and_then(Value::as_str)
    }

    /// Nested `order` mapping, when present and an object
    pub fn order(&self) -> Option<&Map<String, Value>> {
        self.data.get("order").and_then(Value::as_object)
    }

    /// Numeric field of `order`; numbers and numeric strings are accepted
    pub fn order_number(&self, field: &str) -> Option<f64> {
        let value = match self.order()?.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(v: Value) -> TelemetrySnapshot {
        match v {
            Value::Object(map) => TelemetrySnapshot::new(map),
            _ => panic!("test snapshot must be an object"),
        }
    }

    #[test]
    fn accessors_read_vendor_fields() {
        let s = snapshot(json!({
            "stubId": "A1",
            "stubStatus": "01",
            "order": {"voltage": 230, "current": "16.5", "kw": 3.68, "note": "x"}
        }));
        assert_eq!(s.stub_id().as_deref(), Some("A1"));
        assert_eq!(s.stub_status(), Some("01"));
        assert_eq!(s.order_number("voltage"), Some(230.0));
        assert_eq!(s.order_number("current"), Some(16.5));
        assert_eq!(s.order_number("kw"), Some(3.68));
        assert_eq!(s.order_number("note"), None);
        assert_eq!(s.order_number("missing"), None);
    }

    #[test]
    fn odd_shapes_are_absent() {
        let s = snapshot(json!({"stubId": 42, "stubStatus": 1, "order": null}));
        assert_eq!(s.stub_id().as_deref(), Some("42"));
        assert_eq!(s.stub_status(), None);
        assert!(s.order().is_none());
        assert_eq!(s.order_number("voltage"), None);
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        let s = snapshot(json!({
            "order": {"voltage": "NaN", "current": "inf", "kw": "-infinity"}
        }));
        assert_eq!(s.order_number("voltage"), None);
        assert_eq!(s.order_number("current"), None);
        assert_eq!(s.order_number("kw"), None);
    }

    #[test]
    fn http_method_is_case_insensitive() {
        let mut cfg = ApiConfig {
            url: "http://localhost".into(),
            method: "post".into(),
            headers: BTreeMap::new(),
        };
        assert_eq!(cfg.http_method().unwrap(), reqwest::Method::POST);
        cfg.method = "NOT A VERB".into();
        assert!(cfg.http_method().is_err());
    }
}
