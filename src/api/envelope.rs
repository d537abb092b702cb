use super::transport::HttpResponse;
use super::types::TelemetrySnapshot;
use crate::error::FetchError;
use serde_json::Value;

/// The only `code` value the vendor uses for success
pub const SUCCESS_CODE: &str = "200";

/// Outer `{"code": ..., "data": ...}` object returned by the vendor
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub code: Option<Value>,
    pub data: Option<Value>,
}

impl Envelope {
    /// Check transport status and decode the body into an envelope.
    ///
    /// Does not look at `code`; see [`Envelope::is_success`].
    pub fn parse(response: &HttpResponse) -> Result<Self, FetchError> {
        if response.status != 200 {
            return Err(FetchError::Http(response.status));
        }

        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| FetchError::MalformedBody(e.to_string()))?;
        match value {
            Value::Object(mut map) => Ok(Self {
                code: map.remove("code"),
                data: map.remove("data"),
            }),
            other => Err(FetchError::MalformedBody(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// `code` must be the JSON string "200"; the number 200 does not count
    pub fn is_success(&self) -> bool {
        matches!(&self.code, Some(Value::String(code)) if code == SUCCESS_CODE)
    }

    /// `code` as shown in error messages
    pub fn code_text(&self) -> String {
        match &self.code {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "missing".to_string(),
        }
    }

    /// Fail with `ApiError` unless the envelope is successful
    pub fn ensure_success(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::ApiError(self.code_text()))
        }
    }

    /// Successful envelope → snapshot; `data` must be an object
    pub fn into_snapshot(self) -> Result<TelemetrySnapshot, FetchError> {
        let envelope = self.ensure_success()?;
        match envelope.data {
            Some(Value::Object(map)) => Ok(TelemetrySnapshot::new(map)),
            Some(other) => Err(FetchError::MalformedBody(format!(
                "data must be an object, got {}",
                json_kind(&other)
            ))),
            None => Err(FetchError::MalformedBody("missing data field".to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, body.as_bytes().to_vec())
    }

    #[test]
    fn non_200_status_is_http_error() {
        let err = Envelope::parse(&HttpResponse::new(502, b"{}".to_vec())).unwrap_err();
        assert_eq!(err, FetchError::Http(502));
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            Envelope::parse(&ok("<html>")),
            Err(FetchError::MalformedBody(_))
        ));
        assert!(matches!(
            Envelope::parse(&ok("[1,2]")),
            Err(FetchError::MalformedBody(_))
        ));
    }

    #[test]
    fn code_must_be_string_200() {
        assert!(Envelope::parse(&ok(r#"{"code":"200"}"#)).unwrap().is_success());
        assert!(!Envelope::parse(&ok(r#"{"code":200}"#)).unwrap().is_success());
        assert!(!Envelope::parse(&ok(r#"{"code":"500"}"#)).unwrap().is_success());
        assert!(!Envelope::parse(&ok(r#"{}"#)).unwrap().is_success());
    }

    #[test]
    fn api_error_carries_code() {
        let env = Envelope::parse(&ok(r#"{"code":"401","msg":"token expired"}"#)).unwrap();
        assert_eq!(
            env.into_snapshot().unwrap_err(),
            FetchError::ApiError("401".to_string())
        );
        let env = Envelope::parse(&ok(r#"{"data":{}}"#)).unwrap();
        assert_eq!(
            env.into_snapshot().unwrap_err(),
            FetchError::ApiError("missing".to_string())
        );
    }

    #[test]
    fn data_must_be_an_object() {
        let env = Envelope::parse(&ok(r#"{"code":"200","data":[]}"#)).unwrap();
        assert!(matches!(
            env.into_snapshot(),
            Err(FetchError::MalformedBody(_))
        ));
        let env = Envelope::parse(&ok(r#"{"code":"200"}"#)).unwrap();
        assert!(matches!(
            env.into_snapshot(),
            Err(FetchError::MalformedBody(_))
        ));
    }

    #[test]
    fn success_yields_snapshot() {
        let env = Envelope::parse(&ok(
            r#"{"code":"200","data":{"stubId":"A1","order":{"kw":7.4}}}"#,
        ))
        .unwrap();
        let snap = env.into_snapshot().unwrap();
        assert_eq!(snap.stub_id().as_deref(), Some("A1"));
        assert_eq!(snap.order_number("kw"), Some(7.4));
    }
}
