use super::envelope::Envelope;
use super::transport::HttpTransport;
use super::types::{ApiConfig, TelemetrySnapshot};
use crate::error::FetchError;
use std::sync::Arc;

/// Issue one request and turn the response into a snapshot.
///
/// No retries here; the coordinator decides when to try again.
pub async fn fetch(
    transport: &dyn HttpTransport,
    config: &ApiConfig,
) -> Result<TelemetrySnapshot, FetchError> {
    let response = transport
        .execute(config)
        .await
        .map_err(|e| FetchError::Communication(e.to_string()))?;
    Envelope::parse(&response)?.into_snapshot()
}

/// Owns the validated configuration for the lifetime of a station entry
#[derive(Clone)]
pub struct PollingFetcher {
    config: ApiConfig,
    transport: Arc<dyn HttpTransport>,
}

impl PollingFetcher {
    pub fn new(config: ApiConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn fetch(&self) -> Result<TelemetrySnapshot, FetchError> {
        fetch(self.transport.as_ref(), &self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::HttpResponse;
    use crate::error::{Result, StarChargeError};
    use std::collections::BTreeMap;

    struct Fixed(Result<HttpResponse>);

    #[async_trait::async_trait]
    impl HttpTransport for Fixed {
        async fn execute(&self, _request: &ApiConfig) -> Result<HttpResponse> {
            match &self.0 {
                Ok(r) => Ok(r.clone()),
                Err(e) => Err(StarChargeError::network(e.to_string())),
            }
        }
    }

    fn fetcher(result: Result<HttpResponse>) -> PollingFetcher {
        let config = ApiConfig {
            url: "http://vendor.invalid/stub".into(),
            method: "GET".into(),
            headers: BTreeMap::new(),
        };
        PollingFetcher::new(config, Arc::new(Fixed(result)))
    }

    #[tokio::test]
    async fn transport_failure_is_communication_error() {
        let f = fetcher(Err(StarChargeError::network("connection refused")));
        match f.fetch().await {
            Err(FetchError::Communication(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn each_failure_kind_is_classified() {
        let f = fetcher(Ok(HttpResponse::new(500, Vec::new())));
        assert_eq!(f.fetch().await.unwrap_err(), FetchError::Http(500));

        let f = fetcher(Ok(HttpResponse::new(200, b"not json".to_vec())));
        assert!(matches!(
            f.fetch().await,
            Err(FetchError::MalformedBody(_))
        ));

        let f = fetcher(Ok(HttpResponse::new(200, br#"{"code":"500"}"#.to_vec())));
        assert_eq!(
            f.fetch().await.unwrap_err(),
            FetchError::ApiError("500".into())
        );
    }

    #[tokio::test]
    async fn success_returns_data_payload() {
        let body = br#"{"code":"200","data":{"stubId":"A1","stubStatus":"00"}}"#;
        let f = fetcher(Ok(HttpResponse::new(200, body.to_vec())));
        let snap = f.fetch().await.unwrap();
        assert_eq!(snap.stub_status(), Some("00"));
        assert_eq!(f.config().method, "GET");
    }
}
