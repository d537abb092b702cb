//! Vendor API plumbing
//!
//! The request shape (`url`, `method`, `headers`) comes from the user's setup
//! blob; every response is wrapped in a `{"code": "...", "data": {...}}`
//! envelope that is only successful when `code` is the string `"200"`.

pub mod envelope;
pub mod fetch;
pub mod transport;
pub mod types;

pub use envelope::Envelope;
pub use fetch::{PollingFetcher, fetch};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{ApiConfig, TelemetrySnapshot};
