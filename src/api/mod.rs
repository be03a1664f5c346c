mod client;
pub mod model;

use thiserror::Error;

pub use self::client::LiveDnsClient;

/// Header carrying the per-record API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Failure while talking to the record management API.
///
/// The reconciler keeps these per record: a fetch failure means the record's remote state is
/// unknown (and the record is left alone), a write failure means the create or update did not
/// take. Neither aborts the run.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}
