/*!
 * Gateway errors
 *
 * Hard failures of the request pipeline. A well-formed response whose
 * `success` flag is false is not an error at this level.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Backend unreachable (refused, reset, DNS)
    #[error("connection error: {0}")]
    Connection(String),
    /// Backend answered with a non-success HTTP status
    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },
    /// Response body was not the expected JSON
    #[error("invalid response: {0}")]
    Decode(String),
    /// Anything else raised while building or sending the request
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            GatewayError::Connection(err.to_string())
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Status {
                status: status.as_u16(),
                detail: err.to_string(),
            }
        } else {
            GatewayError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
