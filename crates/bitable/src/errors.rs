use thiserror::Error;

/// Errors returned by the Bitable client.
#[derive(Error, Debug)]
pub enum BitableError {
    /// Could not obtain or refresh a tenant access token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure (connection, TLS, decode).
    #[error("Request failed: {0}")]
    Http(String),

    /// The request timed out.
    #[error("Request timed out for table {table_id}")]
    Timeout { table_id: String },

    /// The API answered with a non-zero envelope code.
    #[error("API error {code}: {msg}")]
    Api { code: i64, msg: String },

    /// The response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl BitableError {
    pub(crate) fn from_reqwest(err: reqwest::Error, table_id: &str) -> Self {
        if err.is_timeout() {
            BitableError::Timeout {
                table_id: table_id.to_string(),
            }
        } else {
            BitableError::Http(err.to_string())
        }
    }
}
