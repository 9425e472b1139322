//! Error types for the paygate-rs library.
//!
//! Every layer returns a typed failure instead of logging-and-continuing, so
//! callers can tell apart "retry the network call" (`HttpError`), "this
//! transaction was genuinely declined" (`BusinessError`), and "our trust
//! configuration is broken" (`ConfigError`).

use thiserror::Error;

/// Main error type for gateway operations.
#[derive(Error, Debug)]
pub enum PayError {
    /// Error during HTTP request/response handling
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error while reading an XML document
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// Malformed or empty gateway payload
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Missing required field in a response or notification
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Unparseable key material. Distinct from [`PayError::SignatureError`]:
    /// a bad key is a deployment problem, not a forged message.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Signature verification failed; the payload must not be trusted
    #[error("signature verification failed: {0}")]
    SignatureError(String),

    /// Unsupported or missing signature type field
    #[error("unsupported sign type: {0}")]
    UnsupportedSignType(String),

    /// The provider reported a non-success business result code
    #[error("business error: code {code}, msg {msg}")]
    BusinessError {
        /// Provider result code (e.g. a non-`"10000"` code or an `err_code`)
        code: String,
        /// Provider result message
        msg: String,
        /// Provider sub-code, empty when the gateway reports none
        sub_code: String,
        /// Provider sub-message, empty when the gateway reports none
        sub_msg: String,
    },
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, PayError>;
