//! Nonce and timestamp helpers shared by both gateway adapters.

use chrono::{FixedOffset, Local, Utc};

/// Generates a random nonce string of 32 hex characters.
///
/// A fresh nonce is required per mobile-wallet request to prevent replay;
/// 16 random bytes make collisions vanishingly unlikely.
///
/// # Examples
///
/// ```
/// use paygate_rs::utils::generate_nonce;
///
/// let nonce = generate_nonce();
/// assert_eq!(nonce.len(), 32);
/// ```
pub fn generate_nonce() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let nonce: [u8; 16] = rng.gen();
    hex::encode(nonce)
}

/// Current local date-time in the `YYYY-MM-DD HH:MM:SS` format required by
/// the QR gateway's `timestamp` field.
///
/// The value participates in the request signature, so callers compute it
/// once before signing and never regenerate it afterward.
pub fn local_datetime() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Current Unix epoch seconds, evaluated in the provider's fixed UTC+8 zone,
/// as a decimal string. Used for the mobile-wallet app payment parameters.
pub fn epoch_seconds_utc8() -> String {
    let cst = FixedOffset::east_opt(8 * 3600).unwrap();
    Utc::now().with_timezone(&cst).timestamp().to_string()
}
