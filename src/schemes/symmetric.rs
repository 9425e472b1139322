//! Keyed-MD5 signing and verification for the mobile-wallet gateway.
//!
//! The canonical string gets `&key=<secret>` appended and the uppercase hex
//! MD5 digest of the result is the signature. Signing and verifying are the
//! same computation with the same shared secret, so anyone holding the
//! secret can forge both directions. That is a protocol constraint of the
//! gateway, not something this crate can strengthen.

use crate::params::{canonical_string, ParamMap, SIGN_FIELD};
use md5::{Digest, Md5};

/// Computes the uppercase hex MD5 signature of a parameter set.
///
/// The `sign` field and empty values are excluded from the digest input,
/// matching the canonicalization used everywhere else in the crate.
///
/// # Examples
///
/// ```
/// use paygate_rs::params::ParamMap;
/// use paygate_rs::schemes::symmetric::signature;
///
/// let mut params = ParamMap::new();
/// params.insert("out_trade_no".to_string(), "T002".to_string());
/// params.insert("result_code".to_string(), "SUCCESS".to_string());
/// params.insert("return_code".to_string(), "SUCCESS".to_string());
///
/// assert_eq!(signature(&params, "testkey"), "1C0D4639B7F76539762B95419BD36294");
/// ```
pub fn signature(params: &ParamMap, secret: &str) -> String {
    let canonical = canonical_string(params, &[SIGN_FIELD]);
    let presign = format!("{}&key={}", canonical, secret);
    let digest = Md5::digest(presign.as_bytes());
    hex::encode(digest).to_uppercase()
}

/// Checks the `sign` field of a parameter set against the recomputed digest.
///
/// Comparison is exact string equality; the digest is uppercase hex by
/// construction. A missing `sign` field never verifies.
pub fn verify(params: &ParamMap, secret: &str) -> bool {
    match params.get(SIGN_FIELD) {
        Some(received) => signature(params, secret) == *received,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the provider's signing documentation.
    #[test]
    fn test_documented_vector() {
        let mut params = ParamMap::new();
        params.insert("appid".to_string(), "wxd930ea5d5a258f4f".to_string());
        params.insert("mch_id".to_string(), "10000100".to_string());
        params.insert("device_info".to_string(), "1000".to_string());
        params.insert("body".to_string(), "test".to_string());
        params.insert("nonce_str".to_string(), "ibuaiVcKdpRxkhJA".to_string());

        assert_eq!(
            signature(&params, "192006250b4c09247ec02edce69f6a2d"),
            "9A0A8659F005D6984697E2CA0A9CF3B7"
        );
    }

    #[test]
    fn test_idempotent_across_insertion_order() {
        let mut forward = ParamMap::new();
        forward.insert("appid".to_string(), "wxtest".to_string());
        forward.insert("mch_id".to_string(), "10000100".to_string());
        forward.insert("nonce_str".to_string(), "abc123".to_string());

        let mut backward = ParamMap::new();
        backward.insert("nonce_str".to_string(), "abc123".to_string());
        backward.insert("appid".to_string(), "wxtest".to_string());
        backward.insert("mch_id".to_string(), "10000100".to_string());

        assert_eq!(signature(&forward, "testkey"), signature(&backward, "testkey"));
    }

    #[test]
    fn test_verify_accepts_own_signature() {
        let mut params = ParamMap::new();
        params.insert("out_trade_no".to_string(), "T002".to_string());
        params.insert("return_code".to_string(), "SUCCESS".to_string());
        let sign = signature(&params, "testkey");
        params.insert(SIGN_FIELD.to_string(), sign);
        assert!(verify(&params, "testkey"));
    }

    #[test]
    fn test_verify_rejects_tampered_field() {
        let mut params = ParamMap::new();
        params.insert("out_trade_no".to_string(), "T002".to_string());
        params.insert("return_code".to_string(), "SUCCESS".to_string());
        let sign = signature(&params, "testkey");
        params.insert(SIGN_FIELD.to_string(), sign);
        params.insert("out_trade_no".to_string(), "T003".to_string());
        assert!(!verify(&params, "testkey"));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let mut params = ParamMap::new();
        params.insert("out_trade_no".to_string(), "T002".to_string());
        let sign = signature(&params, "testkey");
        params.insert(SIGN_FIELD.to_string(), sign);
        assert!(!verify(&params, "otherkey"));
    }

    #[test]
    fn test_verify_rejects_missing_sign() {
        let mut params = ParamMap::new();
        params.insert("out_trade_no".to_string(), "T002".to_string());
        assert!(!verify(&params, "testkey"));
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let mut params = ParamMap::new();
        params.insert("out_trade_no".to_string(), "T002".to_string());
        let sign = signature(&params, "testkey").to_lowercase();
        params.insert(SIGN_FIELD.to_string(), sign);
        assert!(!verify(&params, "testkey"));
    }

    #[test]
    fn test_empty_values_do_not_change_signature() {
        let mut params = ParamMap::new();
        params.insert("out_trade_no".to_string(), "T002".to_string());
        let bare = signature(&params, "testkey");
        params.insert("attach".to_string(), String::new());
        assert_eq!(signature(&params, "testkey"), bare);
    }
}
