//! Parameter sets and their canonical serialization.
//!
//! Both gateways sign and verify over the same deterministic rendering of a
//! key/value parameter set: excluded keys are dropped, empty values are
//! dropped, the remaining keys are sorted ascending by byte value, and the
//! entries are rendered as `key=value` joined with `&`. This rendering must
//! be bit-identical on the signing side and the verifying side, so it lives
//! in one place and is used by every signer and verifier in the crate.

use crate::errors::Result;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// An ordered-by-key mapping from field name to field value, assembled per
/// outgoing request or parsed per incoming response. Never persisted.
pub type ParamMap = BTreeMap<String, String>;

/// Name of the field carrying the signature itself.
pub const SIGN_FIELD: &str = "sign";

/// Name of the field declaring the signature scheme of a payload.
pub const SIGN_TYPE_FIELD: &str = "sign_type";

/// Renders a parameter set as its canonical signing string.
///
/// Keys listed in `excluded` are dropped, as are keys whose trimmed value is
/// empty. Values are trimmed of leading/trailing whitespace to tolerate
/// transport-layer padding. The output is possibly empty if every value was
/// empty.
///
/// # Examples
///
/// ```
/// use paygate_rs::params::{canonical_string, ParamMap, SIGN_FIELD};
///
/// let mut params = ParamMap::new();
/// params.insert("b".to_string(), "2".to_string());
/// params.insert("a".to_string(), "1".to_string());
/// params.insert("empty".to_string(), "".to_string());
/// params.insert("sign".to_string(), "abc".to_string());
///
/// assert_eq!(canonical_string(&params, &[SIGN_FIELD]), "a=1&b=2");
/// ```
pub fn canonical_string(params: &ParamMap, excluded: &[&str]) -> String {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        if excluded.contains(&key.as_str()) {
            continue;
        }
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        pairs.push(format!("{}={}", key, value));
    }
    pairs.join("&")
}

/// Inserts `value` under `key` unless the value is empty.
///
/// Request builders use this so that optional fields stay off the wire
/// entirely instead of travelling as empty tags or empty form fields.
pub fn insert_nonempty(params: &mut ParamMap, key: &str, value: &str) {
    if !value.is_empty() {
        params.insert(key.to_string(), value.to_string());
    }
}

/// Builds a typed value out of a decoded parameter set.
///
/// Response and notification types in this crate are flat string records, so
/// a `ParamMap` round-trips through `serde_json::Value` into any of them.
pub fn from_params<T: DeserializeOwned>(params: &ParamMap) -> Result<T> {
    let value = serde_json::to_value(params)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("out_trade_no".to_string(), "T001".to_string());
        params.insert("total_amount".to_string(), "10.00".to_string());
        params.insert("app_id".to_string(), "2016091100486325".to_string());
        params
    }

    #[test]
    fn test_sorted_output() {
        assert_eq!(
            canonical_string(&sample(), &[]),
            "app_id=2016091100486325&out_trade_no=T001&total_amount=10.00"
        );
    }

    #[test]
    fn test_deterministic() {
        let params = sample();
        assert_eq!(canonical_string(&params, &[]), canonical_string(&params, &[]));
    }

    #[test]
    fn test_insertion_order_independent() {
        let mut reversed = ParamMap::new();
        reversed.insert("total_amount".to_string(), "10.00".to_string());
        reversed.insert("app_id".to_string(), "2016091100486325".to_string());
        reversed.insert("out_trade_no".to_string(), "T001".to_string());
        assert_eq!(canonical_string(&sample(), &[]), canonical_string(&reversed, &[]));
    }

    #[test]
    fn test_excluded_keys_never_appear() {
        let mut params = sample();
        params.insert(SIGN_FIELD.to_string(), "c2lnbmF0dXJl".to_string());
        params.insert(SIGN_TYPE_FIELD.to_string(), "RSA2".to_string());
        let canonical = canonical_string(&params, &[SIGN_FIELD, SIGN_TYPE_FIELD]);
        assert!(!canonical.contains("sign="));
        assert!(!canonical.contains("sign_type="));
        assert_eq!(canonical, canonical_string(&sample(), &[]));
    }

    #[test]
    fn test_empty_values_dropped() {
        let mut params = sample();
        params.insert("body".to_string(), String::new());
        params.insert("subject".to_string(), "   ".to_string());
        assert_eq!(canonical_string(&params, &[]), canonical_string(&sample(), &[]));
    }

    #[test]
    fn test_values_trimmed() {
        let mut params = ParamMap::new();
        params.insert("a".to_string(), " padded\t".to_string());
        assert_eq!(canonical_string(&params, &[]), "a=padded");
    }

    #[test]
    fn test_all_empty_yields_empty_string() {
        let mut params = ParamMap::new();
        params.insert("a".to_string(), String::new());
        assert_eq!(canonical_string(&params, &[]), "");
    }

    #[test]
    fn test_insert_nonempty() {
        let mut params = ParamMap::new();
        insert_nonempty(&mut params, "present", "value");
        insert_nonempty(&mut params, "absent", "");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("present").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_from_params() {
        #[derive(serde::Deserialize)]
        struct Record {
            out_trade_no: String,
            #[serde(default)]
            missing: String,
        }

        let record: Record = from_params(&sample()).unwrap();
        assert_eq!(record.out_trade_no, "T001");
        assert_eq!(record.missing, "");
    }
}
