//! Signature scheme implementations.
//!
//! Both gateways follow the same pipeline — canonicalize, digest, sign on the
//! way out; canonicalize, digest, compare on the way in — but differ in the
//! (digest, key-type) pairing. The QR gateway uses RSA PKCS#1 v1.5 over
//! SHA-1 or SHA-256 ([`asymmetric`]); the mobile-wallet gateway uses a keyed
//! MD5 digest with a shared secret ([`symmetric`]).

pub mod asymmetric;
pub mod symmetric;

use crate::errors::PayError;
use std::fmt;
use std::str::FromStr;

/// Digest selector for the asymmetric scheme, carried on the wire in the
/// `sign_type` field.
///
/// When verifying, the variant must be taken from the payload being verified
/// (not a client-wide default): applying the wrong digest rejects every valid
/// signature, or worse, accepts under a weaker assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignType {
    /// `RSA`: PKCS#1 v1.5 over a SHA-1 digest
    Rsa,
    /// `RSA2`: PKCS#1 v1.5 over a SHA-256 digest
    Rsa2,
}

impl SignType {
    /// Wire representation of the sign type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Rsa => "RSA",
            SignType::Rsa2 => "RSA2",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = PayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RSA" => Ok(SignType::Rsa),
            "RSA2" => Ok(SignType::Rsa2),
            other => Err(PayError::UnsupportedSignType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_type_round_trip() {
        assert_eq!("RSA".parse::<SignType>().unwrap(), SignType::Rsa);
        assert_eq!("RSA2".parse::<SignType>().unwrap(), SignType::Rsa2);
        assert_eq!(SignType::Rsa.as_str(), "RSA");
        assert_eq!(SignType::Rsa2.to_string(), "RSA2");
    }

    #[test]
    fn test_sign_type_rejects_unknown() {
        let err = "MD5".parse::<SignType>().unwrap_err();
        assert!(matches!(err, PayError::UnsupportedSignType(_)));
    }

    #[test]
    fn test_sign_type_is_case_sensitive() {
        assert!("rsa2".parse::<SignType>().is_err());
    }
}
