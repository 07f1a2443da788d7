//! Canonical string encoding for BN254 scalar-field elements.
//!
//! Every element has exactly one encoding: 64 lowercase hex characters holding
//! the big-endian bytes of the element's integer representative. Parsing is
//! strict, so two encodings compare equal as strings iff the elements are equal.

use ark_bn254::Fr;
use ark_ff::{BigInteger, One, PrimeField, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use zkauth_types::{ZkAuthError, ZkAuthResult};

/// Length of a canonical field-element string.
pub const FIELD_HEX_LEN: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldElement(Fr);

impl FieldElement {
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    pub fn one() -> Self {
        Self(Fr::one())
    }

    pub fn from_fr(value: Fr) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> Fr {
        self.0
    }

    pub fn to_bytes_be(&self) -> [u8; 32] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes[..32]);
        out
    }

    pub fn to_canonical(&self) -> String {
        hex::encode(self.to_bytes_be())
    }

    /// Parses the canonical form only. Uppercase digits, prefixes, short
    /// strings and values at or above the modulus are all rejected.
    pub fn from_canonical(s: &str) -> ZkAuthResult<Self> {
        if s.len() != FIELD_HEX_LEN {
            return Err(ZkAuthError::Validation(format!(
                "field element must be {} hex characters, got {}",
                FIELD_HEX_LEN,
                s.len()
            )));
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(ZkAuthError::Validation(
                "field element must be lowercase hexadecimal".into(),
            ));
        }

        let bytes = hex::decode(s)
            .map_err(|e| ZkAuthError::Validation(format!("invalid field element: {}", e)))?;
        let value = Fr::from_be_bytes_mod_order(&bytes);
        let element = Self(value);

        // Reduction changed the bytes, so the input was not below the modulus
        if element.to_bytes_be()[..] != bytes[..] {
            return Err(ZkAuthError::Validation(
                "field element is not reduced modulo the field order".into(),
            ));
        }
        Ok(element)
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl From<FieldElement> for Fr {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl FromStr for FieldElement {
    type Err = ZkAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_canonical(s)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_canonical())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_canonical(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // r - 1 for BN254
    const MODULUS_MINUS_ONE: &str =
        "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000000";
    const MODULUS: &str = "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001";

    #[test]
    fn test_one_encoding() {
        let one = FieldElement::one().to_canonical();
        assert_eq!(one.len(), FIELD_HEX_LEN);
        assert!(one.ends_with('1'));
        assert_eq!(&one[..63], "0".repeat(63));
        assert!(FieldElement::from_canonical(&one).unwrap().is_one());
    }

    #[test]
    fn test_canonical_roundtrip() {
        let value = FieldElement::from(0xdead_beef_u64);
        let s = value.to_canonical();
        assert_eq!(FieldElement::from_canonical(&s).unwrap(), value);
        assert_eq!(s.parse::<FieldElement>().unwrap(), value);
    }

    #[test]
    fn test_rejects_non_canonical_forms() {
        let one = FieldElement::one().to_canonical();

        assert!(FieldElement::from_canonical("1").is_err());
        assert!(FieldElement::from_canonical(&format!("0x{}", &one[2..])).is_err());
        assert!(FieldElement::from_canonical(&format!("{}A", &one[..63])).is_err());
        assert!(FieldElement::from_canonical(&format!("{}0", one)).is_err());
        assert!(FieldElement::from_canonical(&"g".repeat(64)).is_err());
    }

    #[test]
    fn test_modulus_boundary() {
        let max = FieldElement::from_canonical(MODULUS_MINUS_ONE).unwrap();
        assert_eq!(max.to_canonical(), MODULUS_MINUS_ONE);
        assert!(FieldElement::from_canonical(MODULUS).is_err());
        assert!(FieldElement::from_canonical(&"f".repeat(64)).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let value = FieldElement::from(42u64);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, format!("\"{}\"", value.to_canonical()));
        let back: FieldElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        assert!(serde_json::from_str::<FieldElement>("\"42\"").is_err());
    }
}
