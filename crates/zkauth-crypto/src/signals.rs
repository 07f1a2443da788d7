//! Public signals of a login proof.
//!
//! Layout, fixed for the protocol:
//!
//! | index | meaning |
//! |-------|---------|
//! | 0 | output flag (`1` = commitment opened) |
//! | 1 | claimed commitment |
//! | 2 | nonce field element |
//!
//! On the wire the tuple is a JSON array of exactly three canonical
//! field-element strings.

use crate::field::FieldElement;
use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use zkauth_types::{ZkAuthError, ZkAuthResult, PUBLIC_SIGNAL_COUNT};

pub const OUTPUT_FLAG_INDEX: usize = 0;
pub const COMMITMENT_INDEX: usize = 1;
pub const NONCE_INDEX: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicSignals {
    pub output_flag: FieldElement,
    pub commitment: FieldElement,
    pub nonce: FieldElement,
}

impl PublicSignals {
    /// Validates arity and the canonical form of every entry.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> ZkAuthResult<Self> {
        if raw.len() != PUBLIC_SIGNAL_COUNT {
            return Err(ZkAuthError::Validation(format!(
                "publicSignals must have exactly {} entries, got {}",
                PUBLIC_SIGNAL_COUNT,
                raw.len()
            )));
        }

        let entry = |index: usize, name: &str| {
            FieldElement::from_canonical(raw[index].as_ref()).map_err(|e| {
                ZkAuthError::Validation(format!("publicSignals[{}] ({}): {}", index, name, e))
            })
        };

        Ok(Self {
            output_flag: entry(OUTPUT_FLAG_INDEX, "outputFlag")?,
            commitment: entry(COMMITMENT_INDEX, "commitment")?,
            nonce: entry(NONCE_INDEX, "nonce")?,
        })
    }

    pub fn to_strings(&self) -> Vec<String> {
        vec![
            self.output_flag.to_canonical(),
            self.commitment.to_canonical(),
            self.nonce.to_canonical(),
        ]
    }

    /// Groth16 public inputs in circuit allocation order.
    pub fn to_public_inputs(&self) -> Vec<Fr> {
        vec![
            self.output_flag.inner(),
            self.commitment.inner(),
            self.nonce.inner(),
        ]
    }

    pub fn flag_is_set(&self) -> bool {
        self.output_flag.is_one()
    }
}

impl Serialize for PublicSignals {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_strings().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicSignals {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
