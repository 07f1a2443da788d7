//! Decimal-string coordinates for BN254 curve points, in the projective
//! layout used by Groth16 JSON documents: `[x, y, "1"]` for G1 and
//! `[[x.c0, x.c1], [y.c0, y.c1], ["1", "0"]]` for G2. The point at infinity
//! is written with a zero third component.

use ark_bn254::{Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{PrimeField, Zero};
use std::str::FromStr;
use zkauth_types::{ZkAuthError, ZkAuthResult};

pub type G1Json = [String; 3];
pub type G2Json = [[String; 2]; 3];

fn invalid(msg: impl Into<String>) -> ZkAuthError {
    ZkAuthError::Serialization(msg.into())
}

pub(crate) fn fq_to_decimal(value: &Fq) -> String {
    value.into_bigint().to_string()
}

/// Strict decimal parse: no sign, no leading zeros, below the base-field
/// modulus.
pub(crate) fn fq_from_decimal(s: &str) -> ZkAuthResult<Fq> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("not a decimal coordinate: {:?}", s)));
    }
    let value = Fq::from_str(s).map_err(|_| invalid(format!("bad coordinate: {}", s)))?;
    if fq_to_decimal(&value) != s {
        return Err(invalid(format!("coordinate is not canonical: {}", s)));
    }
    Ok(value)
}

pub(crate) fn g1_to_json(point: &G1Affine) -> G1Json {
    if point.is_zero() {
        return ["0".into(), "1".into(), "0".into()];
    }
    [fq_to_decimal(&point.x), fq_to_decimal(&point.y), "1".into()]
}

pub(crate) fn g1_from_json(coords: &G1Json) -> ZkAuthResult<G1Affine> {
    match coords[2].as_str() {
        "0" => return Ok(G1Affine::zero()),
        "1" => {}
        other => return Err(invalid(format!("unsupported G1 z coordinate: {}", other))),
    }

    let x = fq_from_decimal(&coords[0])?;
    let y = fq_from_decimal(&coords[1])?;
    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(invalid("G1 point is not on the curve"));
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(invalid("G1 point is not in the prime-order subgroup"));
    }
    Ok(point)
}

fn fq2_to_json(value: &Fq2) -> [String; 2] {
    [fq_to_decimal(&value.c0), fq_to_decimal(&value.c1)]
}

fn fq2_from_json(coords: &[String; 2]) -> ZkAuthResult<Fq2> {
    Ok(Fq2::new(fq_from_decimal(&coords[0])?, fq_from_decimal(&coords[1])?))
}

pub(crate) fn g2_to_json(point: &G2Affine) -> G2Json {
    if point.is_zero() {
        return [
            ["0".into(), "0".into()],
            ["1".into(), "0".into()],
            ["0".into(), "0".into()],
        ];
    }
    [
        fq2_to_json(&point.x),
        fq2_to_json(&point.y),
        ["1".into(), "0".into()],
    ]
}

pub(crate) fn g2_from_json(coords: &G2Json) -> ZkAuthResult<G2Affine> {
    let z = fq2_from_json(&coords[2])?;
    if z.is_zero() {
        return Ok(G2Affine::zero());
    }
    if coords[2][0] != "1" || coords[2][1] != "0" {
        return Err(invalid("unsupported G2 z coordinate"));
    }

    let x = fq2_from_json(&coords[0])?;
    let y = fq2_from_json(&coords[1])?;
    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(invalid("G2 point is not on the curve"));
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(invalid("G2 point is not in the prime-order subgroup"));
    }
    Ok(point)
}
