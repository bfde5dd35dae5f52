//! Curve layer: type aliases and helpers over the BN254 pairing-friendly
//! curve, and the canonical encodings the rest of the crate hashes over.

use crate::config::EC_SIZE;
use crate::error::{Result, RkvacError};
use ark_bn254::Bn254;
use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::{BigInteger, PrimeField, UniformRand};
use ark_serialize::CanonicalSerialize;
use ark_std::rand::RngCore;

/// Scalar field of the curve (`Fr`).
pub type Fr = <Bn254 as Pairing>::ScalarField;
/// `G1` group, in projective form for cheap accumulation.
pub type G1 = <Bn254 as Pairing>::G1;
/// Affine `G1`, used at serialization/hashing boundaries.
pub type G1Affine = <Bn254 as Pairing>::G1Affine;
/// `G2` group, projective form.
pub type G2 = <Bn254 as Pairing>::G2;
/// Affine `G2`.
pub type G2Affine = <Bn254 as Pairing>::G2Affine;
/// Target group `GT` produced by a pairing.
pub type GT = <Bn254 as Pairing>::TargetField;

const LOG_TARGET: &str = "rkvac_protocol::curve";

/// Sample a fresh uniformly random scalar.
pub fn sample_fr<R: RngCore>(rng: &mut R) -> Result<Fr> {
    let v = Fr::rand(rng);
    if v.is_zero_scalar() {
        // Vanishingly unlikely, but a zero scalar breaks several group-inverse
        // steps downstream (e.g. `inv(mr + i + H(epoch))`), so resample once.
        return Err(RkvacError::CryptoSampleFailure);
    }
    Ok(v)
}

trait IsZeroScalar {
    fn is_zero_scalar(&self) -> bool;
}

impl IsZeroScalar for Fr {
    fn is_zero_scalar(&self) -> bool {
        *self == Fr::from(0u64)
    }
}

/// Canonical, fixed-length compressed encoding of a `G1` point, used
/// wherever the protocol hashes a point into a Fiat-Shamir transcript.
pub fn encode_g1(point: &G1) -> Vec<u8> {
    let affine: G1Affine = point.into_affine();
    let mut bytes = Vec::new();
    affine
        .serialize_compressed(&mut bytes)
        .expect("G1 compressed serialization is infallible for a fixed curve");
    bytes
}

/// The fixed generator of `G1`.
pub fn g1_generator() -> G1 {
    G1::generator()
}

/// The fixed generator of `G2`.
pub fn g2_generator() -> G2 {
    G2::generator()
}

/// Evaluate the bilinear pairing `e(p, q)`.
pub fn pairing(p: G1, q: G2) -> GT {
    tracing::trace!(target: LOG_TARGET, "evaluating pairing");
    Bn254::pairing(p, q).0
}

/// Raise a `GT` element to an `Fr`-valued exponent (used by the RA MAC
/// pairing check, `e(sigma, pk) · e(sigma, G2)^fr_hash`).
pub fn gt_pow(base: GT, exponent: Fr) -> GT {
    ark_ff::Field::pow(&base, exponent.into_bigint())
}

/// Fixed-width (`EC_SIZE`-byte) big-endian encoding of a scalar, used by
/// every hash input that absorbs an `Fr` value (e.g. `H(mr‖id)`).
pub fn fr_to_bytes(scalar: &Fr) -> [u8; EC_SIZE] {
    let be = scalar.into_bigint().to_bytes_be();
    let mut out = [0u8; EC_SIZE];
    debug_assert!(be.len() <= EC_SIZE);
    out[EC_SIZE - be.len()..].copy_from_slice(&be);
    out
}

/// Deserialize an `EC_SIZE`-byte big-endian buffer as an `Fr` element
/// (reduced mod the scalar field order). Used to interpret attribute
/// values as scalars before they enter the issuer's signing equation.
pub fn fr_from_bytes(bytes: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(bytes)
}

/// `0x`-prefixed hex rendering of a `G1` point's compressed encoding, for
/// trace logging and the CLI's `-v` output.
pub fn g1_to_hex(point: &G1) -> String {
    format!("0x{}", hex::encode(encode_g1(point)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;

    #[test]
    fn sampled_scalars_are_nonzero_and_distinct() {
        let mut rng = test_rng();
        let a = sample_fr(&mut rng).unwrap();
        let b = sample_fr(&mut rng).unwrap();
        assert_ne!(a, Fr::from(0u64));
        assert_ne!(a, b);
    }

    #[test]
    fn encode_g1_is_deterministic() {
        let p = g1_generator() * Fr::from(7u64);
        assert_eq!(encode_g1(&p), encode_g1(&p));
        let q = g1_generator() * Fr::from(8u64);
        assert_ne!(encode_g1(&p), encode_g1(&q));
    }

    #[test]
    fn pairing_is_bilinear() {
        let a = Fr::from(3u64);
        let b = Fr::from(5u64);
        let lhs = pairing(g1_generator() * a, g2_generator() * b);
        let rhs = ark_ff::Field::pow(&pairing(g1_generator(), g2_generator()), [15u64]);
        assert_eq!(lhs, rhs);
    }
}
