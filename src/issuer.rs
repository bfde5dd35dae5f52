//! Issuer: attribute key generation and the multi-attribute CL-style
//! signature that certifies a user's attribute vector together with
//! their RA-issued revocation handle (spec.md §4.3).

use ark_ff::UniformRand;
use ark_std::rand::RngCore;

use crate::config::USER_MAX_NUM_ATTRIBUTES;
use crate::curve::{fr_from_bytes, g1_generator, gt_pow, pairing, sample_fr, Fr, G1, G2};
use crate::error::{Result, RkvacError};
use crate::ra::{mr_id_hash, RaSignature};
use crate::system::SystemParams;

const LOG_TARGET: &str = "rkvac_protocol::issuer";

/// Issuer's private signing key, one scalar per attribute plus the
/// constant term `sk0` and the revocation-binding term `sk_r`. The
/// Verifier also holds a copy of this (spec.md's "keyed verification"
/// design point, §4.5) — it is never given to the user.
#[derive(Clone, Debug)]
pub struct IssuerKeys {
    pub sk0: Fr,
    pub sk_attrs: Vec<Fr>,
    pub sk_r: Fr,
}

/// The certified attribute vector a user presents for issuance. Ordering
/// is significant: the disclosure policy in §4.4 is positional, so the
/// same ordering must be used at proof time.
#[derive(Clone, Debug)]
pub struct UserAttributes {
    pub values: Vec<Fr>,
}

impl UserAttributes {
    pub fn from_bytes(values: &[[u8; 32]]) -> Self {
        Self {
            values: values.iter().map(|b| fr_from_bytes(b)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The Issuer's signature over a user's attributes and revocation handle:
/// `sigma`, one `attribute_sigmas[i]` per attribute, and `revocation_sigma`
/// (spec.md §3).
#[derive(Clone, Debug)]
pub struct IssuerSignature {
    pub sigma: G1,
    pub attribute_sigmas: Vec<G1>,
    pub revocation_sigma: G1,
}

/// Generate the issuer's private key for `n` attributes (spec.md §4.3:
/// `sk0, sk1..sk_{n-1}, sk_r` sampled independently).
pub fn ie_setup<R: RngCore>(n: usize, rng: &mut R) -> Result<IssuerKeys> {
    if n == 0 || n > USER_MAX_NUM_ATTRIBUTES {
        return Err(RkvacError::ConfigInvalid(format!(
            "num_attributes must be in [1, {USER_MAX_NUM_ATTRIBUTES}], got {n}"
        )));
    }
    tracing::debug!(target: LOG_TARGET, num_attributes = n, "generating issuer keys");
    let sk0 = sample_fr(rng)?;
    let sk_r = sample_fr(rng)?;
    let mut sk_attrs = Vec::with_capacity(n);
    for _ in 0..n {
        sk_attrs.push(sample_fr(rng)?);
    }
    Ok(IssuerKeys {
        sk0,
        sk_attrs,
        sk_r,
    })
}

/// Verify the RA's signature over `id` by pairing equation, then sign the
/// user's attributes and revocation handle together.
///
/// Steps match spec.md §4.3 exactly: (1) the RA-signature pairing check
/// (`RaSignatureInvalid` on failure), (2) the CL-style multi-attribute
/// signature `sigma = G1 · inv(sk0 + Σ mᵢskᵢ + mr·sk_r)`.
pub fn ie_issue(
    sys: &SystemParams,
    keys: &IssuerKeys,
    id: &[u8],
    attrs: &UserAttributes,
    ra_pk: G2,
    ra_sig: &RaSignature,
) -> Result<IssuerSignature> {
    if attrs.len() != keys.sk_attrs.len() {
        return Err(RkvacError::ConfigInvalid(format!(
            "attribute count {} does not match issuer key length {}",
            attrs.len(),
            keys.sk_attrs.len()
        )));
    }

    verify_ra_signature(sys, ra_pk, id, ra_sig)?;

    let mut denom = keys.sk0 + ra_sig.mr * keys.sk_r;
    for (m_i, sk_i) in attrs.values.iter().zip(keys.sk_attrs.iter()) {
        denom += *m_i * sk_i;
    }
    let inv = ark_ff::Field::inverse(&denom).ok_or(RkvacError::CryptoArithmeticFailure(
        "issuer signing denominator is zero".into(),
    ))?;
    let sigma = g1_generator() * inv;

    let attribute_sigmas: Vec<G1> = keys.sk_attrs.iter().map(|sk_i| sigma * sk_i).collect();
    let revocation_sigma = sigma * keys.sk_r;

    validate_nonzero(&sigma, "sigma")?;
    validate_nonzero(&revocation_sigma, "revocation_sigma")?;
    for (i, point) in attribute_sigmas.iter().enumerate() {
        validate_nonzero(point, &format!("attribute_sigmas[{i}]"))?;
    }

    Ok(IssuerSignature {
        sigma,
        attribute_sigmas,
        revocation_sigma,
    })
}

/// `e(ra_sig.sigma, ra_pk) · e(ra_sig.sigma, G2)^{H(mr‖id)} == e(G1, G2)`
/// (spec.md §4.3 step 1, §8 property 2).
fn verify_ra_signature(
    sys: &SystemParams,
    ra_pk: G2,
    id: &[u8],
    ra_sig: &RaSignature,
) -> Result<()> {
    let fr_hash = mr_id_hash(ra_sig.mr, id);
    let lhs = pairing(ra_sig.sigma, ra_pk) * gt_pow(pairing(ra_sig.sigma, sys.g2), fr_hash);
    let rhs = pairing(sys.g1, sys.g2);
    if lhs != rhs {
        tracing::warn!(target: LOG_TARGET, "RA signature failed pairing check");
        return Err(RkvacError::RaSignatureInvalid);
    }
    Ok(())
}

fn validate_nonzero(point: &G1, label: &str) -> Result<()> {
    use ark_std::Zero;
    if point.is_zero() {
        return Err(RkvacError::CryptoArithmeticFailure(format!(
            "{label} is the identity point"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ra::{ra_mac, ra_setup};
    use crate::system::sys_setup;
    use ark_std::test_rng;

    #[test]
    fn issuance_signature_satisfies_defining_relation() {
        let sys = sys_setup().unwrap();
        let mut rng = test_rng();
        let (_ra_params, ra_keys) = ra_setup(&sys, &mut rng).unwrap();
        let id = b"user-0042";
        let ra_sig = ra_mac(ra_keys.sk, id, &mut rng).unwrap();

        let n = 4;
        let ie_keys = ie_setup(n, &mut rng).unwrap();
        let attrs = UserAttributes {
            values: (0..n).map(|_| Fr::rand(&mut rng)).collect(),
        };

        let ie_sig = ie_issue(&sys, &ie_keys, id, &attrs, ra_keys.pk, &ra_sig).unwrap();

        let mut denom = ie_keys.sk0 + ra_sig.mr * ie_keys.sk_r;
        for (m_i, sk_i) in attrs.values.iter().zip(ie_keys.sk_attrs.iter()) {
            denom += *m_i * sk_i;
        }
        assert_eq!(ie_sig.sigma * denom, sys.g1);

        for (i, sk_i) in ie_keys.sk_attrs.iter().enumerate() {
            assert_eq!(ie_sig.attribute_sigmas[i], ie_sig.sigma * sk_i);
        }
        assert_eq!(ie_sig.revocation_sigma, ie_sig.sigma * ie_keys.sk_r);
    }

    #[test]
    fn tampered_ra_signature_is_rejected() {
        let sys = sys_setup().unwrap();
        let mut rng = test_rng();
        let (_ra_params, ra_keys) = ra_setup(&sys, &mut rng).unwrap();
        let (_other_params, other_ra_keys) = ra_setup(&sys, &mut rng).unwrap();
        let id = b"user-0042";
        let ra_sig = ra_mac(ra_keys.sk, id, &mut rng).unwrap();

        let n = 2;
        let ie_keys = ie_setup(n, &mut rng).unwrap();
        let attrs = UserAttributes {
            values: (0..n).map(|_| Fr::rand(&mut rng)).collect(),
        };

        // Verify against the wrong RA's public key.
        let result = ie_issue(&sys, &ie_keys, id, &attrs, other_ra_keys.pk, &ra_sig);
        assert!(matches!(result, Err(RkvacError::RaSignatureInvalid)));
    }

    #[test]
    fn out_of_range_attribute_count_is_config_invalid() {
        let mut rng = test_rng();
        assert!(matches!(
            ie_setup(0, &mut rng),
            Err(RkvacError::ConfigInvalid(_))
        ));
        assert!(matches!(
            ie_setup(USER_MAX_NUM_ATTRIBUTES + 1, &mut rng),
            Err(RkvacError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn mismatched_attribute_count_is_config_invalid() {
        let sys = sys_setup().unwrap();
        let mut rng = test_rng();
        let (_ra_params, ra_keys) = ra_setup(&sys, &mut rng).unwrap();
        let id = b"user-0042";
        let ra_sig = ra_mac(ra_keys.sk, id, &mut rng).unwrap();

        let ie_keys = ie_setup(3, &mut rng).unwrap();
        let attrs = UserAttributes {
            values: (0..2).map(|_| Fr::rand(&mut rng)).collect(),
        };

        let result = ie_issue(&sys, &ie_keys, id, &attrs, ra_keys.pk, &ra_sig);
        assert!(matches!(result, Err(RkvacError::ConfigInvalid(_))));
    }
}
