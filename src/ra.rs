//! Revocation Authority: key generation and the identifier MAC.
//!
//! The RA certifies a user's revocation handle with a short pairing-based
//! MAC (`ra_mac`) and separately publishes a batch of pre-signed
//! randomizers the user blinds into during proving (§4.4's `I, II`
//! selection). Neither step touches attributes; the RA and Issuer are
//! independent trust roots that the user binds together at proof time.

use ark_ff::UniformRand;
use ark_std::rand::RngCore;

use crate::config::{
    REVOCATION_AUTHORITY_VALUE_J, REVOCATION_AUTHORITY_VALUE_K, USER_MAX_ID_LENGTH,
};
use crate::curve::{g1_generator, g2_generator, sample_fr, Fr, G1, G2};
use crate::error::{Result, RkvacError};
use crate::hash::hash_sha1_compat;
use crate::system::SystemParams;

const LOG_TARGET: &str = "rkvac_protocol::ra";

/// RA's key pair. `sk` never leaves the RA; `pk` is handed to the Issuer
/// (for the issuance-time pairing check) and the Verifier (for the
/// `sigma_minus_e*` pairing bindings).
#[derive(Clone, Copy, Debug)]
pub struct RaKeys {
    pub sk: Fr,
    pub pk: G2,
}

/// RA's public parameters: the `h[j]` bases the prover's `t_sig` equation
/// is built from, and the `k` pre-signed randomizer/signature pairs the
/// prover blinds one of into each proof.
#[derive(Clone, Debug)]
pub struct RaParams {
    pub alphas: [Fr; REVOCATION_AUTHORITY_VALUE_J],
    pub h: [G1; REVOCATION_AUTHORITY_VALUE_J],
    pub randomizers: [Fr; REVOCATION_AUTHORITY_VALUE_K],
    pub randomizers_sigma: [G1; REVOCATION_AUTHORITY_VALUE_K],
}

/// The RA's per-user certification: a random `mr` plus a BBS-style
/// signature over `H(mr‖id)`, verified in `ie_issue` by pairing equation
/// rather than by recomputing the signature directly.
#[derive(Clone, Copy, Debug)]
pub struct RaSignature {
    pub mr: Fr,
    pub sigma: G1,
}

/// Generate the RA's key pair and public parameters.
///
/// Every sampled scalar is validated non-zero (`sample_fr` already
/// resamples zero scalars) before being used in a group-inverse step;
/// an inverse of a zero-adjacent sum would otherwise panic deep inside
/// `ark-ff`.
pub fn ra_setup<R: RngCore>(_sys: &SystemParams, rng: &mut R) -> Result<(RaParams, RaKeys)> {
    tracing::debug!(target: LOG_TARGET, "generating RA keys and parameters");

    let sk = sample_fr(rng)?;
    let pk = g2_generator() * sk;

    let mut alphas = [Fr::from(0u64); REVOCATION_AUTHORITY_VALUE_J];
    let mut h = [g1_generator(); REVOCATION_AUTHORITY_VALUE_J];
    for i in 0..REVOCATION_AUTHORITY_VALUE_J {
        let alpha = sample_fr(rng)?;
        alphas[i] = alpha;
        h[i] = g1_generator() * alpha;
    }

    let mut randomizers = [Fr::from(0u64); REVOCATION_AUTHORITY_VALUE_K];
    let mut randomizers_sigma = [g1_generator(); REVOCATION_AUTHORITY_VALUE_K];
    for i in 0..REVOCATION_AUTHORITY_VALUE_K {
        let r = sample_fr(rng)?;
        let denom = r + sk;
        let inv = denom
            .inverse_or_err()
            .map_err(|_| RkvacError::CryptoSampleFailure)?;
        randomizers[i] = r;
        randomizers_sigma[i] = g1_generator() * inv;
    }

    Ok((
        RaParams {
            alphas,
            h,
            randomizers,
            randomizers_sigma,
        },
        RaKeys { sk, pk },
    ))
}

/// Sample two randomizer indices `I, II` independently and uniformly from
/// `[0, k)` (they may coincide, as they could in the source's fixed
/// `(0, 0)` selection).
///
/// Replaces the source CLI's hardcoded `(0, 0)` (spec.md §9 Redesign
/// Flag): always choosing the same pair would let a verifier link every
/// proof built from the same RA batch by its `t_sig` shape.
pub fn random_randomizer_indices<R: RngCore>(rng: &mut R) -> (usize, usize) {
    let k = REVOCATION_AUTHORITY_VALUE_K;
    let i = (rng.next_u32() as usize) % k;
    let ii = (rng.next_u32() as usize) % k;
    (i, ii)
}

/// Compute the RA's MAC over a user identifier: `sigma = G1 · inv(H(mr‖id) + sk)`.
pub fn ra_mac<R: RngCore>(sk: Fr, id: &[u8], rng: &mut R) -> Result<RaSignature> {
    if id.len() > USER_MAX_ID_LENGTH {
        return Err(RkvacError::ConfigInvalid(format!(
            "identifier length {} exceeds USER_MAX_ID_LENGTH ({USER_MAX_ID_LENGTH})",
            id.len()
        )));
    }
    tracing::debug!(target: LOG_TARGET, id_len = id.len(), "computing RA MAC");

    let mr = sample_fr(rng)?;
    let fr_hash = mr_id_hash(mr, id);
    let denom = fr_hash + sk;
    let inv = denom
        .inverse_or_err()
        .map_err(|_| RkvacError::CryptoSampleFailure)?;

    Ok(RaSignature {
        mr,
        sigma: g1_generator() * inv,
    })
}

/// `H(mr‖id)`, reduced to `Fr` via the pad-SHA1 convention (spec.md §4.2,
/// §6). Shared between `ra_mac` and `ie_issue`'s pairing check, which must
/// reproduce the identical scalar.
pub fn mr_id_hash(mr: Fr, id: &[u8]) -> Fr {
    let mut bytes = Vec::with_capacity(32 + id.len());
    bytes.extend_from_slice(&crate::curve::fr_to_bytes(&mr));
    bytes.extend_from_slice(id);
    hash_sha1_compat(&bytes)
}

trait InverseOrErr {
    fn inverse_or_err(&self) -> std::result::Result<Fr, ()>;
}

impl InverseOrErr for Fr {
    fn inverse_or_err(&self) -> std::result::Result<Fr, ()> {
        ark_ff::Field::inverse(self).ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::gt_pow;
    use ark_std::test_rng;
    use ark_std::Zero;

    #[test]
    fn setup_produces_nonzero_points() {
        let sys = crate::system::sys_setup().unwrap();
        let mut rng = test_rng();
        let (params, keys) = ra_setup(&sys, &mut rng).unwrap();
        assert!(!keys.pk.is_zero());
        for h in params.h {
            assert!(!h.is_zero());
        }
        for sigma in params.randomizers_sigma {
            assert!(!sigma.is_zero());
        }
    }

    #[test]
    fn mac_satisfies_pairing_relation() {
        let sys = crate::system::sys_setup().unwrap();
        let mut rng = test_rng();
        let (_params, keys) = ra_setup(&sys, &mut rng).unwrap();
        let id = b"user-0001";
        let sig = ra_mac(keys.sk, id, &mut rng).unwrap();

        let fr_hash = mr_id_hash(sig.mr, id);
        let lhs = crate::curve::pairing(sig.sigma, keys.pk)
            * gt_pow(crate::curve::pairing(sig.sigma, sys.g2), fr_hash);
        let rhs = crate::curve::pairing(sys.g1, sys.g2);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn randomizer_indices_are_in_range() {
        let mut rng = test_rng();
        for _ in 0..32 {
            let (i, ii) = random_randomizer_indices(&mut rng);
            assert!(i < REVOCATION_AUTHORITY_VALUE_K);
            assert!(ii < REVOCATION_AUTHORITY_VALUE_K);
        }
    }

    #[test]
    fn oversized_identifier_is_rejected() {
        let sys = crate::system::sys_setup().unwrap();
        let mut rng = test_rng();
        let (_params, keys) = ra_setup(&sys, &mut rng).unwrap();
        let id = vec![0u8; USER_MAX_ID_LENGTH + 1];
        let result = ra_mac(keys.sk, &id, &mut rng);
        assert!(matches!(result, Err(RkvacError::ConfigInvalid(_))));
    }
}
