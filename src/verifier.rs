//! Verifier: nonce/epoch issuance and proof-of-knowledge verification
//! (spec.md §4.5).
//!
//! The Verifier holds the Issuer's full private key material (`sk0`,
//! `sk_attrs`, `sk_r`) — the "keyed verification" in RKVAC — so its
//! reconstruction of `t_verify` plugs those scalars in directly rather
//! than checking a public-key pairing equation the way `ie_issue` checks
//! the RA's signature.

use ark_std::rand::RngCore;
use time::OffsetDateTime;

use crate::config::{EPOCH_LENGTH, NONCE_LENGTH};
use crate::curve::{g1_generator, pairing, Fr, G1, G2};
use crate::error::{Result, RkvacError};
use crate::hash::{hash_sha1_compat, proof_challenge};
use crate::issuer::IssuerKeys;
use crate::ra::RaParams;
use crate::system::SystemParams;
use crate::user::{DisclosedAttribute, UserCredential, UserPi};

const LOG_TARGET: &str = "rkvac_protocol::verifier";

/// Opaque verifier-issued nonce, absorbed into the Fiat-Shamir
/// transcript to bind a proof to a single verification session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce(pub [u8; NONCE_LENGTH]);

impl Nonce {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// 4-byte calendar-scoped epoch (spec.md §6): day-of-month, zero-based
/// month, then the Unix `tm_year` (years since 1900) as two big-endian
/// bytes. Scopes pseudonym unlinkability and the revocation base point
/// `H(epoch)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Epoch(pub [u8; EPOCH_LENGTH]);

impl Epoch {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encode a calendar date per spec.md §6's exact byte layout.
    pub fn from_date(date: time::Date) -> Self {
        let day = date.day();
        let month_zero_based = date.month() as u8 - 1;
        let tm_year = (date.year() - 1900) as u16;
        let [year_hi, year_lo] = tm_year.to_be_bytes();
        Epoch([day, month_zero_based, year_hi, year_lo])
    }
}

/// A caller-supplied collaborator checking whether a pseudonym has been
/// revoked. spec.md §9 leaves the revocation list itself as an open
/// subsystem (the source has `// ???` stubs); this crate ships only the
/// trait and a never-revoking default so the extension point is named
/// rather than silently absent.
pub trait RevocationList {
    fn contains(&self, c: &G1) -> bool;
}

/// Default collaborator: nothing is ever revoked.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyRevocationList;

impl RevocationList for EmptyRevocationList {
    fn contains(&self, _c: &G1) -> bool {
        false
    }
}

/// Produce a fresh nonce (CSPRNG-sampled) and the current calendar
/// epoch.
pub fn ve_generate_nonce_epoch<R: RngCore>(rng: &mut R) -> Result<(Nonce, Epoch)> {
    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    rng.try_fill_bytes(&mut nonce_bytes)
        .map_err(|_| RkvacError::CryptoSampleFailure)?;

    let now = OffsetDateTime::now_utc();
    let epoch = Epoch::from_date(now.date());
    tracing::debug!(target: LOG_TARGET, "issued nonce and epoch");
    Ok((Nonce(nonce_bytes), epoch))
}

/// Verify a proof of knowledge against the disclosed attribute values,
/// the Issuer's private keys, and the RA's public parameters.
///
/// All-or-nothing per spec.md §4.5: any mismatch collapses to
/// `ProofInvalid` without indicating which of the underlying equations
/// failed (spec.md §7 — the verifier must not leak a side channel).
#[allow(clippy::too_many_arguments)]
pub fn ve_verify_proof_of_knowledge(
    sys: &SystemParams,
    ra_params: &RaParams,
    ra_pk: G2,
    ie_keys: &IssuerKeys,
    num_attributes: usize,
    disclosed: &[DisclosedAttribute],
    nonce: &Nonce,
    epoch: &Epoch,
    cred: &UserCredential,
    pi: &UserPi,
    revocation_list: &dyn RevocationList,
) -> Result<()> {
    validate_disclosure_shape(num_attributes, disclosed, pi)?;

    let hidden_count = num_attributes - disclosed.len();
    let e = pi.e;
    let neg_e = -e;

    // t_verify = sigma_hat*(-e*sk0) + G1*s_v + sigma_hat*(sk_r*s_mr)
    //          + Sum_hidden sigma_hat*(sk_i*s_mz_i)
    //          + Sum_disclosed sigma_hat*(-e*sk_i*m_i)
    let mut t_verify = cred.sigma_hat * (neg_e * ie_keys.sk0)
        + g1_generator() * pi.s_v
        + cred.sigma_hat * (ie_keys.sk_r * pi.s_mr);

    let mut hidden_cursor = 0usize;
    for idx in 0..num_attributes {
        match disclosed.iter().find(|d| d.index == idx) {
            Some(d) => {
                t_verify += cred.sigma_hat * (neg_e * ie_keys.sk_attrs[idx] * d.value);
            }
            None => {
                let s_mz_i = pi.s_mz[hidden_cursor];
                hidden_cursor += 1;
                t_verify += cred.sigma_hat * (ie_keys.sk_attrs[idx] * s_mz_i);
            }
        }
    }
    debug_assert_eq!(hidden_cursor, hidden_count);

    let fr_hash = hash_sha1_compat(epoch.as_bytes());
    let fr_hash_neg = -fr_hash;

    // t_revoke = ((G1 + C*fr_hash_neg)*(-e)) + C*s_mr + C*s_i
    let t_revoke =
        (g1_generator() + cred.c * fr_hash_neg) * neg_e + cred.c * pi.s_mr + cred.c * pi.s_i;

    // t_sig = G1*s_i + h[0]*s_e1 + h[1]*s_e2
    let t_sig = g1_generator() * pi.s_i + ra_params.h[0] * pi.s_e1 + ra_params.h[1] * pi.s_e2;

    // t_sig1 = sigma_minus_e1*(-e) + sigma_hat_e1*s_e1 + G1*s_v
    let t_sig1 = cred.sigma_minus_e1 * neg_e + cred.sigma_hat_e1 * pi.s_e1 + g1_generator() * pi.s_v;
    // t_sig2 = sigma_minus_e2*(-e) + sigma_hat_e2*s_e2 + G1*s_v
    let t_sig2 = cred.sigma_minus_e2 * neg_e + cred.sigma_hat_e2 * pi.s_e2 + g1_generator() * pi.s_v;

    let expected_e = proof_challenge(
        &t_verify,
        &t_revoke,
        &t_sig,
        &t_sig1,
        &t_sig2,
        &cred.sigma_hat,
        &cred.sigma_hat_e1,
        &cred.sigma_hat_e2,
        &cred.sigma_minus_e1,
        &cred.sigma_minus_e2,
        &cred.c,
        nonce.as_bytes(),
    );

    if expected_e != pi.e {
        tracing::debug!(target: LOG_TARGET, "challenge recomputation mismatch");
        return Err(RkvacError::ProofInvalid);
    }

    if pairing(cred.sigma_minus_e1, sys.g2) != pairing(cred.sigma_hat_e1, ra_pk)
        || pairing(cred.sigma_minus_e2, sys.g2) != pairing(cred.sigma_hat_e2, ra_pk)
    {
        tracing::debug!(target: LOG_TARGET, "randomizer pairing binding failed");
        return Err(RkvacError::ProofInvalid);
    }

    if revocation_list.contains(&cred.c) {
        tracing::debug!(target: LOG_TARGET, "pseudonym is revoked");
        return Err(RkvacError::ProofInvalid);
    }

    Ok(())
}

fn validate_disclosure_shape(
    num_attributes: usize,
    disclosed: &[DisclosedAttribute],
    pi: &UserPi,
) -> Result<()> {
    if disclosed.len() > num_attributes {
        return Err(RkvacError::ConfigInvalid(
            "disclosed attribute count exceeds total attribute count".into(),
        ));
    }
    let hidden_count = num_attributes - disclosed.len();
    if pi.s_mz.len() != hidden_count {
        return Err(RkvacError::ConfigInvalid(format!(
            "proof carries {} hidden responses, expected {hidden_count}",
            pi.s_mz.len()
        )));
    }
    // Tail-disclosure policy (spec.md §4.4): disclosed indices must be
    // exactly [n-d, n).
    for d in disclosed {
        if d.index < hidden_count || d.index >= num_attributes {
            return Err(RkvacError::ConfigInvalid(format!(
                "attribute index {} is not in the tail-disclosed range [{hidden_count}, {num_attributes})",
                d.index
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_revocation_list_never_revokes() {
        let list = EmptyRevocationList;
        assert!(!list.contains(&g1_generator()));
    }

    #[test]
    fn epoch_encoding_matches_spec_layout() {
        let date = time::Date::from_calendar_date(2026, time::Month::March, 5).unwrap();
        let epoch = Epoch::from_date(date);
        assert_eq!(epoch.0[0], 5); // day of month
        assert_eq!(epoch.0[1], 2); // zero-based month (March = index 2)
        let year_since_1900 = u16::from_be_bytes([epoch.0[2], epoch.0[3]]);
        assert_eq!(year_since_1900, 126);
    }

    #[test]
    fn disclosure_shape_rejects_wrong_response_count() {
        let pi = UserPi {
            e: Fr::from(0u64),
            s_v: Fr::from(0u64),
            s_mr: Fr::from(0u64),
            s_i: Fr::from(0u64),
            s_e1: Fr::from(0u64),
            s_e2: Fr::from(0u64),
            s_mz: vec![Fr::from(0u64)],
        };
        let result = validate_disclosure_shape(4, &[], &pi);
        assert!(matches!(result, Err(RkvacError::ConfigInvalid(_))));
    }

    #[test]
    fn disclosure_shape_rejects_non_tail_indices() {
        let pi = UserPi {
            e: Fr::from(0u64),
            s_v: Fr::from(0u64),
            s_mr: Fr::from(0u64),
            s_i: Fr::from(0u64),
            s_e1: Fr::from(0u64),
            s_e2: Fr::from(0u64),
            s_mz: vec![Fr::from(0u64), Fr::from(0u64)],
        };
        let disclosed = vec![DisclosedAttribute {
            index: 0,
            value: Fr::from(1u64),
        }];
        let result = validate_disclosure_shape(4, &disclosed, &pi);
        assert!(matches!(result, Err(RkvacError::ConfigInvalid(_))));
    }
}
