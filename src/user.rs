//! User / Prover: selective-disclosure proof of knowledge over a
//! certified attribute vector and revocation handle (spec.md §4.4).
//!
//! The blinding structure realized here is derived symbolically from the
//! verifier's reconstruction equations in `verifier.rs` — see
//! `DESIGN.md`'s "Open Question resolutions" section for the full
//! per-equation derivation. Every comment below restates the piece of
//! that derivation the adjacent code implements, so the two files can be
//! read side by side.

use ark_std::rand::RngCore;

use crate::curve::{fr_from_bytes, g1_generator, sample_fr, Fr, G1};
use crate::error::{Result, RkvacError};
use crate::hash::{hash_sha1_compat, proof_challenge};
use crate::issuer::IssuerSignature;
use crate::ra::{random_randomizer_indices, RaParams, RaSignature};
use crate::verifier::Epoch;

const LOG_TARGET: &str = "rkvac_protocol::user";

/// A single certified attribute together with the prover's disclosure
/// choice for this session.
#[derive(Clone, Copy, Debug)]
pub struct Attribute {
    pub value: Fr,
    pub disclosed: bool,
}

/// An attribute revealed to the verifier: its position in the original
/// ordering and its plaintext value.
#[derive(Clone, Copy, Debug)]
pub struct DisclosedAttribute {
    pub index: usize,
    pub value: Fr,
}

/// Apply the tail-disclosure policy of spec.md §4.4: indices `[n-d, n)`
/// are disclosed, `[0, n-d)` are hidden. Load-bearing ordering — the
/// verifier slices identically.
pub fn apply_disclosure_policy(values: &[Fr], disclosed_count: usize) -> Result<Vec<Attribute>> {
    let n = values.len();
    if disclosed_count > n {
        return Err(RkvacError::ConfigInvalid(format!(
            "disclosed count {disclosed_count} exceeds attribute count {n}"
        )));
    }
    let hidden_count = n - disclosed_count;
    Ok(values
        .iter()
        .enumerate()
        .map(|(idx, value)| Attribute {
            value: *value,
            disclosed: idx >= hidden_count,
        })
        .collect())
}

/// The randomized, per-session credential the prover sends alongside
/// `UserPi`. Every field is freshly blinded; nothing here is reused
/// across sessions.
#[derive(Clone, Copy, Debug)]
pub struct UserCredential {
    pub c: G1,
    pub sigma_hat: G1,
    pub sigma_hat_e1: G1,
    pub sigma_hat_e2: G1,
    pub sigma_minus_e1: G1,
    pub sigma_minus_e2: G1,
}

/// The Sigma-protocol transcript: challenge plus one response per
/// witness (`s_mz` carries one entry per hidden attribute, in index
/// order).
#[derive(Clone, Debug)]
pub struct UserPi {
    pub e: Fr,
    pub s_v: Fr,
    pub s_mr: Fr,
    pub s_i: Fr,
    pub s_e1: Fr,
    pub s_e2: Fr,
    pub s_mz: Vec<Fr>,
}

/// Compute a non-interactive proof of knowledge binding the user's
/// Issuer signature, RA MAC, and a selective disclosure of `attributes`
/// to `nonce`/`epoch`.
pub fn ue_compute_proof_of_knowledge<R: RngCore>(
    ra_params: &RaParams,
    ra_sig: &RaSignature,
    ie_sig: &IssuerSignature,
    attributes: &[Attribute],
    nonce: &[u8],
    epoch: &Epoch,
    rng: &mut R,
) -> Result<(UserCredential, UserPi)> {
    if attributes.len() != ie_sig.attribute_sigmas.len() {
        return Err(RkvacError::ConfigInvalid(
            "attribute count does not match attribute signature count".into(),
        ));
    }

    // Select which two RA randomizers to blind into (spec.md §9 Redesign
    // Flag: sampled uniformly, not the source's fixed `(0, 0)`).
    let (idx1, idx2) = random_randomizer_indices(rng);
    let rand1 = ra_params.randomizers[idx1];
    let rand2 = ra_params.randomizers[idx2];
    let sigma_e1 = ra_params.randomizers_sigma[idx1];
    let sigma_e2 = ra_params.randomizers_sigma[idx2];

    let v = sample_fr(rng)?;
    let sigma_hat = ie_sig.sigma * v;

    // sigma_hat_ej = randomizers_sigma[j] * v, forced by matching
    // `t_sig1`/`t_sig2`'s e-coefficient against the pairing binding
    // e(sigma_minus_ej, G2) = e(sigma_hat_ej, ra.pk) (DESIGN.md).
    let sigma_hat_e1 = sigma_e1 * v;
    let sigma_hat_e2 = sigma_e2 * v;

    // sigma_minus_ej = G1*v - sigma_ej*(v*rand_j), equivalently
    // sigma_hat_ej * ra.sk; see DESIGN.md for the derivation showing
    // both expressions coincide.
    let sigma_minus_e1 = g1_generator() * v - sigma_e1 * (v * rand1);
    let sigma_minus_e2 = g1_generator() * v - sigma_e2 * (v * rand2);

    // Session secret `i` is not independently sampled: `t_sig`'s
    // e-coefficient only vanishes when `i = alphas[0]*rand1 +
    // alphas[1]*rand2` (DESIGN.md).
    let session_i = ra_params.alphas[0] * rand1 + ra_params.alphas[1] * rand2;

    let fr_hash_epoch = hash_sha1_compat(epoch.as_bytes());

    // Pseudonym: C*(H(epoch) + i - mr) = G1, the unique relation
    // consistent with `t_revoke` given `w_mr = -mr`, `w_i = i`
    // (DESIGN.md) — not the garbled `i/(H(epoch)+i)` phrasing in
    // spec.md §4.4, which that document itself flags as underspecified.
    let c_denom = fr_hash_epoch + session_i - ra_sig.mr;
    let c_inv = ark_ff::Field::inverse(&c_denom)
        .ok_or(RkvacError::CryptoArithmeticFailure("pseudonym denominator is zero".into()))?;
    let c = g1_generator() * c_inv;

    let hidden_indices: Vec<usize> = attributes
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.disclosed)
        .map(|(idx, _)| idx)
        .collect();

    // Fresh blinding for every witness.
    let r_v = sample_fr(rng)?;
    let r_mr = sample_fr(rng)?;
    let r_i = sample_fr(rng)?;
    let r_e1 = sample_fr(rng)?;
    let r_e2 = sample_fr(rng)?;
    let mut r_mz: Vec<Fr> = Vec::with_capacity(hidden_indices.len());
    for _ in 0..hidden_indices.len() {
        r_mz.push(sample_fr(rng)?);
    }

    // T_verify = G1*r_v + (revocation_sigma*v)*r_mr + Σ_hidden
    // (attribute_sigmas[idx]*v)*r_mz[idx]; the prover substitutes the
    // public issuer-signature components for `sigma_hat*sk_r` /
    // `sigma_hat*sk_i` since it never holds `sk_r`/`sk_i` directly
    // (DESIGN.md).
    let mut t_verify = g1_generator() * r_v + (ie_sig.revocation_sigma * v) * r_mr;
    for (hidden_pos, &idx) in hidden_indices.iter().enumerate() {
        t_verify += (ie_sig.attribute_sigmas[idx] * v) * r_mz[hidden_pos];
    }

    let t_revoke = c * (r_mr + r_i);
    let t_sig = g1_generator() * r_i + ra_params.h[0] * r_e1 + ra_params.h[1] * r_e2;
    let t_sig1 = sigma_hat_e1 * r_e1 + g1_generator() * r_v;
    let t_sig2 = sigma_hat_e2 * r_e2 + g1_generator() * r_v;

    let e = proof_challenge(
        &t_verify,
        &t_revoke,
        &t_sig,
        &t_sig1,
        &t_sig2,
        &sigma_hat,
        &sigma_hat_e1,
        &sigma_hat_e2,
        &sigma_minus_e1,
        &sigma_minus_e2,
        &c,
        nonce,
    );
    tracing::debug!(target: LOG_TARGET, hidden = hidden_indices.len(), "computed Fiat-Shamir challenge");

    // s_X = r_X + e*w_X for every witness. `w_mr = -mr` and
    // `w_mz[idx] = -value` (not the raw attribute/MAC secret) — the sign
    // that makes `t_verify`'s e-coefficient cancel against the issuer's
    // own signing relation (DESIGN.md).
    let s_v = r_v + e * v;
    let s_mr = r_mr + e * (-ra_sig.mr);
    let s_i = r_i + e * session_i;
    let s_e1 = r_e1 + e * (-rand1);
    let s_e2 = r_e2 + e * (-rand2);
    let s_mz: Vec<Fr> = hidden_indices
        .iter()
        .zip(r_mz.iter())
        .map(|(&idx, r)| *r + e * (-attributes[idx].value))
        .collect();

    Ok((
        UserCredential {
            c,
            sigma_hat,
            sigma_hat_e1,
            sigma_hat_e2,
            sigma_minus_e1,
            sigma_minus_e2,
        },
        UserPi {
            e,
            s_v,
            s_mr,
            s_i,
            s_e1,
            s_e2,
            s_mz,
        },
    ))
}

/// The attributes the prover agreed to reveal, for handing to the
/// verifier (spec.md §4.4's disclosure policy, realized as index/value
/// pairs rather than a full attribute vector — the verifier never
/// receives hidden values).
pub fn disclosed_for_verifier(attributes: &[Attribute]) -> Vec<DisclosedAttribute> {
    attributes
        .iter()
        .enumerate()
        .filter(|(_, a)| a.disclosed)
        .map(|(index, a)| DisclosedAttribute {
            index,
            value: a.value,
        })
        .collect()
}

/// Convert raw 32-byte attribute values into `Fr` scalars (spec.md §3:
/// "ordered sequence of `n` 32-byte values").
pub fn attribute_values_from_bytes(values: &[[u8; 32]]) -> Vec<Fr> {
    values.iter().map(|b| fr_from_bytes(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disclosure_policy_is_tail_biased() {
        let values: Vec<Fr> = (0..4).map(|i| Fr::from(i as u64)).collect();
        let attrs = apply_disclosure_policy(&values, 2).unwrap();
        assert!(!attrs[0].disclosed);
        assert!(!attrs[1].disclosed);
        assert!(attrs[2].disclosed);
        assert!(attrs[3].disclosed);
    }

    #[test]
    fn disclosure_count_over_n_is_rejected() {
        let values: Vec<Fr> = (0..2).map(|i| Fr::from(i as u64)).collect();
        let result = apply_disclosure_policy(&values, 3);
        assert!(matches!(result, Err(RkvacError::ConfigInvalid(_))));
    }

    #[test]
    fn fully_disclosed_has_no_hidden_mz_entries() {
        let values: Vec<Fr> = (0..3).map(|i| Fr::from(i as u64)).collect();
        let attrs = apply_disclosure_policy(&values, 3).unwrap();
        assert!(attrs.iter().all(|a| a.disclosed));
    }
}
