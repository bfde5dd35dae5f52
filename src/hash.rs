//! Fiat-Shamir transcript and hash-to-scalar adapter.
//!
//! The wire format here (12 zero bytes ‖ 20-byte SHA-1 digest, read as a
//! big-endian integer reduced mod `r`) reproduces the original smartcard
//! implementation byte-for-byte. It is cryptographically weak by modern
//! standards but is a required wire contract, not a design choice this
//! crate is free to improve on its own.

use crate::config::{SHA_DIGEST_LENGTH, SHA_DIGEST_PADDING};
use crate::curve::{encode_g1, Fr, G1};
use ark_ff::PrimeField;
use sha1::{Digest, Sha1};

const LOG_TARGET: &str = "rkvac_protocol::hash";

/// Accumulates domain-separated bytes for a Fiat-Shamir challenge, then
/// reduces them to a scalar via [`hash_sha1_compat`].
pub struct Transcript {
    buffer: Vec<u8>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(256),
        }
    }

    /// Append a `G1` point's canonical compressed encoding.
    pub fn absorb_g1(&mut self, point: &G1) -> &mut Self {
        self.buffer.extend_from_slice(&encode_g1(point));
        self
    }

    /// Append raw bytes (e.g. a nonce or an encoded epoch).
    pub fn absorb_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    /// Consume the transcript and derive the Fiat-Shamir challenge scalar.
    pub fn challenge(self) -> Fr {
        tracing::trace!(target: LOG_TARGET, bytes = self.buffer.len(), "deriving challenge");
        hash_sha1_compat(&self.buffer)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce `bytes` to a scalar via the legacy `zero_pad(12) ‖ SHA1(bytes)`
/// convention: the 32-byte buffer is read big-endian and reduced mod `r`.
pub fn hash_sha1_compat(bytes: &[u8]) -> Fr {
    let digest = Sha1::digest(bytes);
    debug_assert_eq!(digest.len(), SHA_DIGEST_LENGTH);
    let mut padded = [0u8; SHA_DIGEST_PADDING + SHA_DIGEST_LENGTH];
    padded[SHA_DIGEST_PADDING..].copy_from_slice(&digest);
    Fr::from_be_bytes_mod_order(&padded)
}

/// Derive the Fiat-Shamir challenge `e` over the prover's five
/// Sigma-protocol commitments, the six credential points, and the
/// verifier's nonce (spec.md §4.4's challenge equation). Shared verbatim
/// between the prover (`user::ue_compute_proof_of_knowledge`) and the
/// verifier (`verifier::ve_verify_proof_of_knowledge`): any divergence in
/// point ordering here silently breaks every proof.
#[allow(clippy::too_many_arguments)]
pub fn proof_challenge(
    t_verify: &G1,
    t_revoke: &G1,
    t_sig: &G1,
    t_sig1: &G1,
    t_sig2: &G1,
    sigma_hat: &G1,
    sigma_hat_e1: &G1,
    sigma_hat_e2: &G1,
    sigma_minus_e1: &G1,
    sigma_minus_e2: &G1,
    c: &G1,
    nonce: &[u8],
) -> Fr {
    let mut transcript = Transcript::new();
    transcript
        .absorb_g1(t_verify)
        .absorb_g1(t_revoke)
        .absorb_g1(t_sig)
        .absorb_g1(t_sig1)
        .absorb_g1(t_sig2)
        .absorb_g1(sigma_hat)
        .absorb_g1(sigma_hat_e1)
        .absorb_g1(sigma_hat_e2)
        .absorb_g1(sigma_minus_e1)
        .absorb_g1(sigma_minus_e2)
        .absorb_g1(c)
        .absorb_bytes(nonce);
    transcript.challenge()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::g1_generator;

    #[test]
    fn sha1_compat_matches_manual_padding() {
        let mut t1 = Transcript::new();
        t1.absorb_g1(&g1_generator());
        let a = t1.challenge();

        let bytes = encode_g1(&g1_generator());
        let digest = Sha1::digest(&bytes);
        let mut padded = [0u8; 32];
        padded[12..].copy_from_slice(&digest);
        let b = Fr::from_be_bytes_mod_order(&padded);

        assert_eq!(a, b);
    }

    #[test]
    fn distinct_transcripts_yield_distinct_challenges() {
        let mut t1 = Transcript::new();
        t1.absorb_g1(&g1_generator());
        let a = t1.challenge();

        let mut t2 = Transcript::new();
        t2.absorb_g1(&(g1_generator() * Fr::from(2u64)));
        let b = t2.challenge();

        assert_ne!(a, b);
    }
}
