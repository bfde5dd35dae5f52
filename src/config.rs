//! Compile-time protocol constants.
//!
//! Mirrors the constants the original smartcard implementation fixed at
//! build time; kept as `usize`/`const` here rather than surfaced as runtime
//! configuration because the wire format (fixed-width attribute arrays,
//! SHA-1 padding) depends on them being stable.

/// Maximum number of attributes a credential may carry.
pub const USER_MAX_NUM_ATTRIBUTES: usize = 9;

/// Maximum length, in bytes, of a user identifier buffer.
pub const USER_MAX_ID_LENGTH: usize = 32;

/// Canonical compressed encoding length, in bytes, used for hashing inputs.
pub const EC_SIZE: usize = 32;

/// Length, in bytes, of the verifier-issued nonce.
pub const NONCE_LENGTH: usize = 32;

/// Length, in bytes, of the encoded epoch (day, month, year-hi, year-lo).
pub const EPOCH_LENGTH: usize = 4;

/// Number of RA randomizer/signature pairs (`e_k`, `sigma_e_k`).
pub const REVOCATION_AUTHORITY_VALUE_K: usize = 8;

/// Number of RA linear-combination bases (`alpha_j`, `h_j`). The prover's
/// `t_sig` equation consumes exactly two randomizer indices (`I`, `II`), so
/// this is pinned to 2 rather than left as a general parameter.
pub const REVOCATION_AUTHORITY_VALUE_J: usize = 2;

/// Raw SHA-1 digest length, in bytes.
pub const SHA_DIGEST_LENGTH: usize = 20;

/// Zero-padding prepended to a SHA-1 digest before it is read as a
/// big-endian integer and reduced mod the scalar field order.
pub const SHA_DIGEST_PADDING: usize = 12;
