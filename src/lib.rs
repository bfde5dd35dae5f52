//! Revocable Keyed-Verification Anonymous Credential (RKVAC) protocol.
//!
//! Four roles, strictly ordered within a session (`sys_setup → ra_setup
//! → ra_mac → ie_setup → ie_issue → ve_generate_nonce_epoch →
//! ue_compute_proof_of_knowledge → ve_verify_proof_of_knowledge`), built
//! over a BN254 pairing. See `DESIGN.md` for the grounding ledger and the
//! blinding-structure derivation the prover/verifier share.

pub mod config;
pub mod curve;
pub mod error;
pub mod hash;
pub mod issuer;
pub mod ra;
pub mod system;
pub mod user;
pub mod verifier;

pub use error::{Result, RkvacError};
