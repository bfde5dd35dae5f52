use thiserror::Error;

/// Error taxonomy for every fallible operation in the protocol.
///
/// Verification failures are intentionally coarse: `ProofInvalid` does not
/// say which of the underlying equations failed, so a verifier's error
/// output cannot be used as a side channel against the prover.
#[derive(Error, Debug)]
pub enum RkvacError {
    #[error("curve initialization failed")]
    CurveInitFailure,

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("failed to sample a field element")]
    CryptoSampleFailure,

    #[error("group/field arithmetic failure: {0}")]
    CryptoArithmeticFailure(String),

    #[error("revocation authority signature is invalid")]
    RaSignatureInvalid,

    #[error("proof of knowledge is invalid")]
    ProofInvalid,
}

pub type Result<T> = std::result::Result<T, RkvacError>;
