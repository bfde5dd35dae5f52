//! System-wide public parameters, shared by every role.

use crate::curve::{g1_generator, g2_generator, G1, G2};
use crate::error::Result;

const LOG_TARGET: &str = "rkvac_protocol::system";

/// Curve generators shared by every role in the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemParams {
    pub g1: G1,
    pub g2: G2,
}

/// Produce the system-wide public parameters.
///
/// Uses the curve's fixed generators; fallible only in principle, to keep
/// the signature stable if a future build swaps in a curve whose generator
/// construction can fail.
pub fn sys_setup() -> Result<SystemParams> {
    tracing::debug!(target: LOG_TARGET, "generating system parameters");
    Ok(SystemParams {
        g1: g1_generator(),
        g2: g2_generator(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_is_deterministic() {
        let a = sys_setup().unwrap();
        let b = sys_setup().unwrap();
        assert_eq!(a, b);
    }
}
