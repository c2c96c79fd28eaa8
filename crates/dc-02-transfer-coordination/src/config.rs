//! Configuration for Transfer Coordination

use dc_01_transition_validation::SignerPolicy;
use serde::{Deserialize, Serialize};

/// Coordination configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoordinationConfig {
    /// Who must sign a transfer besides the two owners.
    pub signer_policy: SignerPolicy,
    /// How long a session waits for the peer's next message (ms).
    pub session_timeout_ms: u64,
    /// Buffered messages per session direction before backpressure.
    pub session_capacity: usize,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            signer_policy: SignerPolicy::OwnersOnly,
            session_timeout_ms: 5_000,
            session_capacity: 16,
        }
    }
}
