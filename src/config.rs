//! Engine-wide tunables. Threaded explicitly through every operation that
//! can loop or enumerate — no global mutable configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on the resolver's choice-point stack depth.
    pub resolver_max_depth: usize,
    /// Upper bound on instantiations produced for a single action schema.
    pub max_groundings_per_schema: usize,
    /// Whether `forall`/`exists` are expanded eagerly during grounding
    /// (`true`, the only mode this core implements) or left lazy for a
    /// future incremental grounder.
    pub dequantify_eagerly: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolver_max_depth: 1_000,
            max_groundings_per_schema: 100_000,
            dequantify_eagerly: true,
        }
    }
}
