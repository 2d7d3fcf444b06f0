use serde::{Deserialize, Serialize};

use crate::ops::DEFAULT_SPOTS;

/// What the resolver does with an op whose kind it does not recognise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownOpPolicy {
    /// Drop the op: no draw, no write. Existing hosts rely on this.
    #[default]
    Skip,
    /// Fail with [`RandomError::UnknownOp`](crate::errors::RandomError::UnknownOp).
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub unknown_ops: UnknownOpPolicy,
    /// Spot count for a die op queued without arguments.
    pub default_spots: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            unknown_ops: UnknownOpPolicy::Skip,
            default_spots: DEFAULT_SPOTS,
        }
    }
}

impl ResolverConfig {
    pub fn new(unknown_ops: UnknownOpPolicy, default_spots: u32) -> Self {
        Self {
            unknown_ops,
            default_spots,
        }
    }

    /// Strict variant: unknown ops are errors.
    pub fn strict() -> Self {
        Self {
            unknown_ops: UnknownOpPolicy::Reject,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unknown_ops(mut self, policy: UnknownOpPolicy) -> Self {
        self.unknown_ops = policy;
        self
    }

    #[must_use]
    pub fn with_default_spots(mut self, spots: u32) -> Self {
        self.default_spots = spots;
        self
    }
}
