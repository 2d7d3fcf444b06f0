//! Error types surfaced while resolving queued random operations.
//!
//! Queueing never fails and neither does drawing from the seed stream; every
//! failure mode lives in the resolver, when a result has to be written back
//! into the state tree.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum RandomError {
    /// A write had to walk through a value that cannot hold children.
    #[error("cannot resolve path '{path}': segment '{segment}' lands on {found}")]
    #[diagnostic(
        code(tumbler::path::not_a_container),
        help("Intermediate segments must name objects (or existing array indices).")
    )]
    PathResolution {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("cannot shuffle '{path}': expected an array, found {found}")]
    #[diagnostic(code(tumbler::shuffle::invalid_target))]
    InvalidShuffleTarget { path: String, found: &'static str },

    #[error("invalid arguments for {kind} op at '{path}': {reason}")]
    #[diagnostic(code(tumbler::op::invalid_argument))]
    InvalidOpArgument {
        kind: String,
        path: String,
        reason: String,
    },

    /// Only raised under [`UnknownOpPolicy::Reject`](crate::config::UnknownOpPolicy::Reject).
    #[error("unknown random op '{kind}' queued for '{path}'")]
    #[diagnostic(
        code(tumbler::op::unknown),
        help("Use UnknownOpPolicy::Skip to drop unrecognised ops silently.")
    )]
    UnknownOp { kind: String, path: String },
}
