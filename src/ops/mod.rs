//! Queueing random operations against a game state.
//!
//! The helpers on [`Random`] are pure state transformers: each returns a new
//! [`GameState`] whose pending list has one more entry, and leaves the input
//! untouched. No randomness happens here. The target field is written later,
//! when the host calls [`resolve`](crate::resolver::resolve).
//!
//! ```rust
//! use tumbler::ops::Random;
//! use tumbler::state::GameState;
//! use tumbler::types::OpKind;
//!
//! let state = GameState::default();
//! let queued = Random::d6(&Random::d6(&state, "field1"), "field2");
//!
//! let kinds: Vec<_> = queued.pending().iter().map(|op| &op.kind).collect();
//! assert_eq!(kinds, [&OpKind::Die, &OpKind::Die]);
//! assert!(state.get("field1").is_none());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::trace;

use crate::path::FieldPath;
use crate::state::GameState;
use crate::types::OpKind;

/// Spot count used by [`Random::die_default`].
pub const DEFAULT_SPOTS: u32 = 6;

/// One deferred request: what to draw, with which arguments, and where the
/// result goes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomOp {
    pub kind: OpKind,
    #[serde(default)]
    pub args: Vec<Value>,
    pub path: FieldPath,
}

impl RandomOp {
    pub fn new(kind: impl Into<OpKind>, args: Vec<Value>, path: impl Into<FieldPath>) -> Self {
        Self {
            kind: kind.into(),
            args,
            path: path.into(),
        }
    }
}

/// Append-only list of pending ops carried alongside a [`GameState`].
///
/// Absent until the first op is queued. Every append allocates a new list, so
/// states that share history never share a list that later changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingOps(Option<Arc<Vec<RandomOp>>>);

impl PendingOps {
    pub fn from_ops(ops: Vec<RandomOp>) -> Self {
        Self(Some(Arc::new(ops)))
    }

    /// True until the first op is queued.
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_ref().is_none_or(|ops| ops.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |ops| ops.len())
    }

    pub fn as_slice(&self) -> &[RandomOp] {
        self.0.as_deref().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RandomOp> {
        self.as_slice().iter()
    }

    /// Whether both lists are the same allocation.
    pub fn ptr_eq(&self, other: &PendingOps) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    #[must_use]
    pub fn appended(&self, op: RandomOp) -> Self {
        let mut ops = self.as_slice().to_vec();
        ops.push(op);
        Self::from_ops(ops)
    }
}

impl<'a> IntoIterator for &'a PendingOps {
    type Item = &'a RandomOp;
    type IntoIter = std::slice::Iter<'a, RandomOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Queue helpers exposed to move/turn logic.
pub struct Random;

impl Random {
    /// Generic entry point. Unknown kinds are accepted here and dealt with by
    /// the resolver's policy.
    pub fn add_random_op(
        state: &GameState,
        path: impl Into<FieldPath>,
        kind: impl Into<OpKind>,
        args: Vec<Value>,
    ) -> GameState {
        let op = RandomOp::new(kind, args, path);
        trace!(kind = %op.kind, path = %op.path, queued = state.pending().len() + 1, "queue random op");
        state.with_pending(state.pending().appended(op))
    }

    /// One die with `spots` faces; resolves to an integer in `[1, spots]`.
    pub fn die(state: &GameState, path: impl Into<FieldPath>, spots: u32) -> GameState {
        Self::add_random_op(state, path, OpKind::Die, vec![json!(spots)])
    }

    pub fn die_default(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::die(state, path, DEFAULT_SPOTS)
    }

    /// `count` dice with `spots` faces; resolves to an array of integers.
    pub fn dice(
        state: &GameState,
        path: impl Into<FieldPath>,
        spots: u32,
        count: u32,
    ) -> GameState {
        Self::add_random_op(state, path, OpKind::Die, vec![json!(spots), json!(count)])
    }

    pub fn d4(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::die(state, path, 4)
    }

    pub fn d6(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::die(state, path, 6)
    }

    pub fn d8(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::die(state, path, 8)
    }

    pub fn d10(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::die(state, path, 10)
    }

    pub fn d12(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::die(state, path, 12)
    }

    pub fn d20(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::die(state, path, 20)
    }

    /// A raw fraction in [0, 1).
    pub fn number(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::add_random_op(state, path, OpKind::Number, Vec::new())
    }

    /// Permute whatever array sits at `path` when the queue is resolved.
    pub fn shuffle(state: &GameState, path: impl Into<FieldPath>) -> GameState {
        Self::add_random_op(state, path, OpKind::Shuffle, Vec::new())
    }
}
