//! Game state as seen by the random-op engine.
//!
//! [`GameState`] pairs the host's public data tree with the side channel of
//! pending random operations. The two are kept apart on purpose: the data is
//! what gets serialized for clients, the pending list never is, so queued
//! requests cannot leak before they are resolved.
//!
//! # Examples
//!
//! ```rust
//! use tumbler::state::GameState;
//! use tumbler::ops::Random;
//! use serde_json::json;
//!
//! let state = GameState::builder()
//!     .with_json("suspense", json!(9000))
//!     .with_json("players", json!({"0": {"points": 100}}))
//!     .build();
//!
//! let queued = Random::d6(&state, "players.0.attackerDie");
//! assert_eq!(queued.pending().len(), 1);
//!
//! // Data is shared, and the pending list is not serialized.
//! assert!(queued.data().ptr_eq(state.data()));
//! assert_eq!(
//!     serde_json::to_value(&queued).unwrap(),
//!     json!({"suspense": 9000, "players": {"0": {"points": 100}}})
//! );
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ops::PendingOps;
use crate::path::{FieldPath, get_at};
use crate::value::{StateMap, StateValue};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameState {
    data: StateValue,
    #[serde(skip)]
    pending: PendingOps,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(StateValue::object())
    }
}

impl GameState {
    /// Wrap a data tree with no pending operations.
    pub fn new(data: impl Into<StateValue>) -> Self {
        Self {
            data: data.into(),
            pending: PendingOps::default(),
        }
    }

    pub fn from_json(value: Value) -> Self {
        Self::new(StateValue::from(value))
    }

    pub fn builder() -> GameStateBuilder {
        GameStateBuilder::default()
    }

    /// The public data tree.
    pub fn data(&self) -> &StateValue {
        &self.data
    }

    pub fn into_data(self) -> StateValue {
        self.data
    }

    pub fn pending(&self) -> &PendingOps {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Read the value at a dotted path.
    pub fn get(&self, path: impl Into<FieldPath>) -> Option<&StateValue> {
        get_at(&self.data, &path.into())
    }

    pub fn to_json(&self) -> Value {
        self.data.to_json()
    }

    /// Same data, different pending list.
    pub(crate) fn with_pending(&self, pending: PendingOps) -> Self {
        Self {
            data: self.data.clone(),
            pending,
        }
    }
}

/// Fluent construction of top-level fields.
#[derive(Debug, Default)]
pub struct GameStateBuilder {
    fields: StateMap,
}

impl GameStateBuilder {
    pub fn with_field(mut self, key: &str, value: impl Into<StateValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_json(self, key: &str, value: Value) -> Self {
        self.with_field(key, StateValue::from(value))
    }

    pub fn build(self) -> GameState {
        GameState::new(self.fields.into_iter().collect::<StateValue>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_empty_object_without_pending() {
        let state = GameState::default();
        assert_eq!(state.to_json(), json!({}));
        assert!(!state.has_pending());
        assert!(state.pending().is_absent());
    }

    #[test]
    fn builder_sets_top_level_fields() {
        let state = GameState::builder()
            .with_field("universe", 42_i64)
            .with_field("name", "tiles")
            .with_json("tiles", json!(["A", "B"]))
            .build();
        assert_eq!(
            state.to_json(),
            json!({"universe": 42, "name": "tiles", "tiles": ["A", "B"]})
        );
        assert_eq!(state.get("tiles.1").and_then(StateValue::as_str), Some("B"));
    }

    #[test]
    fn clone_shares_the_data_tree() {
        let state = GameState::from_json(json!({"players": {"0": {}}}));
        let copy = state.clone();
        assert!(state.data().ptr_eq(copy.data()));
    }

    #[test]
    fn deserializes_from_plain_json() {
        let state: GameState = serde_json::from_value(json!({"a": {"b": 1}})).unwrap();
        assert_eq!(state.get("a.b").and_then(StateValue::as_i64), Some(1));
        assert!(!state.has_pending());
    }
}
