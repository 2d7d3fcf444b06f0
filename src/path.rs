//! Dot-separated field paths and copy-on-write writes into [`StateValue`] trees.
//!
//! A [`FieldPath`] such as `players.0.attackerDie` is split once into its
//! segments. Segments are object keys; when a segment meets an array it must
//! be a decimal index of an existing element.
//!
//! [`set_at`] never mutates its input. It rebuilds only the containers on the
//! route from the root to the written leaf, so every sibling subtree keeps its
//! allocation:
//!
//! ```rust
//! use tumbler::path::{set_at, FieldPath};
//! use tumbler::value::StateValue;
//! use serde_json::json;
//!
//! let before = StateValue::from(json!({"players": {"0": {"hp": 20}, "1": {"hp": 14}}}));
//! let path = FieldPath::parse("players.0.savingThrow");
//! let after = set_at(&before, &path, StateValue::from(17_i64)).unwrap();
//!
//! let p1_before = before.get("players").and_then(|p| p.get("1")).unwrap();
//! let p1_after = after.get("players").and_then(|p| p.get("1")).unwrap();
//! assert!(p1_before.ptr_eq(p1_after));
//! assert!(before.get("players").and_then(|p| p.get("0")).and_then(|p| p.get("savingThrow")).is_none());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::RandomError;
use crate::value::{StateMap, StateValue};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Split `raw` on `.`. Parsing never fails; empty segments are kept as
    /// empty keys.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            segments: raw.split('.').map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        FieldPath::parse(raw)
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        FieldPath::parse(&raw)
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Read the value at `path`, if every segment resolves.
#[must_use]
pub fn get_at<'a>(root: &'a StateValue, path: &FieldPath) -> Option<&'a StateValue> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| current.get(segment))
}

/// Return a new tree with `value` written at `path`.
///
/// Missing intermediate keys are created as empty objects. Walking through a
/// scalar (including `null`) or past the end of an array fails with
/// [`RandomError::PathResolution`].
pub fn set_at(
    root: &StateValue,
    path: &FieldPath,
    value: StateValue,
) -> Result<StateValue, RandomError> {
    set_segments(root, path.segments(), value, path)
}

fn set_segments(
    node: &StateValue,
    segments: &[String],
    value: StateValue,
    path: &FieldPath,
) -> Result<StateValue, RandomError> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(value);
    };

    match node {
        StateValue::Object(map) => {
            let child = if rest.is_empty() {
                value
            } else {
                match map.get(head) {
                    Some(existing) => set_segments(existing, rest, value, path)?,
                    None => set_segments(&StateValue::object(), rest, value, path)?,
                }
            };
            let mut next: StateMap = (**map).clone();
            next.insert(head.clone(), child);
            Ok(StateValue::Object(Arc::new(next)))
        }
        StateValue::Array(items) => {
            let index = head
                .parse::<usize>()
                .ok()
                .filter(|i| *i < items.len())
                .ok_or_else(|| RandomError::PathResolution {
                    path: path.to_string(),
                    segment: head.clone(),
                    found: "an array without that index",
                })?;
            let child = set_segments(&items[index], rest, value, path)?;
            let mut next = (**items).clone();
            next[index] = child;
            Ok(StateValue::Array(Arc::new(next)))
        }
        scalar => Err(RandomError::PathResolution {
            path: path.to_string(),
            segment: head.clone(),
            found: scalar.kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> StateValue {
        StateValue::from(json!({
            "universe": 42,
            "players": {
                "0": {"hp": 20, "inventory": ["sword", "shield"]},
                "1": {"hp": 14, "inventory": ["staff", "bracers"]}
            },
            "deck": [{"id": 1}, {"id": 2}]
        }))
    }

    #[test]
    fn parse_splits_on_dots() {
        let path = FieldPath::parse("players.0.attackerDie");
        assert_eq!(path.segments(), ["players", "0", "attackerDie"]);
        assert_eq!(path.to_string(), "players.0.attackerDie");
        assert_eq!(FieldPath::parse("field1").segments(), ["field1"]);
    }

    #[test]
    fn get_at_walks_objects_and_arrays() {
        let s = state();
        assert_eq!(
            get_at(&s, &"players.1.hp".into()),
            Some(&StateValue::from(14_i64))
        );
        assert_eq!(
            get_at(&s, &"deck.1.id".into()),
            Some(&StateValue::from(2_i64))
        );
        assert!(get_at(&s, &"players.2.hp".into()).is_none());
        assert!(get_at(&s, &"universe.x".into()).is_none());
    }

    #[test]
    fn set_at_copies_only_the_ancestor_chain() {
        let before = state();
        let after = set_at(&before, &"players.0.savingThrow".into(), 11_i64.into()).unwrap();

        assert!(!before.ptr_eq(&after));
        let players_before = before.get("players").unwrap();
        let players_after = after.get("players").unwrap();
        assert!(!players_before.ptr_eq(players_after));
        assert!(
            players_before
                .get("1")
                .unwrap()
                .ptr_eq(players_after.get("1").unwrap())
        );
        assert!(
            get_at(&before, &"players.0.inventory".into())
                .unwrap()
                .ptr_eq(get_at(&after, &"players.0.inventory".into()).unwrap())
        );
        assert!(before.get("deck").unwrap().ptr_eq(after.get("deck").unwrap()));

        assert!(get_at(&before, &"players.0.savingThrow".into()).is_none());
        assert_eq!(
            get_at(&after, &"players.0.savingThrow".into()),
            Some(&StateValue::from(11_i64))
        );
    }

    #[test]
    fn set_at_creates_missing_objects() {
        let after = set_at(&StateValue::object(), &"a.b.c".into(), "x".into()).unwrap();
        assert_eq!(after.to_json(), json!({"a": {"b": {"c": "x"}}}));
    }

    #[test]
    fn set_at_writes_into_existing_array_slots() {
        let before = state();
        let after = set_at(&before, &"deck.0.id".into(), 9_i64.into()).unwrap();
        assert_eq!(get_at(&after, &"deck.0.id".into()), Some(&StateValue::from(9_i64)));
        assert_eq!(
            after.get("deck").unwrap().as_array().unwrap()[1],
            before.get("deck").unwrap().as_array().unwrap()[1]
        );
        assert!(
            after.get("deck").unwrap().as_array().unwrap()[1]
                .ptr_eq(&before.get("deck").unwrap().as_array().unwrap()[1])
        );
    }

    #[test]
    fn set_at_rejects_walking_through_scalars() {
        let err = set_at(&state(), &"universe.answer".into(), 1_i64.into()).unwrap_err();
        assert_eq!(
            err,
            RandomError::PathResolution {
                path: "universe.answer".into(),
                segment: "answer".into(),
                found: "number",
            }
        );
    }

    #[test]
    fn set_at_rejects_out_of_range_indices() {
        let err = set_at(&state(), &"deck.5.id".into(), 1_i64.into()).unwrap_err();
        assert!(matches!(err, RandomError::PathResolution { ref segment, .. } if segment == "5"));
    }
}
