//! Persistent, structurally shared game-state values.
//!
//! [`StateValue`] mirrors the shape of `serde_json::Value`, but arrays and
//! objects sit behind an [`Arc`]. Cloning a value is therefore cheap, and a
//! copy-on-write update only reallocates the containers on the route it
//! touches. Everything else keeps its allocation, which hosts can observe
//! through [`StateValue::ptr_eq`] for change detection.
//!
//! # Examples
//!
//! ```rust
//! use tumbler::value::StateValue;
//! use serde_json::json;
//!
//! let value = StateValue::from(json!({"players": {"0": {"hp": 20}}}));
//! let copy = value.clone();
//!
//! assert!(value.ptr_eq(&copy));
//! assert_eq!(value.to_json(), json!({"players": {"0": {"hp": 20}}}));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Keyed children of an object node.
pub type StateMap = BTreeMap<String, StateValue>;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum StateValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Arc<Vec<StateValue>>),
    Object(Arc<StateMap>),
}

impl StateValue {
    /// An empty object node.
    #[must_use]
    pub fn object() -> Self {
        StateValue::Object(Arc::new(StateMap::new()))
    }

    #[must_use]
    pub fn array(items: Vec<StateValue>) -> Self {
        StateValue::Array(Arc::new(items))
    }

    /// Human-readable type name, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            StateValue::Null => "null",
            StateValue::Bool(_) => "boolean",
            StateValue::Number(_) => "number",
            StateValue::String(_) => "string",
            StateValue::Array(_) => "array",
            StateValue::Object(_) => "object",
        }
    }

    /// Reference identity for containers.
    ///
    /// Returns `true` only when both values are arrays (or both objects)
    /// backed by the same allocation. Scalars carry no identity and always
    /// compare `false`; use `==` for structural equality.
    #[must_use]
    pub fn ptr_eq(&self, other: &StateValue) -> bool {
        match (self, other) {
            (StateValue::Array(a), StateValue::Array(b)) => Arc::ptr_eq(a, b),
            (StateValue::Object(a), StateValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, StateValue::Array(_) | StateValue::Object(_))
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&StateMap> {
        match self {
            StateValue::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[StateValue]> {
        match self {
            StateValue::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StateValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StateValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up one child: an object key, or a decimal index into an array.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StateValue> {
        match self {
            StateValue::Object(map) => map.get(key),
            StateValue::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Deep conversion into a plain `serde_json::Value`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::from(self)
    }
}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StateValue::Null,
            Value::Bool(b) => StateValue::Bool(b),
            Value::Number(n) => StateValue::Number(n),
            Value::String(s) => StateValue::String(s),
            Value::Array(items) => {
                StateValue::array(items.into_iter().map(StateValue::from).collect())
            }
            Value::Object(map) => StateValue::Object(Arc::new(
                map.into_iter()
                    .map(|(k, v)| (k, StateValue::from(v)))
                    .collect(),
            )),
        }
    }
}

impl From<&StateValue> for Value {
    fn from(value: &StateValue) -> Self {
        match value {
            StateValue::Null => Value::Null,
            StateValue::Bool(b) => Value::Bool(*b),
            StateValue::Number(n) => Value::Number(n.clone()),
            StateValue::String(s) => Value::String(s.clone()),
            StateValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            StateValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl From<StateValue> for Value {
    fn from(value: StateValue) -> Self {
        Value::from(&value)
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        StateValue::Bool(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Number(value.into())
    }
}

impl From<u32> for StateValue {
    fn from(value: u32) -> Self {
        StateValue::Number(value.into())
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(StateValue::Null, StateValue::Number)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::String(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::String(value)
    }
}

impl From<Vec<StateValue>> for StateValue {
    fn from(items: Vec<StateValue>) -> Self {
        StateValue::array(items)
    }
}

impl FromIterator<(String, StateValue)> for StateValue {
    fn from_iter<I: IntoIterator<Item = (String, StateValue)>>(iter: I) -> Self {
        StateValue::Object(Arc::new(iter.into_iter().collect()))
    }
}

impl Serialize for StateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            StateValue::Null => serializer.serialize_unit(),
            StateValue::Bool(b) => serializer.serialize_bool(*b),
            StateValue::Number(n) => n.serialize(serializer),
            StateValue::String(s) => serializer.serialize_str(s),
            StateValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            StateValue::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_conversion_preserves_shape() {
        let original = json!({
            "universe": 42,
            "ratio": 0.25,
            "name": "dune",
            "flags": [true, false, null],
            "nested": {"deep": {"x": -1}}
        });
        let value = StateValue::from(original.clone());
        assert_eq!(value.to_json(), original);
        assert_eq!(value.kind_name(), "object");
    }

    #[test]
    fn clone_shares_containers() {
        let value = StateValue::from(json!({"inventory": ["sword", "shield"]}));
        let copy = value.clone();
        assert!(value.ptr_eq(&copy));
        assert!(
            value
                .get("inventory")
                .unwrap()
                .ptr_eq(copy.get("inventory").unwrap())
        );
    }

    #[test]
    fn equal_but_separately_built_values_are_not_ptr_eq() {
        let a = StateValue::from(json!({"k": [1, 2]}));
        let b = StateValue::from(json!({"k": [1, 2]}));
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn scalars_have_no_identity() {
        let a = StateValue::from(3_i64);
        assert!(!a.ptr_eq(&a.clone()));
    }

    #[test]
    fn get_handles_keys_and_indices() {
        let value = StateValue::from(json!({"players": {"0": {"hp": 20}}, "deck": ["a", "b"]}));
        assert_eq!(
            value.get("players").and_then(|p| p.get("0")).and_then(|p| p.get("hp")),
            Some(&StateValue::from(20_i64))
        );
        assert_eq!(
            value.get("deck").and_then(|d| d.get("1")).and_then(StateValue::as_str),
            Some("b")
        );
        assert!(value.get("deck").and_then(|d| d.get("9")).is_none());
        assert!(StateValue::from(7_i64).get("x").is_none());
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert!(StateValue::from(f64::NAN).is_null());
        assert_eq!(StateValue::from(0.5).as_f64(), Some(0.5));
    }

    #[test]
    fn serde_matches_plain_json() {
        let original = json!({"a": [1, {"b": "c"}], "d": null});
        let value: StateValue = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&value).unwrap(), original);
    }
}
