use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a queued random operation.
///
/// Kinds travel as plain strings (`"DICE"`, `"NUMBER"`, `"SHUFFLE"`) so that
/// queues written by other hosts deserialize cleanly. Anything unrecognised
/// lands in [`OpKind::Other`] and is left to the resolver's
/// [`UnknownOpPolicy`](crate::config::UnknownOpPolicy).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OpKind {
    Die,
    Number,
    Shuffle,
    Other(String),
}

impl OpKind {
    pub const DIE: &'static str = "DICE";
    pub const NUMBER: &'static str = "NUMBER";
    pub const SHUFFLE: &'static str = "SHUFFLE";

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            OpKind::Die => Self::DIE,
            OpKind::Number => Self::NUMBER,
            OpKind::Shuffle => Self::SHUFFLE,
            OpKind::Other(name) => name,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, OpKind::Other(_))
    }
}

impl From<&str> for OpKind {
    fn from(value: &str) -> Self {
        match value {
            Self::DIE => OpKind::Die,
            Self::NUMBER => OpKind::Number,
            Self::SHUFFLE => OpKind::Shuffle,
            other => OpKind::Other(other.to_string()),
        }
    }
}

impl From<String> for OpKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::DIE | Self::NUMBER | Self::SHUFFLE => OpKind::from(value.as_str()),
            _ => OpKind::Other(value),
        }
    }
}

impl From<OpKind> for String {
    fn from(kind: OpKind) -> Self {
        match kind {
            OpKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        for kind in [OpKind::Die, OpKind::Number, OpKind::Shuffle] {
            assert_eq!(OpKind::from(kind.as_str()), kind);
            assert!(kind.is_known());
        }
    }

    #[test]
    fn unrecognised_names_are_kept_verbatim() {
        let kind = OpKind::from("XYZ");
        assert_eq!(kind, OpKind::Other("XYZ".into()));
        assert!(!kind.is_known());
        assert_eq!(kind.to_string(), "XYZ");
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_value(OpKind::Die).unwrap(), "DICE");
        let parsed: OpKind = serde_json::from_str("\"SHUFFLE\"").unwrap();
        assert_eq!(parsed, OpKind::Shuffle);
    }
}
