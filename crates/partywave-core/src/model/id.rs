// Entity identifiers. The backend is inconsistent about id types (numeric
// Long ids for most entities, UUID strings for rooms), so an id is either
// a JSON number or a JSON string and is compared by its string form.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Parse user-supplied text: integers become `Number`, anything else `Text`.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => EntityId::Number(n),
            Err(_) => EntityId::Text(trimmed.to_string()),
        }
    }

    /// Numeric value, when the id is a number or numeric text.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            EntityId::Number(n) => Some(*n),
            EntityId::Text(s) => s.parse().ok(),
        }
    }

    /// Whether this id matches the string form of another value
    /// (the `it.id.toString() === value` lookup used for relation options).
    pub fn matches(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Ord for EntityId {
    /// Numeric ids order by value and sort before non-numeric ids; ties fall
    /// back to the string form so the order agrees with `Eq`.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a
                .cmp(&b)
                .then_with(|| self.to_string().cmp(&other.to_string())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_numbers_and_strings() {
        let n: EntityId = serde_json::from_str("42").unwrap();
        let s: EntityId = serde_json::from_str("\"6f1c-uuid\"").unwrap();
        assert_eq!(n, EntityId::Number(42));
        assert_eq!(s, EntityId::Text("6f1c-uuid".into()));
    }

    #[test]
    fn serializes_back_to_original_json_type() {
        assert_eq!(serde_json::to_string(&EntityId::Number(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&EntityId::from("a")).unwrap(), "\"a\"");
    }

    #[test]
    fn compares_by_string_form() {
        assert_eq!(EntityId::Number(7), EntityId::from("7"));
        assert!(EntityId::Number(7).matches("7"));
        assert!(!EntityId::Number(7).matches("07"));
    }

    #[test]
    fn numeric_ids_order_by_value() {
        let mut ids = vec![EntityId::Number(10), EntityId::from("abc"), EntityId::Number(9)];
        ids.sort();
        assert_eq!(
            ids,
            vec![EntityId::Number(9), EntityId::Number(10), EntityId::from("abc")]
        );
    }

    #[test]
    fn parse_prefers_numbers() {
        assert_eq!(EntityId::parse(" 12 "), EntityId::Number(12));
        assert!(matches!(EntityId::parse("x-1"), EntityId::Text(_)));
    }
}
