use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// A trait value: numeric, or a short category label
#[derive(Debug, Clone, PartialEq)]
pub enum TraitValue {
    Number(f64),
    Label(String),
}

impl TraitValue {
    pub fn is_number(&self) -> bool {
        matches!(self, TraitValue::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TraitValue::Number(value) => Some(*value),
            TraitValue::Label(_) => None,
        }
    }
}

// Largest integer a double represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for TraitValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TraitValue::Number(value) if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*value as i64)
            }
            TraitValue::Number(value) => serializer.serialize_f64(*value),
            TraitValue::Label(label) => serializer.serialize_str(label),
        }
    }
}

impl fmt::Display for TraitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitValue::Number(value) => write!(f, "{value}"),
            TraitValue::Label(label) => write!(f, "{label}"),
        }
    }
}

impl From<f64> for TraitValue {
    fn from(value: f64) -> Self {
        TraitValue::Number(value)
    }
}

impl From<usize> for TraitValue {
    fn from(value: usize) -> Self {
        TraitValue::Number(value as f64)
    }
}

impl From<&str> for TraitValue {
    fn from(value: &str) -> Self {
        TraitValue::Label(value.to_string())
    }
}

impl From<String> for TraitValue {
    fn from(value: String) -> Self {
        TraitValue::Label(value)
    }
}

/// Trait name to value, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    entries: Vec<(String, TraitValue)>,
}

impl AttributeSet {
    pub fn new() -> AttributeSet {
        AttributeSet::default()
    }

    /// Builder-style insert. Re-inserting a key replaces its value in place.
    pub fn with(mut self, key: &str, value: impl Into<TraitValue>) -> AttributeSet {
        self.insert(key, value);
        self
    }

    fn insert(&mut self, key: &str, value: impl Into<TraitValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&TraitValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TraitValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let set = AttributeSet::new()
            .with("magic", 10.0)
            .with("charm", 5.0)
            .with("deepness", "Abiding");
        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, vec!["magic", "charm", "deepness"]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let set = AttributeSet::new().with("a", 1.0).with("b", 2.0).with("a", 3.0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a"), Some(&TraitValue::Number(3.0)));
        assert_eq!(set.keys().next(), Some("a"));
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let set = AttributeSet::new()
            .with("zeta", 10.0)
            .with("alpha", 0.5)
            .with("force", "Calm");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"zeta":10,"alpha":0.5,"force":"Calm"}"#);
    }
}
