//! Trait metadata export
//!
//! Converts an [`AttributeSet`] into the `{trait_type, value, display_type}`
//! records NFT metadata consumers expect.

use crate::core::{AttributeSet, TraitValue};
use serde::Serialize;

/// One exported attribute record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
    pub trait_type: String,
    pub value: TraitValue,
}

/// The `{"attributes": [...]}` document handed to metadata consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraitMetadata {
    pub attributes: Vec<TraitRecord>,
}

/// Capitalize the first character of every word and lowercase the rest.
///
/// A word starts at an ASCII word character (`[A-Za-z0-9_]`) and runs to the
/// next whitespace. Internal capitals are not preserved: `gasPrice` becomes
/// `Gasprice`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_whitespace() {
            in_word = false;
            out.push(c);
        } else if in_word {
            out.extend(c.to_lowercase());
        } else if c.is_ascii_alphanumeric() || c == '_' {
            in_word = true;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// One record per attribute, in insertion order. Numbers carry
/// `display_type: "number"`; labels carry no display type.
pub fn format_traits(attributes: &AttributeSet) -> Vec<TraitRecord> {
    attributes
        .iter()
        .map(|(key, value)| TraitRecord {
            display_type: value.is_number().then(|| "number".to_string()),
            trait_type: title_case(key),
            value: value.clone(),
        })
        .collect()
}

pub fn trait_metadata(attributes: &AttributeSet) -> TraitMetadata {
    TraitMetadata {
        attributes: format_traits(attributes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_drops_internal_capitals() {
        assert_eq!(title_case("gasPrice"), "Gasprice");
        assert_eq!(title_case("magic"), "Magic");
        assert_eq!(title_case("GLOW"), "Glow");
    }

    #[test]
    fn test_title_case_multiple_words() {
        assert_eq!(title_case("deep  blue sea"), "Deep  Blue Sea");
        assert_eq!(title_case("tx count\tHIGH"), "Tx Count\tHigh");
    }

    #[test]
    fn test_title_case_word_boundaries() {
        // a word only starts at a word character, then runs to whitespace
        assert_eq!(title_case("-abc"), "-Abc");
        assert_eq!(title_case("x-RAY"), "X-ray");
        assert_eq!(title_case("_private"), "_private");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_format_traits_display_types() {
        let set = AttributeSet::new()
            .with("magic", 12.5)
            .with("force", "Calm")
            .with("gasPrice", 3.0);
        let records = format_traits(&set);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].trait_type, "Magic");
        assert_eq!(records[0].display_type.as_deref(), Some("number"));
        assert_eq!(records[1].trait_type, "Force");
        assert_eq!(records[1].display_type, None);
        assert_eq!(records[2].trait_type, "Gasprice");
    }

    #[test]
    fn test_metadata_json_shape() {
        let set = AttributeSet::new().with("charm", 5.0).with("force", "Vengeance");
        let json = serde_json::to_value(trait_metadata(&set)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "attributes": [
                    { "display_type": "number", "trait_type": "Charm", "value": 5 },
                    { "trait_type": "Force", "value": "Vengeance" }
                ]
            })
        );
    }

    #[test]
    fn test_empty_set_formats_to_empty_list() {
        assert!(format_traits(&AttributeSet::new()).is_empty());
    }
}
