//! Property classification.
//!
//! Decides which calculator animates a style property. Tables come from
//! [`PropertyTableConfig`]; names are stored in camelCase. A hyphenated name
//! (`z-index`) is accepted with a warning by retrying its camelCase form.

use std::collections::HashMap;

use keyframe_config::PropertyTableConfig;
use serde::{Deserialize, Serialize};

use crate::env::Logger;

/// Calculator family of an animatable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyClass {
    Dimensional,
    RoundedNumeric,
    Numeric,
    Transform,
    Color,
}

/// Lookup table from property name to calculator family.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRegistry {
    classes: HashMap<String, PropertyClass>,
}

impl PropertyRegistry {
    /// Build from configured tables. A name listed in several tables keeps
    /// the class of the first table in lookup order.
    pub fn from_config(tables: &PropertyTableConfig) -> Self {
        let ordered = [
            (&tables.dimensional, PropertyClass::Dimensional),
            (&tables.rounded_numeric, PropertyClass::RoundedNumeric),
            (&tables.numeric, PropertyClass::Numeric),
            (&tables.transform, PropertyClass::Transform),
            (&tables.color, PropertyClass::Color),
        ];

        let mut classes = HashMap::new();
        for (names, class) in ordered {
            for name in names {
                classes.entry(name.clone()).or_insert(class);
            }
        }
        Self { classes }
    }

    /// Class of a name exactly as listed.
    pub fn get(&self, property: &str) -> Option<PropertyClass> {
        self.classes.get(property).copied()
    }

    /// Class of `property`, retrying hyphenated names in camelCase.
    ///
    /// Returns `None` for properties the engine cannot animate.
    pub fn classify(&self, property: &str, logger: &dyn Logger) -> Option<PropertyClass> {
        if let Some(class) = self.get(property) {
            return Some(class);
        }
        if !property.contains('-') {
            return None;
        }

        let camel = to_camel_case(property);
        let class = self.get(&camel)?;
        logger.warn(&format!(
            "keyframe property `{}` should be written in camelCase as `{}`",
            property, camel
        ));
        Some(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        Self::from_config(&PropertyTableConfig::default())
    }
}

/// `border-top-width` → `borderTopWidth`.
pub fn to_camel_case(property: &str) -> String {
    let mut camel = String::with_capacity(property.len());
    let mut upper = false;
    for ch in property.chars() {
        if ch == '-' {
            upper = !camel.is_empty();
        } else if upper {
            camel.extend(ch.to_uppercase());
            upper = false;
        } else {
            camel.push(ch);
        }
    }
    camel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingLogger;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("z-index"), "zIndex");
        assert_eq!(to_camel_case("border-top-width"), "borderTopWidth");
        assert_eq!(to_camel_case("opacity"), "opacity");
        assert_eq!(to_camel_case("-webkit-x"), "webkitX");
    }

    #[test]
    fn test_default_classes() {
        let registry = PropertyRegistry::default();
        assert_eq!(registry.get("width"), Some(PropertyClass::Dimensional));
        assert_eq!(registry.get("zIndex"), Some(PropertyClass::RoundedNumeric));
        assert_eq!(registry.get("opacity"), Some(PropertyClass::Numeric));
        assert_eq!(registry.get("transform"), Some(PropertyClass::Transform));
        assert_eq!(registry.get("backgroundColor"), Some(PropertyClass::Color));
        assert_eq!(registry.get("display"), None);
    }

    #[test]
    fn test_hyphenated_name_warns() {
        let registry = PropertyRegistry::default();
        let logger = RecordingLogger::new();

        assert_eq!(
            registry.classify("z-index", &logger),
            Some(PropertyClass::RoundedNumeric)
        );
        let warnings = logger.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("zIndex"));

        assert_eq!(registry.classify("zIndex", &logger), Some(PropertyClass::RoundedNumeric));
        assert_eq!(logger.warnings().len(), 1);
    }

    #[test]
    fn test_unknown_property_is_unclassified() {
        let registry = PropertyRegistry::default();
        let logger = RecordingLogger::new();
        assert_eq!(registry.classify("display", &logger), None);
        assert_eq!(registry.classify("grid-template", &logger), None);
        assert!(logger.warnings().is_empty());
    }

    #[test]
    fn test_first_table_wins() {
        let tables = PropertyTableConfig {
            dimensional: vec!["lineHeight".to_string()],
            rounded_numeric: vec![],
            numeric: vec!["lineHeight".to_string()],
            transform: vec![],
            color: vec![],
        };
        let registry = PropertyRegistry::from_config(&tables);
        assert_eq!(registry.get("lineHeight"), Some(PropertyClass::Dimensional));
        assert_eq!(registry.len(), 1);
    }
}
