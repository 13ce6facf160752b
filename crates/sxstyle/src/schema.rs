//! Property tables that drive resolution.
//!
//! Which theme scale a property reads from, which short names expand to
//! which properties, and how nested scopes merge are all theme-system
//! conventions rather than fixed rules. [`StyleSchema`] keeps them as plain
//! lookup tables. The [`Default`] schema follows the common theme-ui
//! conventions (`color` reads `colors`, `margin` reads `space`, `bg` is
//! `backgroundColor`, and so on); every table can be extended or replaced.
//!
//! ```rust
//! use sxstyle::StyleSchema;
//!
//! let schema = StyleSchema::default()
//!     .with_scale("outlineColor", "colors")
//!     .with_alias("c", "color");
//!
//! assert_eq!(schema.scale_for("outlineColor"), Some("colors"));
//! assert_eq!(schema.resolve_alias("c"), "color");
//! assert_eq!(schema.resolve_alias("color"), "color");
//! ```

use std::collections::{HashMap, HashSet};

/// How a nested description is merged into its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeMerge {
    /// Nested properties are stored as `"{scope}.{property}"`.
    #[default]
    Namespace,
    /// Nested properties are merged into the parent; inner values win.
    Flatten,
}

const COLOR_PROPERTIES: &[&str] = &[
    "color",
    "backgroundColor",
    "borderColor",
    "borderTopColor",
    "borderRightColor",
    "borderBottomColor",
    "borderLeftColor",
    "borderStartColor",
    "borderEndColor",
    "shadowColor",
    "textShadowColor",
    "textDecorationColor",
    "tintColor",
    "overlayColor",
    "placeholderTextColor",
];

const SPACE_PROPERTIES: &[&str] = &[
    "margin",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "marginHorizontal",
    "marginVertical",
    "marginStart",
    "marginEnd",
    "padding",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "paddingHorizontal",
    "paddingVertical",
    "paddingStart",
    "paddingEnd",
    "top",
    "right",
    "bottom",
    "left",
    "start",
    "end",
    "gap",
    "rowGap",
    "columnGap",
];

const NEGATIVE_PROPERTIES: &[&str] = &[
    "margin",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "marginHorizontal",
    "marginVertical",
    "marginStart",
    "marginEnd",
    "top",
    "right",
    "bottom",
    "left",
    "start",
    "end",
];

const SIZE_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "minWidth",
    "maxWidth",
    "minHeight",
    "maxHeight",
    "flexBasis",
    "size",
];

const RADIUS_PROPERTIES: &[&str] = &[
    "borderRadius",
    "borderTopLeftRadius",
    "borderTopRightRadius",
    "borderBottomLeftRadius",
    "borderBottomRightRadius",
    "borderTopStartRadius",
    "borderTopEndRadius",
    "borderBottomStartRadius",
    "borderBottomEndRadius",
];

const BORDER_WIDTH_PROPERTIES: &[&str] = &[
    "borderWidth",
    "borderTopWidth",
    "borderRightWidth",
    "borderBottomWidth",
    "borderLeftWidth",
    "borderStartWidth",
    "borderEndWidth",
];

const SINGLE_SCALES: &[(&str, &str)] = &[
    ("fontFamily", "fonts"),
    ("fontSize", "fontSizes"),
    ("fontWeight", "fontWeights"),
    ("lineHeight", "lineHeights"),
    ("letterSpacing", "letterSpacings"),
    ("borderStyle", "borderStyles"),
    ("zIndex", "zIndices"),
    ("shadow", "shadows"),
    ("boxShadow", "shadows"),
    ("textShadow", "textShadows"),
    ("opacity", "opacities"),
    ("transition", "transitions"),
];

const ALIASES: &[(&str, &str)] = &[
    ("bg", "backgroundColor"),
    ("m", "margin"),
    ("mt", "marginTop"),
    ("mr", "marginRight"),
    ("mb", "marginBottom"),
    ("ml", "marginLeft"),
    ("mx", "marginHorizontal"),
    ("my", "marginVertical"),
    ("p", "padding"),
    ("pt", "paddingTop"),
    ("pr", "paddingRight"),
    ("pb", "paddingBottom"),
    ("pl", "paddingLeft"),
    ("px", "paddingHorizontal"),
    ("py", "paddingVertical"),
];

/// Lookup tables mapping property names to theme scales and aliases.
#[derive(Debug, Clone)]
pub struct StyleSchema {
    scales: HashMap<String, String>,
    aliases: HashMap<String, String>,
    negative: HashSet<String>,
    variant_key: String,
    scope_merge: ScopeMerge,
}

impl StyleSchema {
    /// Creates a schema with no scales, aliases, or negatable properties.
    ///
    /// The variant key is still `"variant"` and nested scopes are namespaced.
    pub fn empty() -> Self {
        Self {
            scales: HashMap::new(),
            aliases: HashMap::new(),
            negative: HashSet::new(),
            variant_key: "variant".to_string(),
            scope_merge: ScopeMerge::default(),
        }
    }

    /// Maps `property` to the theme scale `category`.
    pub fn with_scale(mut self, property: &str, category: &str) -> Self {
        self.scales
            .insert(property.to_string(), category.to_string());
        self
    }

    /// Makes `alias` an alternative name for `property`.
    pub fn with_alias(mut self, alias: &str, property: &str) -> Self {
        self.aliases.insert(alias.to_string(), property.to_string());
        self
    }

    /// Allows `-token` values for `property` to resolve to negated tokens.
    pub fn with_negative(mut self, property: &str) -> Self {
        self.negative.insert(property.to_string());
        self
    }

    /// Sets the property name that pulls in theme variants.
    pub fn with_variant_key(mut self, key: &str) -> Self {
        self.variant_key = key.to_string();
        self
    }

    /// Sets how nested scopes merge into their parent.
    pub fn with_scope_merge(mut self, merge: ScopeMerge) -> Self {
        self.scope_merge = merge;
        self
    }

    /// Returns the theme scale read by `property`, if any.
    pub fn scale_for(&self, property: &str) -> Option<&str> {
        self.scales.get(property).map(String::as_str)
    }

    /// Expands an alias to its full property name.
    pub fn resolve_alias<'a>(&'a self, property: &'a str) -> &'a str {
        self.aliases
            .get(property)
            .map(String::as_str)
            .unwrap_or(property)
    }

    pub fn is_negative(&self, property: &str) -> bool {
        self.negative.contains(property)
    }

    pub fn variant_key(&self) -> &str {
        &self.variant_key
    }

    pub fn scope_merge(&self) -> ScopeMerge {
        self.scope_merge
    }
}

impl Default for StyleSchema {
    fn default() -> Self {
        let groups: [(&[&str], &str); 5] = [
            (COLOR_PROPERTIES, "colors"),
            (SPACE_PROPERTIES, "space"),
            (SIZE_PROPERTIES, "sizes"),
            (RADIUS_PROPERTIES, "radii"),
            (BORDER_WIDTH_PROPERTIES, "borderWidths"),
        ];

        let mut schema = Self::empty();
        for (properties, category) in groups {
            for property in properties {
                schema = schema.with_scale(property, category);
            }
        }
        for (property, category) in SINGLE_SCALES {
            schema = schema.with_scale(property, category);
        }
        for (alias, property) in ALIASES {
            schema = schema.with_alias(alias, property);
        }
        for property in NEGATIVE_PROPERTIES {
            schema = schema.with_negative(property);
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scales() {
        let schema = StyleSchema::default();
        assert_eq!(schema.scale_for("color"), Some("colors"));
        assert_eq!(schema.scale_for("backgroundColor"), Some("colors"));
        assert_eq!(schema.scale_for("marginTop"), Some("space"));
        assert_eq!(schema.scale_for("fontFamily"), Some("fonts"));
        assert_eq!(schema.scale_for("borderTopLeftRadius"), Some("radii"));
        assert_eq!(schema.scale_for("flexDirection"), None);
    }

    #[test]
    fn test_default_aliases() {
        let schema = StyleSchema::default();
        assert_eq!(schema.resolve_alias("bg"), "backgroundColor");
        assert_eq!(schema.resolve_alias("mx"), "marginHorizontal");
        assert_eq!(schema.resolve_alias("unknown"), "unknown");
    }

    #[test]
    fn test_negative_only_for_offsets() {
        let schema = StyleSchema::default();
        assert!(schema.is_negative("marginTop"));
        assert!(schema.is_negative("left"));
        assert!(!schema.is_negative("padding"));
    }

    #[test]
    fn test_empty_schema_has_no_tables() {
        let schema = StyleSchema::empty();
        assert_eq!(schema.scale_for("color"), None);
        assert_eq!(schema.resolve_alias("bg"), "bg");
        assert_eq!(schema.variant_key(), "variant");
        assert_eq!(schema.scope_merge(), ScopeMerge::Namespace);
    }

    #[test]
    fn test_builder_overrides() {
        let schema = StyleSchema::default()
            .with_scale("color", "palette")
            .with_variant_key("look")
            .with_scope_merge(ScopeMerge::Flatten);
        assert_eq!(schema.scale_for("color"), Some("palette"));
        assert_eq!(schema.variant_key(), "look");
        assert_eq!(schema.scope_merge(), ScopeMerge::Flatten);
    }
}
