//! Token resolution: responsive selection followed by theme lookup.
//!
//! Resolving a property value takes two steps, always in this order:
//!
//! 1. A responsive sequence is indexed at `min(breakpoint, len - 1)`, so
//!    tiers past the end hold the last entry.
//! 2. The selected literal is looked up in the theme scale the schema maps
//!    the property to. A miss is not an error: the literal passes through
//!    unchanged, since arbitrary literals are always legal style values.
//!
//! ```rust
//! use sxstyle::{Literal, StyleSchema, SxValue, Theme, TokenResolver};
//!
//! let theme = Theme::new().add_token("colors", "primary", "#123");
//! let schema = StyleSchema::default();
//! let tokens = TokenResolver::new(&theme, &schema, 3);
//!
//! let color = SxValue::responsive(["muted", "primary"]);
//! assert_eq!(tokens.resolve("color", &color), Some(Literal::from("#123")));
//! assert_eq!(tokens.resolve("color", &"tomato".into()), Some(Literal::from("tomato")));
//! ```

use crate::schema::StyleSchema;
use crate::theme::Theme;
use crate::value::{Literal, SxValue};

/// Selects the entry of a responsive sequence for a breakpoint index.
///
/// Returns `None` for an empty sequence or an unset (`None`) entry.
pub fn select_responsive(entries: &[Option<Literal>], breakpoint: usize) -> Option<&Literal> {
    let last = entries.len().checked_sub(1)?;
    entries[breakpoint.min(last)].as_ref()
}

/// Expands property values against a theme at a fixed breakpoint.
#[derive(Debug, Clone, Copy)]
pub struct TokenResolver<'a> {
    theme: &'a Theme,
    schema: &'a StyleSchema,
    breakpoint: usize,
}

impl<'a> TokenResolver<'a> {
    pub fn new(theme: &'a Theme, schema: &'a StyleSchema, breakpoint: usize) -> Self {
        Self {
            theme,
            schema,
            breakpoint,
        }
    }

    pub fn theme(&self) -> &'a Theme {
        self.theme
    }

    pub fn schema(&self) -> &'a StyleSchema {
        self.schema
    }

    pub fn breakpoint(&self) -> usize {
        self.breakpoint
    }

    /// Picks the literal for the active breakpoint without token lookup.
    ///
    /// Nested descriptions have no literal and yield `None`.
    pub fn select<'v>(&self, value: &'v SxValue) -> Option<&'v Literal> {
        match value {
            SxValue::Literal(literal) => Some(literal),
            SxValue::Responsive(entries) => select_responsive(entries, self.breakpoint),
            SxValue::Nested(_) => None,
        }
    }

    /// Resolves a property value to a literal.
    ///
    /// `None` means the property is unset at this breakpoint.
    pub fn resolve(&self, property: &str, value: &SxValue) -> Option<Literal> {
        self.select(value)
            .map(|literal| self.resolve_literal(property, literal))
    }

    /// Looks a literal up in the property's theme scale.
    pub fn resolve_literal(&self, property: &str, literal: &Literal) -> Literal {
        let Some(category) = self.schema.scale_for(property) else {
            return literal.clone();
        };
        let Some(key) = literal.token_key() else {
            return literal.clone();
        };

        if let Some(token) = self.theme.token(category, &key) {
            return token.clone();
        }

        if self.schema.is_negative(property) {
            if let Some(token) = key
                .strip_prefix('-')
                .and_then(|positive| self.theme.token(category, positive))
            {
                return token.negated();
            }
        }

        tracing::trace!(property, category, token = %key, "token not in theme, passing through");
        literal.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> Theme {
        Theme::new()
            .add_token("colors", "primary", "#123")
            .add_token("colors", "gray.100", "#eee")
            .add_scale("space", [0, 4, 8, 16])
            .add_token("sizes", "full", "100%")
    }

    #[test]
    fn test_select_responsive_clamps_to_last() {
        let entries = vec![Some(Literal::from(1)), Some(Literal::from(2))];
        assert_eq!(select_responsive(&entries, 0), Some(&Literal::from(1)));
        assert_eq!(select_responsive(&entries, 1), Some(&Literal::from(2)));
        assert_eq!(select_responsive(&entries, 7), Some(&Literal::from(2)));
    }

    #[test]
    fn test_select_responsive_empty_and_unset() {
        assert_eq!(select_responsive(&[], 0), None);
        let entries = vec![None, Some(Literal::from(2))];
        assert_eq!(select_responsive(&entries, 0), None);
        assert_eq!(select_responsive(&entries, 3), Some(&Literal::from(2)));
    }

    #[test]
    fn test_resolve_known_token() {
        let theme = theme();
        let schema = StyleSchema::default();
        let tokens = TokenResolver::new(&theme, &schema, 0);
        assert_eq!(tokens.resolve("color", &"primary".into()), Some(Literal::from("#123")));
        assert_eq!(tokens.resolve("borderColor", &"gray.100".into()), Some(Literal::from("#eee")));
        assert_eq!(tokens.resolve("width", &"full".into()), Some(Literal::from("100%")));
    }

    #[test]
    fn test_resolve_numeric_scale_index() {
        let theme = theme();
        let schema = StyleSchema::default();
        let tokens = TokenResolver::new(&theme, &schema, 0);
        assert_eq!(tokens.resolve("margin", &2.into()), Some(Literal::from(8)));
        assert_eq!(tokens.resolve("margin", &2.5.into()), Some(Literal::from(2.5)));
    }

    #[test]
    fn test_missing_token_passes_through() {
        let theme = theme();
        let schema = StyleSchema::default();
        let tokens = TokenResolver::new(&theme, &schema, 0);
        assert_eq!(tokens.resolve("color", &"secondary".into()), Some(Literal::from("secondary")));
        assert_eq!(tokens.resolve("margin", &"auto".into()), Some(Literal::from("auto")));
    }

    #[test]
    fn test_unscaled_property_is_literal() {
        let theme = Theme::new().add_token("colors", "row", "#f00");
        let schema = StyleSchema::default();
        let tokens = TokenResolver::new(&theme, &schema, 0);
        assert_eq!(tokens.resolve("flexDirection", &"row".into()), Some(Literal::from("row")));
    }

    #[test]
    fn test_responsive_entries_resolve_after_selection() {
        let theme = theme();
        let schema = StyleSchema::default();
        let value = SxValue::responsive(["secondary", "primary"]);

        let narrow = TokenResolver::new(&theme, &schema, 0);
        let wide = TokenResolver::new(&theme, &schema, 4);
        assert_eq!(narrow.resolve("color", &value), Some(Literal::from("secondary")));
        assert_eq!(wide.resolve("color", &value), Some(Literal::from("#123")));
    }

    #[test]
    fn test_negative_space_tokens() {
        let theme = theme();
        let schema = StyleSchema::default();
        let tokens = TokenResolver::new(&theme, &schema, 0);
        assert_eq!(tokens.resolve("marginTop", &(-2).into()), Some(Literal::from(-8)));
        assert_eq!(tokens.resolve("top", &"-3".into()), Some(Literal::from(-16)));
        assert_eq!(tokens.resolve("padding", &(-2).into()), Some(Literal::from(-2)));
    }

    #[test]
    fn test_nested_value_has_no_literal() {
        let theme = theme();
        let schema = StyleSchema::default();
        let tokens = TokenResolver::new(&theme, &schema, 0);
        let nested = SxValue::Nested(crate::value::SxDescription::new());
        assert_eq!(tokens.resolve("color", &nested), None);
    }

    #[test]
    fn test_boolean_never_looked_up() {
        let theme = Theme::new().add_token("colors", "true", "#fff");
        let schema = StyleSchema::default();
        let tokens = TokenResolver::new(&theme, &schema, 0);
        assert_eq!(tokens.resolve("color", &true.into()), Some(Literal::from(true)));
    }
}
