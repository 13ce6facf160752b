//! Style compilation: sx description in, flat resolved style out.
//!
//! # Precedence
//!
//! For a given property, the first source in this list that sets it wins:
//!
//! 1. a forcing override ([`Overrides::force`])
//! 2. the sx description itself (later entries beat earlier ones)
//! 3. a non-forcing override ([`Overrides::with`])
//! 4. the theme's defaults ([`Theme::defaults`])
//!
//! Variants named by the schema's variant key expand in place, so entries
//! written after `variant` override the variant's own values.
//!
//! # Nested scopes
//!
//! A nested description (for example `":hover": { color: "primary" }`) is a
//! scope. With [`ScopeMerge::Namespace`] its properties land under
//! `":hover.color"`; with [`ScopeMerge::Flatten`] they are merged into the
//! enclosing level after that level's own properties, so inner values win.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::schema::ScopeMerge;
use crate::schema::StyleSchema;
use crate::theme::Theme;
use crate::token::TokenResolver;
use crate::value::{is_integral, Literal, SxDescription, SxValue};

const MAX_VARIANT_DEPTH: usize = 8;
const FONT_FAMILY: &str = "fontFamily";
const FONT_WEIGHT: &str = "fontWeight";

/// A flat property → literal map, ordered by property name.
///
/// Two styles with the same pairs are equal regardless of the order in which
/// the pairs were produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedStyle {
    props: BTreeMap<String, Literal>,
}

impl ResolvedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<&Literal> {
        self.props.get(property)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.props.contains_key(property)
    }

    /// Sets a property, returning the previous value.
    pub fn insert(&mut self, property: impl Into<String>, value: Literal) -> Option<Literal> {
        self.props.insert(property.into(), value)
    }

    /// Sets a property only if it is not already set.
    ///
    /// Returns `true` if the value was stored.
    pub fn fill(&mut self, property: impl Into<String>, value: Literal) -> bool {
        match self.props.entry(property.into()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<Literal> {
        self.props.remove(property)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Canonical serialization used as the cache key.
    ///
    /// Non-finite numbers are written as `{"number": "inf"}` style objects,
    /// which no literal can produce, so `inf`, `-inf` and `NaN` stay distinct.
    pub fn cache_key(&self) -> String {
        let canonical: Map<String, Value> = self
            .props
            .iter()
            .map(|(property, value)| (property.clone(), key_value(value)))
            .collect();
        Value::Object(canonical).to_string()
    }
}

fn key_value(literal: &Literal) -> Value {
    match literal {
        Literal::Bool(b) => Value::Bool(*b),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Number(n) if is_integral(*n) => Value::from(*n as i64),
        Literal::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or_else(|| json!({ "number": n.to_string() })),
    }
}

impl<K: Into<String>, V: Into<Literal>> FromIterator<(K, V)> for ResolvedStyle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            props: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ResolvedStyle {
    type Item = (String, Literal);
    type IntoIter = std::collections::btree_map::IntoIter<String, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.props.into_iter()
    }
}

/// A caller-supplied property value applied on top of an sx description.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub property: String,
    pub value: Literal,
    /// Forcing overrides replace sx values; others only fill gaps.
    pub forcing: bool,
}

/// A bag of overrides, e.g. a typeface injected by an enclosing text context.
///
/// ```rust
/// use sxstyle::Overrides;
///
/// let overrides = Overrides::font_family("body").force("color", "text");
/// assert_eq!(overrides.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    entries: Vec<Override>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides with a single non-forcing `fontFamily`.
    pub fn font_family(family: &str) -> Self {
        Self::new().with("fontFamily", family)
    }

    /// Adds a non-forcing override: used only when sx leaves `property` unset.
    pub fn with<V: Into<Literal>>(mut self, property: &str, value: V) -> Self {
        self.entries.push(Override {
            property: property.to_string(),
            value: value.into(),
            forcing: false,
        });
        self
    }

    /// Adds a forcing override: replaces whatever sx sets for `property`.
    pub fn force<V: Into<Literal>>(mut self, property: &str, value: V) -> Self {
        self.entries.push(Override {
            property: property.to_string(),
            value: value.into(),
            forcing: true,
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Override> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walk output: the style plus the `fontWeight` as written, before token
/// lookup, which custom fonts are keyed by.
#[derive(Default)]
struct Compiled {
    style: ResolvedStyle,
    font_weight: Option<Literal>,
}

fn qualify(scope: Option<&str>, property: &str) -> String {
    match scope {
        Some(scope) => format!("{}.{}", scope, property),
        None => property.to_string(),
    }
}

/// Compiles sx descriptions against a theme at a fixed breakpoint.
#[derive(Debug, Clone, Copy)]
pub struct StyleCompiler<'a> {
    tokens: TokenResolver<'a>,
}

impl<'a> StyleCompiler<'a> {
    pub fn new(theme: &'a Theme, schema: &'a StyleSchema, breakpoint: usize) -> Self {
        Self {
            tokens: TokenResolver::new(theme, schema, breakpoint),
        }
    }

    pub fn tokens(&self) -> &TokenResolver<'a> {
        &self.tokens
    }

    /// Resolves `sx` and `overrides` into a flat style. Never fails.
    pub fn compile(&self, sx: &SxDescription, overrides: &Overrides) -> ResolvedStyle {
        let schema = self.tokens.schema();
        let theme = self.tokens.theme();

        let mut compiled = Compiled::default();
        self.walk(sx, None, &mut compiled, 0);
        let Compiled {
            mut style,
            mut font_weight,
        } = compiled;

        for entry in overrides.iter() {
            let property = schema.resolve_alias(&entry.property);
            let value = self.tokens.resolve_literal(property, &entry.value);
            let stored = if entry.forcing {
                style.insert(property, value);
                true
            } else {
                style.fill(property, value)
            };
            if stored && property == FONT_WEIGHT {
                font_weight = Some(entry.value.clone());
            }
        }

        if !theme.defaults().is_empty() {
            let mut defaults = Compiled::default();
            self.walk(theme.defaults(), None, &mut defaults, 0);
            for (property, value) in defaults.style {
                let weight = property == FONT_WEIGHT;
                if style.fill(property, value) && weight {
                    font_weight = defaults.font_weight.clone();
                }
            }
        }

        self.apply_custom_font(&mut style, font_weight.as_ref());
        style
    }

    fn walk(&self, sx: &SxDescription, scope: Option<&str>, out: &mut Compiled, depth: usize) {
        let schema = self.tokens.schema();
        let mut deferred = Vec::new();

        for (key, value) in sx.iter() {
            if key == schema.variant_key() {
                self.expand_variant(value, scope, out, depth);
                continue;
            }

            match value {
                SxValue::Nested(inner) => match schema.scope_merge() {
                    ScopeMerge::Namespace => {
                        let qualified = qualify(scope, key);
                        self.walk(inner, Some(&qualified), out, depth);
                    }
                    ScopeMerge::Flatten => deferred.push(inner),
                },
                _ => {
                    let property = schema.resolve_alias(key);
                    let Some(selected) = self.tokens.select(value) else {
                        continue;
                    };
                    if scope.is_none() && property == FONT_WEIGHT {
                        out.font_weight = Some(selected.clone());
                    }
                    let literal = self.tokens.resolve_literal(property, selected);
                    out.style.insert(qualify(scope, property), literal);
                }
            }
        }

        for inner in deferred {
            self.walk(inner, scope, out, depth);
        }
    }

    fn expand_variant(
        &self,
        value: &SxValue,
        scope: Option<&str>,
        out: &mut Compiled,
        depth: usize,
    ) {
        let Some(name) = self.tokens.select(value).and_then(Literal::token_key) else {
            return;
        };
        if depth >= MAX_VARIANT_DEPTH {
            tracing::trace!(variant = %name, depth, "variant nesting too deep, skipping");
            return;
        }
        match self.tokens.theme().variant(&name) {
            Some(variant) => self.walk(variant, scope, out, depth + 1),
            None => tracing::trace!(variant = %name, "variant not in theme, skipping"),
        }
    }

    /// Swaps a custom font family for its concrete font. The weight is
    /// matched as written first (`bold`), then as resolved (`700`), then
    /// the family's `default` entry.
    fn apply_custom_font(&self, style: &mut ResolvedStyle, written_weight: Option<&Literal>) {
        let Some(family) = style.get(FONT_FAMILY).and_then(Literal::as_str) else {
            return;
        };
        let theme = self.tokens.theme();
        let weights: Vec<String> = written_weight
            .and_then(Literal::token_key)
            .map(|key| key.into_owned())
            .into_iter()
            .chain(style.get(FONT_WEIGHT).map(Literal::to_string))
            .collect();
        let font = weights
            .iter()
            .find_map(|weight| theme.custom_font_for_weight(family, weight))
            .or_else(|| theme.custom_font(family, None))
            .map(str::to_string);
        if let Some(font) = font {
            style.insert(FONT_FAMILY, Literal::String(font));
        }
    }
}
