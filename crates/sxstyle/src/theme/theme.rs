//! Theme struct holding token scales, breakpoints, and variants.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::SxError;
use crate::value::{Literal, SxDescription};

/// Breakpoint boundaries used when a theme does not define its own.
pub const DEFAULT_BREAKPOINTS: [f64; 4] = [576.0, 768.0, 992.0, 1200.0];

const ROOT_FONT_SIZE: f64 = 16.0;

/// The token dictionary consulted during resolution.
///
/// A theme is never mutated once it is shared: providers hand it out as
/// `Arc<Theme>` and replace it wholesale on change.
///
/// # Example
///
/// ```rust
/// use sxstyle::{Literal, SxDescription, Theme};
///
/// let theme = Theme::new()
///     .add_token("colors", "primary", "#07c")
///     .add_scale("space", [0, 4, 8, 16])
///     .add_variant("buttons.primary", SxDescription::new().with("bg", "primary"));
///
/// assert_eq!(theme.token("colors", "primary"), Some(&Literal::from("#07c")));
/// assert_eq!(theme.token("space", "2"), Some(&Literal::from(8)));
/// assert!(theme.variant("buttons.primary").is_some());
/// ```
///
/// Themes can also be loaded from YAML or JSON. Nested groups are flattened
/// into dotted token names, and every nested object doubles as a variant:
///
/// ```rust
/// use sxstyle::{Literal, Theme};
///
/// let theme = Theme::from_yaml(r##"
/// breakpoints: [480, 960]
/// colors:
///   text: "#111"
///   blue:
///     light: "#9cf"
/// buttons:
///   primary:
///     color: text
/// "##).unwrap();
///
/// assert_eq!(theme.breakpoints(), &[480.0, 960.0]);
/// assert_eq!(theme.token("colors", "blue.light"), Some(&Literal::from("#9cf")));
/// assert!(theme.variant("buttons.primary").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Theme {
    scales: HashMap<String, HashMap<String, Literal>>,
    breakpoints: Vec<f64>,
    variants: HashMap<String, SxDescription>,
    defaults: SxDescription,
    custom_fonts: HashMap<String, HashMap<String, String>>,
}

impl Theme {
    /// Creates a theme with no tokens and the default breakpoints.
    pub fn new() -> Self {
        Self {
            scales: HashMap::new(),
            breakpoints: DEFAULT_BREAKPOINTS.to_vec(),
            variants: HashMap::new(),
            defaults: SxDescription::new(),
            custom_fonts: HashMap::new(),
        }
    }

    /// Adds a single token to a scale, returning the theme for chaining.
    pub fn add_token<V: Into<Literal>>(mut self, category: &str, name: &str, value: V) -> Self {
        self.scales
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), value.into());
        self
    }

    /// Adds an array scale whose token names are the entry indices.
    pub fn add_scale<I, V>(mut self, category: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Literal>,
    {
        let scale = self.scales.entry(category.to_string()).or_default();
        for (index, value) in values.into_iter().enumerate() {
            scale.insert(index.to_string(), value.into());
        }
        self
    }

    /// Replaces the breakpoint boundaries.
    ///
    /// Boundaries are checked by [`validate`](Self::validate).
    pub fn with_breakpoints(mut self, breakpoints: Vec<f64>) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Registers a named variant that sx descriptions can pull in.
    pub fn add_variant(mut self, name: &str, sx: SxDescription) -> Self {
        self.variants.insert(name.to_string(), sx);
        self
    }

    /// Adds a theme-level default, applied when nothing else sets `property`.
    pub fn add_default<V: Into<crate::value::SxValue>>(mut self, property: &str, value: V) -> Self {
        self.defaults.push(property, value);
        self
    }

    /// Maps a font family and weight to a concrete font name.
    ///
    /// The weight `"default"` is used when a style sets no weight.
    pub fn add_custom_font(mut self, family: &str, weight: &str, font: &str) -> Self {
        self.custom_fonts
            .entry(family.to_string())
            .or_default()
            .insert(weight.to_string(), font.to_string());
        self
    }

    /// Looks up a token by category and name.
    pub fn token(&self, category: &str, name: &str) -> Option<&Literal> {
        self.scales.get(category)?.get(name)
    }

    /// Returns every token of a category.
    pub fn scale(&self, category: &str) -> Option<&HashMap<String, Literal>> {
        self.scales.get(category)
    }

    /// Ascending viewport widths; `n` boundaries define `n + 1` tiers.
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn variant(&self, name: &str) -> Option<&SxDescription> {
        self.variants.get(name)
    }

    pub fn defaults(&self) -> &SxDescription {
        &self.defaults
    }

    /// Returns the concrete font for a family at the given weight, falling
    /// back to the family's `"default"` entry.
    pub fn custom_font(&self, family: &str, weight: Option<&str>) -> Option<&str> {
        let weights = self.custom_fonts.get(family)?;
        weight
            .and_then(|w| weights.get(w))
            .or_else(|| weights.get("default"))
            .map(String::as_str)
    }

    /// Returns the concrete font registered for exactly this weight.
    pub fn custom_font_for_weight(&self, family: &str, weight: &str) -> Option<&str> {
        self.custom_fonts
            .get(family)?
            .get(weight)
            .map(String::as_str)
    }

    /// Checks that breakpoints are finite, non-negative, and ascending.
    pub fn validate(&self) -> Result<(), SxError> {
        for bp in &self.breakpoints {
            if !bp.is_finite() || *bp < 0.0 {
                return Err(SxError::invalid_theme(format!(
                    "breakpoint {} must be a non-negative number",
                    bp
                )));
            }
        }
        if self.breakpoints.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(SxError::invalid_theme(
                "breakpoints must be strictly ascending",
            ));
        }
        Ok(())
    }

    /// Parses and validates a theme from JSON.
    pub fn from_json(source: &str) -> Result<Self, SxError> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(&value)
    }

    /// Parses and validates a theme from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, SxError> {
        let value: Value = serde_yaml::from_str(source)?;
        Self::from_value(&value)
    }

    /// Builds a theme from a JSON document tree.
    ///
    /// `breakpoints`, `customFonts`, and `defaults` are reserved keys. Every
    /// other top-level object or array becomes a token scale.
    pub fn from_value(value: &Value) -> Result<Self, SxError> {
        let Value::Object(root) = value else {
            return Err(SxError::invalid_theme("theme must be an object"));
        };

        let mut theme = Theme::new();
        for (key, value) in root {
            match key.as_str() {
                "breakpoints" => theme.breakpoints = parse_breakpoints(value)?,
                "customFonts" => theme.custom_fonts = parse_custom_fonts(value)?,
                "defaults" => {
                    theme.defaults = SxDescription::from_value(value)
                        .map_err(|e| SxError::invalid_theme(format!("defaults: {}", e)))?;
                }
                _ => theme.collect_scale(key, value),
            }
        }

        theme.validate()?;
        Ok(theme)
    }

    fn collect_scale(&mut self, category: &str, value: &Value) {
        let mut tokens = HashMap::new();
        match value {
            Value::Object(_) | Value::Array(_) => {
                collect_tokens(category, "", value, &mut tokens, &mut self.variants);
            }
            _ => {
                tracing::trace!(category, "ignoring scalar top-level theme key");
                return;
            }
        }
        self.scales
            .entry(category.to_string())
            .or_default()
            .extend(tokens);
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn collect_tokens(
    category: &str,
    prefix: &str,
    value: &Value,
    tokens: &mut HashMap<String, Literal>,
    variants: &mut HashMap<String, SxDescription>,
) {
    let children: Vec<(String, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (join(prefix, k), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (join(prefix, &i.to_string()), v))
            .collect(),
        _ => return,
    };

    for (name, child) in children {
        match child {
            Value::Object(_) => {
                match SxDescription::from_value(child) {
                    Ok(sx) => {
                        variants.insert(join(category, &name), sx);
                    }
                    Err(err) => {
                        tracing::trace!(
                            category,
                            name = name.as_str(),
                            %err,
                            "group is not a variant"
                        );
                    }
                }
                collect_tokens(category, &name, child, tokens, variants);
            }
            Value::Array(_) => collect_tokens(category, &name, child, tokens, variants),
            Value::Null => {}
            scalar => {
                if let Ok(literal) = Literal::from_json(scalar, &name) {
                    tokens.insert(name, literal);
                }
            }
        }
    }
}

fn parse_breakpoints(value: &Value) -> Result<Vec<f64>, SxError> {
    let Value::Array(items) = value else {
        return Err(SxError::invalid_theme("breakpoints must be an array"));
    };
    items.iter().map(parse_breakpoint).collect()
}

fn parse_breakpoint(value: &Value) -> Result<f64, SxError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SxError::invalid_theme("breakpoint is out of range")),
        Value::String(s) => {
            let s = s.trim();
            let (number, scale) = if let Some(px) = s.strip_suffix("px") {
                (px, 1.0)
            } else if let Some(rem) = s.strip_suffix("rem") {
                (rem, ROOT_FONT_SIZE)
            } else if let Some(em) = s.strip_suffix("em") {
                (em, ROOT_FONT_SIZE)
            } else {
                (s, 1.0)
            };
            number
                .trim()
                .parse::<f64>()
                .map(|n| n * scale)
                .map_err(|_| SxError::invalid_theme(format!("unrecognized breakpoint '{}'", s)))
        }
        _ => Err(SxError::invalid_theme(
            "breakpoints must be numbers or length strings",
        )),
    }
}

fn parse_custom_fonts(value: &Value) -> Result<HashMap<String, HashMap<String, String>>, SxError> {
    let Value::Object(families) = value else {
        return Err(SxError::invalid_theme("customFonts must be an object"));
    };

    let mut fonts = HashMap::new();
    for (family, weights) in families {
        let Value::Object(weights) = weights else {
            return Err(SxError::invalid_theme(format!(
                "customFonts.{} must map weights to font names",
                family
            )));
        };
        let mut mapped = HashMap::new();
        for (weight, font) in weights {
            let Value::String(font) = font else {
                return Err(SxError::invalid_theme(format!(
                    "customFonts.{}.{} must be a string",
                    family, weight
                )));
            };
            mapped.insert(weight.clone(), font.clone());
        }
        fonts.insert(family.clone(), mapped);
    }
    Ok(fonts)
}
