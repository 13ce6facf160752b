//! # sxstyle - themed, responsive style resolution
//!
//! `sxstyle` turns a declarative style description (an "sx" object) into a
//! flat, fully resolved style and hands back a cached platform handle for it.
//!
//! ## Pipeline
//!
//! ```text
//! SxDescription ──► StyleCompiler ──► ResolvedStyle ──► StyleCache ──► handle
//!                    │  (TokenResolver: responsive pick, then theme lookup)
//!                    └─ Theme + breakpoint index
//! ```
//!
//! - [`breakpoint_index`] and [`BreakpointWatcher`] map viewport widths to a tier
//! - [`TokenResolver`] selects responsive entries and expands theme tokens
//! - [`StyleCompiler`] walks descriptions, variants, scopes, and overrides
//! - [`StyleCache`] registers each distinct style once with a [`StyleBackend`]
//! - [`UseSx`] binds it all into a callable that stays stable between renders
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sxstyle::{Literal, Overrides, SxDescription, Theme, UseSx};
//!
//! let theme = Arc::new(Theme::from_yaml(r##"
//! colors:
//!   primary: "#123"
//! space: [0, 4, 8, 16]
//! fonts:
//!   body: Inter
//! "##).unwrap());
//!
//! let sx = SxDescription::from_json(r#"{"color": "primary", "p": [1, 2]}"#).unwrap();
//!
//! let mut use_sx = UseSx::global();
//! let resolve = use_sx.bind(&theme, 0);
//! let handle = resolve.call(&sx, &Overrides::font_family("body"));
//!
//! let style = handle.style();
//! assert_eq!(style.get("color"), Some(&Literal::from("#123")));
//! assert_eq!(style.get("padding"), Some(&Literal::from(4)));
//! assert_eq!(style.get("fontFamily"), Some(&Literal::from("Inter")));
//! ```
//!
//! ## Permissive resolution
//!
//! Resolution never fails. A value that is not a token in the property's
//! scale is used as written, so literal colors and sizes need no theme
//! entry. Only malformed input documents produce an [`SxError`].

mod breakpoint;
mod cache;
mod compile;
mod error;
mod hook;
mod schema;
mod signal;
mod theme;
mod token;
mod value;

pub use breakpoint::{breakpoint_index, BreakpointWatcher, ManualViewport, Viewport};
pub use cache::{global_cache, CacheStats, StyleBackend, StyleCache, StyleSheet, StyleSheetBackend};
pub use compile::{Override, Overrides, ResolvedStyle, StyleCompiler};
pub use error::SxError;
pub use hook::{SxContext, SxFn, UseSx};
pub use schema::{ScopeMerge, StyleSchema};
pub use signal::Subscription;
pub use theme::{
    detect_color_mode, set_theme_detector, AdaptiveTheme, ColorMode, Theme, ThemeChoice,
    ThemeProvider, DEFAULT_BREAKPOINTS,
};
pub use token::{select_responsive, TokenResolver};
pub use value::{Literal, SxDescription, SxValue};
