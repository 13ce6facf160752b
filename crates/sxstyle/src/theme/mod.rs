//! Theme system: token dictionaries and the providers that hand them out.
//!
//! This module provides:
//!
//! - [`Theme`]: token scales, breakpoints, variants, defaults, and custom fonts
//! - [`AdaptiveTheme`]: Light/dark theme pairs with OS detection
//! - [`ThemeChoice`]: Reference type for selecting a theme
//! - [`ThemeProvider`]: Owner of the current theme with change notification
//! - [`ColorMode`]: Light or dark color mode enum

mod adaptive;
mod choice;
mod provider;
#[allow(clippy::module_inception)]
mod theme;

pub use adaptive::{detect_color_mode, set_theme_detector, AdaptiveTheme, ColorMode};
pub use choice::ThemeChoice;
pub use provider::ThemeProvider;
pub use theme::{Theme, DEFAULT_BREAKPOINTS};
