//! Adaptive themes that respond to system color mode.

use std::sync::{Arc, Mutex, PoisonError};

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;

use super::theme::Theme;

/// The user's preferred color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Light,
    Dark,
}

/// A pair of themes selected by the user's display mode.
///
/// Both variants are stored as `Arc<Theme>`, so resolving twice under the
/// same mode yields the same theme identity and bound resolvers stay valid.
///
/// # Example
///
/// ```rust
/// use sxstyle::{AdaptiveTheme, ColorMode, Literal, Theme};
///
/// let light = Theme::new().add_token("colors", "text", "#111");
/// let dark = Theme::new().add_token("colors", "text", "#eee");
/// let adaptive = AdaptiveTheme::new(light, dark);
///
/// let theme = adaptive.resolve_for(ColorMode::Dark);
/// assert_eq!(theme.token("colors", "text"), Some(&Literal::from("#eee")));
/// ```
#[derive(Debug, Clone)]
pub struct AdaptiveTheme {
    light: Arc<Theme>,
    dark: Arc<Theme>,
}

impl AdaptiveTheme {
    /// Creates an adaptive theme with separate light and dark variants.
    pub fn new(light: Theme, dark: Theme) -> Self {
        Self {
            light: Arc::new(light),
            dark: Arc::new(dark),
        }
    }

    /// Resolves to the theme for the current color mode.
    pub fn resolve(&self) -> Arc<Theme> {
        self.resolve_for(detect_color_mode())
    }

    /// Resolves to the theme for an explicit color mode.
    pub fn resolve_for(&self, mode: ColorMode) -> Arc<Theme> {
        match mode {
            ColorMode::Light => Arc::clone(&self.light),
            ColorMode::Dark => Arc::clone(&self.dark),
        }
    }
}

type ThemeDetector = fn() -> ColorMode;

static THEME_DETECTOR: Lazy<Mutex<ThemeDetector>> = Lazy::new(|| Mutex::new(os_theme_detector));

/// Overrides the detector used to determine whether the user prefers a light or dark theme.
///
/// This is useful for testing or when you want to force a specific color mode.
pub fn set_theme_detector(detector: ThemeDetector) {
    let mut guard = THEME_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Returns the color mode reported by the current detector.
pub fn detect_color_mode() -> ColorMode {
    let detector = THEME_DETECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    (*detector)()
}

fn os_theme_detector() -> ColorMode {
    match detect_os_theme() {
        OsThemeMode::Dark => ColorMode::Dark,
        OsThemeMode::Light => ColorMode::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Literal;
    use serial_test::serial;

    fn adaptive() -> AdaptiveTheme {
        let light = Theme::new().add_token("colors", "text", "black");
        let dark = Theme::new().add_token("colors", "text", "white");
        AdaptiveTheme::new(light, dark)
    }

    #[test]
    #[serial]
    fn test_adaptive_theme_uses_detector() {
        let adaptive = adaptive();

        set_theme_detector(|| ColorMode::Dark);
        let dark = adaptive.resolve();
        assert_eq!(dark.token("colors", "text"), Some(&Literal::from("white")));

        set_theme_detector(|| ColorMode::Light);
        let light = adaptive.resolve();
        assert_eq!(light.token("colors", "text"), Some(&Literal::from("black")));
    }

    #[test]
    #[serial]
    fn test_adaptive_theme_keeps_identity() {
        let adaptive = adaptive();
        set_theme_detector(|| ColorMode::Light);

        let first = adaptive.resolve();
        let second = adaptive.resolve();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &adaptive.resolve_for(ColorMode::Dark)));
    }
}
