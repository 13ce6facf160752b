//! Theme selection for resolution.

use std::sync::Arc;

use super::adaptive::AdaptiveTheme;
use super::theme::Theme;

/// Reference to either a fixed theme or an adaptive theme.
#[derive(Debug)]
pub enum ThemeChoice<'a> {
    /// A fixed theme that doesn't change based on color mode.
    Theme(&'a Arc<Theme>),
    /// An adaptive theme that selects light/dark based on OS settings.
    Adaptive(&'a AdaptiveTheme),
}

impl<'a> ThemeChoice<'a> {
    /// Resolves to a concrete shared theme.
    ///
    /// Fixed themes return another handle to the same `Arc`. Adaptive themes
    /// detect the current color mode and return that variant.
    pub fn resolve(&self) -> Arc<Theme> {
        match self {
            ThemeChoice::Theme(theme) => Arc::clone(theme),
            ThemeChoice::Adaptive(adaptive) => adaptive.resolve(),
        }
    }
}

impl<'a> From<&'a Arc<Theme>> for ThemeChoice<'a> {
    fn from(theme: &'a Arc<Theme>) -> Self {
        ThemeChoice::Theme(theme)
    }
}

impl<'a> From<&'a AdaptiveTheme> for ThemeChoice<'a> {
    fn from(adaptive: &'a AdaptiveTheme) -> Self {
        ThemeChoice::Adaptive(adaptive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{set_theme_detector, ColorMode};
    use serial_test::serial;

    #[test]
    fn test_fixed_choice_shares_theme() {
        let theme = Arc::new(Theme::new());
        let choice = ThemeChoice::from(&theme);
        assert!(Arc::ptr_eq(&choice.resolve(), &theme));
    }

    #[test]
    #[serial]
    fn test_adaptive_choice_follows_mode() {
        let adaptive = AdaptiveTheme::new(
            Theme::new().with_breakpoints(vec![100.0]),
            Theme::new().with_breakpoints(vec![200.0]),
        );
        set_theme_detector(|| ColorMode::Dark);
        let theme = ThemeChoice::from(&adaptive).resolve();
        assert_eq!(theme.breakpoints(), &[200.0]);
        set_theme_detector(|| ColorMode::Light);
    }
}
