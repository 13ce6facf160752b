//! End-to-end resolution: theme files, the hook, and the shared cache.

use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;

use serial_test::serial;
use sxstyle::{
    global_cache, set_theme_detector, AdaptiveTheme, ColorMode, Literal, ManualViewport,
    Overrides, StyleCache, StyleSheetBackend, SxContext, SxDescription, SxValue, Theme,
    ThemeChoice, ThemeProvider, UseSx,
};

fn local_hook() -> UseSx<StyleSheetBackend> {
    UseSx::new(Arc::new(StyleCache::new(StyleSheetBackend::new())))
}

#[test]
fn test_primary_color_and_responsive_margin() {
    let theme = Arc::new(Theme::new().add_token("colors", "primary", "#123"));
    let sx = SxDescription::new()
        .with("color", "primary")
        .with("margin", SxValue::responsive([4, 8]));
    let mut hook = local_hook();

    let narrow = hook.bind(&theme, 0).compile(&sx, &Overrides::new());
    let expected: sxstyle::ResolvedStyle = [
        ("color", Literal::from("#123")),
        ("margin", Literal::from(4)),
    ]
    .into_iter()
    .collect();
    assert_eq!(narrow, expected);

    let wide = hook.bind(&theme, 1).compile(&sx, &Overrides::new());
    let expected: sxstyle::ResolvedStyle = [
        ("color", Literal::from("#123")),
        ("margin", Literal::from(8)),
    ]
    .into_iter()
    .collect();
    assert_eq!(wide, expected);
}

#[test]
fn test_theme_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r##"
breakpoints: ["40em", "64em"]
colors:
  text: "#222"
  primary: "#07c"
space: [0, 4, 8, 16, 32]
fonts:
  body: system-ui
  heading: Georgia
buttons:
  primary:
    color: background
    bg: primary
    px: 3
defaults:
  color: text
"##
    )
    .unwrap();

    let source = std::fs::read_to_string(file.path()).unwrap();
    let theme = Arc::new(Theme::from_yaml(&source).unwrap());
    assert_eq!(theme.breakpoints(), &[640.0, 1024.0]);

    let sx = SxDescription::from_json(r#"{"variant": "buttons.primary", "py": [1, 2]}"#).unwrap();
    let mut hook = local_hook();
    let style = hook.bind(&theme, 2).compile(&sx, &Overrides::font_family("body"));

    assert_eq!(style.get("color"), Some(&Literal::from("background")));
    assert_eq!(style.get("backgroundColor"), Some(&Literal::from("#07c")));
    assert_eq!(style.get("paddingHorizontal"), Some(&Literal::from(16)));
    assert_eq!(style.get("paddingVertical"), Some(&Literal::from(8)));
    assert_eq!(style.get("fontFamily"), Some(&Literal::from("system-ui")));
}

#[test]
fn test_defaults_apply_when_sx_is_silent() {
    let theme = Arc::new(
        Theme::from_yaml("colors:\n  text: \"#222\"\ndefaults:\n  color: text\n").unwrap(),
    );
    let mut hook = local_hook();
    let style = hook.bind(&theme, 0).compile(&SxDescription::new(), &Overrides::new());
    assert_eq!(style.get("color"), Some(&Literal::from("#222")));
}

#[test]
fn test_theme_change_keeps_old_entries() {
    let cache = Arc::new(StyleCache::new(StyleSheetBackend::new()));
    let mut hook = UseSx::new(Arc::clone(&cache));
    let sx = SxDescription::new().with("color", "primary");

    let light = Arc::new(Theme::new().add_token("colors", "primary", "#fff"));
    let dark = Arc::new(Theme::new().add_token("colors", "primary", "#000"));

    let first = hook.bind(&light, 0).sx(&sx);
    let second = hook.bind(&dark, 0).sx(&sx);
    let again = hook.bind(&light, 0).sx(&sx);

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_context_full_cycle() {
    let viewport = ManualViewport::new(300.0);
    let provider = ThemeProvider::new(Arc::new(
        Theme::new()
            .add_token("colors", "primary", "#123")
            .with_breakpoints(vec![500.0, 900.0]),
    ));
    let context = SxContext::new(provider.clone(), &viewport, local_hook());
    let sx = SxDescription::new()
        .with("color", "primary")
        .with("width", SxValue::responsive(["100%", "50%", "33%"]));

    let handle = context.sx().sx(&sx);
    assert_eq!(handle.style().get("width"), Some(&Literal::from("100%")));

    viewport.set_width(950.0);
    assert_eq!(context.breakpoint(), 2);
    let handle = context.sx().sx(&sx);
    assert_eq!(handle.style().get("width"), Some(&Literal::from("33%")));

    let stable = context.sx();
    assert!(Rc::ptr_eq(&stable, &context.sx()));

    drop(context);
    assert_eq!(viewport.subscriber_count(), 0);
}

#[test]
#[serial]
fn test_adaptive_theme_through_provider() {
    let adaptive = AdaptiveTheme::new(
        Theme::new().add_token("colors", "text", "#111"),
        Theme::new().add_token("colors", "text", "#eee"),
    );
    set_theme_detector(|| ColorMode::Dark);
    let provider = ThemeProvider::from_choice(ThemeChoice::from(&adaptive));
    set_theme_detector(|| ColorMode::Light);

    let mut hook = local_hook();
    let style = hook
        .bind(&provider.theme(), 0)
        .compile(&SxDescription::new().with("color", "text"), &Overrides::new());
    assert_eq!(style.get("color"), Some(&Literal::from("#eee")));
}

#[test]
#[serial]
fn test_global_cache_shared_between_hooks() {
    let theme = Arc::new(Theme::new());
    let sx = SxDescription::new().with("zIndex", 987_654);

    let a = UseSx::global().bind(&theme, 0).sx(&sx);
    let b = UseSx::global().bind(&theme, 3).sx(&sx);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(global_cache().len() >= 1);
}
