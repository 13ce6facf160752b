//! Property tests for responsive clamping, token lookup, and cache identity.

use std::sync::Arc;

use proptest::prelude::*;
use sxstyle::{
    select_responsive, Literal, Overrides, ResolvedStyle, StyleCache, StyleSchema,
    StyleSheetBackend, SxDescription, SxValue, Theme, TokenResolver, UseSx,
};

proptest! {
    #[test]
    fn responsive_selection_clamps(
        values in prop::collection::vec(-1000i32..1000, 1..8),
        index in 0usize..16,
    ) {
        let entries: Vec<Option<Literal>> =
            values.iter().map(|v| Some(Literal::from(*v))).collect();
        let expected = Literal::from(values[index.min(values.len() - 1)]);
        prop_assert_eq!(select_responsive(&entries, index), Some(&expected));
    }

    #[test]
    fn present_tokens_resolve_absent_pass_through(name in "[a-z]{1,8}", other in "[A-Z]{1,8}") {
        let theme = Theme::new().add_token("colors", &name, "#abcdef");
        let schema = StyleSchema::default();
        let tokens = TokenResolver::new(&theme, &schema, 0);

        prop_assert_eq!(
            tokens.resolve("color", &SxValue::from(name.as_str())),
            Some(Literal::from("#abcdef"))
        );
        prop_assert_eq!(
            tokens.resolve("color", &SxValue::from(other.as_str())),
            Some(Literal::from(other.as_str()))
        );
    }

    #[test]
    fn cache_ignores_insertion_order(
        pairs in prop::collection::btree_map("[a-z]{1,6}", -50i32..50, 0..6),
    ) {
        let cache = StyleCache::new(StyleSheetBackend::new());
        let forward: ResolvedStyle = pairs
            .iter()
            .map(|(k, v)| (k.clone(), Literal::from(*v)))
            .collect();
        let backward: ResolvedStyle = pairs
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), Literal::from(*v)))
            .collect();

        prop_assert!(Arc::ptr_eq(&cache.get(&forward), &cache.get(&backward)));
        prop_assert_eq!(cache.backend().registered(), 1);
    }

    #[test]
    fn sx_wins_over_non_forcing_override(sx_font in "[a-z]{1,8}", fallback in "[A-Z]{1,8}") {
        let theme = Arc::new(Theme::new());
        let mut hook = UseSx::new(Arc::new(StyleCache::new(StyleSheetBackend::new())));
        let sx = SxDescription::new().with("fontFamily", sx_font.as_str());

        let explicit = hook
            .bind(&theme, 0)
            .compile(&sx, &Overrides::font_family(&fallback));
        prop_assert_eq!(explicit.get("fontFamily"), Some(&Literal::from(sx_font.as_str())));

        let forced = hook
            .bind(&theme, 0)
            .compile(&sx, &Overrides::new().force("fontFamily", fallback.as_str()));
        prop_assert_eq!(forced.get("fontFamily"), Some(&Literal::from(fallback.as_str())));
    }
}
