//! The resolution hook: a stable callable bound to a theme and breakpoint.
//!
//! [`UseSx`] hands out an `Rc<SxFn>` that compiles sx descriptions and looks
//! them up in a [`StyleCache`]. The callable is rebuilt only when the theme
//! (by identity) or the breakpoint index changes, so consumers can compare
//! it with [`Rc::ptr_eq`] to skip redundant work.
//!
//! ```rust
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use sxstyle::{Literal, SxDescription, SxValue, Theme, UseSx};
//!
//! let theme = Arc::new(Theme::new().add_token("colors", "primary", "#123"));
//! let mut use_sx = UseSx::global();
//!
//! let sx = use_sx.bind(&theme, 1);
//! assert!(Rc::ptr_eq(&sx, &use_sx.bind(&theme, 1)));
//!
//! let handle = sx.sx(
//!     &SxDescription::new()
//!         .with("color", "primary")
//!         .with("margin", SxValue::responsive([4, 8])),
//! );
//! assert_eq!(handle.style().get("color"), Some(&Literal::from("#123")));
//! assert_eq!(handle.style().get("margin"), Some(&Literal::from(8)));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::breakpoint::{BreakpointWatcher, Viewport};
use crate::cache::{global_cache, StyleBackend, StyleCache, StyleSheetBackend};
use crate::compile::{Overrides, ResolvedStyle, StyleCompiler};
use crate::schema::StyleSchema;
use crate::theme::{Theme, ThemeProvider};
use crate::value::SxDescription;

/// Resolver bound to one theme and breakpoint index.
pub struct SxFn<B: StyleBackend> {
    theme: Arc<Theme>,
    breakpoint: usize,
    schema: Arc<StyleSchema>,
    cache: Arc<StyleCache<B>>,
}

impl<B: StyleBackend> SxFn<B> {
    /// Resolves `sx` with `overrides` and returns the cached handle.
    pub fn call(&self, sx: &SxDescription, overrides: &Overrides) -> B::Handle {
        let style = self.compile(sx, overrides);
        self.cache.get(&style)
    }

    /// Resolves `sx` without overrides.
    pub fn sx(&self, sx: &SxDescription) -> B::Handle {
        self.call(sx, &Overrides::new())
    }

    /// Resolves without touching the cache.
    pub fn compile(&self, sx: &SxDescription, overrides: &Overrides) -> ResolvedStyle {
        StyleCompiler::new(&self.theme, &self.schema, self.breakpoint).compile(sx, overrides)
    }

    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    pub fn breakpoint(&self) -> usize {
        self.breakpoint
    }
}

impl<B: StyleBackend> fmt::Debug for SxFn<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SxFn")
            .field("breakpoint", &self.breakpoint)
            .finish_non_exhaustive()
    }
}

/// Memoizes an [`SxFn`] on its theme and breakpoint.
pub struct UseSx<B: StyleBackend> {
    schema: Arc<StyleSchema>,
    cache: Arc<StyleCache<B>>,
    bound: Option<Rc<SxFn<B>>>,
}

impl UseSx<StyleSheetBackend> {
    /// A hook backed by the process-wide cache.
    pub fn global() -> Self {
        Self::new(global_cache())
    }
}

impl<B: StyleBackend> UseSx<B> {
    /// A hook using `cache` and the default schema.
    pub fn new(cache: Arc<StyleCache<B>>) -> Self {
        Self {
            schema: Arc::new(StyleSchema::default()),
            cache,
            bound: None,
        }
    }

    /// Replaces the schema. The next [`bind`](Self::bind) builds a new callable.
    pub fn with_schema(mut self, schema: StyleSchema) -> Self {
        self.schema = Arc::new(schema);
        self.bound = None;
        self
    }

    pub fn cache(&self) -> &Arc<StyleCache<B>> {
        &self.cache
    }

    /// Returns the callable for `theme` at `breakpoint`.
    ///
    /// The same `Rc` is returned until the theme identity or the breakpoint
    /// index differs from the previous call.
    pub fn bind(&mut self, theme: &Arc<Theme>, breakpoint: usize) -> Rc<SxFn<B>> {
        if let Some(bound) = &self.bound {
            if Arc::ptr_eq(&bound.theme, theme) && bound.breakpoint == breakpoint {
                return Rc::clone(bound);
            }
        }

        tracing::debug!(breakpoint, "binding sx resolver");
        let bound = Rc::new(SxFn {
            theme: Arc::clone(theme),
            breakpoint,
            schema: Arc::clone(&self.schema),
            cache: Arc::clone(&self.cache),
        });
        self.bound = Some(Rc::clone(&bound));
        bound
    }
}

impl<B: StyleBackend> fmt::Debug for UseSx<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseSx")
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

/// Wires a theme provider and a viewport to a [`UseSx`].
///
/// The context owns one viewport subscription, released when it is dropped.
pub struct SxContext<B: StyleBackend> {
    provider: ThemeProvider,
    watcher: BreakpointWatcher,
    boundaries_from: RefCell<Arc<Theme>>,
    hook: RefCell<UseSx<B>>,
}

impl<B: StyleBackend> SxContext<B> {
    pub fn new(provider: ThemeProvider, viewport: &dyn Viewport, hook: UseSx<B>) -> Self {
        let theme = provider.theme();
        let watcher = BreakpointWatcher::new(viewport, theme.breakpoints().to_vec());
        Self {
            provider,
            watcher,
            boundaries_from: RefCell::new(theme),
            hook: RefCell::new(hook),
        }
    }

    /// Returns the callable for the current theme and breakpoint.
    ///
    /// Call this on every render; it is cheap when nothing changed.
    pub fn sx(&self) -> Rc<SxFn<B>> {
        let theme = self.current_theme();
        self.hook.borrow_mut().bind(&theme, self.watcher.index())
    }

    /// The current breakpoint index, measured against the current theme's
    /// boundaries.
    pub fn breakpoint(&self) -> usize {
        self.current_theme();
        self.watcher.index()
    }

    /// Returns the provider's theme, moving the watcher onto its boundaries
    /// if the theme was replaced since the last call.
    fn current_theme(&self) -> Arc<Theme> {
        let theme = self.provider.theme();
        let mut seen = self.boundaries_from.borrow_mut();
        if !Arc::ptr_eq(&seen, &theme) {
            self.watcher.set_boundaries(theme.breakpoints().to_vec());
            *seen = Arc::clone(&theme);
        }
        theme
    }

    pub fn provider(&self) -> &ThemeProvider {
        &self.provider
    }
}

impl<B: StyleBackend> fmt::Debug for SxContext<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SxContext")
            .field("provider", &self.provider)
            .field("watcher", &self.watcher)
            .finish_non_exhaustive()
    }
}
