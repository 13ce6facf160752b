//! Theme provider that hands out the current theme and announces replacements.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::choice::ThemeChoice;
use super::theme::Theme;
use crate::signal::{Listeners, Subscription};

/// Owner of the current theme for a subtree of consumers.
///
/// The theme is replaced wholesale, never edited in place. Clones share the
/// same current theme and subscribers.
///
/// ```rust
/// use std::sync::Arc;
/// use sxstyle::{Theme, ThemeProvider};
///
/// let provider = ThemeProvider::new(Arc::new(Theme::new()));
/// let next = Arc::new(Theme::new().add_token("colors", "text", "#000"));
/// provider.set_theme(Arc::clone(&next));
/// assert!(Arc::ptr_eq(&provider.theme(), &next));
/// ```
#[derive(Clone)]
pub struct ThemeProvider {
    current: Rc<RefCell<Arc<Theme>>>,
    listeners: Listeners<Arc<Theme>>,
}

impl ThemeProvider {
    pub fn new(theme: Arc<Theme>) -> Self {
        Self {
            current: Rc::new(RefCell::new(theme)),
            listeners: Listeners::new(),
        }
    }

    /// Creates a provider seeded from a fixed or adaptive theme.
    pub fn from_choice(choice: ThemeChoice<'_>) -> Self {
        Self::new(choice.resolve())
    }

    /// Returns the current theme.
    pub fn theme(&self) -> Arc<Theme> {
        Arc::clone(&self.current.borrow())
    }

    /// Replaces the theme and notifies subscribers.
    ///
    /// Setting the theme that is already current is a no-op.
    pub fn set_theme(&self, theme: Arc<Theme>) {
        if Arc::ptr_eq(&self.current.borrow(), &theme) {
            return;
        }
        *self.current.borrow_mut() = Arc::clone(&theme);
        self.listeners.notify(&theme);
    }

    /// Registers a listener called after every replacement.
    pub fn subscribe(&self, listener: impl Fn(&Arc<Theme>) + 'static) -> Subscription {
        self.listeners.subscribe(Rc::new(listener))
    }
}

impl fmt::Debug for ThemeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeProvider")
            .field("theme", &self.current.borrow())
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}
