//! Style cache: one registered handle per distinct resolved style.
//!
//! Registration with the platform is assumed to be expensive, so the cache
//! calls [`StyleBackend::register`] at most once for each distinct
//! [`ResolvedStyle`] it retains. Keys are the style's canonical
//! serialization, so property order never matters.
//!
//! The check-then-register step runs under a single lock, which keeps the
//! at-most-once guarantee when the cache is shared across threads.
//!
//! ```rust
//! use std::sync::Arc;
//! use sxstyle::{Literal, ResolvedStyle, StyleCache, StyleSheetBackend};
//!
//! let cache = StyleCache::new(StyleSheetBackend::new());
//! let a: ResolvedStyle = [("color", Literal::from("red")), ("margin", Literal::from(4))]
//!     .into_iter()
//!     .collect();
//! let b: ResolvedStyle = [("margin", Literal::from(4)), ("color", Literal::from("red"))]
//!     .into_iter()
//!     .collect();
//!
//! assert!(Arc::ptr_eq(&cache.get(&a), &cache.get(&b)));
//! assert_eq!(cache.len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use crate::compile::ResolvedStyle;

/// The platform layer that turns a resolved style into a usable handle.
pub trait StyleBackend {
    /// Opaque handle returned to callers. Clones must refer to the same
    /// registered style.
    type Handle: Clone;

    fn register(&self, style: &ResolvedStyle) -> Self::Handle;
}

/// A registered style produced by [`StyleSheetBackend`].
#[derive(Debug, PartialEq)]
pub struct StyleSheet {
    id: u64,
    style: ResolvedStyle,
}

impl StyleSheet {
    /// Registration id, unique within the backend.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }
}

/// Default backend: stores the style and numbers registrations in order.
#[derive(Debug, Default)]
pub struct StyleSheetBackend {
    next_id: AtomicU64,
}

impl StyleSheetBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of styles registered so far.
    pub fn registered(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl StyleBackend for StyleSheetBackend {
    type Handle = Arc<StyleSheet>;

    fn register(&self, style: &ResolvedStyle) -> Self::Handle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Arc::new(StyleSheet {
            id,
            style: style.clone(),
        })
    }
}

/// Counters describing cache behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Entry<H> {
    handle: H,
    last_used: u64,
}

struct CacheState<H> {
    entries: HashMap<String, Entry<H>>,
    tick: u64,
    stats: CacheStats,
}

/// Maps resolved styles to backend handles.
///
/// Unbounded by default. [`StyleCache::bounded`] evicts the least recently
/// used entry once `capacity` distinct styles are held; an evicted style is
/// registered again, with a new handle, the next time it is requested.
pub struct StyleCache<B: StyleBackend> {
    backend: B,
    capacity: Option<NonZeroUsize>,
    state: Mutex<CacheState<B::Handle>>,
}

impl<B: StyleBackend> StyleCache<B> {
    /// Creates an unbounded cache.
    pub fn new(backend: B) -> Self {
        Self::with_capacity(backend, None)
    }

    /// Creates a cache holding at most `capacity` styles.
    pub fn bounded(backend: B, capacity: NonZeroUsize) -> Self {
        Self::with_capacity(backend, Some(capacity))
    }

    fn with_capacity(backend: B, capacity: Option<NonZeroUsize>) -> Self {
        Self {
            backend,
            capacity,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                tick: 0,
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the handle for `style`, registering it on first use.
    pub fn get(&self, style: &ResolvedStyle) -> B::Handle {
        let key = style.cache_key();
        let mut state = self.lock();
        state.tick += 1;
        let tick = state.tick;

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.last_used = tick;
            let handle = entry.handle.clone();
            state.stats.hits += 1;
            return handle;
        }

        if let Some(capacity) = self.capacity {
            if state.entries.len() >= capacity.get() {
                evict_oldest(&mut state);
            }
        }

        tracing::debug!(key = key.as_str(), "registering style");
        let handle = self.backend.register(style);
        state.stats.misses += 1;
        state.entries.insert(
            key,
            Entry {
                handle: handle.clone(),
                last_used: tick,
            },
        );
        handle
    }

    /// Returns `true` if a handle for `style` is retained.
    pub fn contains(&self, style: &ResolvedStyle) -> bool {
        self.lock().entries.contains_key(&style.cache_key())
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Drops every entry, starting a new cache epoch.
    pub fn clear(&self) {
        let mut state = self.lock();
        tracing::debug!(entries = state.entries.len(), "clearing style cache");
        state.entries.clear();
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<B::Handle>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn evict_oldest<H>(state: &mut CacheState<H>) {
    let oldest = state
        .entries
        .iter()
        .min_by_key(|(_, entry)| entry.last_used)
        .map(|(key, _)| key.clone());
    if let Some(key) = oldest {
        tracing::debug!(key = key.as_str(), "evicting style");
        state.entries.remove(&key);
        state.stats.evictions += 1;
    }
}

impl<B: StyleBackend + fmt::Debug> fmt::Debug for StyleCache<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("StyleCache")
            .field("backend", &self.backend)
            .field("capacity", &self.capacity)
            .field("entries", &state.entries.len())
            .field("stats", &state.stats)
            .finish()
    }
}

static GLOBAL_CACHE: Lazy<Arc<StyleCache<StyleSheetBackend>>> =
    Lazy::new(|| Arc::new(StyleCache::new(StyleSheetBackend::new())));

/// The process-wide cache shared by every resolver that does not bring its own.
pub fn global_cache() -> Arc<StyleCache<StyleSheetBackend>> {
    Arc::clone(&GLOBAL_CACHE)
}
