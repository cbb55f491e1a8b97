//! Content-addressed cache for encoded templates
//!
//! Templates are keyed by the SHA-256 digest of their encoded HTML, so two
//! invocations whose static markup matches share one entry and one parsed
//! tree. Runtime values never live in the cache: every template keeps the
//! placeholder map of its own invocation.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use sha2::{Digest, Sha256};
use tracing::trace;

use crate::error::Result;
use crate::parser::{ParsedNode, ParserKind};

/// Hex SHA-256 digest used as the cache key
pub fn content_hash(html: &str) -> String {
    format!("{:x}", Sha256::digest(html.as_bytes()))
}

/// One cached template
#[derive(Debug)]
pub struct CacheEntry {
    key: String,
    html: String,
    trees: RefCell<HashMap<ParserKind, Rc<Vec<ParsedNode>>>>,
    retrievals: Cell<usize>,
}

impl CacheEntry {
    pub fn new(html: String) -> Self {
        Self {
            key: content_hash(&html),
            html,
            trees: RefCell::new(HashMap::new()),
            retrievals: Cell::new(0),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// How many times this entry has been handed out by a cache
    pub fn retrievals(&self) -> usize {
        self.retrievals.get()
    }

    /// Parsed tree for `parser`, parsing on first use
    pub fn tree(&self, parser: ParserKind) -> Result<Rc<Vec<ParsedNode>>> {
        if let Some(tree) = self.trees.borrow().get(&parser) {
            return Ok(Rc::clone(tree));
        }

        let tree = Rc::new(parser.parse(&self.html)?);
        self.trees.borrow_mut().insert(parser, Rc::clone(&tree));
        Ok(tree)
    }

    pub fn is_parsed(&self, parser: ParserKind) -> bool {
        self.trees.borrow().contains_key(&parser)
    }

    fn mark_retrieved(&self) -> usize {
        let count = self.retrievals.get() + 1;
        self.retrievals.set(count);
        count
    }
}

/// Backing storage for a [`TemplateCache`]
pub trait CacheStore {
    fn get(&self, key: &str) -> Option<Rc<CacheEntry>>;
    fn insert(&mut self, key: String, entry: Rc<CacheEntry>);
    fn len(&self) -> usize;
    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Rc<CacheEntry>>,
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Rc<CacheEntry>> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: String, entry: Rc<CacheEntry>) {
        self.entries.insert(key, entry);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Result of a cache lookup
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub entry: Rc<CacheEntry>,
    /// True on the second and later retrieval of the same entry
    pub from_cache: bool,
}

/// Template cache with hit/miss accounting
pub struct TemplateCache<S: CacheStore = MemoryStore> {
    store: RefCell<S>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl TemplateCache<MemoryStore> {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::default())
    }
}

impl Default for TemplateCache<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CacheStore> TemplateCache<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store: RefCell::new(store),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Return the entry for `html`, creating it on a miss
    pub fn get_or_insert(&self, html: &str) -> CacheLookup {
        let key = content_hash(html);

        let cached = self.store.borrow().get(&key);
        if let Some(entry) = cached {
            self.hits.set(self.hits.get() + 1);
            let count = entry.mark_retrieved();
            trace!(key = %key, retrievals = count, "template cache hit");
            return CacheLookup {
                entry,
                from_cache: count > 1,
            };
        }

        self.misses.set(self.misses.get() + 1);
        trace!(key = %key, "template cache miss");
        let entry = Rc::new(CacheEntry::new(html.to_string()));
        entry.mark_retrieved();
        self.store.borrow_mut().insert(key, Rc::clone(&entry));
        CacheLookup {
            entry,
            from_cache: false,
        }
    }

    /// Check for an entry without touching the statistics
    pub fn contains(&self, html: &str) -> bool {
        self.store.borrow().get(&content_hash(html)).is_some()
    }

    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }

    /// Drop every entry and reset the statistics
    pub fn clear(&self) {
        self.store.borrow_mut().clear();
        self.hits.set(0);
        self.misses.set(0);
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.get();
        let misses = self.misses.get();
        CacheStats {
            hits,
            misses,
            hit_rate: if hits + misses > 0 {
                hits as f64 / (hits + misses) as f64
            } else {
                0.0
            },
            entry_count: self.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
    pub entry_count: usize,
}

thread_local! {
    static GLOBAL_CACHE: TemplateCache = TemplateCache::new();
}

/// Run `f` against this thread's default cache
pub fn with_global_cache<R>(f: impl FnOnce(&TemplateCache) -> R) -> R {
    GLOBAL_CACHE.with(f)
}

/// Clear this thread's default cache
pub fn clear_global_cache() {
    with_global_cache(TemplateCache::clear);
}

/// Statistics of this thread's default cache
pub fn global_cache_stats() -> CacheStats {
    with_global_cache(TemplateCache::stats)
}
