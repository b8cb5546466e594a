//! Per-class memoizing accessor with optional expiry.

use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use classprop_core::error::{ClassPropError, Result, WriteOp};
use classprop_core::traits::Clock;
use classprop_core::{ClassKey, SystemClock};

use crate::config::CacheConfig;
use crate::entry::CacheEntry;

type ComputeFn<V, E> = Box<dyn Fn(&ClassKey) -> std::result::Result<V, E> + Send + Sync>;
type Slot<V> = Arc<Mutex<Option<CacheEntry<V>>>>;

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    computations: AtomicU64,
    failures: AtomicU64,
}

/// Cached class property.
///
/// Holds one entry per class that read it. The key is the exact type used
/// for access, so a subclass always computes its own value and resetting
/// one class never touches another.
///
/// Expiry is only checked on access. A failed computation is returned to
/// the caller unchanged and nothing is cached for it.
///
/// # Thread Safety
///
/// Each class has its own slot lock, held for the duration of a miss.
/// Concurrent readers of the same class wait for the one computation;
/// readers of other classes are not blocked. The computation may read the
/// cache for a different class, but reading the class it is computing
/// deadlocks.
///
/// [`len`](Self::len), [`stats`](Self::stats), [`reset_all`](Self::reset_all)
/// and [`cleanup_expired`](Self::cleanup_expired) lock every slot in turn.
/// On other threads they wait for any in-flight miss to finish. Called from
/// inside a computation they deadlock on the slot being computed.
pub struct ClassValueCache<V, E = Infallible> {
    compute: ComputeFn<V, E>,
    slots: DashMap<ClassKey, Slot<V>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    counters: Counters,
}

impl<V> ClassValueCache<V, Infallible> {
    /// Creates a cache with default configuration around an infallible
    /// computation.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(&ClassKey) -> V + Send + Sync + 'static,
    {
        Self::with_config(CacheConfig::default(), compute)
    }

    /// Creates a cache with custom configuration around an infallible
    /// computation.
    pub fn with_config<F>(config: CacheConfig, compute: F) -> Self
    where
        F: Fn(&ClassKey) -> V + Send + Sync + 'static,
    {
        Self::try_with_config(config, move |class| Ok(compute(class)))
    }
}

impl<V, E> ClassValueCache<V, E> {
    /// Creates a cache with default configuration around a fallible
    /// computation.
    pub fn try_new<F>(compute: F) -> Self
    where
        F: Fn(&ClassKey) -> std::result::Result<V, E> + Send + Sync + 'static,
    {
        Self::try_with_config(CacheConfig::default(), compute)
    }

    /// Creates a cache with custom configuration around a fallible
    /// computation.
    pub fn try_with_config<F>(config: CacheConfig, compute: F) -> Self
    where
        F: Fn(&ClassKey) -> std::result::Result<V, E> + Send + Sync + 'static,
    {
        Self {
            compute: Box::new(compute),
            slots: DashMap::new(),
            config,
            clock: Arc::new(SystemClock),
            counters: Counters::default(),
        }
    }

    /// Replaces the clock used for staleness checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the property name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // RESET
    // ═══════════════════════════════════════════════════════════════════════════

    /// Removes the entry of class `C`.
    ///
    /// Returns true if an entry was removed.
    pub fn reset<C: ?Sized + 'static>(&self) -> bool {
        self.reset_for(&ClassKey::of::<C>())
    }

    /// Removes the entry of `class`, leaving every other class untouched.
    ///
    /// Waits for an in-flight computation of `class` and discards its result.
    pub fn reset_for(&self, class: &ClassKey) -> bool {
        let Some(slot) = self.existing_slot(class) else {
            return false;
        };

        let mut entry = slot.lock();
        let removed = entry.take().is_some();

        // The map and `slot` hold the only references unless another reader
        // is already waiting on this slot; that reader keeps it alive.
        self.slots.remove_if(class, |_, mapped| {
            Arc::ptr_eq(mapped, &slot) && Arc::strong_count(mapped) == 2
        });
        drop(entry);

        if removed {
            debug!(class = %class, property = %self.config.name, "Cache entry reset");
        }
        removed
    }

    /// Removes every entry.
    ///
    /// Waits for in-flight computations; see the type-level docs.
    pub fn reset_all(&self) {
        let classes: Vec<ClassKey> = self.slots.iter().map(|slot| *slot.key()).collect();
        for class in &classes {
            self.reset_for(class);
        }
        debug!(property = %self.config.name, "Cache cleared");
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // READ-ONLY VIEW
    // ═══════════════════════════════════════════════════════════════════════════

    /// Rejects assigning a value for class `C`.
    ///
    /// # Errors
    /// Always returns `ClassPropError::ReadOnly`; the cache is unchanged.
    pub fn set<C: ?Sized + 'static>(&self, value: V) -> Result<()> {
        self.set_for(&ClassKey::of::<C>(), value)
    }

    /// Rejects assigning a value through an instance.
    pub fn set_of<C: ?Sized + 'static>(&self, instance: &C, value: V) -> Result<()> {
        self.set_for(&ClassKey::of_val(instance), value)
    }

    /// Rejects assigning a value for `class`.
    pub fn set_for(&self, class: &ClassKey, _value: V) -> Result<()> {
        Err(self.read_only(class, WriteOp::Set))
    }

    /// Rejects deleting the value of class `C`.
    ///
    /// # Errors
    /// Always returns `ClassPropError::ReadOnly`; the cache is unchanged.
    /// Use [`reset`](Self::reset) to invalidate an entry.
    pub fn delete<C: ?Sized + 'static>(&self) -> Result<()> {
        self.delete_for(&ClassKey::of::<C>())
    }

    /// Rejects deleting the value through an instance.
    pub fn delete_of<C: ?Sized + 'static>(&self, instance: &C) -> Result<()> {
        self.delete_for(&ClassKey::of_val(instance))
    }

    /// Rejects deleting the value of `class`.
    pub fn delete_for(&self, class: &ClassKey) -> Result<()> {
        Err(self.read_only(class, WriteOp::Delete))
    }

    fn read_only(&self, class: &ClassKey, operation: WriteOp) -> ClassPropError {
        warn!(
            class = %class,
            property = %self.config.name,
            %operation,
            "Rejected write to read-only class property"
        );
        ClassPropError::ReadOnly {
            property: self.config.name.clone(),
            class: class.name().to_string(),
            operation,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INSPECTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns true if class `C` has a valid entry.
    pub fn is_cached<C: ?Sized + 'static>(&self) -> bool {
        self.is_cached_for(&ClassKey::of::<C>())
    }

    /// Returns true if `class` has a valid entry. Never computes.
    pub fn is_cached_for(&self, class: &ClassKey) -> bool {
        let Some(slot) = self.existing_slot(class) else {
            return false;
        };
        let now = self.clock.now();
        let timeout = self.config.timeout();
        let entry = slot.lock();
        entry.as_ref().is_some_and(|e| e.is_valid(now, timeout))
    }

    /// Removes all entries that are no longer valid.
    ///
    /// Returns the number of entries removed. Waits for in-flight
    /// computations; see the type-level docs.
    pub fn cleanup_expired(&self) -> usize {
        let Some(timeout) = self.config.timeout() else {
            return 0;
        };

        let mut removed = 0;
        for slot in self.snapshot() {
            let mut entry = slot.lock();
            let now = self.clock.now();
            if entry.as_ref().is_some_and(|e| !e.is_valid(now, Some(timeout))) {
                if let Some(stale) = entry.take() {
                    debug!(class = %stale.owning_class, property = %self.config.name, "Expired entry removed");
                }
                removed += 1;
            }
        }
        removed
    }

    /// Returns the number of stored entries, including expired ones.
    ///
    /// Waits for in-flight computations; see the type-level docs.
    pub fn len(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cache statistics.
    ///
    /// Waits for in-flight computations; see the type-level docs.
    pub fn stats(&self) -> CacheStats {
        let timeout = self.config.timeout();
        let mut total = 0;
        let mut expired = 0;

        for slot in self.snapshot() {
            let entry = slot.lock();
            if let Some(entry) = entry.as_ref() {
                total += 1;
                if !entry.is_valid(self.clock.now(), timeout) {
                    expired += 1;
                }
            }
        }

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            valid_entries: total - expired,
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            computations: self.counters.computations.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SLOTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns the slot of `class`, creating an empty one on first access.
    ///
    /// The map guard is released before returning, so callers may lock the
    /// slot while the computation touches the map.
    fn slot(&self, class: &ClassKey) -> Slot<V> {
        if let Some(slot) = self.existing_slot(class) {
            return slot;
        }
        Arc::clone(self.slots.entry(*class).or_default().value())
    }

    fn existing_slot(&self, class: &ClassKey) -> Option<Slot<V>> {
        self.slots.get(class).map(|slot| Arc::clone(slot.value()))
    }

    fn snapshot(&self) -> Vec<Slot<V>> {
        self.slots.iter().map(|slot| Arc::clone(slot.value())).collect()
    }
}

impl<V: Clone, E> ClassValueCache<V, E> {
    // ═══════════════════════════════════════════════════════════════════════════
    // READ
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns the value of class `C`, computing it on a miss.
    ///
    /// # Errors
    /// Returns the computation's error unchanged; nothing is cached.
    pub fn get<C: ?Sized + 'static>(&self) -> std::result::Result<V, E> {
        self.get_for(&ClassKey::of::<C>())
    }

    /// Returns the value for the concrete type of `instance`.
    pub fn get_of<C: ?Sized + 'static>(&self, instance: &C) -> std::result::Result<V, E> {
        self.get_for(&ClassKey::of_val(instance))
    }

    /// Returns the value of `class`, computing it if no valid entry exists.
    pub fn get_for(&self, class: &ClassKey) -> std::result::Result<V, E> {
        let slot = self.slot(class);
        let mut entry = slot.lock();
        let timeout = self.config.timeout();

        if let Some(cached) = entry.as_ref() {
            if cached.is_valid(self.clock.now(), timeout) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!(class = %class, property = %self.config.name, "Cache hit");
                return Ok(cached.computed_value.clone());
            }
            debug!(class = %class, property = %self.config.name, "Cache entry expired");
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        debug!(class = %class, property = %self.config.name, "Cache miss, computing");

        match (self.compute)(class) {
            Ok(value) => {
                self.counters.computations.fetch_add(1, Ordering::Relaxed);
                *entry = Some(CacheEntry::new(*class, value.clone(), self.clock.now()));
                Ok(value)
            }
            Err(err) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                warn!(class = %class, property = %self.config.name, "Computation failed, nothing cached");
                Err(err)
            }
        }
    }
}

impl<V: Clone> ClassValueCache<V, Infallible> {
    /// Returns the value of class `C`.
    pub fn value<C: ?Sized + 'static>(&self) -> V {
        self.value_for(&ClassKey::of::<C>())
    }

    /// Returns the value for the concrete type of `instance`.
    pub fn value_of<C: ?Sized + 'static>(&self, instance: &C) -> V {
        self.value_for(&ClassKey::of_val(instance))
    }

    /// Returns the value of `class`.
    pub fn value_for(&self, class: &ClassKey) -> V {
        match self.get_for(class) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<V, E> fmt::Debug for ClassValueCache<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassValueCache")
            .field("config", &self.config)
            .field("classes", &self.slots.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Expired entries
    pub expired_entries: usize,
    /// Valid (non-expired) entries
    pub valid_entries: usize,
    /// Reads served from a valid entry
    pub hits: u64,
    /// Reads that ran the computation
    pub misses: u64,
    /// Successful computations
    pub computations: u64,
    /// Failed computations
    pub failures: u64,
}
