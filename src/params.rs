//! Captured path parameters and the pool that recycles their buffers.
//!
//! Lookup writes captures into a [`Params`] buffer drawn from a
//! [`ParamsPool`]. Keys are the `Arc<str>` names already held by the route
//! tree; values are ranges into one reusable `String`. Once a buffer has
//! grown to fit the deepest route it is reused without touching the
//! allocator.

use std::fmt;
use std::ops::{Deref, DerefMut, Range};
use std::sync::{Arc, Mutex, PoisonError};

/// Path parameters captured for one request, in capture order.
#[derive(Clone, Default)]
pub struct Params {
    keys: Vec<Arc<str>>,
    values: Vec<Range<usize>>,
    text: String,
}

impl Params {
    pub(crate) fn with_capacity(slots: usize) -> Self {
        Self {
            keys: Vec::with_capacity(slots),
            values: Vec::with_capacity(slots),
            text: String::with_capacity(slots * 16),
        }
    }

    /// Returns the value bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.keys
            .iter()
            .position(|k| &**k == key)
            .map(|i| &self.text[self.values[i].clone()])
    }

    /// Iterates `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .zip(&self.values)
            .map(|(k, v)| (&**k, &self.text[v.clone()]))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn push(&mut self, key: &Arc<str>, value: &str) {
        let start = self.text.len();
        self.text.push_str(value);
        self.keys.push(Arc::clone(key));
        self.values.push(start..self.text.len());
    }

    /// Drops every binding past the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        if len >= self.keys.len() {
            return;
        }
        self.text.truncate(self.values[len].start);
        self.keys.truncate(len);
        self.values.truncate(len);
    }

    /// Empties the buffer, keeping its capacity.
    pub(crate) fn reset(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.text.clear();
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.keys.capacity()
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// ── Pool ─────────────────────────────────────────────────────────────────────

/// A free list of [`Params`] buffers shared by every request on a router.
pub(crate) struct ParamsPool {
    free: Mutex<Vec<Params>>,
    slots: usize,
    max_idle: usize,
}

impl ParamsPool {
    pub(crate) fn new(slots: usize, max_idle: usize) -> Self {
        Self { free: Mutex::new(Vec::new()), slots, max_idle }
    }

    /// Takes an empty buffer from the pool, creating one if none is idle.
    ///
    /// The returned guard owns the buffer exclusively and gives it back when
    /// dropped.
    pub(crate) fn acquire(self: &Arc<Self>) -> PooledParams {
        let recycled = self.free.lock().unwrap_or_else(PoisonError::into_inner).pop();
        let mut params = recycled.unwrap_or_else(|| Params::with_capacity(self.slots));
        params.reset();
        PooledParams { params, pool: Arc::clone(self) }
    }

    fn release(&self, params: Params) {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_idle {
            free.push(params);
        }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// A [`Params`] buffer on loan from the router's pool.
///
/// Dereferences to [`Params`]. Returned to the pool on drop, so it cannot
/// outlive the request that holds it or be shared with another one.
pub struct PooledParams {
    params: Params,
    pool: Arc<ParamsPool>,
}

impl Deref for PooledParams {
    type Target = Params;

    fn deref(&self) -> &Params {
        &self.params
    }
}

impl DerefMut for PooledParams {
    fn deref_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

impl Drop for PooledParams {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.params));
    }
}

impl fmt::Debug for PooledParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.params.fmt(f)
    }
}
