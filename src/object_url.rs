// src/object_url.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: HashMap<String, Arc<[u8]>>,
    revoked: u64,
}

/// Hands out `blob:` style URLs that stay resolvable until their guard drops.
#[derive(Clone, Default)]
pub struct ObjectUrlRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, bytes: Arc<[u8]>) -> ObjectUrl {
        let mut reg = lock(&self.inner);
        reg.next_id += 1;
        let url = format!("blob:mockup/{}", reg.next_id);
        reg.entries.insert(url.clone(), bytes);
        tracing::debug!(%url, "object url created");
        ObjectUrl {
            url,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Bytes behind a live URL; `None` once revoked.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        lock(&self.inner).entries.get(url).cloned()
    }

    pub fn live_count(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    pub fn revoked_count(&self) -> u64 {
        lock(&self.inner).revoked
    }
}

impl fmt::Debug for ObjectUrlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrlRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owning handle for one URL. Revoked exactly once, when dropped.
pub struct ObjectUrl {
    url: String,
    registry: Weak<Mutex<Registry>>,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            let mut reg = lock(&inner);
            if reg.entries.remove(&self.url).is_some() {
                reg.revoked += 1;
                tracing::debug!(url = %self.url, "object url revoked");
            }
        }
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

fn lock(inner: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
