//! Generic config store with change notification.
//!
//! `ConfigStore<T>` wraps `Arc<RwLock<T>>` and provides a watch-based
//! notification mechanism so that consumers (the persistence task, for one)
//! can react to configuration changes without polling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, RwLockReadGuard, watch};

/// A shared, versioned configuration store with change notification.
///
/// Wraps a value of type `T` behind `Arc<RwLock<T>>` and maintains an
/// incrementing version counter. Subscribers receive a [`ConfigWatcher`]
/// that can `await` the next change.
pub struct ConfigStore<T> {
    inner: Arc<ConfigStoreInner<T>>,
}

struct ConfigStoreInner<T> {
    data: RwLock<T>,
    version: AtomicU64,
    version_tx: watch::Sender<u64>,
}

/// Receives notifications when a [`ConfigStore`] is updated.
pub struct ConfigWatcher {
    version_rx: watch::Receiver<u64>,
}

// -- ConfigStore --------------------------------------------------------

impl<T> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        let (version_tx, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(ConfigStoreInner {
                data: RwLock::new(initial),
                version: AtomicU64::new(0),
                version_tx,
            }),
        }
    }

    /// Replace the stored value and notify all watchers.
    pub async fn update(&self, value: T) {
        let mut guard = self.inner.data.write().await;
        *guard = value;
        self.publish(guard);
    }

    /// Read the current value.
    pub async fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.data.read().await
    }

    /// Number of updates published so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Relaxed)
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> ConfigWatcher {
        ConfigWatcher {
            version_rx: self.inner.version_tx.subscribe(),
        }
    }

    fn publish(&self, guard: tokio::sync::RwLockWriteGuard<'_, T>) {
        let new_version = self.inner.version.fetch_add(1, Ordering::Relaxed) + 1;
        // Drop the write guard before notifying so subscribers can
        // immediately acquire a read lock.
        drop(guard);
        let _ = self.inner.version_tx.send(new_version);
    }
}

impl<T: Clone> ConfigStore<T> {
    /// Clone the current value.
    pub async fn snapshot(&self) -> T {
        self.inner.data.read().await.clone()
    }

    /// Apply `f` to a copy of the stored value under the write lock.
    ///
    /// The copy replaces the stored value and watchers are notified only
    /// when `f` succeeds; on error the store is left as it was.
    pub async fn try_modify<R, E>(
        &self,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut guard = self.inner.data.write().await;
        let mut draft = guard.clone();
        let result = f(&mut draft)?;
        *guard = draft;
        self.publish(guard);
        Ok(result)
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// -- ConfigWatcher ------------------------------------------------------

impl ConfigWatcher {
    /// Wait until the config store is updated.
    ///
    /// Returns `Ok(())` when a new version is available, or `Err` if the
    /// [`ConfigStore`] has been dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.version_rx.changed().await
    }

    /// Version seen by the last [`changed`](ConfigWatcher::changed) call.
    pub fn seen_version(&mut self) -> u64 {
        *self.version_rx.borrow_and_update()
    }
}
