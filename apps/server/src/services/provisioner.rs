//! Lazy search-index provisioning
//!
//! An index for a partition is created on first use from the matching
//! relational rows. Per partition the lifecycle is
//! `Absent -> Provisioning -> Ready`; [`IndexProvisioner::reindex`] is the only
//! way back, rebuilding the index from the current table contents.
//!
//! First access is single-flight per `(backend, index)`: concurrent requests
//! for a new partition queue behind one creator and then find the index ready.
//! A provisioning that fails removes whatever it created, so the partition is
//! `Absent` again for the next request.

use crate::{
    config::BackendKind,
    db::ProductStore,
    metrics,
    models::{Partition, ProductDocument},
    search::SearchBackend,
    Error, Result,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// A usable remote index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHandle {
    pub backend: BackendKind,
    pub name: String,
    /// True when this call created (or rebuilt) the index.
    pub created: bool,
    /// Documents written when `created`; 0 otherwise.
    pub documents: usize,
}

type LockKey = (BackendKind, String);
type LockMap = Arc<Mutex<HashMap<LockKey, Arc<tokio::sync::Mutex<()>>>>>;

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Provision only if the index is still absent once the lock is held.
    Create,
    /// Drop whatever exists and provision again.
    Rebuild,
}

pub struct IndexProvisioner {
    store: Arc<dyn ProductStore>,
    in_flight: LockMap,
}

impl IndexProvisioner {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            store,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return a handle to the partition's index, creating and filling it first if absent.
    ///
    /// Fails with [`Error::NotFound`] when no product belongs to the partition;
    /// no index is created in that case and the next call checks again.
    pub async fn ensure_index(
        &self,
        backend: &Arc<dyn SearchBackend>,
        partition: &Partition,
    ) -> Result<IndexHandle> {
        let name = partition.key();
        if backend.index_exists(&name).await? {
            tracing::debug!(backend = %backend.kind(), index = %name, "Index already exists");
            return Ok(existing(backend.kind(), name));
        }
        self.run_locked(backend, partition, name, Mode::Create).await
    }

    /// Drop the partition's index (if any) and build it again from the store.
    pub async fn reindex(
        &self,
        backend: &Arc<dyn SearchBackend>,
        partition: &Partition,
    ) -> Result<IndexHandle> {
        self.run_locked(backend, partition, partition.key(), Mode::Rebuild)
            .await
    }

    /// The locked section runs on its own task: a caller that goes away while
    /// waiting or provisioning does not interrupt the create/ingest/cleanup
    /// sequence, and its lease is returned when the task ends.
    async fn run_locked(
        &self,
        backend: &Arc<dyn SearchBackend>,
        partition: &Partition,
        name: String,
        mode: Mode,
    ) -> Result<IndexHandle> {
        let lease = LockLease::acquire(&self.in_flight, (backend.kind(), name.clone()));
        let task = tokio::spawn(locked_section(
            self.store.clone(),
            backend.clone(),
            partition.clone(),
            name,
            mode,
            lease,
        ));
        task.await
            .map_err(|e| Error::Internal(format!("Index provisioning task failed: {e}")))?
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        lock_map(&self.in_flight).len()
    }
}

async fn locked_section(
    store: Arc<dyn ProductStore>,
    backend: Arc<dyn SearchBackend>,
    partition: Partition,
    name: String,
    mode: Mode,
    lease: LockLease,
) -> Result<IndexHandle> {
    let _guard = lease.lock.lock().await;
    let kind = backend.kind();

    match mode {
        Mode::Create => {
            // Another request may have finished provisioning while we waited.
            if backend.index_exists(&name).await? {
                return Ok(existing(kind, name));
            }
            tracing::info!(backend = %kind, index = %name, "Index does not exist, provisioning");
        }
        Mode::Rebuild => {
            let dropped = backend.delete_index(&name).await?;
            tracing::info!(backend = %kind, index = %name, dropped, "Rebuilding index");
        }
    }

    provision(store.as_ref(), backend.as_ref(), &partition, &name).await
}

async fn provision(
    store: &dyn ProductStore,
    backend: &dyn SearchBackend,
    partition: &Partition,
    name: &str,
) -> Result<IndexHandle> {
    let kind = backend.kind();
    let started = Instant::now();

    let rows = store.find_by_partition(partition).await?;
    if rows.is_empty() {
        metrics::record_provision(kind, "empty", started.elapsed());
        return Err(Error::NotFound(format!(
            "No products found for {partition}."
        )));
    }

    let documents: Vec<ProductDocument> = rows.into_iter().map(ProductDocument::from).collect();
    let count = documents.len();

    if let Err(e) = backend.create_index(name, &documents).await {
        metrics::record_provision(kind, "error", started.elapsed());
        tracing::error!(backend = %kind, index = %name, error = %e, "Index provisioning failed");
        // A half-built index would otherwise be served as ready.
        match backend.delete_index(name).await {
            Ok(dropped) => {
                tracing::warn!(backend = %kind, index = %name, dropped, "Removed partially provisioned index")
            }
            Err(cleanup) => {
                tracing::error!(backend = %kind, index = %name, error = %cleanup, "Failed to remove partially provisioned index")
            }
        }
        return Err(e);
    }

    metrics::record_provision(kind, "created", started.elapsed());
    tracing::info!(
        backend = %kind,
        index = %name,
        documents = count,
        duration_ms = started.elapsed().as_millis() as u64,
        "Index provisioned"
    );

    Ok(IndexHandle {
        backend: kind,
        name: name.to_string(),
        created: true,
        documents: count,
    })
}

/// Claim on a per-partition lock. The map entry is forgotten when the last
/// claim is dropped, whether its holder finished, failed or was cancelled.
struct LockLease {
    map: LockMap,
    key: LockKey,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl LockLease {
    fn acquire(map: &LockMap, key: LockKey) -> Self {
        let lock = lock_map(map).entry(key.clone()).or_default().clone();
        Self {
            map: map.clone(),
            key,
            lock,
        }
    }
}

impl Drop for LockLease {
    fn drop(&mut self) {
        let mut in_flight = lock_map(&self.map);
        // One reference in the map, one held here.
        if Arc::strong_count(&self.lock) <= 2 {
            in_flight.remove(&self.key);
        }
    }
}

fn lock_map(map: &LockMap) -> MutexGuard<'_, HashMap<LockKey, Arc<tokio::sync::Mutex<()>>>> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn existing(backend: BackendKind, name: String) -> IndexHandle {
    IndexHandle {
        backend,
        name,
        created: false,
        documents: 0,
    }
}
