//! Bounded-concurrency registry lookups
//!
//! A fixed number of workers pull dependencies off a [`WorkQueue`], look each
//! one up, and push the enriched copy onto an unbounded result channel. The
//! pool returns once the queue's completion barrier is reached, so every
//! input record comes back exactly once.

use crate::domain::Dependency;
use crate::progress::Progress;
use crate::queue::WorkQueue;
use crate::registry::{RegistryClient, VersionLookup};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

/// Default number of concurrent lookups
pub const DEFAULT_WORKERS: usize = 5;

/// Fixed-size pool of lookup workers sharing one registry client
pub struct FetchPool {
    client: Arc<dyn RegistryClient>,
    workers: usize,
    progress: Progress,
}

impl FetchPool {
    /// Create a pool with [`DEFAULT_WORKERS`] workers
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self {
            client,
            workers: DEFAULT_WORKERS,
            progress: Progress::disabled(),
        }
    }

    /// Set the worker count (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Tick this progress handle once per finished lookup
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Look up every record and return the enriched copies.
    ///
    /// Output order is unspecified.
    pub async fn run(&self, records: impl IntoIterator<Item = Dependency>) -> Vec<Dependency> {
        let work = Arc::new(WorkQueue::new());
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();

        let mut submitted = 0usize;
        for record in records {
            work.put(record);
            submitted += 1;
        }
        debug!(
            records = submitted,
            workers = self.workers,
            registry = self.client.registry_name(),
            "starting lookups"
        );

        let mut tasks = JoinSet::new();
        for id in 0..self.workers {
            tasks.spawn(worker(
                id,
                Arc::clone(&work),
                result_tx.clone(),
                Arc::clone(&self.client),
                self.progress.clone(),
            ));
        }
        drop(result_tx);

        work.join().await;

        // Every item is done; release the idle workers and reap them
        work.close();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "lookup worker terminated abnormally");
            }
        }

        let mut results = Vec::with_capacity(submitted);
        while let Some(dependency) = result_rx.recv().await {
            results.push(dependency);
        }
        debug!(results = results.len(), "lookups finished");

        results
    }
}

async fn worker(
    id: usize,
    work: Arc<WorkQueue<Dependency>>,
    results: mpsc::UnboundedSender<Dependency>,
    client: Arc<dyn RegistryClient>,
    progress: Progress,
) {
    while let Some(dependency) = work.get().await {
        let _done = work.task_guard();
        trace!(worker = id, %dependency, "lookup");

        let lookup = client.lookup(&dependency.name).await;
        if let VersionLookup::Failed(e) = &lookup {
            warn!(package = %dependency.name, error = %e, "registry lookup failed");
        }

        let enriched = dependency.with_last_version(lookup.into_version());
        if results.send(enriched).is_err() {
            warn!(worker = id, "result queue dropped before pool finished");
        }
        progress.inc();
    }
    trace!(worker = id, "worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(10);

    /// Registry double that records every call
    #[derive(Default)]
    struct RecordingRegistry {
        versions: HashMap<String, String>,
        failing: HashSet<String>,
        delay: Duration,
        calls: Mutex<HashMap<String, usize>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl RecordingRegistry {
        fn with_version(mut self, name: &str, version: &str) -> Self {
            self.versions.insert(name.to_string(), version.to_string());
            self
        }

        fn with_failure(mut self, name: &str) -> Self {
            self.failing.insert(name.to_string());
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> HashMap<String, usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RegistryClient for RecordingRegistry {
        fn registry_name(&self) -> &'static str {
            "fake"
        }

        async fn lookup(&self, package: &str) -> VersionLookup {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            *self
                .calls
                .lock()
                .unwrap()
                .entry(package.to_string())
                .or_default() += 1;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(package) {
                return VersionLookup::Failed(RegistryError::timeout(package, "fake"));
            }
            match self.versions.get(package) {
                Some(version) => VersionLookup::Found(version.clone()),
                None => VersionLookup::NotFound,
            }
        }
    }

    fn records(names: &[&str]) -> Vec<Dependency> {
        names.iter().map(|n| Dependency::new(*n, "1.0.0")).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_record_processed_exactly_once() {
        let names: Vec<String> = (0..23).map(|i| format!("pkg-{}", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let registry = Arc::new(RecordingRegistry::default().with_delay(Duration::from_millis(5)));
        let pool = FetchPool::new(registry.clone());

        let results = timeout(WAIT, pool.run(records(&name_refs))).await.unwrap();

        assert_eq!(results.len(), 23);
        let calls = registry.calls();
        assert_eq!(calls.len(), 23);
        assert!(calls.values().all(|&count| count == 1));

        let returned: HashSet<_> = results.iter().map(|d| d.name.clone()).collect();
        assert_eq!(returned, names.into_iter().collect::<HashSet<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded_by_worker_count() {
        let names: Vec<String> = (0..20).map(|i| format!("pkg-{}", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let registry = Arc::new(RecordingRegistry::default().with_delay(Duration::from_millis(10)));
        let pool = FetchPool::new(registry.clone()).with_workers(3);

        let results = timeout(WAIT, pool.run(records(&name_refs))).await.unwrap();

        assert_eq!(results.len(), 20);
        let peak = registry.max_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency {} exceeds 3 workers", peak);
        assert!(peak >= 1);
    }

    #[tokio::test]
    async fn test_empty_input_does_not_deadlock() {
        let registry = Arc::new(RecordingRegistry::default());
        let pool = FetchPool::new(registry.clone());

        let results = timeout(WAIT, pool.run(Vec::new())).await.unwrap();

        assert!(results.is_empty());
        assert!(registry.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_record_with_idle_workers() {
        let registry = Arc::new(RecordingRegistry::default().with_version("requests", "2.0.0"));
        let pool = FetchPool::new(registry.clone());
        assert_eq!(pool.workers, DEFAULT_WORKERS);

        let results = timeout(WAIT, pool.run(records(&["requests"])))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].last_version.as_deref(), Some("2.0.0"));
        assert_eq!(registry.calls().get("requests"), Some(&1));
    }

    #[tokio::test]
    async fn test_lookup_outcomes_map_to_last_version() {
        let registry = Arc::new(
            RecordingRegistry::default()
                .with_version("flask", "2.0.0")
                .with_failure("numpy"),
        );
        let pool = FetchPool::new(registry);

        let results = pool.run(records(&["flask", "numpy", "ghost"])).await;
        let by_name: HashMap<_, _> = results
            .into_iter()
            .map(|d| (d.name.clone(), d.last_version))
            .collect();

        assert_eq!(by_name["flask"].as_deref(), Some("2.0.0"));
        assert_eq!(by_name["numpy"], None);
        assert_eq!(by_name["ghost"], None);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_independent_items() {
        let registry = Arc::new(RecordingRegistry::default().with_version("flask", "2.0.0"));
        let pool = FetchPool::new(registry.clone()).with_workers(2);

        let results = pool.run(records(&["flask", "flask"])).await;

        assert_eq!(results.len(), 2);
        assert_eq!(registry.calls().get("flask"), Some(&2));
    }

    #[tokio::test]
    async fn test_zero_workers_clamped_to_one() {
        let registry = Arc::new(RecordingRegistry::default());
        let pool = FetchPool::new(registry).with_workers(0);
        assert_eq!(pool.workers, 1);

        let results = timeout(WAIT, pool.run(records(&["a", "b", "c"])))
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }
}
