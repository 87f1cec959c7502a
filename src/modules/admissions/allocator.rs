//! Per-partition sequence allocation.

use std::sync::Arc;

use registrar_models::Partition;
use tracing::{debug, instrument, warn};

use crate::modules::admissions::error::AdmissionError;
use crate::modules::admissions::store::{CounterStore, StoreError};

/// Issues the next unused sequence number for a partition.
///
/// All state lives in the [`CounterStore`]; the allocator itself holds
/// nothing, so any number of service instances can share one store.
#[derive(Clone)]
pub struct SequenceAllocator {
    counters: Arc<dyn CounterStore>,
}

impl SequenceAllocator {
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Returns the next sequence number for `partition`, starting at 1.
    ///
    /// Concurrent calls on the same partition never return the same value.
    /// The counter either advanced or it did not; no state is kept here on
    /// failure.
    #[instrument(skip(self, partition), fields(partition = %partition))]
    pub async fn allocate(&self, partition: Partition) -> Result<u32, AdmissionError> {
        let value = self
            .counters
            .increment_or_create(&partition)
            .await
            .map_err(|source| {
                warn!(partition = %partition, error = %source, "Sequence allocation failed");
                AdmissionError::AllocationFailure { partition, source }
            })?;

        let sequence = u32::try_from(value)
            .ok()
            .filter(|v| *v >= 1)
            .ok_or_else(|| AdmissionError::AllocationFailure {
                partition,
                source: StoreError::InvalidState(format!(
                    "counter for {partition} returned {value}"
                )),
            })?;

        debug!(partition = %partition, sequence, "Sequence allocated");
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::admissions::memory::InMemoryAdmissionStore;
    use async_trait::async_trait;
    use registrar_models::CourseCode;
    use std::collections::HashSet;
    use std::time::Duration;

    struct FixedCounter(i64);

    #[async_trait]
    impl CounterStore for FixedCounter {
        async fn increment_or_create(&self, _partition: &Partition) -> Result<i64, StoreError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn test_allocate_is_sequential() {
        let allocator = SequenceAllocator::new(Arc::new(InMemoryAdmissionStore::new()));
        let partition = Partition::new(CourseCode::Bca, 2024);

        let mut issued = Vec::new();
        for _ in 0..5 {
            issued.push(allocator.allocate(partition).await.unwrap());
        }
        assert_eq!(issued, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_allocations_issue_each_value_once() {
        let store = Arc::new(InMemoryAdmissionStore::with_latency(Duration::from_millis(1)));
        let allocator = SequenceAllocator::new(store.clone());
        let partition = Partition::new(CourseCode::Mca, 2025);
        const N: u32 = 50;

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let allocator = allocator.clone();
                tokio::spawn(async move { allocator.allocate(partition).await })
            })
            .collect();

        let mut values = HashSet::new();
        for handle in handles {
            let value = handle.await.unwrap().unwrap();
            assert!(values.insert(value), "sequence {value} issued twice");
        }

        assert_eq!(values, (1..=N).collect::<HashSet<_>>());
        assert_eq!(store.counter_value(&partition).await, Some(i64::from(N)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_partitions_are_independent() {
        let store = Arc::new(InMemoryAdmissionStore::with_latency(Duration::from_millis(1)));
        let allocator = SequenceAllocator::new(store);

        let handles: Vec<_> = CourseCode::ALL
            .into_iter()
            .flat_map(|code| (0..10).map(move |_| Partition::new(code, 2024)))
            .map(|partition| {
                let allocator = allocator.clone();
                tokio::spawn(async move { (partition, allocator.allocate(partition).await) })
            })
            .collect();

        let mut per_partition: std::collections::HashMap<Partition, Vec<u32>> =
            std::collections::HashMap::new();
        for handle in handles {
            let (partition, value) = handle.await.unwrap();
            per_partition.entry(partition).or_default().push(value.unwrap());
        }

        assert_eq!(per_partition.len(), CourseCode::ALL.len());
        for (_, mut values) in per_partition {
            values.sort_unstable();
            assert_eq!(values, (1..=10).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_allocation_failure() {
        let store = Arc::new(InMemoryAdmissionStore::new());
        store.fail_allocations(true);
        let allocator = SequenceAllocator::new(store);

        let err = allocator
            .allocate(Partition::new(CourseCode::Bba, 2024))
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionError::AllocationFailure { .. }));
    }

    #[tokio::test]
    async fn test_non_positive_counter_is_rejected() {
        let allocator = SequenceAllocator::new(Arc::new(FixedCounter(0)));
        let err = allocator
            .allocate(Partition::new(CourseCode::Mba, 2024))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdmissionError::AllocationFailure {
                source: StoreError::InvalidState(_),
                ..
            }
        ));
    }
}
