//! Thread count and batch size for a parallel import

use crate::error::{ImportError, Result};
use crate::import::pool::WorkerPool;

/// Upper bound for the number of nodes in one batch; every batch
/// pre-allocates arrays of this length
pub const MAX_BATCH_SIZE: u64 = 2_000_000_000;

/// Largest power of two not above `MAX_BATCH_SIZE`
const LARGEST_BATCH: u64 = 1 << 30;

/// Number of importer threads and the power-of-two batch each one owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadSizing {
    number_of_threads: usize,
    batch_size: usize,
}

impl ThreadSizing {
    /// Size an import of `node_count` nodes on `pool`
    pub fn new<P: WorkerPool>(concurrency: usize, node_count: u64, pool: &P) -> Result<Self> {
        Self::with_available_workers(concurrency, node_count, pool.available_workers())
    }

    /// Size an import given how many workers can start immediately
    /// (`None` when the pool never queues).
    ///
    /// Every batch has to run at the same time: the caller blocks until all
    /// importers are done, so a batch stuck in a queue behind the others would
    /// never finish. With a capped pool the thread count is lowered to what is
    /// available and the batch grows instead.
    pub fn with_available_workers(
        concurrency: usize,
        node_count: u64,
        available: Option<usize>,
    ) -> Result<Self> {
        let thread_lower_bound = node_count / MAX_BATCH_SIZE;
        let min_threads = ceil_div(node_count, LARGEST_BATCH);

        let mut target_threads = concurrency.max(1) as u64;
        // node ids are split into batches by shifting, hence the power of two
        let mut batch_size = batch_size_for(node_count, target_threads);

        while batch_size > MAX_BATCH_SIZE {
            target_threads = thread_lower_bound
                .max(target_threads + 1)
                .max(min_threads);
            batch_size = batch_size_for(node_count, target_threads);
        }

        if let Some(available) = available {
            let available = available as u64;
            if available < target_threads {
                if available == 0 {
                    return Err(ImportError::NoThreadsAvailable { node_count });
                }
                log::debug!(
                    "Only {} of {} requested threads available",
                    available,
                    target_threads
                );
                target_threads = available;
                batch_size = batch_size_for(node_count, target_threads);
                if batch_size > MAX_BATCH_SIZE {
                    return Err(ImportError::NotEnoughThreads {
                        available,
                        node_count,
                        batch_size,
                    });
                }
            }
        }

        if target_threads > MAX_BATCH_SIZE {
            return Err(ImportError::TooManyThreads {
                node_count,
                threads: target_threads,
            });
        }

        // both are below MAX_BATCH_SIZE
        Ok(Self {
            number_of_threads: target_threads as usize,
            batch_size: batch_size as usize,
        })
    }

    pub fn number_of_threads(&self) -> usize {
        self.number_of_threads
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of non-empty batches needed for `node_count` nodes
    pub fn batch_count(&self, node_count: usize) -> usize {
        if node_count == 0 {
            0
        } else {
            1 + (node_count - 1) / self.batch_size
        }
    }
}

fn ceil_div(dividend: u64, divisor: u64) -> u64 {
    if dividend == 0 {
        0
    } else {
        1 + (dividend - 1) / divisor
    }
}

fn batch_size_for(node_count: u64, threads: u64) -> u64 {
    ceil_div(node_count, threads)
        .checked_next_power_of_two()
        .unwrap_or(u64::MAX)
}
