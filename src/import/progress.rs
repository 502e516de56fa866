//! Shared import progress counter

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts processed nodes across all importer threads and logs every 10%
#[derive(Debug)]
pub struct ImportProgress {
    total: usize,
    step: usize,
    imported: AtomicUsize,
}

impl ImportProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            step: (total / 10).max(1),
            imported: AtomicUsize::new(0),
        }
    }

    /// Record one processed node, found in the store or not
    pub fn node_imported(&self) {
        let done = self.imported.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.step == 0 || done == self.total {
            log::info!(
                "Imported {} of {} nodes ({}%)",
                done,
                self.total,
                done * 100 / self.total.max(1)
            );
        }
    }

    pub fn imported(&self) -> usize {
        self.imported.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
