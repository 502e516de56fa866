//! Worker pools that run importer batches side by side

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{ImportError, Result};

/// Runs a set of tasks concurrently and waits for all of them
pub trait WorkerPool {
    /// Workers that can pick up a task right away, `None` if tasks are never
    /// queued
    fn available_workers(&self) -> Option<usize>;

    /// Run `work` on every task at the same time and return once all are done
    fn run_all<T, F>(&self, tasks: &mut [T], work: F) -> Result<()>
    where
        T: Send,
        F: Fn(&mut T) + Sync;
}

/// A dedicated rayon pool.
///
/// Every thread of the pool is reported as available, so the import must
/// have the pool to itself; work queued by others would hold up batches.
impl WorkerPool for rayon::ThreadPool {
    fn available_workers(&self) -> Option<usize> {
        Some(self.current_num_threads())
    }

    fn run_all<T, F>(&self, tasks: &mut [T], work: F) -> Result<()>
    where
        T: Send,
        F: Fn(&mut T) + Sync,
    {
        let work = &work;
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.scope(|scope| {
                for task in tasks.iter_mut() {
                    scope.spawn(move |_| work(task));
                }
            })
        }))
        .map_err(|payload| ImportError::WorkerPanicked(panic_message(payload.as_ref())))
    }
}

/// One freshly spawned thread per task
#[derive(Debug, Clone, Copy, Default)]
pub struct DedicatedThreads;

impl WorkerPool for DedicatedThreads {
    fn available_workers(&self) -> Option<usize> {
        None
    }

    fn run_all<T, F>(&self, tasks: &mut [T], work: F) -> Result<()>
    where
        T: Send,
        F: Fn(&mut T) + Sync,
    {
        let work = &work;
        crossbeam::thread::scope(|scope| {
            for task in tasks.iter_mut() {
                scope.spawn(move |_| work(task));
            }
        })
        .map_err(|payload| ImportError::WorkerPanicked(panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(panics) = payload.downcast_ref::<Vec<Box<dyn Any + Send + 'static>>>() {
        // crossbeam collects the payloads of every panicked thread
        panics
            .first()
            .map(|first| panic_message(first.as_ref()))
            .unwrap_or_else(|| "unknown panic".to_string())
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    #[test]
    fn rayon_pool_reports_its_size() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap();
        assert_eq!(pool.available_workers(), Some(3));
        assert_eq!(DedicatedThreads.available_workers(), None);
    }

    #[test]
    fn every_task_runs_once() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let mut tasks = vec![1u64, 2, 3];
        pool.run_all(&mut tasks, |task| *task *= 10).unwrap();
        assert_eq!(tasks, vec![10, 20, 30]);

        DedicatedThreads.run_all(&mut tasks, |task| *task += 1).unwrap();
        assert_eq!(tasks, vec![11, 21, 31]);
    }

    #[test]
    fn tasks_run_concurrently() {
        // would never return if any task waited in a queue
        let barrier = Barrier::new(4);
        let mut tasks = vec![(); 4];
        DedicatedThreads
            .run_all(&mut tasks, |_| {
                barrier.wait();
            })
            .unwrap();

        let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        let barrier = Barrier::new(4);
        pool.run_all(&mut tasks, |_| {
            barrier.wait();
        })
        .unwrap();
    }

    #[test]
    fn worker_panics_become_errors() {
        let mut tasks = vec![0u8; 2];
        let err = DedicatedThreads
            .run_all(&mut tasks, |_| panic!("batch failed"))
            .unwrap_err();
        assert!(matches!(err, ImportError::WorkerPanicked(_)));

        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let err = pool.run_all(&mut tasks, |_| panic!("batch failed")).unwrap_err();
        assert!(err.to_string().contains("batch failed"));
    }
}
