//! Error types for relationship import

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(
        "There are only {available} threads available and with {node_count} nodes this would mean \
         that every thread would have to process {batch_size} nodes each, which is too large and unsupported."
    )]
    NotEnoughThreads {
        available: u64,
        node_count: u64,
        batch_size: u64,
    },

    #[error("No threads are available to import {node_count} nodes")]
    NoThreadsAvailable { node_count: u64 },

    #[error("Importing {node_count} nodes would need {threads} threads which cannot be created.")]
    TooManyThreads { node_count: u64, threads: u64 },

    #[error("invalid graph setup: {0}")]
    InvalidSetup(String),

    #[error("relationship import worker panicked: {0}")]
    WorkerPanicked(String),
}
