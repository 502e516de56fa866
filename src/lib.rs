//! Compressed adjacency storage and parallel relationship import

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod import;
pub mod storage;

pub use config::{GraphSetup, PropertySpec};
pub use error::{ImportError, Result};
pub use import::{load_relationships, ImportedGraph};
