//! Parquet relationship files

use anyhow::{anyhow, Result};
use polars::prelude::*;

use crate::data::InMemoryGraphStore;

/// Column layout of a relationship file
#[derive(Debug, Clone)]
pub struct RelationshipColumns {
    pub source: String,
    pub target: String,
    /// Optional weight column, stored under its own name as property key
    pub weight: Option<String>,
}

impl Default for RelationshipColumns {
    fn default() -> Self {
        Self {
            source: "source".to_string(),
            target: "target".to_string(),
            weight: None,
        }
    }
}

/// Load a parquet file of relationships into an in-memory store
pub fn load_store(path: &str, columns: &RelationshipColumns, rel_type: &str) -> Result<InMemoryGraphStore> {
    log::info!("Reading parquet file: {}", path);

    if !std::path::Path::new(path).exists() {
        return Err(anyhow!("File not found: {}", path));
    }

    let mut selection = vec![
        col(columns.source.as_str()).cast(DataType::UInt64),
        col(columns.target.as_str()).cast(DataType::UInt64),
    ];
    if let Some(weight) = &columns.weight {
        selection.push(col(weight.as_str()).cast(DataType::Float64));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?
        .select(selection)
        .collect()?;

    log::info!("Loaded {} relationships", df.height());

    let sources = df.column(&columns.source)?.u64()?;
    let targets = df.column(&columns.target)?.u64()?;
    let weights = match &columns.weight {
        Some(weight) => Some(df.column(weight)?.f64()?),
        None => None,
    };
    let weight_key = columns.weight.as_deref().unwrap_or("weight");

    let triples = (0..df.height()).filter_map(|i| {
        let source = sources.get(i)?;
        let target = targets.get(i)?;
        let weight = weights.and_then(|w| w.get(i));
        Some((source, target, weight))
    });

    let store = InMemoryGraphStore::from_triples(rel_type, weight_key, triples);
    log::info!(
        "Built store with {} nodes and {} relationships",
        store.node_count(),
        store.relationship_count()
    );
    Ok(store)
}
