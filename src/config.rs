//! Import configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// A property to read during import and the value used when it is absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Property key in the graph store
    pub property: String,

    /// Value assumed when the property is missing
    #[serde(default)]
    pub default: f64,
}

impl PropertySpec {
    pub fn new(property: impl Into<String>, default: f64) -> Self {
        Self {
            property: property.into(),
            default,
        }
    }
}

/// How relationships are pulled out of the graph store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSetup {
    /// Desired number of importer threads
    pub concurrency: usize,

    /// Only load relationships of this type; `None` loads every type
    pub relationship_type: Option<String>,

    /// Store both directions of every relationship in a single sorted list
    pub load_as_undirected: bool,

    /// Load incoming relationships (ignored when undirected)
    pub load_incoming: bool,

    /// Load outgoing relationships (ignored when undirected)
    pub load_outgoing: bool,

    /// Relationship property recorded as weight
    pub relationship_weight: Option<PropertySpec>,

    /// Node property recorded as node weight
    pub node_weight: Option<PropertySpec>,

    /// Additional node property
    pub node_property: Option<PropertySpec>,
}

impl Default for GraphSetup {
    fn default() -> Self {
        Self {
            concurrency: num_cpus::get(),
            relationship_type: None,
            load_as_undirected: false,
            load_incoming: false,
            load_outgoing: true,
            relationship_weight: None,
            node_weight: None,
            node_property: None,
        }
    }
}

impl GraphSetup {
    /// Create a directed, unweighted setup
    pub fn new(concurrency: usize, load_outgoing: bool, load_incoming: bool) -> Self {
        Self {
            concurrency,
            load_outgoing,
            load_incoming,
            ..Self::default()
        }
    }

    /// Read a setup from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading graph setup {}", path.display()))?;
        let setup: GraphSetup = serde_json::from_str(&raw)
            .with_context(|| format!("parsing graph setup {}", path.display()))?;
        setup.validate()?;
        Ok(setup)
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        if self.concurrency == 0 {
            return Err(ImportError::InvalidSetup(
                "concurrency must be at least 1".to_string(),
            ));
        }
        let specs = [&self.relationship_weight, &self.node_weight, &self.node_property];
        if specs.into_iter().flatten().any(|spec| spec.property.is_empty()) {
            return Err(ImportError::InvalidSetup(
                "property keys must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
