//! Registry crate for the operation catalogs shown on each panel.
//!
//! Catalogs are plain JSON data files under `catalogs/`, embedded at compile
//! time and validated on load. The agents catalog is the exception: it is
//! synthesized from the backend's `/agents` listing at runtime.

mod agents;
mod error;
mod models;
mod search;

use std::sync::Arc;

use indexmap::IndexMap;
use seodeck_types::{Catalog, OperationDescriptor, PanelId};
use tracing::debug;

pub use agents::agents_catalog;
pub use error::RegistryError;
pub use models::{CatalogFile, FieldSpec, OperationEntry};
pub use search::{SearchHit, search_catalogs};

const EMBEDDED_CATALOGS: &[(&str, &str)] = &[
    ("orchestration.json", include_str!("../catalogs/orchestration.json")),
    ("phases.json", include_str!("../catalogs/phases.json")),
    ("technical.json", include_str!("../catalogs/technical.json")),
    ("on_page.json", include_str!("../catalogs/on_page.json")),
    ("local.json", include_str!("../catalogs/local.json")),
    ("off_page.json", include_str!("../catalogs/off_page.json")),
];

/// All static catalogs keyed by panel, in display order.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: IndexMap<PanelId, Arc<Catalog>>,
}

impl CatalogRegistry {
    /// Load and validate every embedded catalog file.
    pub fn from_embedded() -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for (file_name, raw) in EMBEDDED_CATALOGS {
            registry.insert(CatalogFile::parse(file_name, raw)?.resolve()?)?;
        }
        debug!(
            catalogs = registry.catalogs.len(),
            operations = registry.operation_count(),
            "loaded embedded catalogs"
        );
        Ok(registry)
    }

    /// Add a catalog; each panel may be registered once.
    pub fn insert(&mut self, catalog: Catalog) -> Result<(), RegistryError> {
        if self.catalogs.contains_key(&catalog.panel) {
            return Err(RegistryError::DuplicateCatalog { panel: catalog.panel });
        }
        self.catalogs.insert(catalog.panel, Arc::new(catalog));
        Ok(())
    }

    pub fn get(&self, panel: PanelId) -> Option<Arc<Catalog>> {
        self.catalogs.get(&panel).cloned()
    }

    pub fn find_operation(&self, panel: PanelId, operation_id: &str) -> Result<&OperationDescriptor, RegistryError> {
        let catalog = self.catalogs.get(&panel).ok_or(RegistryError::UnknownPanel { panel })?;
        catalog.find(operation_id).ok_or_else(|| RegistryError::UnknownOperation {
            panel,
            operation: operation_id.to_string(),
        })
    }

    pub fn catalogs(&self) -> impl Iterator<Item = &Arc<Catalog>> {
        self.catalogs.values()
    }

    pub fn operation_count(&self) -> usize {
        self.catalogs.values().map(|catalog| catalog.len()).sum()
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search_catalogs(self.catalogs.values().map(Arc::as_ref), query)
    }
}
