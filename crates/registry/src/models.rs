//! On-disk catalog format.
//!
//! A catalog file declares its field vocabulary once and lets operations
//! reference fields by name:
//!
//! ```json
//! {
//!   "panel": "local",
//!   "title": "Local SEO",
//!   "categories": [{ "id": "local", "label": "Local" }],
//!   "fields": { "name": { "label": "Business Name", "kind": "text" } },
//!   "operations": [{
//!     "id": "gmb_manager",
//!     "label": "GMB Manager",
//!     "category": "local",
//!     "endpoint": "/local_seo/gmb_manager",
//!     "inputs": ["name"],
//!     "manual_url": true
//!   }]
//! }
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use seodeck_types::{
    Catalog, Category, FieldGroup, FieldKind, HttpMethod, InputField, OperationDescriptor, PanelId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::RegistryError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub panel: PanelId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldSpec>,
    pub operations: Vec<OperationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub body_key: Option<String>,
    #[serde(default)]
    pub only_without_url: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationEntry {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub endpoint: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub manual_url: bool,
    #[serde(default)]
    pub groups: Vec<FieldGroup>,
    #[serde(default)]
    pub defaults: Map<String, Value>,
    #[serde(default = "default_send_body")]
    pub send_body: bool,
}

fn default_send_body() -> bool {
    true
}

impl CatalogFile {
    pub fn parse(file: &str, raw: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(raw).map_err(|error| RegistryError::Parse {
            file: file.to_string(),
            message: error.to_string(),
        })
    }

    /// Validate references and expand field names into full descriptors.
    pub fn resolve(self) -> Result<Catalog, RegistryError> {
        let panel = self.panel;
        for (name, spec) in &self.fields {
            if spec.kind == FieldKind::Enum && spec.options.is_empty() {
                return Err(RegistryError::EnumWithoutOptions {
                    panel,
                    field: name.clone(),
                });
            }
        }

        let category_ids: HashSet<&str> = self.categories.iter().map(|category| category.id.as_str()).collect();
        let mut seen_ids = HashSet::new();
        let mut operations = Vec::with_capacity(self.operations.len());

        for entry in self.operations {
            if !seen_ids.insert(entry.id.clone()) {
                return Err(RegistryError::DuplicateOperation {
                    panel,
                    operation: entry.id,
                });
            }
            if !category_ids.contains(entry.category.as_str()) {
                return Err(RegistryError::UnknownCategory {
                    panel,
                    operation: entry.id,
                    category: entry.category,
                });
            }

            if let Some(field) = entry.inputs.iter().find(|field| !self.fields.contains_key(*field)) {
                return Err(RegistryError::UnknownField {
                    panel,
                    operation: entry.id.clone(),
                    field: field.clone(),
                });
            }
            let grouped = entry
                .groups
                .iter()
                .flat_map(|group| group.fields.iter().chain(group.requires.iter()));
            for field in grouped {
                if !entry.inputs.contains(field) {
                    return Err(RegistryError::GroupFieldNotInput {
                        panel,
                        operation: entry.id.clone(),
                        field: field.clone(),
                    });
                }
            }

            let input_fields = entry
                .inputs
                .iter()
                .filter_map(|name| self.fields.get(name).map(|spec| spec.to_input_field(name)))
                .collect();

            operations.push(OperationDescriptor {
                id: entry.id,
                label: entry.label,
                description: entry.description,
                category: entry.category,
                endpoint: entry.endpoint,
                method: entry.method,
                input_fields,
                manual_url: entry.manual_url,
                groups: entry.groups,
                defaults: entry.defaults,
                send_body: entry.send_body,
            });
        }

        Ok(Catalog {
            panel,
            title: self.title,
            description: self.description,
            categories: self.categories,
            operations,
        })
    }
}

impl FieldSpec {
    fn to_input_field(&self, name: &str) -> InputField {
        InputField {
            name: name.to_string(),
            label: self.label.clone(),
            kind: self.kind,
            placeholder: self.placeholder.clone(),
            options: self.options.clone(),
            default: self.default.clone(),
            body_key: self.body_key.clone(),
            only_without_url: self.only_without_url,
        }
    }
}
