//! Operation descriptors and the catalogs that group them.
//!
//! An [`OperationDescriptor`] describes one backend capability: the fixed
//! endpoint it posts to and the free-form input fields an operator may fill
//! before invoking it. Descriptors are static data; the registry crate loads
//! them from embedded catalog files.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::PanelId;

/// The declared kind of an input field. The kind selects the transform that
/// is applied to the raw string value when a request body is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text, sent as a string.
    #[default]
    Text,
    /// Multi-line text, sent as a string.
    LongText,
    /// A JSON blob parsed and sent as structured JSON.
    Json,
    /// Parsed as a base-10 integer.
    Integer,
    /// One of a fixed set of options, sent as a string.
    Enum,
    /// A date in `YYYY-MM-DD` form, sent as a string.
    Date,
    /// Comma-separated values split into an ordered sequence.
    List,
}

impl FieldKind {
    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::LongText | Self::Json)
    }
}

/// One named input accepted by an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub placeholder: String,
    /// Allowed values for [`FieldKind::Enum`] fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Pre-filled value used when the operator leaves the field untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Key to serialize the value under when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_key: Option<String>,
    /// Only sent when no target URL is available for the request.
    #[serde(default)]
    pub only_without_url: bool,
}

impl InputField {
    /// The key this field's value is written under in a request body.
    pub fn body_key(&self) -> &str {
        self.body_key.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupShape {
    /// `{ "<key>": { field: value, ... } }`
    #[default]
    Object,
    /// `{ "<key>": [ { field: value, ... } ] }`
    List,
}

/// A set of input fields nested under a single body key instead of being
/// written at the top level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub key: String,
    #[serde(default)]
    pub shape: GroupShape,
    pub fields: Vec<String>,
    /// The group is emitted only when this field has a non-empty value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
    #[serde(default)]
    pub only_without_url: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Whether resending the request after an ambiguous failure is safe.
    pub fn is_idempotent(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A static description of one invocable backend operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Unique key within the owning catalog.
    pub id: String,
    pub label: String,
    pub description: String,
    /// Grouping tag used for client-side filtering only.
    pub category: String,
    /// Fixed request path, including any static query string.
    pub endpoint: String,
    #[serde(default)]
    pub method: HttpMethod,
    /// Ordered input fields; the `url` field is implied by `manual_url`.
    #[serde(default)]
    pub input_fields: Vec<InputField>,
    /// Whether the operation offers its own URL field as a fallback for the
    /// global target URL.
    #[serde(default)]
    pub manual_url: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<FieldGroup>,
    /// Constant entries merged into every request body.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub defaults: Map<String, Value>,
    /// When false the request is sent without a body.
    #[serde(default = "default_true")]
    pub send_body: bool,
}

fn default_true() -> bool {
    true
}

impl OperationDescriptor {
    /// The name of the per-operation manual URL field.
    pub const URL_FIELD: &'static str = "url";

    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.input_fields.iter().find(|field| field.name == name)
    }

    /// Whether the named field is written inside a group rather than at the
    /// top level of the body.
    pub fn is_grouped(&self, name: &str) -> bool {
        self.groups.iter().any(|group| group.fields.iter().any(|field| field == name))
    }

    /// Every field name the operator may edit, starting with `url` when the
    /// operation exposes a manual URL field.
    pub fn editable_field_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.input_fields.len() + 1);
        if self.manual_url {
            names.push(Self::URL_FIELD);
        }
        names.extend(self.input_fields.iter().map(|field| field.name.as_str()));
        names
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

/// An ordered list of operations shown on one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub panel: PanelId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    pub operations: Vec<OperationDescriptor>,
}

impl Catalog {
    pub fn find(&self, operation_id: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|operation| operation.id == operation_id)
    }

    /// Operations in the given category, or all operations when `category`
    /// is `None`. Catalog order is preserved.
    pub fn filter<'a>(&'a self, category: Option<&'a str>) -> impl Iterator<Item = &'a OperationDescriptor> + 'a {
        self.operations
            .iter()
            .filter(move |operation| category.is_none_or(|wanted| operation.category == wanted))
    }

    pub fn category_label(&self, category_id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.id == category_id)
            .map(|category| category.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str, category: &str) -> OperationDescriptor {
        OperationDescriptor {
            id: id.into(),
            label: id.into(),
            description: String::new(),
            category: category.into(),
            endpoint: format!("/{id}"),
            method: HttpMethod::Post,
            input_fields: vec![],
            manual_url: true,
            groups: vec![],
            defaults: Map::new(),
            send_body: true,
        }
    }

    #[test]
    fn filter_preserves_catalog_order() {
        let catalog = Catalog {
            panel: PanelId::Technical,
            title: "Technical SEO".into(),
            description: String::new(),
            categories: vec![],
            operations: vec![
                descriptor("robots", "crawling"),
                descriptor("speed", "performance"),
                descriptor("sitemap", "crawling"),
            ],
        };

        let crawling: Vec<_> = catalog.filter(Some("crawling")).map(|op| op.id.as_str()).collect();
        assert_eq!(crawling, vec!["robots", "sitemap"]);
        assert_eq!(catalog.filter(None).count(), 3);
        assert_eq!(catalog.filter(Some("missing")).count(), 0);
    }

    #[test]
    fn descriptor_defaults_when_deserialized() {
        let op: OperationDescriptor = serde_json::from_value(serde_json::json!({
            "id": "ssl_https_check",
            "label": "SSL/HTTPS Checker",
            "description": "",
            "category": "security",
            "endpoint": "/technical_seo/ssl_https_check"
        }))
        .expect("descriptor");
        assert_eq!(op.method, HttpMethod::Post);
        assert!(op.send_body);
        assert!(!op.manual_url);
        assert!(op.editable_field_names().is_empty());
    }

    #[test]
    fn body_key_falls_back_to_name() {
        let field = InputField {
            name: "benchmark_competitors".into(),
            label: "Competitors".into(),
            kind: FieldKind::List,
            placeholder: String::new(),
            options: vec![],
            default: None,
            body_key: Some("competitor_urls".into()),
            only_without_url: false,
        };
        assert_eq!(field.body_key(), "competitor_urls");
        let plain = InputField { body_key: None, ..field };
        assert_eq!(plain.body_key(), "benchmark_competitors");
    }
}
