//! Request-body construction from raw operator input.
//!
//! Every field value is kept as the string the operator typed. Building a
//! body applies each field's declared transform:
//!
//! - `list`: split on commas, trimmed, empty items dropped, order kept
//! - `json`: parsed; a parse failure aborts the whole submission
//! - `integer`: parsed as a base-10 integer
//! - everything else is sent as a trimmed string
//!
//! Empty values fall back to the field's declared default and are omitted
//! when there is none.

use indexmap::IndexMap;
use seodeck_types::{FieldKind, GroupShape, InputField, OperationDescriptor};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Raw values for one operation, keyed by field name.
pub type FieldValues = IndexMap<String, String>;

/// A field value that cannot be transformed into its declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{label}: invalid JSON ({message})")]
    InvalidJson {
        field: String,
        label: String,
        message: String,
    },
    #[error("{label}: expected a whole number, got '{value}'")]
    InvalidInteger { field: String, label: String, value: String },
}

impl FieldError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidJson { field, .. } | Self::InvalidInteger { field, .. } => field,
        }
    }
}

/// Build the JSON body for `operation`.
///
/// `url` is taken from `global_url` when set, otherwise from the operation's
/// own `url` field when it exposes one. Fields flagged `only_without_url`
/// (and groups flagged likewise) are left out whenever a URL is present.
pub fn build_request_body(
    operation: &OperationDescriptor,
    global_url: Option<&str>,
    values: Option<&FieldValues>,
) -> Result<Map<String, Value>, FieldError> {
    let mut body = Map::new();
    let url = non_blank(global_url).or_else(|| {
        operation
            .manual_url
            .then(|| raw_value(values, OperationDescriptor::URL_FIELD))
            .flatten()
    });
    let has_url = url.is_some();
    if let Some(url) = url {
        body.insert(OperationDescriptor::URL_FIELD.to_string(), Value::String(url.to_string()));
    }

    let effective = |field: &InputField| -> Option<String> {
        raw_value(values, &field.name)
            .map(str::to_string)
            .or_else(|| non_blank(field.default.as_deref()).map(str::to_string))
    };

    for field in &operation.input_fields {
        if operation.is_grouped(&field.name) || (field.only_without_url && has_url) {
            continue;
        }
        if let Some(value) = effective(field) {
            body.insert(field.body_key().to_string(), transform(field, &value)?);
        }
    }

    for group in &operation.groups {
        if group.only_without_url && has_url {
            continue;
        }
        let required_present = group
            .requires
            .as_deref()
            .and_then(|name| operation.field(name))
            .is_none_or(|field| effective(field).is_some());
        if !required_present {
            continue;
        }

        let mut members = Map::new();
        for field in group.fields.iter().filter_map(|name| operation.field(name)) {
            if let Some(value) = effective(field) {
                members.insert(field.body_key().to_string(), transform(field, &value)?);
            }
        }
        if members.is_empty() {
            continue;
        }
        let nested = match group.shape {
            GroupShape::Object => Value::Object(members),
            GroupShape::List => Value::Array(vec![Value::Object(members)]),
        };
        body.insert(group.key.clone(), nested);
    }

    for (key, value) in &operation.defaults {
        body.entry(key.clone()).or_insert_with(|| value.clone());
    }

    Ok(body)
}

fn raw_value<'a>(values: Option<&'a FieldValues>, name: &str) -> Option<&'a str> {
    non_blank(values.and_then(|values| values.get(name)).map(String::as_str))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn transform(field: &InputField, value: &str) -> Result<Value, FieldError> {
    match field.kind {
        FieldKind::List => Ok(Value::Array(split_list(value).into_iter().map(Value::String).collect())),
        FieldKind::Json => serde_json::from_str(value).map_err(|error| FieldError::InvalidJson {
            field: field.name.clone(),
            label: field.label.clone(),
            message: error.to_string(),
        }),
        FieldKind::Integer => value
            .parse::<i64>()
            .map(|number| Value::Number(Number::from(number)))
            .map_err(|_| FieldError::InvalidInteger {
                field: field.name.clone(),
                label: field.label.clone(),
                value: value.to_string(),
            }),
        FieldKind::Text | FieldKind::LongText | FieldKind::Enum | FieldKind::Date => Ok(Value::String(value.to_string())),
    }
}

/// `"a, b ,c"` -> `["a", "b", "c"]`
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use seodeck_types::{FieldGroup, HttpMethod};
    use serde_json::json;

    use super::*;

    fn field(name: &str, kind: FieldKind) -> InputField {
        InputField {
            name: name.into(),
            label: name.replace('_', " "),
            kind,
            placeholder: String::new(),
            options: vec![],
            default: None,
            body_key: None,
            only_without_url: false,
        }
    }

    fn operation(input_fields: Vec<InputField>) -> OperationDescriptor {
        OperationDescriptor {
            id: "op".into(),
            label: "Op".into(),
            description: String::new(),
            category: "test".into(),
            endpoint: "/op".into(),
            method: HttpMethod::Post,
            input_fields,
            manual_url: true,
            groups: vec![],
            defaults: Map::new(),
            send_body: true,
        }
    }

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn comma_lists_are_trimmed_and_ordered() {
        let op = operation(vec![field("keywords", FieldKind::List)]);
        let body = build_request_body(&op, None, Some(&values(&[("keywords", "a, b ,c")]))).expect("body");
        assert_eq!(Value::Object(body), json!({ "keywords": ["a", "b", "c"] }));
        assert_eq!(split_list("x,,x , "), vec!["x", "x"]);
    }

    #[test]
    fn invalid_json_aborts_with_the_field_name() {
        let op = operation(vec![field("backlink_data", FieldKind::Json)]);
        let error = build_request_body(&op, None, Some(&values(&[("backlink_data", "{not valid")]))).unwrap_err();
        assert_eq!(error.field(), "backlink_data");
        assert!(error.to_string().starts_with("backlink data: invalid JSON"), "{error}");
    }

    #[test]
    fn integers_parse_and_defaults_fill_blanks() {
        let mut limit = field("site_limit", FieldKind::Integer);
        limit.default = Some("50".into());
        let op = operation(vec![limit]);

        let body = build_request_body(&op, None, None).expect("body");
        assert_eq!(Value::Object(body), json!({ "site_limit": 50 }));

        let body = build_request_body(&op, None, Some(&values(&[("site_limit", " 20 ")]))).expect("body");
        assert_eq!(Value::Object(body), json!({ "site_limit": 20 }));

        let error = build_request_body(&op, None, Some(&values(&[("site_limit", "lots")]))).unwrap_err();
        assert!(matches!(error, FieldError::InvalidInteger { .. }));
    }

    #[test]
    fn global_url_wins_over_manual_url() {
        let op = operation(vec![]);
        let typed = values(&[("url", "https://manual.example")]);

        let body = build_request_body(&op, Some("https://global.example"), Some(&typed)).expect("body");
        assert_eq!(body["url"], "https://global.example");

        let body = build_request_body(&op, Some("   "), Some(&typed)).expect("body");
        assert_eq!(body["url"], "https://manual.example");

        let mut no_manual = op.clone();
        no_manual.manual_url = false;
        let body = build_request_body(&no_manual, None, Some(&typed)).expect("body");
        assert!(body.is_empty());
    }

    #[test]
    fn url_suppresses_only_without_url_fields() {
        let mut profile = field("backlink_profile", FieldKind::Json);
        profile.only_without_url = true;
        let op = operation(vec![field("keywords", FieldKind::List), profile]);
        let typed = values(&[("keywords", "seo"), ("backlink_profile", "{not even parsed")]);

        let body = build_request_body(&op, Some("https://example.com"), Some(&typed)).expect("body");
        assert_eq!(Value::Object(body), json!({ "url": "https://example.com", "keywords": ["seo"] }));
    }

    #[test]
    fn groups_nest_members_when_required_field_is_set() {
        let mut op = operation(vec![
            field("name", FieldKind::Text),
            field("phone", FieldKind::Text),
            field("competitors", FieldKind::List),
        ]);
        op.input_fields[2].body_key = Some("competitor_urls".into());
        op.groups = vec![FieldGroup {
            key: "listings".into(),
            shape: GroupShape::List,
            fields: vec!["name".into(), "phone".into()],
            requires: Some("name".into()),
            only_without_url: true,
        }];
        op.defaults.insert("mode".into(), json!("full"));

        let typed = values(&[("name", "Cafe"), ("phone", "555"), ("competitors", "a.com, b.com")]);
        let body = build_request_body(&op, None, Some(&typed)).expect("body");
        assert_eq!(
            Value::Object(body),
            json!({
                "competitor_urls": ["a.com", "b.com"],
                "listings": [{ "name": "Cafe", "phone": "555" }],
                "mode": "full"
            })
        );

        let without_name = values(&[("phone", "555")]);
        let body = build_request_body(&op, None, Some(&without_name)).expect("body");
        assert!(!body.contains_key("listings"));
        assert!(!body.contains_key("phone"), "grouped fields never appear at the top level");

        let body = build_request_body(&op, Some("https://example.com"), Some(&typed)).expect("body");
        assert!(!body.contains_key("listings"));
    }

    #[test]
    fn empty_fields_produce_an_empty_body() {
        let op = operation(vec![field("content", FieldKind::LongText)]);
        let body = build_request_body(&op, None, Some(&values(&[("content", "   ")]))).expect("body");
        assert!(body.is_empty());
    }
}
