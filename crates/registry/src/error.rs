use seodeck_types::PanelId;
use thiserror::Error;

/// Errors raised while loading or querying catalogs.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to parse catalog {file}: {message}")]
    Parse { file: String, message: String },
    #[error("catalog for panel '{panel}' registered twice")]
    DuplicateCatalog { panel: PanelId },
    #[error("panel '{panel}': duplicate operation id '{operation}'")]
    DuplicateOperation { panel: PanelId, operation: String },
    #[error("panel '{panel}': operation '{operation}' references undeclared field '{field}'")]
    UnknownField {
        panel: PanelId,
        operation: String,
        field: String,
    },
    #[error("panel '{panel}': operation '{operation}' groups field '{field}' which is not one of its inputs")]
    GroupFieldNotInput {
        panel: PanelId,
        operation: String,
        field: String,
    },
    #[error("panel '{panel}': operation '{operation}' uses undeclared category '{category}'")]
    UnknownCategory {
        panel: PanelId,
        operation: String,
        category: String,
    },
    #[error("panel '{panel}': enum field '{field}' declares no options")]
    EnumWithoutOptions { panel: PanelId, field: String },
    #[error("no catalog registered for panel '{panel}'")]
    UnknownPanel { panel: PanelId },
    #[error("panel '{panel}' has no operation '{operation}'")]
    UnknownOperation { panel: PanelId, operation: String },
    #[error("operation '{operation}' on panel '{panel}' has no input '{field}' (expected one of: {expected})")]
    UnknownInput {
        panel: PanelId,
        operation: String,
        field: String,
        expected: String,
    },
}
