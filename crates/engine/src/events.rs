use seodeck_types::PanelId;

/// Notifications emitted while panels execute operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    Started { panel: PanelId, operation: String },
    Succeeded { panel: PanelId, operation: String },
    Failed { panel: PanelId, operation: String, message: String },
    /// Input validation failed before anything was sent.
    Invalid { panel: PanelId, operation: String, field: String, message: String },
    /// Backend state changed; dashboard projections should be re-fetched.
    RefreshRequested { generation: u64 },
}

impl PanelEvent {
    /// A one-line notification suitable for a toast.
    pub fn summary(&self) -> String {
        match self {
            Self::Started { operation, .. } => format!("Running {operation}..."),
            Self::Succeeded { operation, .. } => format!("{operation} completed successfully"),
            Self::Failed { operation, message, .. } => format!("{operation} failed: {message}"),
            Self::Invalid { message, .. } => message.clone(),
            Self::RefreshRequested { .. } => "Refreshing dashboard".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Invalid { .. })
    }
}
