//! Shared type definitions for the Seodeck workspace.
//!
//! These types are used across the API client, the catalog registry, the
//! panel engine and the terminal UI. They intentionally carry no I/O.
//!
//! - [`operation`]: static operation descriptors and catalogs
//! - [`panel`]: the set of feature-area panels
//! - [`result`]: the envelope returned by an operation invocation
//! - [`dashboard`]: read-only view models fetched for dashboard display

pub mod dashboard;
pub mod operation;
pub mod panel;
pub mod result;

pub use dashboard::*;
pub use operation::*;
pub use panel::{PanelId, ParsePanelIdError};
pub use result::ExecutionResult;
