//! # Seodeck Engine
//!
//! Presentation state for the dashboard, independent of any rendering.
//!
//! - **`body`**: turns raw operator input into a JSON request body
//! - **`panel`**: the generic panel controller, one instance per catalog
//! - **`dashboard`**: health, agents, dependency and log projections
//! - **`session`**: the global target URL, every panel, and the event stream

pub mod body;
pub mod dashboard;
pub mod events;
pub mod panel;
pub mod session;

pub use body::{FieldError, FieldValues, build_request_body};
pub use dashboard::{DashboardController, LOG_PAGE_SIZE, LogPager};
pub use events::PanelEvent;
pub use panel::{ExecuteOutcome, LastResult, PanelController, PanelSnapshot};
pub use session::{GlobalTarget, Session};
