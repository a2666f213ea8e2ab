pub mod common;
pub mod component;
mod dependencies;
mod header;
mod logs;
mod overview;
mod panel;
mod status_bar;
mod tabs;

pub(crate) use component::Component;
pub use dependencies::DependenciesComponent;
pub use header::HeaderComponent;
pub use logs::LogsComponent;
pub use overview::OverviewComponent;
pub use panel::PanelComponent;
pub use status_bar::StatusBarComponent;
pub use tabs::TabsComponent;
