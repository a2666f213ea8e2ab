//! UI rendering and the terminal runtime.

pub mod components;
pub mod main_component;
pub mod runtime;
