//! DOM-free state, validation and formatting shared by the browser components.
pub mod forms;
pub mod store;
pub mod view;
