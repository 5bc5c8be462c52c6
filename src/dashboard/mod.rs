//! The dashboard: state store, its event loop and text rendering

pub mod render;
pub mod state;
pub mod store;

pub use state::{RequestTag, SarRejection};
pub use store::{Dashboard, DashboardEvent, Flow};
