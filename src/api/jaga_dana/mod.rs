pub mod client;
pub mod models;
pub mod sse;

pub use client::BackendClient;
pub use models::ApiError;
